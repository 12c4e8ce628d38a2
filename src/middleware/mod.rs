use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;
use std::sync::Arc;

use crate::{error::AppError, session::Session, AppState};

/// Bearer token from the Authorization header, falling back to the session cookie.
fn extract_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let from_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| {
            let (scheme, token) = value.trim().split_once(' ')?;
            scheme.eq_ignore_ascii_case("bearer").then(|| token.trim().to_string())
        });

    from_header
        .or_else(|| {
            CookieJar::from_headers(headers)
                .get(cookie_name)
                .map(|cookie| cookie.value().trim().to_string())
        })
        .map(|token| token.strip_prefix("Bearer ").map(str::to_string).unwrap_or(token))
        .filter(|token| !token.is_empty())
}

// Session required: missing or expired token -> 401
impl FromRequestParts<Arc<AppState>> for Session {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(&parts.headers, &state.config.session.cookie_name)
            .ok_or(AppError::Unauthorized)?;

        let session = Session::from_token(token);
        if session.is_expired(Utc::now().timestamp()) {
            tracing::debug!("Rejecting expired session token");
            return Err(AppError::Unauthorized);
        }

        Ok(session)
    }
}

/// Session if one was presented; anonymous otherwise. Never rejects.
#[derive(Debug, Clone)]
pub struct OptionalSession(pub Option<Session>);

impl FromRequestParts<Arc<AppState>> for OptionalSession {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let session = extract_token(&parts.headers, &state.config.session.cookie_name)
            .map(Session::from_token)
            .filter(|session| !session.is_expired(Utc::now().timestamp()));
        Ok(OptionalSession(session))
    }
}

/// Session whose token carries the organizer role.
#[derive(Debug, Clone)]
pub struct OrganizerSession(pub Session);

impl FromRequestParts<Arc<AppState>> for OrganizerSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state).await?;
        if !session.is_organizer() {
            return Err(AppError::Forbidden("Accès réservé aux organisateurs".to_string()));
        }
        Ok(OrganizerSession(session))
    }
}
