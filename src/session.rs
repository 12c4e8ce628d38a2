use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::Deserialize;

use crate::models::{RawId, Role};

/// Claims read from the token payload. The signature is the backend's business;
/// these only drive routing and which endpoints are called.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Claims {
    #[serde(default, deserialize_with = "crate::models::lenient")]
    pub sub: Option<RawId>,
    #[serde(default, deserialize_with = "crate::models::lenient")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "crate::models::lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "crate::models::lenient")]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "crate::models::lenient")]
    pub exp: Option<i64>,
}

/// Explicit per-request credentials, passed to every backend call that needs them.
#[derive(Debug, Clone)]
pub struct Session {
    token: String,
    claims: Claims,
}

impl Session {
    pub fn from_token(token: impl Into<String>) -> Self {
        let token = token.into().trim().to_string();
        let claims = decode_claims(&token).unwrap_or_default();
        Session { token, claims }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn claims(&self) -> &Claims {
        &self.claims
    }

    pub fn role(&self) -> Role {
        self.claims
            .role
            .as_deref()
            .map(Role::parse)
            .unwrap_or_default()
    }

    pub fn is_organizer(&self) -> bool {
        self.role() == Role::Organizer
    }

    /// A token without `exp` never expires on our side.
    pub fn is_expired(&self, now_unix: i64) -> bool {
        self.claims.exp.is_some_and(|exp| exp <= now_unix)
    }
}

fn decode_claims(token: &str) -> Option<Claims> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    serde_json::from_slice(&bytes).ok()
}
