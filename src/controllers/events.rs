use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

use crate::{
    error::AppError,
    filter::{self, FilterParams},
    middleware::OptionalSession,
    models::Event,
    normalize::event_from_value,
    AppState,
};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/events", get(list_events))
        .route("/events/{id}", get(get_event))
}

// GET /api/events
async fn list_events(
    State(state): State<Arc<AppState>>,
    OptionalSession(session): OptionalSession,
    params: Result<Query<FilterParams>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(params) = params?;
    params.validate()?;

    let raw = state.backend.list_events(session.as_ref()).await?;
    let events: Vec<Event> = raw.into_iter().map(event_from_value).collect();
    let listed = filter::apply(&events, &params, super::now());

    tracing::debug!(
        "Events listing: {} fetched, {} after filters (tab {:?})",
        events.len(),
        listed.len(),
        params.tab
    );

    Ok(Json(json!({
        "success": true,
        "count": listed.len(),
        "events": listed,
    })))
}

// GET /api/events/{id}
async fn get_event(
    State(state): State<Arc<AppState>>,
    OptionalSession(session): OptionalSession,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let raw = state.backend.get_event(&id, session.as_ref()).await?;
    if raw.is_null() {
        return Err(AppError::NotFound("Événement introuvable".to_string()));
    }

    Ok(Json(json!({
        "success": true,
        "event": event_from_value(raw),
    })))
}
