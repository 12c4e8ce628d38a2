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
    models::Destination,
    normalize::destination_from_value,
    AppState,
};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/destinations", get(list_destinations))
        .route("/destinations/{slug}", get(get_destination))
}

// GET /api/destinations?query=&location=<country>
async fn list_destinations(
    State(state): State<Arc<AppState>>,
    OptionalSession(session): OptionalSession,
    params: Result<Query<FilterParams>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(params) = params?;
    params.validate()?;

    let raw = state.backend.list_destinations(session.as_ref()).await?;
    let destinations: Vec<Destination> = raw.into_iter().map(destination_from_value).collect();
    let listed = filter::apply(&destinations, &params, super::now());

    Ok(Json(json!({
        "success": true,
        "count": listed.len(),
        "destinations": listed,
    })))
}

// GET /api/destinations/{slug}
async fn get_destination(
    State(state): State<Arc<AppState>>,
    OptionalSession(session): OptionalSession,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let raw = state.backend.get_destination(&slug, session.as_ref()).await?;
    if raw.is_null() {
        return Err(AppError::NotFound("Destination introuvable".to_string()));
    }

    Ok(Json(json!({
        "success": true,
        "destination": destination_from_value(raw),
    })))
}
