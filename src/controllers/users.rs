use axum::{extract::State, response::IntoResponse, routing::get, Json, Router};
use serde_json::json;
use std::sync::Arc;

use crate::{
    error::AppError,
    models::{RawUser, User},
    session::Session,
    AppState,
};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/me", get(current_user))
}

// GET /api/me
async fn current_user(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let raw = state.backend.current_user(&session).await?;
    let user = User::from_raw(serde_json::from_value::<RawUser>(raw).unwrap_or_default());

    Ok(Json(json!({
        "success": true,
        "user": user,
    })))
}
