//! analytics.rs
//!
//! Organizer dashboard: reservation counts per status, tickets sold and
//! revenue, overall and per event.

use axum::{extract::State, response::IntoResponse, routing::get, Json, Router};
use std::sync::Arc;

use crate::{error::AppError, middleware::OrganizerSession, stats, AppState};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/analytics", get(get_dashboard))
}

/// GET /api/analytics
async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    OrganizerSession(session): OrganizerSession,
) -> Result<impl IntoResponse, AppError> {
    let reservations = super::reservations::load_reservations(&state, &session).await?;
    let summary = stats::summarize(&reservations);

    tracing::info!(
        "Dashboard: {} reservations, {} tickets, revenue {}",
        summary.total_reservations,
        summary.total_tickets,
        summary.total_revenue
    );

    Ok(Json(summary))
}
