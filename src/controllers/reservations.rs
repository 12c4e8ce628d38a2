//! reservations.rs
//!
//! Reservation listing, booking and cancellation on behalf of the session user.
//!
//! Organizers see every reservation, visitors only their own. Reservations
//! that reference their event by id only are completed from the events list,
//! fetched concurrently, so category/price/date filters still apply to them.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, warn};
use validator::Validate;

use crate::{
    backend_client::NewReservation,
    error::{AppError, BackendError},
    filter::{self, FilterParams},
    models::{Event, RawId, Reservation, ReservationStatus},
    normalize::{attach_events, event_from_value, reservation_from_value},
    session::Session,
    AppState,
};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/reservations", get(list_reservations).post(create_reservation))
        .route("/reservations/{id}/cancel", patch(cancel_reservation))
}

/// Fetches the session's reservations and completes bare event references.
pub(crate) async fn load_reservations(
    state: &AppState,
    session: &Session,
) -> Result<Vec<Reservation>, BackendError> {
    let reservations = async {
        if session.is_organizer() {
            state.backend.list_all_reservations(session).await
        } else {
            state.backend.list_user_reservations(session).await
        }
    };
    let (reservations, events) =
        futures::join!(reservations, state.backend.list_events(Some(session)));

    let now = Utc::now();
    let mut reservations: Vec<Reservation> = reservations?
        .into_iter()
        .map(|raw| reservation_from_value(raw, now))
        .collect();

    match events {
        Ok(events) => {
            let events: Vec<Event> = events.into_iter().map(event_from_value).collect();
            attach_events(&mut reservations, &events);
        }
        Err(e) => warn!("Events unavailable, reservations keep their own event data: {}", e),
    }

    Ok(reservations)
}

// GET /api/reservations
async fn list_reservations(
    State(state): State<Arc<AppState>>,
    session: Session,
    params: Result<Query<FilterParams>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(params) = params?;
    params.validate()?;

    let reservations = load_reservations(&state, &session).await?;
    let listed = filter::apply(&reservations, &params, super::now());

    Ok(Json(json!({
        "success": true,
        "count": listed.len(),
        "reservations": listed,
    })))
}

// POST /api/reservations
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct CreateReservationRequest {
    event_id: RawId,
    #[validate(range(min = 1, max = 20, message = "Entre 1 et 20 billets par réservation"))]
    number_of_tickets: u32,
}

async fn create_reservation(
    State(state): State<Arc<AppState>>,
    session: Session,
    body: Result<Json<CreateReservationRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = body?;
    req.validate()?;

    let event_id = req.event_id.into_string();
    if event_id.is_empty() {
        return Err(AppError::Validation("eventId est obligatoire".to_string()));
    }

    let created = state
        .backend
        .create_reservation(
            &session,
            &NewReservation {
                event_id: event_id.clone(),
                number_of_tickets: req.number_of_tickets,
            },
        )
        .await?;

    let mut reservation = reservation_from_value(created, Utc::now());
    if reservation.event_id.is_empty() {
        reservation.event_id = event_id.clone();
        reservation.event.id = event_id;
    }

    info!(
        "Reservation {} created for event {} ({} tickets)",
        reservation.id, reservation.event_id, reservation.number_of_tickets
    );

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "reservation": reservation,
        })),
    ))
}

// PATCH /api/reservations/{id}/cancel
async fn cancel_reservation(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let updated = state.backend.cancel_reservation(&session, &id).await?;
    info!("Reservation {} cancelled", id);

    // Some backends answer 204; the transition itself is what the client needs to know.
    let reservation = match updated {
        Value::Object(_) => {
            let mut reservation = reservation_from_value(updated, Utc::now());
            if reservation.id.is_empty() {
                reservation.id = id.clone();
            }
            Some(reservation)
        }
        _ => None,
    };

    Ok(Json(json!({
        "success": true,
        "id": id,
        "status": ReservationStatus::Cancelled,
        "reservation": reservation,
    })))
}
