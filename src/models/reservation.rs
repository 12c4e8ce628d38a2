use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{first_id, first_number, first_text, lenient, Event, RawEventRef, RawId, RawNumber, RawUserRef};
use crate::text::fold;

/// Reservation lifecycle: pending, then confirmed or cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
}

impl ReservationStatus {
    /// Case- and accent-insensitive mapping; anything unrecognised is pending.
    pub fn parse(value: &str) -> Self {
        let folded = fold(value);
        if folded.starts_with("confirm") || folded == "accepted" || folded == "paid" {
            ReservationStatus::Confirmed
        } else if folded.starts_with("cancel") || folded.starts_with("annul") {
            ReservationStatus::Cancelled
        } else {
            ReservationStatus::Pending
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Cancelled => "cancelled",
        }
    }
}

/// Reservation record as the backend returns it. Each key spelling is a separate
/// field: payloads mixing `quantity` with a `tickets` array, or `createdAt` with
/// `created_at`, must still read.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawReservation {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<RawId>,
    #[serde(default, deserialize_with = "lenient", rename = "_id")]
    pub object_id: Option<RawId>,
    #[serde(default, deserialize_with = "lenient")]
    pub reservation_id: Option<RawId>,
    #[serde(default, deserialize_with = "lenient", rename = "reservation_id")]
    pub reservation_id_snake: Option<RawId>,
    #[serde(default, deserialize_with = "lenient")]
    pub event_id: Option<RawId>,
    #[serde(default, deserialize_with = "lenient", rename = "event_id")]
    pub event_id_snake: Option<RawId>,
    #[serde(default, deserialize_with = "lenient")]
    pub event: Option<RawEventRef>,
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub reservation_status: Option<String>,
    #[serde(default, deserialize_with = "lenient", rename = "reservation_status")]
    pub reservation_status_snake: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub reservation_date: Option<String>,
    #[serde(default, deserialize_with = "lenient", rename = "reservation_date")]
    pub reservation_date_snake: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient", rename = "created_at")]
    pub created_at_snake: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub number_of_tickets: Option<RawNumber>,
    #[serde(default, deserialize_with = "lenient", rename = "number_of_tickets")]
    pub number_of_tickets_snake: Option<RawNumber>,
    #[serde(default, deserialize_with = "lenient")]
    pub ticket_count: Option<RawNumber>,
    #[serde(default, deserialize_with = "lenient", rename = "ticket_count")]
    pub ticket_count_snake: Option<RawNumber>,
    #[serde(default, deserialize_with = "lenient")]
    pub quantity: Option<RawNumber>,
    // Only a count is read here; a list of ticket objects gives `None`.
    #[serde(default, deserialize_with = "lenient")]
    pub tickets: Option<RawNumber>,
    #[serde(default, deserialize_with = "lenient")]
    pub user: Option<RawUserRef>,
    #[serde(default, deserialize_with = "lenient")]
    pub user_name: Option<String>,
    #[serde(default, deserialize_with = "lenient", rename = "user_name")]
    pub user_name_snake: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub user_email: Option<String>,
    #[serde(default, deserialize_with = "lenient", rename = "user_email")]
    pub user_email_snake: Option<String>,
}

impl RawReservation {
    pub fn id(&self) -> Option<String> {
        first_id([&self.id, &self.object_id, &self.reservation_id, &self.reservation_id_snake])
    }

    pub fn event_id(&self) -> Option<String> {
        first_id([&self.event_id, &self.event_id_snake])
    }

    pub fn status(&self) -> Option<String> {
        first_text([&self.status, &self.reservation_status, &self.reservation_status_snake])
    }

    /// Date candidates: the reservation date first, then the creation date.
    pub fn dates(&self) -> [&Option<String>; 4] {
        [
            &self.reservation_date,
            &self.reservation_date_snake,
            &self.created_at,
            &self.created_at_snake,
        ]
    }

    pub fn ticket_count(&self) -> Option<f64> {
        first_number([
            &self.number_of_tickets,
            &self.number_of_tickets_snake,
            &self.ticket_count,
            &self.ticket_count_snake,
            &self.quantity,
            &self.tickets,
        ])
    }

    pub fn user_name(&self) -> Option<String> {
        first_text([&self.user_name, &self.user_name_snake])
    }

    pub fn user_email(&self) -> Option<String> {
        first_text([&self.user_email, &self.user_email_snake])
    }
}

/// Canonical reservation. Always carries a renderable event, status, ticket count and user.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: String,
    pub event_id: String,
    pub event: Event,
    pub status: ReservationStatus,
    pub reservation_date: DateTime<Utc>,
    pub number_of_tickets: u32,
    pub user_name: String,
    pub user_email: String,
}
