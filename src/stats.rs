//! stats.rs
//!
//! Aggregates for the organizer dashboard: reservations per status, tickets
//! sold, revenue, and a per-event breakdown ordered by tickets sold.

use serde::Serialize;
use std::collections::HashMap;

use crate::models::{Reservation, ReservationStatus};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventSales {
    pub event_id: String,
    pub title: String,
    pub reservations: u32,
    pub tickets: u32,
    pub revenue: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub total_reservations: u32,
    pub pending: u32,
    pub confirmed: u32,
    pub cancelled: u32,
    /// Tickets held by non-cancelled reservations.
    pub total_tickets: u32,
    /// Revenue over confirmed reservations only, formatted with two decimals.
    pub total_revenue: String,
    pub events: Vec<EventSales>,
}

#[derive(Default)]
struct Tally {
    title: String,
    reservations: u32,
    tickets: u32,
    revenue: f64,
}

pub fn summarize(reservations: &[Reservation]) -> DashboardSummary {
    let mut pending = 0;
    let mut confirmed = 0;
    let mut cancelled = 0;
    let mut total_tickets = 0u32;
    let mut total_revenue = 0.0;
    let mut per_event: HashMap<&str, Tally> = HashMap::new();

    for reservation in reservations {
        match reservation.status {
            ReservationStatus::Pending => pending += 1,
            ReservationStatus::Confirmed => confirmed += 1,
            ReservationStatus::Cancelled => {
                cancelled += 1;
                continue;
            }
        }

        let revenue = match reservation.status {
            ReservationStatus::Confirmed => {
                reservation.event.price.unwrap_or(0.0) * f64::from(reservation.number_of_tickets)
            }
            _ => 0.0,
        };

        total_tickets = total_tickets.saturating_add(reservation.number_of_tickets);
        total_revenue += revenue;

        let tally = per_event
            .entry(reservation.event_id.as_str())
            .or_insert_with(|| Tally {
                title: reservation.event.title.clone(),
                ..Default::default()
            });
        tally.reservations += 1;
        tally.tickets = tally.tickets.saturating_add(reservation.number_of_tickets);
        tally.revenue += revenue;
    }

    let mut events: Vec<EventSales> = per_event
        .into_iter()
        .map(|(event_id, tally)| EventSales {
            event_id: event_id.to_string(),
            title: tally.title,
            reservations: tally.reservations,
            tickets: tally.tickets,
            revenue: format!("{:.2}", tally.revenue),
        })
        .collect();
    // HashMap order is random; tie-break on id so the output is stable.
    events.sort_by(|a, b| b.tickets.cmp(&a.tickets).then_with(|| a.event_id.cmp(&b.event_id)));

    DashboardSummary {
        total_reservations: pending + confirmed + cancelled,
        pending,
        confirmed,
        cancelled,
        total_tickets,
        total_revenue: format!("{:.2}", total_revenue),
        events,
    }
}
