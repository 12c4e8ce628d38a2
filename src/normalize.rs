//! normalize.rs
//!
//! Maps the backend's heterogeneous record shapes onto the canonical models.
//!
//! Every function here is total: a missing or malformed field degrades to a
//! fixed placeholder, never to an error. The same backend may send `date` or
//! `startDate`, `status` in any casing, the user as a nested object or a bare
//! id, and ticket counts as strings.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc};
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

use crate::models::{
    destination::{Coordinates, RawHighlight},
    event::{DestinationSummary, Organizer},
    first_text, Destination, Event, Highlight, RawDestination, RawDestinationRef, RawEvent,
    RawEventRef, RawReservation, RawUser, RawUserRef, Reservation, ReservationStatus,
    Schedule, NOT_AVAILABLE,
};
use crate::text::slugify;

/// Name shown for a reservation with no user attached.
pub const FALLBACK_GUEST_NAME: &str = "Invité";
/// Name shown for a user record that carries no name.
pub const FALLBACK_USER_NAME: &str = "Utilisateur";

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y"];
const TIME_FORMATS: &[&str] = &["%H:%M:%S%.f", "%H:%M"];

// --- Date and time parsing ---

/// Parses a timestamp, keeping the wall-clock time as written when an offset is present.
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    parse_with_offset(value).map(|(local, _)| local)
}

/// Wall-clock time plus the offset it was written in; offset-less values count as UTC.
fn parse_with_offset(value: &str) -> Option<(NaiveDateTime, FixedOffset)> {
    let value = value.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(value) {
        return Some((at.naive_local(), *at.offset()));
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|local| (local, Utc.fix()))
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .or_else(|| parse_datetime(value).map(|at| at.date()))
}

pub fn parse_time(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(value, fmt).ok())
}

/// Event start: `schedule` is what comparisons use (UTC), `local` is the
/// wall-clock time shown to users.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Start {
    pub schedule: Schedule,
    pub local: Option<NaiveDateTime>,
}

impl Start {
    fn at(local: NaiveDateTime, offset: FixedOffset) -> Self {
        if local.time() == NaiveTime::MIN {
            return Start { schedule: Schedule::Day(local.date()), local: None };
        }
        let utc = local
            .checked_sub_signed(Duration::seconds(i64::from(offset.local_minus_utc())))
            .unwrap_or(local);
        Start { schedule: Schedule::At(utc), local: Some(local) }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        match self.schedule {
            Schedule::Day(day) => Some(day),
            _ => self.local.map(|at| at.date()),
        }
    }

    pub fn time(&self) -> Option<NaiveTime> {
        self.local.map(|at| at.time())
    }
}

/// Resolves one date-ish field, combining it with a separate time field when needed.
fn resolve_start(value: &str, time: Option<NaiveTime>) -> Option<Start> {
    if let Some((at, offset)) = parse_with_offset(value) {
        return Some(match time {
            Some(t) if at.time() == NaiveTime::MIN => Start::at(at.date().and_time(t), offset),
            _ => Start::at(at, offset),
        });
    }
    let day = parse_date(value)?;
    Some(match time {
        Some(t) => Start::at(day.and_time(t), Utc.fix()),
        None => Start { schedule: Schedule::Day(day), local: None },
    })
}

/// `startDate` wins over `date` when both parse.
pub fn derive_start(raw: &RawEvent) -> Start {
    let time = raw.time().as_deref().and_then(parse_time);
    raw.starts()
        .into_iter()
        .flatten()
        .find_map(|s| resolve_start(s, time))
        .unwrap_or_default()
}

fn parse_instant(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(value) {
        return Some(at.with_timezone(&Utc));
    }
    parse_datetime(value)
        .or_else(|| parse_date(value).map(|d| d.and_time(NaiveTime::MIN)))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

// --- Events ---

fn organizer_from(reference: RawUserRef) -> Organizer {
    match reference {
        RawUserRef::Object(user) => Organizer {
            name: user
                .display_name()
                .unwrap_or_else(|| FALLBACK_USER_NAME.to_string()),
            id: user.id().unwrap_or_default(),
        },
        RawUserRef::Id(id) => Organizer {
            id: id.into_string(),
            name: FALLBACK_USER_NAME.to_string(),
        },
    }
}

pub fn normalize_event(raw: RawEvent) -> Event {
    let start = derive_start(&raw);
    let destination_name = raw.destination_name();

    let destination = match &raw.destination {
        Some(RawDestinationRef::Object(dest)) => Some(DestinationSummary {
            id: dest.id().unwrap_or_default(),
            name: dest
                .name()
                .or_else(|| destination_name.clone())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        }),
        Some(RawDestinationRef::Id(id)) => Some(DestinationSummary {
            id: id.clone().into_string(),
            name: destination_name.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        }),
        None => destination_name.map(|name| DestinationSummary {
            id: String::new(),
            name,
        }),
    };

    let location = raw
        .location()
        .or_else(|| {
            destination
                .as_ref()
                .map(|d| d.name.clone())
                .filter(|name| name != NOT_AVAILABLE)
        })
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    let end_date = raw.ends().into_iter().flatten().find_map(|s| {
        parse_datetime(s).or_else(|| parse_date(s).map(|d| d.and_time(NaiveTime::MIN)))
    });

    Event {
        id: raw.id().unwrap_or_default(),
        title: first_text([&raw.title, &raw.name]).unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        description: first_text([&raw.description]).unwrap_or_default(),
        date: start.date(),
        time: start.time(),
        schedule: start.schedule,
        end_date,
        location,
        destination,
        category: raw.category(),
        price: raw.price().filter(|p| *p >= 0.0),
        capacity: raw
            .capacity()
            .filter(|c| *c >= 0.0)
            .map(|c| c.min(u32::MAX as f64) as u32),
        image: raw.image(),
        organizer: raw.organizer.or(raw.user).map(organizer_from),
    }
}

/// Normalizes an arbitrary JSON value; non-objects give a placeholder event.
pub fn event_from_value(value: Value) -> Event {
    normalize_event(serde_json::from_value(value).unwrap_or_else(|e| {
        debug!("Unreadable event record, using placeholder: {}", e);
        RawEvent::default()
    }))
}

/// Renderable stand-in for an event known only by id.
pub fn placeholder_event(id: String) -> Event {
    let mut event = normalize_event(RawEvent::default());
    event.id = id;
    event
}

// --- Reservations ---

pub fn normalize_reservation(raw: RawReservation, now: DateTime<Utc>) -> Reservation {
    let status = raw
        .status()
        .map(|s| ReservationStatus::parse(&s))
        .unwrap_or_default();

    let reservation_date = raw
        .dates()
        .into_iter()
        .flatten()
        .find_map(|s| parse_instant(s))
        .unwrap_or(now);

    let number_of_tickets = raw
        .ticket_count()
        .map(|n| n.round().clamp(1.0, u32::MAX as f64) as u32)
        .unwrap_or(1);

    // The user may sit on the reservation or, on some endpoints, on the nested event.
    let reservation_user = match &raw.user {
        Some(RawUserRef::Object(user)) => Some(user.clone()),
        _ => None,
    };
    let event_user = match &raw.event {
        Some(RawEventRef::Object(event)) => match &event.user {
            Some(RawUserRef::Object(user)) => Some(user.clone()),
            _ => None,
        },
        _ => None,
    };
    let has_user = raw.user.is_some() || event_user.is_some();

    let user_name = raw
        .user_name()
        .or_else(|| reservation_user.as_ref().and_then(RawUser::display_name))
        .or_else(|| event_user.as_ref().and_then(RawUser::display_name))
        .unwrap_or_else(|| {
            if has_user {
                FALLBACK_USER_NAME.to_string()
            } else {
                FALLBACK_GUEST_NAME.to_string()
            }
        });

    let user_email = raw
        .user_email()
        .or_else(|| reservation_user.as_ref().and_then(|u| first_text([&u.email])))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    let explicit_event_id = raw.event_id();
    let id = raw.id().unwrap_or_default();
    let mut event = match raw.event {
        Some(RawEventRef::Object(event)) => normalize_event(*event),
        Some(RawEventRef::Id(event_ref)) => placeholder_event(event_ref.into_string()),
        None => placeholder_event(String::new()),
    };
    let event_id = explicit_event_id.unwrap_or_else(|| event.id.clone());
    if event.id.is_empty() {
        event.id = event_id.clone();
    }

    Reservation {
        id,
        event_id,
        event,
        status,
        reservation_date,
        number_of_tickets,
        user_name,
        user_email,
    }
}

pub fn reservation_from_value(value: Value, now: DateTime<Utc>) -> Reservation {
    normalize_reservation(
        serde_json::from_value(value).unwrap_or_else(|e| {
            debug!("Unreadable reservation record, using placeholder: {}", e);
            RawReservation::default()
        }),
        now,
    )
}

/// Replaces events known only by id with the full event from a separately fetched list.
pub fn attach_events(reservations: &mut [Reservation], events: &[Event]) {
    let by_id: HashMap<&str, &Event> = events
        .iter()
        .filter(|e| !e.id.is_empty())
        .map(|e| (e.id.as_str(), e))
        .collect();

    for reservation in reservations.iter_mut() {
        let bare = reservation.event.title == NOT_AVAILABLE && reservation.event.schedule == Schedule::Unknown;
        if !bare {
            continue;
        }
        if let Some(event) = by_id.get(reservation.event_id.as_str()) {
            reservation.event = (*event).clone();
        }
    }
}

// --- Destinations ---

pub fn normalize_destination(raw: RawDestination) -> Destination {
    let name = raw.name().unwrap_or_else(|| NOT_AVAILABLE.to_string());
    let id = raw.id().unwrap_or_default();
    let slug = first_text([&raw.slug])
        .unwrap_or_else(|| if name == NOT_AVAILABLE { id.clone() } else { slugify(&name) });

    let coordinates = match (raw.latitude(), raw.longitude()) {
        (Some(latitude), Some(longitude)) => Some(Coordinates { latitude, longitude }),
        _ => None,
    };

    let mut highlights: Vec<RawHighlight> = raw
        .highlights
        .clone()
        .unwrap_or_default()
        .into_iter()
        .filter_map(|v| serde_json::from_value::<RawHighlight>(v).ok())
        .filter(|h| h.name().is_some())
        .collect();
    // Stable: highlights without an explicit order keep their relative position at the end.
    highlights.sort_by_key(|h| h.order().unwrap_or(u32::MAX));

    Destination {
        id,
        slug,
        name,
        description: first_text([&raw.description]).unwrap_or_default(),
        country: raw.country(),
        region: first_text([&raw.region]),
        coordinates,
        image: raw.image(),
        highlights: highlights
            .into_iter()
            .map(|h| Highlight {
                name: h.name().unwrap_or_default(),
                description: first_text([&h.description]).unwrap_or_default(),
                image: h.image(),
            })
            .collect(),
    }
}

pub fn destination_from_value(value: Value) -> Destination {
    normalize_destination(serde_json::from_value(value).unwrap_or_else(|e| {
        debug!("Unreadable destination record, using placeholder: {}", e);
        RawDestination::default()
    }))
}
