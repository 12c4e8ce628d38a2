use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use super::{first_id, first_number, first_text, lenient, RawDestinationRef, RawId, RawNumber, RawUserRef};

/// Event record as the backend returns it. Field names vary between endpoints
/// and some payloads carry several spellings at once, so every spelling is its
/// own field and the normalizer picks the first usable one.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEvent {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<RawId>,
    #[serde(default, deserialize_with = "lenient", rename = "_id")]
    pub object_id: Option<RawId>,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub time: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub start_time: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub heure: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub start_date: Option<String>,
    #[serde(default, deserialize_with = "lenient", rename = "start_date")]
    pub start_date_snake: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub start_date_time: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub end_date: Option<String>,
    #[serde(default, deserialize_with = "lenient", rename = "end_date")]
    pub end_date_snake: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub end_date_time: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub lieu: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub venue: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub destination: Option<RawDestinationRef>,
    #[serde(default, deserialize_with = "lenient")]
    pub destination_name: Option<String>,
    #[serde(default, deserialize_with = "lenient", rename = "destination_name")]
    pub destination_name_snake: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub categorie: Option<String>,
    #[serde(default, deserialize_with = "lenient", rename = "type")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub price: Option<RawNumber>,
    #[serde(default, deserialize_with = "lenient")]
    pub prix: Option<RawNumber>,
    #[serde(default, deserialize_with = "lenient")]
    pub capacity: Option<RawNumber>,
    #[serde(default, deserialize_with = "lenient")]
    pub max_participants: Option<RawNumber>,
    #[serde(default, deserialize_with = "lenient")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "lenient", rename = "image_url")]
    pub image_url_snake: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub organizer: Option<RawUserRef>,
    #[serde(default, deserialize_with = "lenient")]
    pub user: Option<RawUserRef>,
}

impl RawEvent {
    pub fn id(&self) -> Option<String> {
        first_id([&self.id, &self.object_id])
    }

    /// Start candidates, most specific first.
    pub fn starts(&self) -> [&Option<String>; 4] {
        [&self.start_date, &self.start_date_snake, &self.start_date_time, &self.date]
    }

    pub fn ends(&self) -> [&Option<String>; 3] {
        [&self.end_date, &self.end_date_snake, &self.end_date_time]
    }

    pub fn time(&self) -> Option<String> {
        first_text([&self.time, &self.start_time, &self.heure])
    }

    pub fn location(&self) -> Option<String> {
        first_text([&self.location, &self.lieu, &self.venue])
    }

    pub fn destination_name(&self) -> Option<String> {
        first_text([&self.destination_name, &self.destination_name_snake])
    }

    pub fn category(&self) -> Option<String> {
        first_text([&self.category, &self.categorie, &self.kind])
    }

    pub fn price(&self) -> Option<f64> {
        first_number([&self.price, &self.prix])
    }

    pub fn capacity(&self) -> Option<f64> {
        first_number([&self.capacity, &self.max_participants])
    }

    pub fn image(&self) -> Option<String> {
        first_text([&self.image, &self.image_url, &self.image_url_snake])
    }
}

/// An event reference inside a reservation: the nested object or just its id.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawEventRef {
    Object(Box<RawEvent>),
    Id(RawId),
}

/// When an event takes place, at the precision the backend gave us. Drives the
/// upcoming/past split and the ordering; what users see is `Event::date`/`Event::time`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Schedule {
    /// A start time is known, as a UTC instant.
    At(NaiveDateTime),
    /// Only the calendar day is known (bare date or midnight start).
    Day(NaiveDate),
    #[default]
    Unknown,
}

impl Schedule {
    /// Instant used for ordering; a bare day orders as its midnight.
    pub fn sort_key(&self) -> Option<NaiveDateTime> {
        match self {
            Schedule::At(at) => Some(*at),
            Schedule::Day(day) => Some(day.and_time(NaiveTime::MIN)),
            Schedule::Unknown => None,
        }
    }

    /// Still to come. A bare day counts as upcoming for the whole of that day.
    pub fn is_upcoming(&self, now: NaiveDateTime) -> bool {
        match self {
            Schedule::At(at) => *at >= now,
            Schedule::Day(day) => *day >= now.date(),
            Schedule::Unknown => false,
        }
    }

    pub fn is_past(&self, now: NaiveDateTime) -> bool {
        match self {
            Schedule::At(at) => *at < now,
            Schedule::Day(day) => *day < now.date(),
            Schedule::Unknown => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DestinationSummary {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Organizer {
    pub id: String,
    pub name: String,
}

/// Canonical event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(skip)]
    pub schedule: Schedule,
    pub date: Option<NaiveDate>,
    #[serde(serialize_with = "serialize_time")]
    pub time: Option<NaiveTime>,
    pub end_date: Option<NaiveDateTime>,
    pub location: String,
    pub destination: Option<DestinationSummary>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub capacity: Option<u32>,
    pub image: Option<String>,
    pub organizer: Option<Organizer>,
}

fn serialize_time<S>(time: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match time {
        Some(t) => serializer.serialize_some(&t.format("%H:%M").to_string()),
        None => serializer.serialize_none(),
    }
}
