//! filter.rs
//!
//! In-memory filter/sort pipeline behind every listing view.
//!
//! Records are reduced by free-text search, status, category, location, date
//! range, price range and tab (all / upcoming / past), then ordered by event
//! date. Anything that cannot be evaluated (missing price, unparseable date)
//! simply does not match a filter that constrains it.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use std::cmp::Ordering;
use validator::{Validate, ValidationError};

use crate::models::{Destination, Event, Reservation, ReservationStatus, Schedule, NOT_AVAILABLE};
use crate::text::{contains_folded, fold};

/// Which slice of the timeline a listing shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    All,
    Upcoming,
    Past,
}

/// Active UI filters. Deserializes straight from the listing query string.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
#[validate(schema(function = "validate_ranges"))]
pub struct FilterParams {
    #[validate(length(max = 200))]
    pub query: Option<String>,
    pub status: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    #[validate(range(min = 0.0))]
    pub min_price: Option<f64>,
    #[validate(range(min = 0.0))]
    pub max_price: Option<f64>,
    pub tab: Tab,
}

fn validate_ranges(params: &FilterParams) -> Result<(), ValidationError> {
    if let (Some(from), Some(to)) = (params.from, params.to) {
        if from > to {
            return Err(ValidationError::new("date_range"));
        }
    }
    // `NaN` and infinities pass the `range` rule but would never compare.
    if [params.min_price, params.max_price].into_iter().flatten().any(|p| !p.is_finite()) {
        return Err(ValidationError::new("price_not_finite"));
    }
    if let (Some(min), Some(max)) = (params.min_price, params.max_price) {
        if min > max {
            return Err(ValidationError::new("price_range"));
        }
    }
    Ok(())
}

/// A record the pipeline can filter and sort.
pub trait Listing {
    fn title(&self) -> &str;
    fn description(&self) -> &str;
    fn location(&self) -> Option<&str>;
    fn destination_name(&self) -> Option<&str>;
    fn category(&self) -> Option<&str>;
    fn status(&self) -> Option<ReservationStatus>;
    fn schedule(&self) -> Schedule;
    /// Calendar day as displayed, used by the date range.
    fn date(&self) -> Option<NaiveDate>;
    fn price(&self) -> Option<f64>;
}

fn available(value: &str) -> Option<&str> {
    (value != NOT_AVAILABLE && !value.trim().is_empty()).then_some(value)
}

impl Listing for Event {
    fn title(&self) -> &str {
        &self.title
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn location(&self) -> Option<&str> {
        available(&self.location)
    }

    fn destination_name(&self) -> Option<&str> {
        self.destination.as_ref().and_then(|d| available(&d.name))
    }

    fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    fn status(&self) -> Option<ReservationStatus> {
        None
    }

    fn schedule(&self) -> Schedule {
        self.schedule
    }

    fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    fn price(&self) -> Option<f64> {
        self.price
    }
}

impl Listing for Reservation {
    fn title(&self) -> &str {
        &self.event.title
    }

    fn description(&self) -> &str {
        &self.event.description
    }

    fn location(&self) -> Option<&str> {
        self.event.location()
    }

    fn destination_name(&self) -> Option<&str> {
        self.event.destination_name()
    }

    fn category(&self) -> Option<&str> {
        self.event.category.as_deref()
    }

    fn status(&self) -> Option<ReservationStatus> {
        Some(self.status)
    }

    fn schedule(&self) -> Schedule {
        self.event.schedule
    }

    fn date(&self) -> Option<NaiveDate> {
        self.event.date
    }

    fn price(&self) -> Option<f64> {
        self.event.price
    }
}

// Destinations have no date, price or status: the location filter reads the country
// and the text search also covers the region.
impl Listing for Destination {
    fn title(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn location(&self) -> Option<&str> {
        self.country.as_deref()
    }

    fn destination_name(&self) -> Option<&str> {
        self.region.as_deref()
    }

    fn category(&self) -> Option<&str> {
        None
    }

    fn status(&self) -> Option<ReservationStatus> {
        None
    }

    fn schedule(&self) -> Schedule {
        Schedule::Unknown
    }

    fn date(&self) -> Option<NaiveDate> {
        None
    }

    fn price(&self) -> Option<f64> {
        None
    }
}

/// A select-box value; blank and "all" mean no constraint.
fn selector(value: Option<&str>) -> Option<String> {
    value
        .map(fold)
        .filter(|v| !v.is_empty() && v != "all" && v != "tous" && v != "toutes")
}

/// Filter parameters folded once per pipeline run.
struct Prepared {
    needle: Option<String>,
    status: Option<String>,
    category: Option<String>,
    location: Option<String>,
}

impl Prepared {
    fn new(params: &FilterParams) -> Self {
        Prepared {
            needle: params.query.as_deref().map(fold).filter(|q| !q.is_empty()),
            status: selector(params.status.as_deref()),
            category: selector(params.category.as_deref()),
            location: selector(params.location.as_deref()),
        }
    }
}

fn exact(value: Option<&str>, wanted: &str) -> bool {
    value.map(fold).is_some_and(|v| v == wanted)
}

fn matches_text<T: Listing>(record: &T, needle: &str) -> bool {
    contains_folded(record.title(), needle)
        || contains_folded(record.description(), needle)
        || record.location().is_some_and(|l| contains_folded(l, needle))
        || record.destination_name().is_some_and(|d| contains_folded(d, needle))
}

fn matches_tab<T: Listing>(record: &T, tab: Tab, now: NaiveDateTime) -> bool {
    let cancelled = record.status() == Some(ReservationStatus::Cancelled);
    match tab {
        Tab::All => true,
        Tab::Upcoming => !cancelled && record.schedule().is_upcoming(now),
        Tab::Past => cancelled || record.schedule().is_past(now),
    }
}

fn matches<T: Listing>(record: &T, params: &FilterParams, prepared: &Prepared, now: NaiveDateTime) -> bool {
    if let Some(needle) = &prepared.needle {
        if !matches_text(record, needle) {
            return false;
        }
    }

    if let Some(status) = &prepared.status {
        if !exact(record.status().map(|s| s.as_str()), status) {
            return false;
        }
    }

    if let Some(category) = &prepared.category {
        if !exact(record.category(), category) {
            return false;
        }
    }

    if let Some(location) = &prepared.location {
        if !exact(record.location(), location) && !exact(record.destination_name(), location) {
            return false;
        }
    }

    if params.from.is_some() || params.to.is_some() {
        let Some(day) = record.date() else {
            return false;
        };
        if params.from.is_some_and(|from| day < from) || params.to.is_some_and(|to| day > to) {
            return false;
        }
    }

    if params.min_price.is_some() || params.max_price.is_some() {
        let Some(price) = record.price() else {
            return false;
        };
        if params.min_price.is_some_and(|min| price < min)
            || params.max_price.is_some_and(|max| price > max)
        {
            return false;
        }
    }

    matches_tab(record, params.tab, now)
}

/// Orders by event date; records without a date go last in either direction.
fn compare_dates(a: Option<NaiveDateTime>, b: Option<NaiveDateTime>, descending: bool) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) if descending => b.cmp(&a),
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Runs the whole pipeline. Pure: the same input and `now` always give the same output.
pub fn apply<T: Listing + Clone>(records: &[T], params: &FilterParams, now: NaiveDateTime) -> Vec<T> {
    let prepared = Prepared::new(params);

    let mut selected: Vec<T> = records
        .iter()
        .filter(|record| matches(*record, params, &prepared, now))
        .cloned()
        .collect();

    let descending = params.tab == Tab::Past;
    selected.sort_by(|a, b| compare_dates(a.schedule().sort_key(), b.schedule().sort_key(), descending));

    selected
}
