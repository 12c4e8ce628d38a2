pub mod user;
pub mod event;
pub mod destination;
pub mod reservation;

pub use user::{RawUser, RawUserRef, Role, User};
pub use event::{Event, RawEvent, RawEventRef, Schedule};
pub use destination::{Destination, Highlight, RawDestination, RawDestinationRef};
pub use reservation::{RawReservation, Reservation, ReservationStatus};

use serde::{de::DeserializeOwned, Deserialize, Deserializer};

/// Placeholder shown wherever the backend left a text field empty.
pub const NOT_AVAILABLE: &str = "Non disponible";

/// Identifier as the backend sends it: a number on some endpoints, a string on others.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Number(i64),
    Text(String),
}

impl RawId {
    pub fn into_string(self) -> String {
        match self {
            RawId::Number(n) => n.to_string(),
            RawId::Text(s) => s.trim().to_string(),
        }
    }
}

/// Numeric field that may arrive as a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
    Number(f64),
    Text(String),
}

impl RawNumber {
    pub fn to_f64(&self) -> Option<f64> {
        let value = match self {
            RawNumber::Number(n) => *n,
            RawNumber::Text(s) => s.trim().replace(',', ".").parse().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

/// Deserializes an optional field, turning a value of the wrong shape into `None`.
///
/// Every raw record field goes through this so one odd field never rejects the whole record.
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// First non-blank string among the candidates, trimmed.
pub(crate) fn first_text<'a, I>(candidates: I) -> Option<String>
where
    I: IntoIterator<Item = &'a Option<String>>,
{
    candidates
        .into_iter()
        .flatten()
        .map(|s| s.trim())
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// First non-blank identifier among the candidates.
pub(crate) fn first_id<'a, I>(candidates: I) -> Option<String>
where
    I: IntoIterator<Item = &'a Option<RawId>>,
{
    candidates
        .into_iter()
        .flatten()
        .map(|id| id.clone().into_string())
        .find(|id| !id.is_empty())
}

/// First candidate that reads as a finite number.
pub(crate) fn first_number<'a, I>(candidates: I) -> Option<f64>
where
    I: IntoIterator<Item = &'a Option<RawNumber>>,
{
    candidates.into_iter().flatten().find_map(RawNumber::to_f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_number_accepts_strings_and_numbers() {
        let n: RawNumber = serde_json::from_str("25000").unwrap();
        assert_eq!(n.to_f64(), Some(25000.0));
        let s: RawNumber = serde_json::from_str("\"12,5\"").unwrap();
        assert_eq!(s.to_f64(), Some(12.5));
        let bad: RawNumber = serde_json::from_str("\"gratuit\"").unwrap();
        assert_eq!(bad.to_f64(), None);
    }

    #[test]
    fn raw_id_renders_both_shapes() {
        let n: RawId = serde_json::from_str("42").unwrap();
        assert_eq!(n.into_string(), "42");
        let s: RawId = serde_json::from_str("\" ab-12 \"").unwrap();
        assert_eq!(s.into_string(), "ab-12");
    }

    #[test]
    fn first_text_skips_blanks() {
        let candidates = [None, Some("  ".to_string()), Some(" Dakar ".to_string())];
        assert_eq!(first_text(&candidates), Some("Dakar".to_string()));
    }

    #[test]
    fn first_id_and_number_skip_unusable_candidates() {
        let ids = [Some(RawId::Text(" ".to_string())), Some(RawId::Number(7))];
        assert_eq!(first_id(&ids), Some("7".to_string()));

        let numbers = [Some(RawNumber::Text("n/a".to_string())), None, Some(RawNumber::Number(3.0))];
        assert_eq!(first_number(&numbers), Some(3.0));
    }
}
