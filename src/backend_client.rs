//! backend_client.rs
//!
//! Thin HTTP client for the AfricaEvents REST backend.
//!
//! Returns raw JSON records; normalization happens in the caller. Calls are
//! single-shot: no retry, no backoff. A 401 surfaces as
//! `BackendError::Unauthorized` for the handler to turn into a response.

use reqwest::{Method, RequestBuilder, StatusCode, Url};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::{config::BackendConfig, error::BackendError, session::Session};

/// Keys under which list endpoints wrap their arrays.
const ENVELOPE_KEYS: &[&str] = &["data", "items", "events", "destinations", "reservations", "content"];

#[derive(Clone)]
pub struct BackendClient {
    base_url: Url,
    http_client: reqwest::Client,
}

/// Body of `POST /reservations`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReservation {
    pub event_id: String,
    pub number_of_tickets: u32,
}

impl BackendClient {
    pub fn from_config(config: &BackendConfig) -> Result<Self, BackendError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        let base_url = Url::parse(config.url.trim_end_matches('/'))
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| BackendError::InvalidUrl(config.url.clone()))?;

        Ok(Self { base_url, http_client })
    }

    /// Backend URL for the given path segments. Each segment is percent-encoded,
    /// so an id can never reach another endpoint.
    fn url(&self, segments: &[&str]) -> Result<Url, BackendError> {
        if segments.iter().any(|s| s.trim().is_empty() || *s == "." || *s == "..") {
            return Err(BackendError::NotFound(segments.join("/")));
        }
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| BackendError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: &Url, session: Option<&Session>) -> RequestBuilder {
        let builder = self.http_client.request(method, url.clone());
        match session {
            Some(session) => builder.bearer_auth(session.token()),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder, path: &str) -> Result<Value, BackendError> {
        let response = builder.send().await?;
        let status = response.status();
        debug!("Backend {} -> {}", path, status);

        match status {
            s if s.is_success() => {
                if s == StatusCode::NO_CONTENT {
                    return Ok(Value::Null);
                }
                let body = response.bytes().await?;
                if body.is_empty() {
                    return Ok(Value::Null);
                }
                // A success with an unreadable body is treated as "nothing returned".
                Ok(serde_json::from_slice(&body).unwrap_or_else(|e| {
                    warn!("Backend {} returned non-JSON body: {}", path, e);
                    Value::Null
                }))
            }
            StatusCode::UNAUTHORIZED => Err(BackendError::Unauthorized),
            StatusCode::FORBIDDEN => Err(BackendError::Forbidden),
            StatusCode::NOT_FOUND => Err(BackendError::NotFound(path.to_string())),
            s if s == StatusCode::BAD_REQUEST || s == StatusCode::CONFLICT || s == StatusCode::UNPROCESSABLE_ENTITY => {
                let body = response.text().await.unwrap_or_default();
                Err(BackendError::Rejected {
                    status: s.as_u16(),
                    message: error_message(&body).unwrap_or_else(|| "Requête refusée".to_string()),
                })
            }
            s => Err(BackendError::Status { status: s.as_u16() }),
        }
    }

    async fn get(&self, segments: &[&str], session: Option<&Session>) -> Result<Value, BackendError> {
        let url = self.url(segments)?;
        self.send(self.request(Method::GET, &url, session), url.path()).await
    }

    async fn get_list(&self, segments: &[&str], session: Option<&Session>) -> Result<Vec<Value>, BackendError> {
        let body = self.get(segments, session).await?;
        Ok(into_records(body))
    }

    // --- Events ---

    pub async fn list_events(&self, session: Option<&Session>) -> Result<Vec<Value>, BackendError> {
        self.get_list(&["events"], session).await
    }

    pub async fn get_event(&self, id: &str, session: Option<&Session>) -> Result<Value, BackendError> {
        self.get(&["events", id], session).await.map(unwrap_single)
    }

    // --- Destinations ---

    pub async fn list_destinations(&self, session: Option<&Session>) -> Result<Vec<Value>, BackendError> {
        self.get_list(&["destinations"], session).await
    }

    pub async fn get_destination(&self, slug: &str, session: Option<&Session>) -> Result<Value, BackendError> {
        self.get(&["destinations", "slug", slug], session)
            .await
            .map(unwrap_single)
    }

    // --- Reservations ---

    /// Every reservation; the backend only allows this for organizers.
    pub async fn list_all_reservations(&self, session: &Session) -> Result<Vec<Value>, BackendError> {
        self.get_list(&["reservations"], Some(session)).await
    }

    /// Reservations of the session's own user.
    pub async fn list_user_reservations(&self, session: &Session) -> Result<Vec<Value>, BackendError> {
        self.get_list(&["reservations", "user"], Some(session)).await
    }

    pub async fn create_reservation(
        &self,
        session: &Session,
        reservation: &NewReservation,
    ) -> Result<Value, BackendError> {
        let url = self.url(&["reservations"])?;
        let builder = self.request(Method::POST, &url, Some(session)).json(reservation);
        self.send(builder, url.path()).await.map(unwrap_single)
    }

    /// Cancellation is a status transition on the backend, never a delete.
    pub async fn cancel_reservation(&self, session: &Session, id: &str) -> Result<Value, BackendError> {
        let url = self.url(&["reservations", id, "cancel"])?;
        self.send(self.request(Method::PATCH, &url, Some(session)), url.path())
            .await
            .map(unwrap_single)
    }

    // --- Users ---

    pub async fn current_user(&self, session: &Session) -> Result<Value, BackendError> {
        self.get(&["users", "me"], Some(session)).await.map(unwrap_single)
    }
}

/// Extracts the record array from a bare array or a `{ "data": [...] }`-style envelope.
pub fn into_records(body: Value) -> Vec<Value> {
    match body {
        Value::Array(items) => items,
        Value::Object(mut map) => {
            for key in ENVELOPE_KEYS {
                match map.remove(*key) {
                    Some(Value::Array(items)) => return items,
                    // Paginated payloads nest one level deeper: { data: { content: [...] } }
                    Some(nested @ Value::Object(_)) => {
                        let items = into_records(nested);
                        if !items.is_empty() {
                            return items;
                        }
                    }
                    _ => {}
                }
            }
            warn!("Backend list response had no recognisable record array");
            Vec::new()
        }
        Value::Null => Vec::new(),
        other => {
            warn!("Backend list response was a bare {}", json_kind(&other));
            Vec::new()
        }
    }
}

/// Single-record endpoints sometimes wrap the record in `{ "data": {...} }`
/// next to any number of metadata keys. A top-level `id` means the body is the record.
fn unwrap_single(body: Value) -> Value {
    match body {
        Value::Object(mut map) if !map.contains_key("id") && map.get("data").is_some_and(Value::is_object) => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["message", "error", "detail"]
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn into_records_reads_envelopes() {
        assert_eq!(into_records(json!([1, 2])).len(), 2);
        assert_eq!(into_records(json!({ "data": [1, 2, 3] })).len(), 3);
        assert_eq!(into_records(json!({ "reservations": [1] })).len(), 1);
        assert_eq!(into_records(json!({ "data": { "content": [1, 2] }, "page": 0 })).len(), 2);
        assert!(into_records(json!({ "message": "ok" })).is_empty());
        assert!(into_records(Value::Null).is_empty());
        assert!(into_records(json!("oops")).is_empty());
    }

    #[test]
    fn unwrap_single_strips_data_envelope() {
        assert_eq!(unwrap_single(json!({ "data": { "id": 1 }, "success": true })), json!({ "id": 1 }));
        assert_eq!(unwrap_single(json!({ "id": 1, "title": "x" })), json!({ "id": 1, "title": "x" }));
        assert_eq!(
            unwrap_single(json!({ "id": 1, "data": { "note": "meta" } })),
            json!({ "id": 1, "data": { "note": "meta" } })
        );
    }

    #[test]
    fn unwrap_single_ignores_extra_metadata_keys() {
        let body = json!({
            "success": true,
            "message": "OK",
            "data": { "id": 4, "title": "Jazz" },
            "timestamp": "2025-06-15T12:00:00Z"
        });
        assert_eq!(unwrap_single(body), json!({ "id": 4, "title": "Jazz" }));
    }

    #[test]
    fn error_message_prefers_message_field() {
        assert_eq!(error_message(r#"{"message":"Plus de places"}"#).as_deref(), Some("Plus de places"));
        assert_eq!(error_message("not json"), None);
    }
}
