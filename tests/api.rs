use africa_events::{app, config::Config, AppState};
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

fn token(role: &str) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let exp = (Utc::now() + Duration::hours(1)).timestamp();
    let payload = URL_SAFE_NO_PAD.encode(json!({ "sub": 1, "role": role, "exp": exp }).to_string());
    format!("{header}.{payload}.sig")
}

fn day(offset: i64) -> String {
    (Utc::now().date_naive() + Duration::days(offset))
        .format("%Y-%m-%d")
        .to_string()
}

fn router(server: &MockServer) -> Router {
    let state = AppState::new(Config::for_backend(&server.uri())).unwrap();
    app(state)
}

async fn call(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn get(uri: &str, bearer: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(Method::GET).uri(uri);
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

fn ids(body: &Value, key: &str) -> Vec<String> {
    body[key]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap().to_string())
        .collect()
}

async fn mount_events(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "title": "Hier", "date": day(-1), "category": "Musique", "price": 1000 },
            { "id": 3, "title": "Dans trois jours", "date": day(3), "category": "Musique", "price": 3000 },
            { "id": 2, "name": "Événement de demain", "startDate": format!("{}T20:00:00", day(1)), "price": "2000" }
        ])))
        .mount(server)
        .await;
}

#[tokio::test]
async fn health_is_ok() {
    let server = MockServer::start().await;
    let response = router(&server).oneshot(get("/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn events_upcoming_tab_filters_and_sorts() {
    let server = MockServer::start().await;
    mount_events(&server).await;

    let (status, body) = call(router(&server), get("/api/events?tab=upcoming", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["count"], 2);
    assert_eq!(ids(&body, "events"), vec!["2", "3"]);
    assert_eq!(body["events"][0]["time"], "20:00");
}

#[tokio::test]
async fn events_search_is_accent_insensitive() {
    let server = MockServer::start().await;
    mount_events(&server).await;

    let (status, body) = call(router(&server), get("/api/events?query=evenement", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body, "events"), vec!["2"]);
}

#[tokio::test]
async fn invalid_filters_are_rejected() {
    let server = MockServer::start().await;
    mount_events(&server).await;

    let (status, body) = call(router(&server), get("/api/events?minPrice=50&maxPrice=10", None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, _) = call(router(&server), get("/api/events?tab=someday", None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn fetch_failure_differs_from_empty_result() {
    let failing = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/events"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&failing)
        .await;
    let (status, body) = call(router(&failing), get("/api/events", None)).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["success"], false);

    let empty = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&empty)
        .await;
    let (status, body) = call(router(&empty), get("/api/events", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn reservations_require_a_session() {
    let server = MockServer::start().await;
    let (status, body) = call(router(&server), get("/api/reservations", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn session_cookie_is_accepted() {
    let server = MockServer::start().await;
    mount_events(&server).await;
    Mock::given(method("GET"))
        .and(path("/reservations/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let request = Request::builder()
        .uri("/api/reservations")
        .header(header::COOKIE, format!("token={}", token("VISITOR")))
        .body(Body::empty())
        .unwrap();
    let (status, _) = call(router(&server), request).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn visitor_reservations_past_tab_includes_cancelled() {
    let server = MockServer::start().await;
    mount_events(&server).await;
    Mock::given(method("GET"))
        .and(path("/reservations/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "reservations": [
            { "id": "a", "status": "CONFIRMED", "event": 1 },
            { "id": "b", "status": "Cancelled", "event": 3 },
            { "id": "c", "event": { "id": 2, "title": "Demain", "date": day(1) } }
        ]})))
        .mount(&server)
        .await;

    let visitor = token("VISITOR");

    let (status, body) = call(router(&server), get("/api/reservations?tab=past", Some(&visitor))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body, "reservations"), vec!["b", "a"]);
    // Bare event references are completed from the events list.
    assert_eq!(body["reservations"][1]["event"]["title"], "Hier");

    let (_, body) = call(router(&server), get("/api/reservations?tab=upcoming", Some(&visitor))).await;
    assert_eq!(ids(&body, "reservations"), vec!["c"]);
    assert_eq!(body["reservations"][0]["status"], "pending");
    assert_eq!(body["reservations"][0]["userName"], "Invité");

    let (_, body) = call(router(&server), get("/api/reservations?status=confirmed&category=musique", Some(&visitor))).await;
    assert_eq!(ids(&body, "reservations"), vec!["a"]);
}

#[tokio::test]
async fn backend_unauthorized_becomes_401() {
    let server = MockServer::start().await;
    mount_events(&server).await;
    Mock::given(method("GET"))
        .and(path("/reservations"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let (status, _) = call(router(&server), get("/api/reservations", Some(&token("ORGANIZER")))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn expired_token_is_rejected_before_backend_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/reservations/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none"}"#);
    let payload = URL_SAFE_NO_PAD.encode(json!({ "role": "VISITOR", "exp": 1_000 }).to_string());
    let expired = format!("{header}.{payload}.sig");

    let (status, _) = call(router(&server), get("/api/reservations", Some(&expired))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn analytics_is_organizer_only() {
    let server = MockServer::start().await;
    mount_events(&server).await;
    Mock::given(method("GET"))
        .and(path("/reservations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "status": "confirmed", "numberOfTickets": 2, "event": 3 },
            { "id": 2, "status": "pending", "numberOfTickets": 1, "event": 3 },
            { "id": 3, "status": "cancelled", "numberOfTickets": 5, "event": 1 }
        ])))
        .mount(&server)
        .await;

    let (status, _) = call(router(&server), get("/api/analytics", Some(&token("VISITOR")))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = call(router(&server), get("/api/analytics", Some(&token("ORGANIZER")))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_reservations"], 3);
    assert_eq!(body["cancelled"], 1);
    assert_eq!(body["total_tickets"], 3);
    assert_eq!(body["total_revenue"], "6000.00");
    assert_eq!(body["events"][0]["event_id"], "3");
}

#[tokio::test]
async fn create_reservation_validates_ticket_count() {
    let server = MockServer::start().await;
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/reservations")
        .header(header::AUTHORIZATION, format!("Bearer {}", token("VISITOR")))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "eventId": 3, "numberOfTickets": 0 }).to_string()))
        .unwrap();

    let (status, body) = call(router(&server), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn create_reservation_returns_normalized_record() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/reservations"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "data": { "id": 77, "status": "PENDING", "ticketCount": "2" }
        })))
        .mount(&server)
        .await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/reservations")
        .header(header::AUTHORIZATION, format!("Bearer {}", token("VISITOR")))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "eventId": 3, "numberOfTickets": 2 }).to_string()))
        .unwrap();

    let (status, body) = call(router(&server), request).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["reservation"]["id"], "77");
    assert_eq!(body["reservation"]["eventId"], "3");
    assert_eq!(body["reservation"]["numberOfTickets"], 2);
    assert_eq!(body["reservation"]["status"], "pending");
}

#[tokio::test]
async fn cancel_reports_cancelled_status() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/reservations/12/cancel"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 12, "status": "CANCELLED" })))
        .expect(1)
        .mount(&server)
        .await;

    let request = Request::builder()
        .method(Method::PATCH)
        .uri("/api/reservations/12/cancel")
        .header(header::AUTHORIZATION, format!("Bearer {}", token("VISITOR")))
        .body(Body::empty())
        .unwrap();

    let (status, body) = call(router(&server), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "cancelled");
    assert_eq!(body["reservation"]["status"], "cancelled");
}

#[tokio::test]
async fn destination_detail_keeps_highlight_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/destinations/slug/ile-de-goree"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 4,
            "name": "Île de Gorée",
            "country": "Sénégal",
            "highlights": [
                { "name": "Musée", "order": 2 },
                { "name": "Port", "order": 1 }
            ]
        })))
        .mount(&server)
        .await;

    let (status, body) = call(router(&server), get("/api/destinations/ile-de-goree", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["destination"]["slug"], "ile-de-goree");
    assert_eq!(body["destination"]["highlights"][0]["name"], "Port");
}

#[tokio::test]
async fn path_ids_stay_inside_their_backend_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/reservations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": "every-reservation" }])))
        .expect(0)
        .mount(&server)
        .await;

    let visitor = token("VISITOR");
    let (status, body) = call(router(&server), get("/api/events/..%2Freservations", Some(&visitor))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);

    let request = Request::builder()
        .method(Method::PATCH)
        .uri("/api/reservations/%2E%2E/cancel")
        .header(header::AUTHORIZATION, format!("Bearer {visitor}"))
        .body(Body::empty())
        .unwrap();
    let (status, _) = call(router(&server), request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let received = server.received_requests().await.unwrap_or_default();
    assert_eq!(received.len(), 1);
    assert!(received[0].url.path().starts_with("/events/"));
}

#[tokio::test]
async fn event_detail_unwraps_envelope_with_metadata() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/events/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "OK",
            "data": { "id": 5, "_id": "65a1", "title": "Jazz", "type": "CONCERT", "category": "Musique" },
            "timestamp": "2025-06-15T12:00:00Z"
        })))
        .mount(&server)
        .await;

    let (status, body) = call(router(&server), get("/api/events/5", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["event"]["id"], "5");
    assert_eq!(body["event"]["title"], "Jazz");
    assert_eq!(body["event"]["category"], "Musique");
}
