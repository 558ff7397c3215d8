use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt; // for .oneshot()

use hotel_api::{
    build_router,
    config::{AppConfig, AuthConfig, AuthScheme, Config, CorsConfig, FeatureFlags, LogFormat},
    database::InMemoryStore,
    AppState,
};

fn test_config(enable_auth: bool) -> Config {
    Config {
        app: AppConfig {
            host: "127.0.0.1".into(),
            port: 0,
            environment: "test".into(),
            rust_log: "hotel_api=debug".into(),
            log_format: LogFormat::Pretty,
        },
        auth: AuthConfig {
            scheme: AuthScheme::Jwt,
            jwt_secret: "test-secret".into(),
            jwt_issuer: "hotel-api".into(),
            jwt_expires_in_hours: 1,
            bcrypt_cost: 4,
        },
        cors: CorsConfig::default(),
        features: FeatureFlags { enable_auth, seed_on_startup: true },
    }
}

async fn app_with(enable_auth: bool) -> Router {
    let state = Arc::new(AppState::new(test_config(enable_auth), Arc::new(InMemoryStore::new())));
    state.seed().await.expect("seed");
    build_router(state)
}

async fn app() -> Router {
    app_with(false).await
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>, token: Option<&str>) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let req = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(req).await.unwrap()
}

async fn body_text(resp: Response) -> String {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(resp: Response) -> Value {
    serde_json::from_str(&body_text(resp).await).unwrap()
}

async fn login(app: &Router, email: &str, password: &str) -> String {
    let resp = send(app, Method::POST, "/api/auth/login", Some(json!({"email": email, "password": password})), None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    body_json(resp).await["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_check() {
    let app = app().await;
    let resp = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_text(resp).await, "OK");
}

#[tokio::test]
async fn login_returns_token_and_role() {
    let app = app().await;
    let resp = send(
        &app,
        Method::POST,
        "/api/auth/login",
        Some(json!({"email": "admin@stayflex.test", "password": "admin123"})),
        None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body_json(resp).await;
    assert_eq!(body["role"], "admin");
    assert_eq!(body["email"], "admin@stayflex.test");
    assert_eq!(body["userId"], "user-admin-1");
    assert!(!body["token"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn login_email_is_case_insensitive() {
    let app = app().await;
    let resp = send(
        &app,
        Method::POST,
        "/api/auth/login",
        Some(json!({"email": "Guest1@StayFlex.test", "password": "password123"})),
        None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["userId"], "user-guest-1");
}

#[tokio::test]
async fn bad_credentials_do_not_leak_which_part_failed() {
    let app = app().await;
    let wrong_password = send(
        &app,
        Method::POST,
        "/api/auth/login",
        Some(json!({"email": "guest1@stayflex.test", "password": "nope"})),
        None,
    )
    .await;
    let unknown_email = send(
        &app,
        Method::POST,
        "/api/auth/login",
        Some(json!({"email": "nobody@stayflex.test", "password": "password123"})),
        None,
    )
    .await;

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_text(wrong_password).await, body_text(unknown_email).await);
}

#[tokio::test]
async fn malformed_login_body_is_bad_request() {
    let app = app().await;
    let resp = send(&app, Method::POST, "/api/auth/login", Some(json!({"email": 42})), None).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn search_lists_only_free_rooms() {
    let app = app().await;
    let resp = send(
        &app,
        Method::GET,
        "/api/guest/rooms/search?checkIn=2025-12-02&checkOut=2025-12-04&guests=2",
        None,
        None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body_json(resp).await;
    let ids: Vec<&str> = body["rooms"].as_array().unwrap().iter().map(|r| r["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["room-301"]);
    assert_eq!(body["rooms"][0]["basePrice"], 250.0);
    assert_eq!(body["rooms"][0]["type"], "Suite");
    assert_eq!(body["rooms"][0]["status"], "available");
}

#[tokio::test]
async fn search_rejects_bad_dates() {
    let app = app().await;
    for uri in [
        "/api/guest/rooms/search?checkIn=2025-13-01&checkOut=2025-12-04",
        "/api/guest/rooms/search?checkIn=2025-12-04&checkOut=2025-12-04",
        "/api/guest/rooms/search?checkOut=2025-12-04",
        "/api/guest/rooms/search?checkIn=2025-12-01&checkOut=2025-12-04&guests=two",
    ] {
        let resp = send(&app, Method::GET, uri, None, None).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", uri);
    }
}

#[tokio::test]
async fn overlapping_booking_is_rejected_back_to_back_accepted() {
    let app = app().await;
    let overlap = send(
        &app,
        Method::POST,
        "/api/guest/bookings",
        Some(json!({"userId": "user-guest-2", "roomId": "room-101", "checkIn": "2025-12-04", "checkOut": "2025-12-06", "guests": 1})),
        None,
    )
    .await;
    assert_eq!(overlap.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(overlap).await, "room is not available for the selected dates");

    let ok = send(
        &app,
        Method::POST,
        "/api/guest/bookings",
        Some(json!({"userId": "user-guest-2", "roomId": "room-101", "checkIn": "2025-12-05", "checkOut": "2025-12-08", "guests": 1})),
        None,
    )
    .await;
    assert_eq!(ok.status(), StatusCode::CREATED);
    let body = body_json(ok).await;
    assert_eq!(body["status"], "confirmed");
    assert_eq!(body["roomId"], "room-101");
    assert_eq!(body["checkIn"], "2025-12-05");
    assert_eq!(body["checkOut"], "2025-12-08");
}

#[tokio::test]
async fn booking_validation_errors() {
    let app = app().await;
    let cases = [
        json!({"userId": "user-guest-1", "roomId": "room-301", "checkIn": "2099-01-05", "checkOut": "2099-01-05", "guests": 1}),
        json!({"userId": "user-guest-1", "roomId": "room-301", "checkIn": "2099-01-05", "checkOut": "2099-01-01", "guests": 1}),
        json!({"userId": "user-guest-1", "roomId": "room-301", "checkIn": "05/01/2099", "checkOut": "2099-01-07", "guests": 1}),
        json!({"userId": "user-guest-1", "roomId": "room-301", "checkIn": "2099-01-05", "checkOut": "2099-01-07", "guests": 5}),
        json!({"userId": "user-guest-1", "roomId": "room-999", "checkIn": "2099-01-05", "checkOut": "2099-01-07", "guests": 1}),
        json!({"roomId": "room-301", "checkIn": "2099-01-05", "checkOut": "2099-01-07", "guests": 1}),
    ];
    for case in cases {
        let resp = send(&app, Method::POST, "/api/guest/bookings", Some(case.clone()), None).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", case);
    }
}

#[tokio::test]
async fn guest_bookings_require_user_id() {
    let app = app().await;
    let resp = send(&app, Method::GET, "/api/guest/bookings", None, None).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = send(&app, Method::GET, "/api/guest/bookings?userId=user-guest-2", None, None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    let ids: Vec<&str> = body["bookings"].as_array().unwrap().iter().map(|b| b["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["booking-2", "booking-6"]);

    let resp = send(&app, Method::GET, "/api/guest/bookings?userId=user-nobody", None, None).await;
    assert_eq!(body_json(resp).await["bookings"], json!([]));
}

#[tokio::test]
async fn cancel_lifecycle() {
    let app = app().await;

    let past = send(&app, Method::POST, "/api/guest/bookings/booking-1/cancel", None, None).await;
    assert_eq!(past.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(past).await, "cannot cancel past bookings");

    let missing = send(&app, Method::POST, "/api/guest/bookings/booking-404/cancel", None, None).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    let created = send(
        &app,
        Method::POST,
        "/api/guest/bookings",
        Some(json!({"userId": "user-guest-1", "roomId": "room-102", "checkIn": "2099-03-01", "checkOut": "2099-03-04", "guests": 2})),
        None,
    )
    .await;
    let id = body_json(created).await["id"].as_str().unwrap().to_string();

    let cancelled = send(&app, Method::POST, &format!("/api/guest/bookings/{}/cancel", id), None, None).await;
    assert_eq!(cancelled.status(), StatusCode::NO_CONTENT);

    // the dates are free again
    let rebook = send(
        &app,
        Method::POST,
        "/api/guest/bookings",
        Some(json!({"userId": "user-guest-2", "roomId": "room-102", "checkIn": "2099-03-02", "checkOut": "2099-03-03", "guests": 1})),
        None,
    )
    .await;
    assert_eq!(rebook.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn admin_booking_overview_filters_by_range() {
    let app = app().await;
    let resp = send(&app, Method::GET, "/api/admin/bookings?from=2025-12-01&to=2025-12-31", None, None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    let bookings = body["bookings"].as_array().unwrap();
    assert_eq!(bookings.len(), 6);
    assert!(bookings.iter().all(|b| b["checkIn"].as_str().unwrap() >= "2025-12-01"
        && b["checkOut"].as_str().unwrap() <= "2025-12-31"));

    let all = body_json(send(&app, Method::GET, "/api/admin/bookings", None, None).await).await;
    assert_eq!(all["bookings"].as_array().unwrap().len(), 7);

    let bad = send(&app, Method::GET, "/api/admin/bookings?from=yesterday", None, None).await;
    assert_eq!(bad.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn admin_booking_overview_handles_calendar_limits() {
    let app = app().await;
    let resp = send(&app, Method::GET, "/api/admin/bookings?to=%2B262142-12-31", None, None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["bookings"].as_array().unwrap().len(), 7);

    let resp = send(&app, Method::GET, "/api/admin/bookings?from=%2B262142-12-31", None, None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["bookings"], json!([]));
}

#[tokio::test]
async fn check_in_and_out_respect_dates() {
    let app = app().await;

    let early = send(&app, Method::POST, "/api/admin/bookings/booking-2/check-in?actionDate=2025-12-09", None, None).await;
    assert_eq!(early.status(), StatusCode::BAD_REQUEST);

    let ok = send(&app, Method::POST, "/api/admin/bookings/booking-2/check-in?actionDate=2025-12-10", None, None).await;
    assert_eq!(ok.status(), StatusCode::OK);
    assert_eq!(body_json(ok).await["status"], "checked-in");

    let early_out = send(&app, Method::POST, "/api/admin/bookings/booking-2/check-out?actionDate=2025-12-11", None, None).await;
    assert_eq!(early_out.status(), StatusCode::BAD_REQUEST);

    let out = send(&app, Method::POST, "/api/admin/bookings/booking-2/check-out?actionDate=2025-12-12", None, None).await;
    assert_eq!(out.status(), StatusCode::OK);
    assert_eq!(body_json(out).await["status"], "checked-out");

    // confirmed stays can be checked out directly
    let direct = send(&app, Method::POST, "/api/admin/bookings/booking-6/check-out?actionDate=2025-12-15", None, None).await;
    assert_eq!(direct.status(), StatusCode::OK);

    let missing = send(&app, Method::POST, "/api/admin/bookings/booking-404/check-in", None, None).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    let bad_date = send(&app, Method::POST, "/api/admin/bookings/booking-5/check-in?actionDate=soon", None, None).await;
    assert_eq!(bad_date.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn check_in_without_action_date_uses_today() {
    let app = app().await;
    let created = send(
        &app,
        Method::POST,
        "/api/guest/bookings",
        Some(json!({"userId": "user-guest-1", "roomId": "room-301", "checkIn": "2099-06-01", "checkOut": "2099-06-03", "guests": 2})),
        None,
    )
    .await;
    let id = body_json(created).await["id"].as_str().unwrap().to_string();

    let resp = send(&app, Method::POST, &format!("/api/admin/bookings/{}/check-in", id), None, None).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // seeded December 2025 stay has started by now
    let resp = send(&app, Method::POST, "/api/admin/bookings/booking-5/check-in", None, None).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn admin_room_management() {
    let app = app().await;

    let created = send(
        &app,
        Method::POST,
        "/api/admin/rooms",
        Some(json!({"id": "room-401", "name": "Family 401", "type": "Family", "capacity": 5, "basePrice": 300.0})),
        None,
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    assert_eq!(body_json(created).await["status"], "available");

    let invalid = send(
        &app,
        Method::POST,
        "/api/admin/rooms",
        Some(json!({"name": "", "type": "Family", "capacity": 5, "basePrice": 300.0})),
        None,
    )
    .await;
    assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);

    let patched = send(&app, Method::PATCH, "/api/admin/rooms/room-401", Some(json!({"status": "OUT_OF_ORDER"})), None).await;
    assert_eq!(patched.status(), StatusCode::OK);
    assert_eq!(body_json(patched).await["status"], "out_of_order");

    let bad_status = send(&app, Method::PATCH, "/api/admin/rooms/room-401", Some(json!({"status": "closed"})), None).await;
    assert_eq!(bad_status.status(), StatusCode::BAD_REQUEST);

    let missing = send(&app, Method::PATCH, "/api/admin/rooms/room-999", Some(json!({"status": "available"})), None).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    // out-of-order rooms drop out of search
    let search = body_json(
        send(&app, Method::GET, "/api/guest/rooms/search?checkIn=2099-01-01&checkOut=2099-01-02&guests=5", None, None).await,
    )
    .await;
    assert_eq!(search["rooms"], json!([]));

    let list = body_json(send(&app, Method::GET, "/api/admin/rooms", None, None).await).await;
    assert_eq!(list["rooms"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn room_deletion_guarded_by_future_bookings() {
    let app = app().await;
    send(
        &app,
        Method::POST,
        "/api/guest/bookings",
        Some(json!({"userId": "user-guest-1", "roomId": "room-201", "checkIn": "2099-02-01", "checkOut": "2099-02-03", "guests": 1})),
        None,
    )
    .await;

    let blocked = send(&app, Method::DELETE, "/api/admin/rooms/room-201", None, None).await;
    assert_eq!(blocked.status(), StatusCode::BAD_REQUEST);

    // room-301 only has a 2024 stay
    let deleted = send(&app, Method::DELETE, "/api/admin/rooms/room-301", None, None).await;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let again = send(&app, Method::DELETE, "/api/admin/rooms/room-301", None, None).await;
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn auth_gating_when_enabled() {
    let app = app_with(true).await;

    let anonymous = send(&app, Method::GET, "/api/admin/rooms", None, None).await;
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let guest = login(&app, "guest1@stayflex.test", "password123").await;
    let forbidden = send(&app, Method::GET, "/api/admin/rooms", None, Some(&guest)).await;
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

    let garbage = send(&app, Method::GET, "/api/admin/rooms", None, Some("not-a-token")).await;
    assert_eq!(garbage.status(), StatusCode::UNAUTHORIZED);

    let admin = login(&app, "admin@stayflex.test", "admin123").await;
    let ok = send(&app, Method::GET, "/api/admin/rooms", None, Some(&admin)).await;
    assert_eq!(ok.status(), StatusCode::OK);

    let own = send(&app, Method::GET, "/api/guest/bookings?userId=user-guest-1", None, Some(&guest)).await;
    assert_eq!(own.status(), StatusCode::OK);
    let other = send(&app, Method::GET, "/api/guest/bookings?userId=user-guest-2", None, Some(&guest)).await;
    assert_eq!(other.status(), StatusCode::FORBIDDEN);
    let other_cancel = send(&app, Method::POST, "/api/guest/bookings/booking-2/cancel", None, Some(&guest)).await;
    assert_eq!(other_cancel.status(), StatusCode::FORBIDDEN);

    // search stays public
    let search = send(&app, Method::GET, "/api/guest/rooms/search?checkIn=2099-01-01&checkOut=2099-01-02", None, None).await;
    assert_eq!(search.status(), StatusCode::OK);
}

#[tokio::test]
async fn cors_mirrors_origin_with_credentials() {
    let app = app().await;
    let req = Request::builder()
        .method(Method::GET)
        .uri("/health")
        .header(header::ORIGIN, "http://localhost:3000")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();

    assert_eq!(
        resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "http://localhost:3000"
    );
    assert_eq!(
        resp.headers().get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
        "true"
    );
}
