//! Router-level tests driven in-process with `oneshot`.
//!
//! The pool connects lazily and every request here is answered before any
//! query runs, so no database is needed.

use axum::Router;
use axum::body::Body;
use http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;

use menuqr_server::auth::restaurant_auth::create_token;
use menuqr_server::{AppState, Config, api};

fn app() -> Router {
    let config = Config::for_tests();
    let pool = PgPoolOptions::new()
        .connect_lazy(&config.database_url)
        .expect("lazy pool");
    let state = AppState::with_pool(&config, pool).expect("state");
    api::build_app(state)
}

fn token(expiry_hours: i64) -> String {
    create_token(7, "chef@example.com", &Config::for_tests().jwt_secret, expiry_hours).unwrap()
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn health_reports_ok() {
    let request = Request::get("/health").body(Body::empty()).unwrap();
    let (status, body) = send(app(), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "menuqr-server");
}

#[tokio::test]
async fn protected_routes_require_token() {
    for uri in [
        "/api/auth/me",
        "/api/restaurant/profile",
        "/api/menu",
        "/api/section",
        "/api/dish",
        "/api/order",
        "/api/statistics/overview",
    ] {
        let request = Request::get(uri).body(Body::empty()).unwrap();
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(body["code"], 1001, "{uri}");
    }
}

#[tokio::test]
async fn owner_writes_on_public_paths_still_require_token() {
    let request = json_request(Method::PUT, "/api/menu/1", json!({ "name": "Dinner" }));
    let (status, _) = send(app(), request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let request = json_request(Method::PATCH, "/api/order/1/status", json!({ "status": "ready" }));
    let (status, _) = send(app(), request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn bad_and_expired_tokens_are_rejected() {
    let request = Request::get("/api/menu")
        .header(header::AUTHORIZATION, "Bearer not-a-token")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app(), request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1004);

    let request = Request::get("/api/menu")
        .header(header::AUTHORIZATION, format!("Bearer {}", token(-2)))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app(), request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1003);
}

#[tokio::test]
async fn register_validates_fields() {
    let request = json_request(
        Method::POST,
        "/api/auth/register",
        json!({ "name": "", "email": "nope", "password": "short" }),
    );
    let (status, body) = send(app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2);
    let details = body["details"].as_object().unwrap();
    assert!(details.contains_key("name"));
    assert!(details.contains_key("email"));
    assert!(details.contains_key("password"));
}

#[tokio::test]
async fn register_is_rate_limited_per_ip() {
    let app = app();
    let attempt = || {
        let mut request = json_request(
            Method::POST,
            "/api/auth/register",
            json!({ "name": "", "email": "x", "password": "y" }),
        );
        request
            .headers_mut()
            .insert("x-forwarded-for", "198.51.100.4".parse().unwrap());
        request
    };

    for _ in 0..3 {
        let (status, _) = send(app.clone(), attempt()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
    let response = app.clone().oneshot(attempt()).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    let retry_after: u64 = response.headers()[header::RETRY_AFTER]
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    assert!((1..=60).contains(&retry_after));

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["code"], 9);
    assert_eq!(body["details"]["retry_after_secs"], retry_after);
}

#[tokio::test]
async fn reset_password_rejects_short_password() {
    let request = json_request(
        Method::POST,
        "/api/auth/reset-password",
        json!({ "token": "abc", "password": "1234" }),
    );
    let (status, body) = send(app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 1007);
}

#[tokio::test]
async fn empty_order_is_rejected_for_anonymous_customer() {
    let request = json_request(
        Method::POST,
        "/api/order",
        json!({
            "menu_id": 1,
            "client": { "client_type": "internal", "table_number": "4" },
            "items": []
        }),
    );
    let (status, body) = send(app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4002);
}

#[tokio::test]
async fn dine_in_order_without_table_is_rejected() {
    let request = json_request(
        Method::POST,
        "/api/order",
        json!({
            "menu_id": 1,
            "client": { "client_type": "internal" },
            "items": [{ "dish_id": 3, "quantity": 1 }]
        }),
    );
    let (status, body) = send(app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2);
}

#[tokio::test]
async fn menu_create_rejects_bad_date() {
    let mut request = json_request(
        Method::POST,
        "/api/menu",
        json!({ "name": "Lunch", "date": "2025-13-01" }),
    );
    request.headers_mut().insert(
        header::AUTHORIZATION,
        format!("Bearer {}", token(24)).parse().unwrap(),
    );
    let (status, body) = send(app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 6003);
}

#[tokio::test]
async fn cors_preflight_mirrors_origin() {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/menu/current")
        .header(header::ORIGIN, "https://menu.example.com")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
        .body(Body::empty())
        .unwrap();
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "https://menu.example.com"
    );
}

#[tokio::test]
async fn responses_carry_request_id() {
    let request = Request::get("/health").body(Body::empty()).unwrap();
    let response = app().oneshot(request).await.unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}
