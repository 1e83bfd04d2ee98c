#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use staypay_api::config::ServerConfig;
use staypay_api::routes;
use staypay_api::state::AppState;

/// The tenant all helpers send by default.
pub const TENANT: i64 = 10;

/// A second tenant for isolation tests.
pub const OTHER_TENANT: i64 = 99;

/// Build a test `ServerConfig` with safe defaults: default alert
/// thresholds (5/14 days, 1.00 tolerance) and a 30-second timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        alert_missing_after_days: 5,
        alert_escalate_after_days: 14,
        alert_mismatch_tolerance: Decimal::ONE,
    }
}

/// Build the full application router with the middleware layers, using
/// the given database pool.
///
/// This mirrors the router construction in `main.rs` so integration
/// tests exercise the same stack (request ID, timeout, tracing, panic
/// recovery) that production uses.
pub fn build_test_app(pool: PgPool) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(test_config()),
    };

    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .with_state(state)
}

/// Send a request with the default tenant header.
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    send_as(app, TENANT, method, uri, body).await
}

/// Send a request as a specific tenant.
pub async fn send_as(
    app: &Router,
    tenant: i64,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("x-tenant-id", tenant.to_string())
        .header(CONTENT_TYPE, "application/json");
    let request = match body {
        Some(json) => builder.body(Body::from(json.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

/// Send a request with no tenant header at all.
pub async fn send_without_tenant(app: &Router, method: Method, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

pub async fn post_json(app: &Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn put_json(app: &Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::PUT, uri, Some(body)).await
}

pub async fn delete(app: &Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None).await
}

/// Collect a response body into JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Parse a JSON string field holding a decimal amount.
pub fn as_decimal(value: &serde_json::Value) -> Decimal {
    use std::str::FromStr;
    Decimal::from_str(value.as_str().unwrap_or_else(|| panic!("not a string: {value}"))).unwrap()
}

/// Upsert an airbnb rule for the default tenant and property 7.
pub async fn seed_rule(app: &Router, rate: &str) {
    let response = put_json(
        app,
        "/api/v1/properties/7/rules/airbnb",
        serde_json::json!({ "commission_rate": rate }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

/// Create a payout through the API and return its JSON.
pub async fn seed_payout(
    app: &Router,
    reservation_code: &str,
    guest_paid: &str,
    check_in: &str,
    check_out: &str,
) -> serde_json::Value {
    let response = post_json(
        app,
        "/api/v1/payouts",
        serde_json::json!({
            "property_id": 7,
            "reservation_code": reservation_code,
            "guest_name": "Somchai P.",
            "check_in": check_in,
            "check_out": check_out,
            "platform": "airbnb",
            "guest_paid_amount": guest_paid,
            "currency": "THB",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}
