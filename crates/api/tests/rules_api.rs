//! HTTP-level integration tests for the rule management endpoints.
//!
//! Uses Axum's tower::ServiceExt to send requests directly to the
//! router without an actual TCP listener.

mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, delete, get, put_json, send_without_tenant};
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_upsert_and_get_rule(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = put_json(
        &app,
        "/api/v1/properties/7/rules/airbnb",
        serde_json::json!({ "commission_rate": "13.00" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["platform"], "airbnb");
    assert_eq!(json["data"]["is_active"], true);

    let response = get(&app, "/api/v1/properties/7/rules/airbnb").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(common::as_decimal(&json["data"]["commission_rate"]).to_string(), "13.00");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_get_missing_rule_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(&app, "/api/v1/properties/7/rules/airbnb").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reupsert_supersedes_and_keeps_history(pool: PgPool) {
    let app = common::build_test_app(pool);
    common::seed_rule(&app, "13.00").await;
    common::seed_rule(&app, "15.00").await;

    let response = get(&app, "/api/v1/properties/7/rules/airbnb").await;
    let json = body_json(response).await;
    assert_eq!(common::as_decimal(&json["data"]["commission_rate"]).to_string(), "15.00");

    // Both rows remain on file; only one is active.
    let response = get(&app, "/api/v1/properties/7/rules").await;
    let json = body_json(response).await;
    let rules = json["data"].as_array().unwrap();
    assert_eq!(rules.len(), 2);
    let active: Vec<_> = rules
        .iter()
        .filter(|r| r["is_active"] == true)
        .collect();
    assert_eq!(active.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_platform_name_is_normalized(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = put_json(
        &app,
        "/api/v1/properties/7/rules/Airbnb",
        serde_json::json!({ "commission_rate": "13.00" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(&app, "/api/v1/properties/7/rules/airbnb").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_rate_out_of_bounds_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);

    for rate in ["100.01", "-1.00"] {
        let response = put_json(
            &app,
            "/api/v1/properties/7/rules/airbnb",
            serde_json::json!({ "commission_rate": rate }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "rate {rate}");
        let json = body_json(response).await;
        assert_eq!(json["code"], "VALIDATION_ERROR");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deactivate_rule(pool: PgPool) {
    let app = common::build_test_app(pool);
    common::seed_rule(&app, "13.00").await;

    let response = get(&app, "/api/v1/properties/7/rules/airbnb").await;
    let json = body_json(response).await;
    let id = json["data"]["id"].as_i64().unwrap();

    let response = delete(&app, &format!("/api/v1/rules/{id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // No active rule remains for the key.
    let response = get(&app, "/api/v1/properties/7/rules/airbnb").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Deactivating again is a no-op, not an error.
    let response = delete(&app, &format!("/api/v1/rules/{id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_missing_tenant_header_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = send_without_tenant(&app, Method::GET, "/api/v1/properties/7/rules").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_foreign_tenant_sees_nothing(pool: PgPool) {
    let app = common::build_test_app(pool);
    common::seed_rule(&app, "13.00").await;

    let response = common::send_as(
        &app,
        common::OTHER_TENANT,
        Method::GET,
        "/api/v1/properties/7/rules/airbnb",
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
