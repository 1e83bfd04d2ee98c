//! HTTP-level integration tests for the payout lifecycle endpoints.

mod common;

use axum::http::{Method, StatusCode};
use common::{as_decimal, body_json, get, post_json};
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_computes_amounts_from_rule(pool: PgPool) {
    let app = common::build_test_app(pool);
    common::seed_rule(&app, "13.00").await;

    let payout = common::seed_payout(&app, "HM1", "45600.00", "2025-03-01", "2025-03-05").await;

    assert_eq!(payout["status"], "pending");
    assert_eq!(as_decimal(&payout["commission_amount"]).to_string(), "5928.00");
    assert_eq!(as_decimal(&payout["net_payout_amount"]).to_string(), "39672.00");
    assert_eq!(payout["currency"], "THB");
    assert_eq!(payout["manual_override"], false);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_without_rule_or_rate_fails(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json(
        &app,
        "/api/v1/payouts",
        serde_json::json!({
            "property_id": 7,
            "reservation_code": "HM1",
            "guest_name": "Somchai P.",
            "check_in": "2025-03-01",
            "check_out": "2025-03-05",
            "platform": "airbnb",
            "guest_paid_amount": "45600.00",
            "currency": "THB",
        }),
    )
    .await;

    // Never a silent 0% fallback.
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["code"], "RULE_NOT_FOUND");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_with_explicit_rate_needs_no_rule(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json(
        &app,
        "/api/v1/payouts",
        serde_json::json!({
            "property_id": 7,
            "reservation_code": "HM1",
            "guest_name": "Somchai P.",
            "check_in": "2025-03-01",
            "check_out": "2025-03-05",
            "platform": "direct",
            "guest_paid_amount": "1000.00",
            "currency": "THB",
            "commission_rate": "0.00",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(as_decimal(&json["data"]["net_payout_amount"]).to_string(), "1000.00");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_reservation_code_conflicts(pool: PgPool) {
    let app = common::build_test_app(pool);
    common::seed_rule(&app, "13.00").await;
    common::seed_payout(&app, "HM1", "45600.00", "2025-03-01", "2025-03-05").await;

    let response = post_json(
        &app,
        "/api/v1/payouts",
        serde_json::json!({
            "property_id": 7,
            "reservation_code": "HM1",
            "guest_name": "Another Guest",
            "check_in": "2025-04-01",
            "check_out": "2025-04-05",
            "platform": "airbnb",
            "guest_paid_amount": "100.00",
            "currency": "THB",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_full_lifecycle_pending_confirmed_received(pool: PgPool) {
    let app = common::build_test_app(pool);
    common::seed_rule(&app, "13.00").await;
    let payout = common::seed_payout(&app, "HM1", "45600.00", "2025-03-01", "2025-03-05").await;
    let id = payout["id"].as_i64().unwrap();

    let response = post_json(
        &app,
        &format!("/api/v1/payouts/{id}/confirm"),
        serde_json::json!({ "actor": "alice" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "confirmed");
    assert_eq!(json["data"]["confirmed_by"], "alice");

    let response = post_json(
        &app,
        &format!("/api/v1/payouts/{id}/received"),
        serde_json::json!({ "actor": "alice" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "received");
    assert_eq!(json["data"]["received_by"], "alice");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_confirm_is_idempotent(pool: PgPool) {
    let app = common::build_test_app(pool);
    common::seed_rule(&app, "13.00").await;
    let payout = common::seed_payout(&app, "HM1", "45600.00", "2025-03-01", "2025-03-05").await;
    let id = payout["id"].as_i64().unwrap();

    let first = post_json(
        &app,
        &format!("/api/v1/payouts/{id}/confirm"),
        serde_json::json!({ "actor": "alice" }),
    )
    .await;
    assert_eq!(first.status(), StatusCode::OK);
    let first = body_json(first).await;

    // Second confirm returns the unchanged record; bob does not take over.
    let second = post_json(
        &app,
        &format!("/api/v1/payouts/{id}/confirm"),
        serde_json::json!({ "actor": "bob" }),
    )
    .await;
    assert_eq!(second.status(), StatusCode::OK);
    let second = body_json(second).await;
    assert_eq!(second["data"]["status"], "confirmed");
    assert_eq!(second["data"]["confirmed_by"], "alice");
    assert_eq!(second["data"]["confirmed_at"], first["data"]["confirmed_at"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_invalid_transitions_conflict(pool: PgPool) {
    let app = common::build_test_app(pool);
    common::seed_rule(&app, "13.00").await;
    let payout = common::seed_payout(&app, "HM1", "45600.00", "2025-03-01", "2025-03-05").await;
    let id = payout["id"].as_i64().unwrap();

    // received straight from pending: rejected.
    let response = post_json(
        &app,
        &format!("/api/v1/payouts/{id}/received"),
        serde_json::json!({ "actor": "alice" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INVALID_TRANSITION");

    // Walk to received, then try to confirm again: no regression.
    post_json(&app, &format!("/api/v1/payouts/{id}/confirm"), serde_json::json!({ "actor": "alice" })).await;
    post_json(&app, &format!("/api/v1/payouts/{id}/received"), serde_json::json!({ "actor": "alice" })).await;

    let response = post_json(
        &app,
        &format!("/api/v1/payouts/{id}/confirm"),
        serde_json::json!({ "actor": "bob" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INVALID_TRANSITION");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_override_validates_additive_identity(pool: PgPool) {
    let app = common::build_test_app(pool);
    common::seed_rule(&app, "13.00").await;
    let payout = common::seed_payout(&app, "HM2", "38500.00", "2025-03-01", "2025-03-05").await;
    let id = payout["id"].as_i64().unwrap();

    // 1925.00 + 36000.00 != 38500.00: rejected before persisting.
    let response = post_json(
        &app,
        &format!("/api/v1/payouts/{id}/override"),
        serde_json::json!({
            "commission_rate": "5.00",
            "commission_amount": "1925.00",
            "net_payout_amount": "36000.00",
            "reason": "Negotiated rate",
            "actor": "carol",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INVARIANT_VIOLATION");

    // 1925.00 + 36575.00 == 38500.00: accepted, confirmed, flagged.
    let response = post_json(
        &app,
        &format!("/api/v1/payouts/{id}/override"),
        serde_json::json!({
            "commission_rate": "5.00",
            "commission_amount": "1925.00",
            "net_payout_amount": "36575.00",
            "reason": "Negotiated rate",
            "actor": "carol",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "confirmed");
    assert_eq!(json["data"]["manual_override"], true);
    assert_eq!(json["data"]["override_by"], "carol");
    assert_eq!(as_decimal(&json["data"]["net_payout_amount"]).to_string(), "36575.00");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_cross_tenant_payout_is_not_found(pool: PgPool) {
    let app = common::build_test_app(pool);
    common::seed_rule(&app, "13.00").await;
    let payout = common::seed_payout(&app, "HM1", "45600.00", "2025-03-01", "2025-03-05").await;
    let id = payout["id"].as_i64().unwrap();

    // Existence never leaks across tenants: plain 404, for reads and
    // mutations alike.
    let response = common::send_as(
        &app,
        common::OTHER_TENANT,
        Method::GET,
        &format!("/api/v1/payouts/{id}"),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = common::send_as(
        &app,
        common::OTHER_TENANT,
        Method::POST,
        &format!("/api/v1/payouts/{id}/confirm"),
        Some(serde_json::json!({ "actor": "mallory" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Untouched for its owner.
    let response = get(&app, &format!("/api/v1/payouts/{id}")).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "pending");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_payouts_with_filters(pool: PgPool) {
    let app = common::build_test_app(pool);
    common::seed_rule(&app, "13.00").await;
    common::seed_payout(&app, "HM1", "1000.00", "2025-03-01", "2025-03-05").await;
    common::seed_payout(&app, "HM2", "2000.00", "2025-04-01", "2025-04-05").await;

    let response = get(&app, "/api/v1/payouts?check_in_from=2025-04-01").await;
    let json = body_json(response).await;
    let rows = json["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["reservation_code"], "HM2");

    let response = get(&app, "/api/v1/payouts?status=pending&platform=airbnb").await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);
}
