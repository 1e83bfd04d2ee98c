use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use staypay_core::alert::{ALERT_MANUAL_REVIEW_NEEDED, ALERT_PAYOUT_MISSING};
use staypay_core::payout::compute_breakdown;
use staypay_db::models::booking_payout::NewBookingPayout;
use staypay_db::models::payout_alert::AlertFilter;
use staypay_db::repositories::{BookingPayoutRepo, PayoutAlertRepo};

const TENANT: i64 = 10;
const OTHER_TENANT: i64 = 99;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

async fn seed_payout(pool: &PgPool) -> i64 {
    let guest_paid = dec("45600.00");
    let breakdown = compute_breakdown(guest_paid, dec("13.00")).unwrap();
    let payout = BookingPayoutRepo::create(
        pool,
        TENANT,
        &NewBookingPayout {
            property_id: 7,
            reservation_code: "HM1".to_string(),
            guest_name: "Somchai P.".to_string(),
            check_in: NaiveDate::from_str("2025-03-01").unwrap(),
            check_out: NaiveDate::from_str("2025-03-05").unwrap(),
            platform: "airbnb".to_string(),
            guest_paid_amount: guest_paid,
            currency: "THB".to_string(),
            commission_rate: dec("13.00"),
            commission_amount: breakdown.commission_amount,
            net_payout_amount: breakdown.net_payout_amount,
            notes: None,
        },
    )
    .await
    .unwrap();
    payout.id
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_find_unresolved_backs_dedup(pool: PgPool) {
    let payout_id = seed_payout(&pool).await;

    assert!(
        PayoutAlertRepo::find_unresolved(&pool, TENANT, payout_id, ALERT_PAYOUT_MISSING)
            .await
            .unwrap()
            .is_none()
    );

    let created = PayoutAlertRepo::create(
        &pool,
        TENANT,
        payout_id,
        ALERT_PAYOUT_MISSING,
        "medium",
        "7 days past check-out",
    )
    .await
    .unwrap();

    let found = PayoutAlertRepo::find_unresolved(&pool, TENANT, payout_id, ALERT_PAYOUT_MISSING)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, created.id);

    // A different type is tracked independently.
    assert!(
        PayoutAlertRepo::find_unresolved(&pool, TENANT, payout_id, ALERT_MANUAL_REVIEW_NEEDED)
            .await
            .unwrap()
            .is_none()
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_refresh_updates_in_place(pool: PgPool) {
    let payout_id = seed_payout(&pool).await;
    let created = PayoutAlertRepo::create(
        &pool,
        TENANT,
        payout_id,
        ALERT_PAYOUT_MISSING,
        "medium",
        "7 days past check-out",
    )
    .await
    .unwrap();

    let refreshed =
        PayoutAlertRepo::refresh(&pool, TENANT, created.id, "high", "20 days past check-out")
            .await
            .unwrap()
            .unwrap();
    assert_eq!(refreshed.id, created.id);
    assert_eq!(refreshed.severity, "high");
    assert_eq!(refreshed.message, "20 days past check-out");

    // Still exactly one alert row for the payout.
    let all = PayoutAlertRepo::list(
        &pool,
        TENANT,
        &AlertFilter {
            payout_id: Some(payout_id),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(all.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_resolve_is_terminal(pool: PgPool) {
    let payout_id = seed_payout(&pool).await;
    let created = PayoutAlertRepo::create(
        &pool,
        TENANT,
        payout_id,
        ALERT_PAYOUT_MISSING,
        "medium",
        "7 days past check-out",
    )
    .await
    .unwrap();

    let resolved =
        PayoutAlertRepo::resolve(&pool, TENANT, created.id, "alice", Some("payout arrived"))
            .await
            .unwrap()
            .unwrap();
    assert!(resolved.is_resolved);
    assert_eq!(resolved.resolved_by.as_deref(), Some("alice"));
    assert_eq!(resolved.resolution_notes.as_deref(), Some("payout arrived"));

    // Second resolve: CAS refuses, nothing reopens.
    assert!(PayoutAlertRepo::resolve(&pool, TENANT, created.id, "bob", None)
        .await
        .unwrap()
        .is_none());

    // Resolved alerts no longer count for dedup; a new one may be created.
    assert!(
        PayoutAlertRepo::find_unresolved(&pool, TENANT, payout_id, ALERT_PAYOUT_MISSING)
            .await
            .unwrap()
            .is_none()
    );
    PayoutAlertRepo::create(
        &pool,
        TENANT,
        payout_id,
        ALERT_PAYOUT_MISSING,
        "high",
        "still missing",
    )
    .await
    .unwrap();
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_filters(pool: PgPool) {
    let payout_id = seed_payout(&pool).await;
    PayoutAlertRepo::create(&pool, TENANT, payout_id, ALERT_PAYOUT_MISSING, "medium", "m")
        .await
        .unwrap();
    let review =
        PayoutAlertRepo::create(&pool, TENANT, payout_id, ALERT_MANUAL_REVIEW_NEEDED, "low", "r")
            .await
            .unwrap();
    PayoutAlertRepo::resolve(&pool, TENANT, review.id, "alice", None)
        .await
        .unwrap()
        .unwrap();

    let unresolved = PayoutAlertRepo::list(
        &pool,
        TENANT,
        &AlertFilter {
            resolved: Some(false),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(unresolved.len(), 1);
    assert_eq!(unresolved[0].alert_type, ALERT_PAYOUT_MISSING);

    let by_severity = PayoutAlertRepo::list(
        &pool,
        TENANT,
        &AlertFilter {
            severity: Some("low".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(by_severity.len(), 1);
    assert_eq!(by_severity[0].alert_type, ALERT_MANUAL_REVIEW_NEEDED);

    // Tenant isolation applies to alerts too.
    let foreign = PayoutAlertRepo::list(&pool, OTHER_TENANT, &AlertFilter::default())
        .await
        .unwrap();
    assert!(foreign.is_empty());
}
