//! Payout lifecycle operations and alert synchronization.
//!
//! Status transitions are compare-and-set at the repository layer; this
//! module diagnoses a lost CAS by re-reading the row. If the re-read
//! shows a state the operation could never apply to, the caller gets
//! `InvalidTransition`; if it shows the operation already happened, the
//! call is idempotent and returns the current row; if it still shows the
//! pre-condition state, the row changed between the two reads and the
//! caller gets `StaleState` to re-read and retry.

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use staypay_core::alert::{self, AlertInput, AlertThresholds};
use staypay_core::error::CoreError;
use staypay_core::payout::{self, PayoutStatus, STATUS_CONFIRMED, STATUS_PENDING, STATUS_RECEIVED};
use staypay_core::platform::normalize_platform;
use staypay_core::types::{DbId, TenantId};
use staypay_db::models::booking_payout::{
    BookingPayout, CreateBookingPayout, NewBookingPayout, OverridePayout, RecordObservation,
};
use staypay_db::models::payout_alert::PayoutAlert;
use staypay_db::repositories::{BookingPayoutRepo, PayoutAlertRepo, PayoutRuleRepo};

use crate::error::{AppError, AppResult};

/// Observation source: the OTA platform's own payout feed.
pub const OBSERVATION_PLATFORM_SYNC: &str = "platform_sync";

/// Observation source: a parsed payout confirmation email.
pub const OBSERVATION_EMAIL_PARSE: &str = "email_parse";

/// Outcome of a bulk alert evaluation pass.
#[derive(Debug, Serialize)]
pub struct BulkEvaluation {
    /// Payouts inspected.
    pub evaluated: usize,
    /// Alerts created or refreshed across all of them.
    pub alerts: usize,
}

fn current_status(p: &BookingPayout) -> AppResult<PayoutStatus> {
    p.payout_status().ok_or_else(|| {
        AppError::InternalError(format!(
            "Payout {} carries unknown status '{}'",
            p.id, p.status
        ))
    })
}

/// Record a new booking payout.
///
/// The commission rate comes from the request when supplied, otherwise
/// from the active rule for the booking's (property, platform); with
/// neither on file the create fails with `RuleNotFound` rather than
/// assuming 0%.
pub async fn create_payout(
    pool: &PgPool,
    tenant_id: TenantId,
    input: &CreateBookingPayout,
    thresholds: &AlertThresholds,
) -> AppResult<(BookingPayout, Vec<PayoutAlert>)> {
    let platform = normalize_platform(&input.platform).map_err(CoreError::Validation)?;

    let rate = match input.commission_rate {
        Some(rate) => rate,
        None => {
            let rule =
                PayoutRuleRepo::find_active(pool, tenant_id, input.property_id, &platform).await?;
            match rule {
                Some(rule) => rule.commission_rate,
                None => {
                    return Err(CoreError::RuleNotFound {
                        property_id: input.property_id,
                        platform,
                    }
                    .into())
                }
            }
        }
    };

    if input.check_out < input.check_in {
        return Err(CoreError::Validation(format!(
            "Check-out {} precedes check-in {}",
            input.check_out, input.check_in
        ))
        .into());
    }

    let breakdown = payout::compute_breakdown(input.guest_paid_amount, rate)?;

    let new_payout = NewBookingPayout {
        property_id: input.property_id,
        reservation_code: input.reservation_code.clone(),
        guest_name: input.guest_name.clone(),
        check_in: input.check_in,
        check_out: input.check_out,
        platform,
        guest_paid_amount: input.guest_paid_amount,
        currency: input.currency.clone(),
        commission_rate: rate,
        commission_amount: breakdown.commission_amount,
        net_payout_amount: breakdown.net_payout_amount,
        notes: input.notes.clone(),
    };

    let created = BookingPayoutRepo::create(pool, tenant_id, &new_payout).await?;
    let alerts = sync_alerts(pool, tenant_id, &created, thresholds).await?;
    Ok((created, alerts))
}

/// Confirm a pending payout. Idempotent on an already-confirmed row.
pub async fn confirm_payout(
    pool: &PgPool,
    tenant_id: TenantId,
    id: DbId,
    actor: &str,
    thresholds: &AlertThresholds,
) -> AppResult<BookingPayout> {
    if let Some(confirmed) = BookingPayoutRepo::confirm(pool, tenant_id, id, actor).await? {
        sync_alerts(pool, tenant_id, &confirmed, thresholds).await?;
        return Ok(confirmed);
    }

    let current = BookingPayoutRepo::find_by_id(pool, tenant_id, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "BookingPayout",
            id,
        })?;
    match current_status(&current)? {
        // A concurrent writer got there first; the payout is confirmed
        // either way.
        PayoutStatus::Confirmed => Ok(current),
        PayoutStatus::Received => Err(CoreError::InvalidTransition {
            from: STATUS_RECEIVED,
            to: STATUS_CONFIRMED,
        }
        .into()),
        PayoutStatus::Pending => Err(CoreError::StaleState.into()),
    }
}

/// Verify a confirmed payout's funds as deposited. Idempotent on an
/// already-received row.
pub async fn mark_received(
    pool: &PgPool,
    tenant_id: TenantId,
    id: DbId,
    actor: &str,
    thresholds: &AlertThresholds,
) -> AppResult<BookingPayout> {
    if let Some(received) = BookingPayoutRepo::mark_received(pool, tenant_id, id, actor).await? {
        sync_alerts(pool, tenant_id, &received, thresholds).await?;
        return Ok(received);
    }

    let current = BookingPayoutRepo::find_by_id(pool, tenant_id, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "BookingPayout",
            id,
        })?;
    match current_status(&current)? {
        PayoutStatus::Received => Ok(current),
        PayoutStatus::Pending => Err(CoreError::InvalidTransition {
            from: STATUS_PENDING,
            to: STATUS_RECEIVED,
        }
        .into()),
        PayoutStatus::Confirmed => Err(CoreError::StaleState.into()),
    }
}

/// Apply a manual override: operator-supplied rate, commission, and net
/// amounts replace the computed figures, the payout moves to
/// `confirmed`, and the override audit trail is recorded.
pub async fn override_payout(
    pool: &PgPool,
    tenant_id: TenantId,
    id: DbId,
    input: &OverridePayout,
    thresholds: &AlertThresholds,
) -> AppResult<BookingPayout> {
    let current = BookingPayoutRepo::find_by_id(pool, tenant_id, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "BookingPayout",
            id,
        })?;

    let rule =
        PayoutRuleRepo::find_active(pool, tenant_id, current.property_id, &current.platform)
            .await?;
    if let Some(rule) = &rule {
        if !rule.manual_override_allowed {
            return Err(CoreError::Validation(format!(
                "Manual overrides are disabled for property {} on platform '{}'",
                current.property_id, current.platform
            ))
            .into());
        }
    }

    payout::validate_override_from(current_status(&current)?)?;
    payout::verify_override(
        current.guest_paid_amount,
        input.commission_rate,
        input.commission_amount,
        input.net_payout_amount,
    )?;

    let updated = BookingPayoutRepo::apply_override(
        pool,
        tenant_id,
        id,
        input.commission_rate,
        input.commission_amount,
        input.net_payout_amount,
        &input.reason,
        &input.actor,
    )
    .await?;

    match updated {
        Some(overridden) => {
            sync_alerts(pool, tenant_id, &overridden, thresholds).await?;
            Ok(overridden)
        }
        None => {
            // The CAS saw neither pending nor confirmed even though the
            // read above did: the row moved under us.
            let after = BookingPayoutRepo::find_by_id(pool, tenant_id, id)
                .await?
                .ok_or(CoreError::NotFound {
                    entity: "BookingPayout",
                    id,
                })?;
            match current_status(&after)? {
                PayoutStatus::Received => Err(CoreError::InvalidTransition {
                    from: STATUS_RECEIVED,
                    to: STATUS_CONFIRMED,
                }
                .into()),
                _ => Err(CoreError::StaleState.into()),
            }
        }
    }
}

/// Store an externally observed payout fact and re-evaluate alerts.
/// Observations never overwrite computed amounts.
pub async fn record_observation(
    pool: &PgPool,
    tenant_id: TenantId,
    id: DbId,
    input: &RecordObservation,
    thresholds: &AlertThresholds,
) -> AppResult<(BookingPayout, Vec<PayoutAlert>)> {
    let (platform_sync, email_parse) = match input.source.as_str() {
        OBSERVATION_PLATFORM_SYNC => (true, false),
        OBSERVATION_EMAIL_PARSE => (false, true),
        other => {
            return Err(CoreError::Validation(format!(
                "Unknown observation source '{other}'. \
                 Expected '{OBSERVATION_PLATFORM_SYNC}' or '{OBSERVATION_EMAIL_PARSE}'"
            ))
            .into())
        }
    };

    if let Some(amount) = input.observed_payout_amount {
        if amount < Decimal::ZERO {
            return Err(CoreError::Validation(format!(
                "Observed payout amount must not be negative, got {amount}"
            ))
            .into());
        }
    }

    let updated = BookingPayoutRepo::record_observation(
        pool,
        tenant_id,
        id,
        platform_sync,
        email_parse,
        input.observed_payout_amount,
    )
    .await?
    .ok_or(CoreError::NotFound {
        entity: "BookingPayout",
        id,
    })?;

    let alerts = sync_alerts(pool, tenant_id, &updated, thresholds).await?;
    Ok((updated, alerts))
}

/// Re-run alert evaluation for one payout.
pub async fn evaluate_payout(
    pool: &PgPool,
    tenant_id: TenantId,
    id: DbId,
    thresholds: &AlertThresholds,
) -> AppResult<(BookingPayout, Vec<PayoutAlert>)> {
    let current = BookingPayoutRepo::find_by_id(pool, tenant_id, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "BookingPayout",
            id,
        })?;
    let alerts = sync_alerts(pool, tenant_id, &current, thresholds).await?;
    Ok((current, alerts))
}

/// Re-run alert evaluation across the tenant's alert-relevant payouts.
/// This is the hook an external scheduler calls periodically; the engine
/// itself never schedules anything.
pub async fn evaluate_all(
    pool: &PgPool,
    tenant_id: TenantId,
    thresholds: &AlertThresholds,
) -> AppResult<BulkEvaluation> {
    let payouts = BookingPayoutRepo::list_for_evaluation(pool, tenant_id).await?;
    let mut alerts = 0;
    let evaluated = payouts.len();
    for payout in &payouts {
        alerts += sync_alerts(pool, tenant_id, payout, thresholds).await?.len();
    }
    Ok(BulkEvaluation { evaluated, alerts })
}

/// Bring the persisted alerts for one payout in line with what its
/// current state warrants.
///
/// For each evaluated draft, an existing unresolved alert of the same
/// type is refreshed (message + severity, bumped timestamp) and a
/// missing one is created. Alerts whose condition has lapsed are left
/// untouched: they close only through an explicit resolve.
pub async fn sync_alerts(
    pool: &PgPool,
    tenant_id: TenantId,
    payout: &BookingPayout,
    thresholds: &AlertThresholds,
) -> AppResult<Vec<PayoutAlert>> {
    let rule =
        PayoutRuleRepo::find_active(pool, tenant_id, payout.property_id, &payout.platform).await?;
    let alert_on_payout_missing = rule.map(|r| r.alert_on_payout_missing).unwrap_or(false);

    let input = AlertInput {
        reservation_code: &payout.reservation_code,
        status: current_status(payout)?,
        check_out: payout.check_out,
        net_payout_amount: payout.net_payout_amount,
        manual_override: payout.manual_override,
        override_reason: payout.override_reason.as_deref(),
        observed_payout_amount: payout.observed_payout_amount,
        alert_on_payout_missing,
    };
    let today = chrono::Utc::now().date_naive();
    let drafts = alert::evaluate(&input, thresholds, today);

    let mut synced = Vec::with_capacity(drafts.len());
    for draft in drafts {
        let existing =
            PayoutAlertRepo::find_unresolved(pool, tenant_id, payout.id, draft.alert_type).await?;
        let refreshed = match existing {
            Some(existing) => {
                PayoutAlertRepo::refresh(
                    pool,
                    tenant_id,
                    existing.id,
                    draft.severity.as_str(),
                    &draft.message,
                )
                .await?
            }
            None => None,
        };
        let alert = match refreshed {
            Some(alert) => alert,
            // No unresolved alert of this type (or it was resolved
            // between the lookup and the refresh): create one.
            None => {
                PayoutAlertRepo::create(
                    pool,
                    tenant_id,
                    payout.id,
                    draft.alert_type,
                    draft.severity.as_str(),
                    &draft.message,
                )
                .await?
            }
        };
        synced.push(alert);
    }

    if !synced.is_empty() {
        BookingPayoutRepo::set_alert_generated(pool, tenant_id, payout.id).await?;
    }
    Ok(synced)
}
