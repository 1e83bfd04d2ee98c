//! Repository for the `booking_payouts` table.
//!
//! Status transitions are compare-and-set: the UPDATE carries the
//! expected pre-condition status in its WHERE clause and returns the row
//! only when it still matched at write time. Callers diagnose a `None`
//! by re-reading.

use rust_decimal::Decimal;
use sqlx::PgPool;
use staypay_core::payout::{STATUS_CONFIRMED, STATUS_PENDING, STATUS_RECEIVED};
use staypay_core::types::{DbId, TenantId};

use crate::models::booking_payout::{BookingPayout, NewBookingPayout, PayoutFilter};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, tenant_id, property_id, reservation_code, guest_name, \
    check_in, check_out, platform, guest_paid_amount, currency, \
    commission_rate, commission_amount, net_payout_amount, status, \
    confirmed_by, confirmed_at, received_by, received_at, \
    manual_override, override_reason, override_by, override_at, \
    platform_sync_observed, email_parse_observed, observed_payout_amount, \
    alert_generated, notes, created_at, updated_at";

const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 500;

/// Provides payout creation, lookup, listing, and CAS status transitions.
pub struct BookingPayoutRepo;

impl BookingPayoutRepo {
    /// Insert a new payout record with status `pending`.
    pub async fn create(
        pool: &PgPool,
        tenant_id: TenantId,
        input: &NewBookingPayout,
    ) -> Result<BookingPayout, sqlx::Error> {
        let query = format!(
            "INSERT INTO booking_payouts \
                (tenant_id, property_id, reservation_code, guest_name, \
                 check_in, check_out, platform, guest_paid_amount, currency, \
                 commission_rate, commission_amount, net_payout_amount, notes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BookingPayout>(&query)
            .bind(tenant_id)
            .bind(input.property_id)
            .bind(&input.reservation_code)
            .bind(&input.guest_name)
            .bind(input.check_in)
            .bind(input.check_out)
            .bind(&input.platform)
            .bind(input.guest_paid_amount)
            .bind(&input.currency)
            .bind(input.commission_rate)
            .bind(input.commission_amount)
            .bind(input.net_payout_amount)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    /// Find a payout by its internal id.
    pub async fn find_by_id(
        pool: &PgPool,
        tenant_id: TenantId,
        id: DbId,
    ) -> Result<Option<BookingPayout>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM booking_payouts WHERE tenant_id = $1 AND id = $2");
        sqlx::query_as::<_, BookingPayout>(&query)
            .bind(tenant_id)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a payout by its tenant-unique reservation code.
    pub async fn find_by_reservation_code(
        pool: &PgPool,
        tenant_id: TenantId,
        reservation_code: &str,
    ) -> Result<Option<BookingPayout>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM booking_payouts \
             WHERE tenant_id = $1 AND reservation_code = $2"
        );
        sqlx::query_as::<_, BookingPayout>(&query)
            .bind(tenant_id)
            .bind(reservation_code)
            .fetch_optional(pool)
            .await
    }

    /// List payouts matching the filter, most recent check-in first.
    pub async fn list(
        pool: &PgPool,
        tenant_id: TenantId,
        filter: &PayoutFilter,
    ) -> Result<Vec<BookingPayout>, sqlx::Error> {
        let limit = filter.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let offset = filter.offset.unwrap_or(0).max(0);
        let query = format!(
            "SELECT {COLUMNS} FROM booking_payouts \
             WHERE tenant_id = $1 \
               AND ($2::BIGINT IS NULL OR property_id = $2) \
               AND ($3::TEXT IS NULL OR platform = $3) \
               AND ($4::TEXT IS NULL OR status = $4) \
               AND ($5::DATE IS NULL OR check_in >= $5) \
               AND ($6::DATE IS NULL OR check_in <= $6) \
             ORDER BY check_in DESC, id DESC \
             LIMIT $7 OFFSET $8"
        );
        sqlx::query_as::<_, BookingPayout>(&query)
            .bind(tenant_id)
            .bind(filter.property_id)
            .bind(&filter.platform)
            .bind(&filter.status)
            .bind(filter.check_in_from)
            .bind(filter.check_in_to)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Payouts worth re-running alert evaluation on: still pending,
    /// manually overridden, or carrying an external observation.
    pub async fn list_for_evaluation(
        pool: &PgPool,
        tenant_id: TenantId,
    ) -> Result<Vec<BookingPayout>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM booking_payouts \
             WHERE tenant_id = $1 \
               AND (status = $2 OR manual_override OR observed_payout_amount IS NOT NULL) \
             ORDER BY id"
        );
        sqlx::query_as::<_, BookingPayout>(&query)
            .bind(tenant_id)
            .bind(STATUS_PENDING)
            .fetch_all(pool)
            .await
    }

    /// CAS `pending -> confirmed`, recording the confirming actor.
    /// Returns `None` if the row was not in `pending` at write time.
    pub async fn confirm(
        pool: &PgPool,
        tenant_id: TenantId,
        id: DbId,
        actor: &str,
    ) -> Result<Option<BookingPayout>, sqlx::Error> {
        let query = format!(
            "UPDATE booking_payouts SET \
                 status = $4, \
                 confirmed_by = $3, \
                 confirmed_at = NOW(), \
                 updated_at = NOW() \
             WHERE tenant_id = $1 AND id = $2 AND status = $5 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BookingPayout>(&query)
            .bind(tenant_id)
            .bind(id)
            .bind(actor)
            .bind(STATUS_CONFIRMED)
            .bind(STATUS_PENDING)
            .fetch_optional(pool)
            .await
    }

    /// CAS `confirmed -> received`, recording the verifying actor.
    /// Returns `None` if the row was not in `confirmed` at write time.
    pub async fn mark_received(
        pool: &PgPool,
        tenant_id: TenantId,
        id: DbId,
        actor: &str,
    ) -> Result<Option<BookingPayout>, sqlx::Error> {
        let query = format!(
            "UPDATE booking_payouts SET \
                 status = $4, \
                 received_by = $3, \
                 received_at = NOW(), \
                 updated_at = NOW() \
             WHERE tenant_id = $1 AND id = $2 AND status = $5 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BookingPayout>(&query)
            .bind(tenant_id)
            .bind(id)
            .bind(actor)
            .bind(STATUS_RECEIVED)
            .bind(STATUS_CONFIRMED)
            .fetch_optional(pool)
            .await
    }

    /// Apply a manual override: replace the three amount fields, move
    /// status to `confirmed`, and record the audit trail. CAS on status
    /// in (`pending`, `confirmed`); a `received` row is never touched.
    ///
    /// The amounts must already satisfy the additive identity; the
    /// caller validates before reaching here and the CHECK constraint
    /// backstops it.
    #[allow(clippy::too_many_arguments)]
    pub async fn apply_override(
        pool: &PgPool,
        tenant_id: TenantId,
        id: DbId,
        commission_rate: Decimal,
        commission_amount: Decimal,
        net_payout_amount: Decimal,
        reason: &str,
        actor: &str,
    ) -> Result<Option<BookingPayout>, sqlx::Error> {
        let query = format!(
            "UPDATE booking_payouts SET \
                 commission_rate = $3, \
                 commission_amount = $4, \
                 net_payout_amount = $5, \
                 status = $8, \
                 manual_override = TRUE, \
                 override_reason = $6, \
                 override_by = $7, \
                 override_at = NOW(), \
                 confirmed_by = $7, \
                 confirmed_at = NOW(), \
                 updated_at = NOW() \
             WHERE tenant_id = $1 AND id = $2 AND status IN ($9, $8) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BookingPayout>(&query)
            .bind(tenant_id)
            .bind(id)
            .bind(commission_rate)
            .bind(commission_amount)
            .bind(net_payout_amount)
            .bind(reason)
            .bind(actor)
            .bind(STATUS_CONFIRMED)
            .bind(STATUS_PENDING)
            .fetch_optional(pool)
            .await
    }

    /// Record an externally observed payout fact. Observation flags are
    /// sticky; the observed amount keeps its latest non-null value.
    pub async fn record_observation(
        pool: &PgPool,
        tenant_id: TenantId,
        id: DbId,
        platform_sync: bool,
        email_parse: bool,
        observed_payout_amount: Option<Decimal>,
    ) -> Result<Option<BookingPayout>, sqlx::Error> {
        let query = format!(
            "UPDATE booking_payouts SET \
                 platform_sync_observed = platform_sync_observed OR $3, \
                 email_parse_observed = email_parse_observed OR $4, \
                 observed_payout_amount = COALESCE($5, observed_payout_amount), \
                 updated_at = NOW() \
             WHERE tenant_id = $1 AND id = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BookingPayout>(&query)
            .bind(tenant_id)
            .bind(id)
            .bind(platform_sync)
            .bind(email_parse)
            .bind(observed_payout_amount)
            .fetch_optional(pool)
            .await
    }

    /// Flag that alert evaluation has produced at least one alert for
    /// this payout.
    pub async fn set_alert_generated(
        pool: &PgPool,
        tenant_id: TenantId,
        id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE booking_payouts SET alert_generated = TRUE, updated_at = NOW() \
             WHERE tenant_id = $1 AND id = $2 AND NOT alert_generated",
        )
        .bind(tenant_id)
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }
}
