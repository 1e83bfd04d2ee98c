//! Repository for the `payout_rules` table.

use sqlx::PgPool;
use staypay_core::types::{DbId, TenantId};

use crate::models::payout_rule::{PayoutRule, UpsertPayoutRule};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, tenant_id, property_id, platform, commission_rate, \
    use_external_payout, manual_override_allowed, alert_on_payout_missing, \
    is_active, created_at, updated_at";

/// Provides rule lookup, upsert, and soft deactivation.
pub struct PayoutRuleRepo;

impl PayoutRuleRepo {
    /// Find the single active rule for a (property, platform) key, if any.
    pub async fn find_active(
        pool: &PgPool,
        tenant_id: TenantId,
        property_id: DbId,
        platform: &str,
    ) -> Result<Option<PayoutRule>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM payout_rules \
             WHERE tenant_id = $1 AND property_id = $2 AND platform = $3 AND is_active"
        );
        sqlx::query_as::<_, PayoutRule>(&query)
            .bind(tenant_id)
            .bind(property_id)
            .bind(platform)
            .fetch_optional(pool)
            .await
    }

    /// Find a rule by id, active or not.
    pub async fn find_by_id(
        pool: &PgPool,
        tenant_id: TenantId,
        id: DbId,
    ) -> Result<Option<PayoutRule>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM payout_rules WHERE tenant_id = $1 AND id = $2");
        sqlx::query_as::<_, PayoutRule>(&query)
            .bind(tenant_id)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Create or replace the active rule for a (property, platform) key.
    ///
    /// Runs in a transaction: any prior active rule for the key is
    /// deactivated before the replacement row is inserted, so the
    /// partial unique index on active rows never trips under normal use.
    pub async fn upsert(
        pool: &PgPool,
        tenant_id: TenantId,
        property_id: DbId,
        platform: &str,
        input: &UpsertPayoutRule,
    ) -> Result<PayoutRule, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query(
            "UPDATE payout_rules SET is_active = FALSE, updated_at = NOW() \
             WHERE tenant_id = $1 AND property_id = $2 AND platform = $3 AND is_active",
        )
        .bind(tenant_id)
        .bind(property_id)
        .bind(platform)
        .execute(&mut *tx)
        .await?;

        let query = format!(
            "INSERT INTO payout_rules \
                (tenant_id, property_id, platform, commission_rate, \
                 use_external_payout, manual_override_allowed, alert_on_payout_missing) \
             VALUES ($1, $2, $3, $4, COALESCE($5, FALSE), COALESCE($6, TRUE), COALESCE($7, TRUE)) \
             RETURNING {COLUMNS}"
        );
        let rule = sqlx::query_as::<_, PayoutRule>(&query)
            .bind(tenant_id)
            .bind(property_id)
            .bind(platform)
            .bind(input.commission_rate)
            .bind(input.use_external_payout)
            .bind(input.manual_override_allowed)
            .bind(input.alert_on_payout_missing)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(rule)
    }

    /// Deactivate a rule. Returns `true` if a row was flipped; an
    /// already-inactive rule returns `false` (idempotent).
    pub async fn deactivate(
        pool: &PgPool,
        tenant_id: TenantId,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE payout_rules SET is_active = FALSE, updated_at = NOW() \
             WHERE tenant_id = $1 AND id = $2 AND is_active",
        )
        .bind(tenant_id)
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List rules for a tenant, optionally scoped to one property.
    /// Includes inactive rules; active rows sort first per key.
    pub async fn list(
        pool: &PgPool,
        tenant_id: TenantId,
        property_id: Option<DbId>,
    ) -> Result<Vec<PayoutRule>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM payout_rules \
             WHERE tenant_id = $1 AND ($2::BIGINT IS NULL OR property_id = $2) \
             ORDER BY property_id, platform, is_active DESC, created_at DESC"
        );
        sqlx::query_as::<_, PayoutRule>(&query)
            .bind(tenant_id)
            .bind(property_id)
            .fetch_all(pool)
            .await
    }
}
