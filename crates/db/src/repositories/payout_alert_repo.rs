//! Repository for the `payout_alerts` table.

use sqlx::PgPool;
use staypay_core::types::{DbId, TenantId};

use crate::models::payout_alert::{AlertFilter, PayoutAlert};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, tenant_id, payout_id, alert_type, severity, message, \
    is_resolved, resolved_by, resolved_at, resolution_notes, created_at, updated_at";

const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 500;

/// Provides alert creation, dedup lookup, refresh, and resolution.
pub struct PayoutAlertRepo;

impl PayoutAlertRepo {
    /// Insert a new unresolved alert.
    pub async fn create(
        pool: &PgPool,
        tenant_id: TenantId,
        payout_id: DbId,
        alert_type: &str,
        severity: &str,
        message: &str,
    ) -> Result<PayoutAlert, sqlx::Error> {
        let query = format!(
            "INSERT INTO payout_alerts (tenant_id, payout_id, alert_type, severity, message) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PayoutAlert>(&query)
            .bind(tenant_id)
            .bind(payout_id)
            .bind(alert_type)
            .bind(severity)
            .bind(message)
            .fetch_one(pool)
            .await
    }

    /// Find the unresolved alert of a given type for a payout, if one
    /// exists. This is the dedup check run before every create.
    pub async fn find_unresolved(
        pool: &PgPool,
        tenant_id: TenantId,
        payout_id: DbId,
        alert_type: &str,
    ) -> Result<Option<PayoutAlert>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM payout_alerts \
             WHERE tenant_id = $1 AND payout_id = $2 AND alert_type = $3 AND NOT is_resolved"
        );
        sqlx::query_as::<_, PayoutAlert>(&query)
            .bind(tenant_id)
            .bind(payout_id)
            .bind(alert_type)
            .fetch_optional(pool)
            .await
    }

    /// Refresh an unresolved alert in place instead of duplicating it:
    /// update severity and message, bump `updated_at`.
    pub async fn refresh(
        pool: &PgPool,
        tenant_id: TenantId,
        id: DbId,
        severity: &str,
        message: &str,
    ) -> Result<Option<PayoutAlert>, sqlx::Error> {
        let query = format!(
            "UPDATE payout_alerts SET severity = $3, message = $4, updated_at = NOW() \
             WHERE tenant_id = $1 AND id = $2 AND NOT is_resolved \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PayoutAlert>(&query)
            .bind(tenant_id)
            .bind(id)
            .bind(severity)
            .bind(message)
            .fetch_optional(pool)
            .await
    }

    /// Find an alert by id.
    pub async fn find_by_id(
        pool: &PgPool,
        tenant_id: TenantId,
        id: DbId,
    ) -> Result<Option<PayoutAlert>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM payout_alerts WHERE tenant_id = $1 AND id = $2");
        sqlx::query_as::<_, PayoutAlert>(&query)
            .bind(tenant_id)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Resolve an alert. CAS on `NOT is_resolved`: resolving an
    /// already-resolved alert returns `None` and changes nothing.
    pub async fn resolve(
        pool: &PgPool,
        tenant_id: TenantId,
        id: DbId,
        actor: &str,
        notes: Option<&str>,
    ) -> Result<Option<PayoutAlert>, sqlx::Error> {
        let query = format!(
            "UPDATE payout_alerts SET \
                 is_resolved = TRUE, \
                 resolved_by = $3, \
                 resolved_at = NOW(), \
                 resolution_notes = $4, \
                 updated_at = NOW() \
             WHERE tenant_id = $1 AND id = $2 AND NOT is_resolved \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PayoutAlert>(&query)
            .bind(tenant_id)
            .bind(id)
            .bind(actor)
            .bind(notes)
            .fetch_optional(pool)
            .await
    }

    /// List alerts matching the filter, newest first.
    pub async fn list(
        pool: &PgPool,
        tenant_id: TenantId,
        filter: &AlertFilter,
    ) -> Result<Vec<PayoutAlert>, sqlx::Error> {
        let limit = filter.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let offset = filter.offset.unwrap_or(0).max(0);
        let query = format!(
            "SELECT {COLUMNS} FROM payout_alerts \
             WHERE tenant_id = $1 \
               AND ($2::BIGINT IS NULL OR payout_id = $2) \
               AND ($3::TEXT IS NULL OR alert_type = $3) \
               AND ($4::TEXT IS NULL OR severity = $4) \
               AND ($5::BOOLEAN IS NULL OR is_resolved = $5) \
             ORDER BY created_at DESC, id DESC \
             LIMIT $6 OFFSET $7"
        );
        sqlx::query_as::<_, PayoutAlert>(&query)
            .bind(tenant_id)
            .bind(filter.payout_id)
            .bind(&filter.alert_type)
            .bind(&filter.severity)
            .bind(filter.resolved)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }
}
