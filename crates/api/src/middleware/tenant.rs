//! Tenant-context extractor for Axum handlers.
//!
//! Tenancy is an input to this engine, not something it manages: the
//! surrounding application resolves the caller to a tenant and forwards
//! the id in the `X-Tenant-Id` header. Every handler takes this
//! extractor, so a request without a tenant never reaches repository
//! code.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use staypay_core::types::TenantId;

use crate::error::AppError;
use crate::state::AppState;

/// The tenant scope of the current request.
///
/// Use this as an extractor parameter in every handler:
///
/// ```ignore
/// async fn my_handler(tenant: TenantContext) -> AppResult<Json<()>> {
///     tracing::info!(tenant_id = tenant.tenant_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TenantContext {
    pub tenant_id: TenantId,
}

impl FromRequestParts<AppState> for TenantContext {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get("x-tenant-id")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::BadRequest("Missing X-Tenant-Id header".into()))?;

        let tenant_id: TenantId = raw
            .parse()
            .map_err(|_| AppError::BadRequest("X-Tenant-Id must be an integer id".into()))?;

        Ok(TenantContext { tenant_id })
    }
}
