/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// Tenant identifiers share the BIGINT id space. They are minted by the
/// external tenant registry; this engine only scopes by them.
pub type TenantId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
