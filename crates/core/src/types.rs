/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Sentinel substituted when a snapshot record carries no usable timestamp.
///
/// A malformed record must not fail the whole batch; analytic components
/// fall back to the epoch and mark the affected output as anomalous.
pub const EPOCH: Timestamp = chrono::DateTime::UNIX_EPOCH;
