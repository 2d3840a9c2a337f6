//! Request handlers.
//!
//! Handlers fetch an immutable snapshot from the store once per request
//! and hand it to the pure engine functions in `jansetu_core`; the only
//! write path is the status transition handler.

pub mod analytics;
pub mod complaints;

use jansetu_core::complaint::ComplaintRecord;
use jansetu_db::repositories::ComplaintRepo;
use sqlx::PgPool;

use crate::error::AppResult;

/// Fetch the full complaint snapshot and convert it into engine records.
pub(crate) async fn fetch_snapshot(pool: &PgPool) -> AppResult<Vec<ComplaintRecord>> {
    let rows = ComplaintRepo::list(pool).await?;
    let records = rows
        .iter()
        .map(|row| row.to_record())
        .collect::<Result<Vec<_>, _>>()?;
    Ok(records)
}
