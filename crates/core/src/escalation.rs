//! SLA-based escalation monitor.
//!
//! A reporting view, not a mutation: it filters the snapshot down to
//! complaints that have been open past the SLA threshold and leaves the
//! store untouched. Source order is preserved — no re-sorting.

use serde::Serialize;

use crate::complaint::{Category, ComplaintRecord, Status};
use crate::types::{DbId, Timestamp, EPOCH};

/// Default service-level threshold in hours. Callers may override it
/// (`ESCALATION_SLA_HOURS` in the server configuration).
pub const DEFAULT_SLA_HOURS: i64 = 48;

/// One overdue complaint, as shown on the authority escalation list.
#[derive(Debug, Clone, Serialize)]
pub struct Escalation {
    pub complaint_id: DbId,
    pub category: Category,
    pub description: String,
    pub department: Option<String>,
    /// Whole hours the complaint has been open (floor of elapsed time).
    pub hours_open: i64,
    /// Set when a missing `created_at` forced an epoch substitution.
    pub anomaly: bool,
}

/// Filter the snapshot down to unresolved complaints open longer than
/// `sla_hours`. Resolved complaints never escalate, regardless of age.
pub fn overdue(
    records: &[ComplaintRecord],
    now: Timestamp,
    sla_hours: i64,
) -> Vec<Escalation> {
    records
        .iter()
        .filter(|r| r.status != Status::Resolved)
        .filter_map(|r| {
            let anomaly = r.created_at.is_none();
            let created = r.created_at.unwrap_or(EPOCH);
            let elapsed = now - created;
            if elapsed <= chrono::Duration::hours(sla_hours) {
                return None;
            }
            Some(Escalation {
                complaint_id: r.id,
                category: r.category,
                description: r.description.clone(),
                department: r.department.clone(),
                hours_open: elapsed.num_hours(),
                anomaly,
            })
        })
        .collect()
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */
