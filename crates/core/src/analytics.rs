//! Multi-view aggregation over a complaint snapshot.
//!
//! Pure logic — no database access. One annotated snapshot feeds four
//! independent views: the public counters, the monthly reported/resolved
//! series, and two department leaderboards with deliberately different
//! semantics (resolution rate vs. resolution speed). They are separate
//! named results, not one sortable structure with a flag: their sort keys
//! and filtered populations differ materially.

use chrono::{Datelike, NaiveDate};
use indexmap::IndexMap;
use serde::Serialize;

use crate::complaint::{ComplaintRecord, Status};
use crate::types::{Timestamp, EPOCH};

/* --------------------------------------------------------------------------
Counters
-------------------------------------------------------------------------- */

/// Headline counters for the public transparency page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Counters {
    pub reported: i64,
    pub in_progress: i64,
    pub resolved: i64,
}

pub fn counters(records: &[ComplaintRecord]) -> Counters {
    let mut c = Counters {
        reported: records.len() as i64,
        in_progress: 0,
        resolved: 0,
    };
    for r in records {
        match r.status {
            Status::InProgress => c.in_progress += 1,
            Status::Resolved => c.resolved += 1,
            Status::Pending => {}
        }
    }
    c
}

/// Quick stats for the authority dashboard header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuickStats {
    pub pending: i64,
    pub resolved: i64,
    /// Complaints created on the calendar day of `now` (UTC).
    pub today: i64,
}

pub fn quick_stats(records: &[ComplaintRecord], now: Timestamp) -> QuickStats {
    let today = now.date_naive();
    let mut s = QuickStats {
        pending: 0,
        resolved: 0,
        today: 0,
    };
    for r in records {
        match r.status {
            Status::Pending => s.pending += 1,
            Status::Resolved => s.resolved += 1,
            Status::InProgress => {}
        }
        if r.created_at.is_some_and(|c| c.date_naive() == today) {
            s.today += 1;
        }
    }
    s
}

/* --------------------------------------------------------------------------
Monthly series
-------------------------------------------------------------------------- */

/// One calendar-month bucket of the reported-vs-resolved series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyBucket {
    /// Short month label, e.g. `"Jan"`.
    pub month: String,
    pub reported: i64,
    pub resolved: i64,
}

/// Group the snapshot by calendar month of `created_at`.
///
/// Buckets are emitted in chronological order of month start. Grouping in
/// first-seen scan order would leak insertion order into the output and
/// make parallel merging non-deterministic, so the sort is an explicit
/// final step, not an artifact.
pub fn monthly_series(records: &[ComplaintRecord]) -> Vec<MonthlyBucket> {
    let mut buckets: IndexMap<NaiveDate, MonthlyBucket> = IndexMap::new();

    for r in records {
        let created = r.created_at.unwrap_or(EPOCH);
        let month_start = NaiveDate::from_ymd_opt(created.year(), created.month(), 1)
            .unwrap_or(EPOCH.date_naive());
        let bucket = buckets.entry(month_start).or_insert_with(|| MonthlyBucket {
            month: created.format("%b").to_string(),
            reported: 0,
            resolved: 0,
        });
        bucket.reported += 1;
        if r.status == Status::Resolved {
            bucket.resolved += 1;
        }
    }

    buckets.sort_keys();
    buckets.into_values().collect()
}

/* --------------------------------------------------------------------------
Department leaderboards
-------------------------------------------------------------------------- */

/// Public transparency leaderboard entry: every department with at least
/// one assigned complaint, ranked by resolution rate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublicLeaderboardEntry {
    pub department: String,
    pub total: i64,
    pub resolved: i64,
    /// Resolution-rate percentage, rounded to the nearest integer.
    pub score: i64,
    /// Mean hours to resolution, one decimal; `None` ("not available")
    /// until the department has resolved something.
    pub avg_time_hours: Option<f64>,
}

/// Internal performance leaderboard entry: resolved complaints only,
/// ranked fastest-first by mean resolution time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceLeaderboardEntry {
    pub department: String,
    /// Mean hours to resolution, one decimal.
    pub avg_time_hours: f64,
}

#[derive(Default)]
struct DeptAccumulator {
    total: i64,
    resolved: i64,
    total_time_hours: f64,
}

/// Hours between creation and last status change, epoch-substituting
/// missing timestamps so one bad record cannot fail the batch.
fn resolution_hours(r: &ComplaintRecord) -> f64 {
    let created = r.created_at.unwrap_or(EPOCH);
    let updated = r.updated_at.unwrap_or(EPOCH);
    (updated - created).num_seconds() as f64 / 3600.0
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// Accumulate per-department totals in first-encounter order.
///
/// Complaints with no assigned department are skipped — they are excluded
/// from department-scoped aggregates, never defaulted.
fn accumulate_departments(records: &[ComplaintRecord]) -> IndexMap<String, DeptAccumulator> {
    let mut departments: IndexMap<String, DeptAccumulator> = IndexMap::new();
    for r in records {
        let Some(dept) = r.department.as_deref() else {
            continue;
        };
        let acc = departments.entry(dept.to_string()).or_default();
        acc.total += 1;
        if r.status == Status::Resolved {
            acc.resolved += 1;
            acc.total_time_hours += resolution_hours(r);
        }
    }
    departments
}

/// Build the public transparency leaderboard: descending by score,
/// encounter order preserved between equal scores (stable sort).
pub fn public_leaderboard(records: &[ComplaintRecord]) -> Vec<PublicLeaderboardEntry> {
    let mut entries: Vec<PublicLeaderboardEntry> = accumulate_departments(records)
        .into_iter()
        .map(|(department, acc)| PublicLeaderboardEntry {
            department,
            total: acc.total,
            resolved: acc.resolved,
            score: ((acc.resolved as f64 / acc.total as f64) * 100.0).round() as i64,
            avg_time_hours: (acc.resolved > 0)
                .then(|| round1(acc.total_time_hours / acc.resolved as f64)),
        })
        .collect();

    entries.sort_by(|a, b| b.score.cmp(&a.score));
    entries
}

/// Build the internal performance leaderboard: ascending by mean
/// resolution time, fastest department first. Departments with nothing
/// resolved have no meaningful speed and are absent entirely.
pub fn performance_leaderboard(records: &[ComplaintRecord]) -> Vec<PerformanceLeaderboardEntry> {
    let mut entries: Vec<PerformanceLeaderboardEntry> = accumulate_departments(records)
        .into_iter()
        .filter(|(_, acc)| acc.resolved > 0)
        .map(|(department, acc)| PerformanceLeaderboardEntry {
            department,
            avg_time_hours: round1(acc.total_time_hours / acc.resolved as f64),
        })
        .collect();

    entries.sort_by(|a, b| a.avg_time_hours.total_cmp(&b.avg_time_hours));
    entries
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;
    use crate::complaint::Category;
    use crate::types::DbId;
    use chrono::{TimeZone, Utc};

    fn ts(month: u32, day: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2025, month, day, 10, 0, 0).unwrap()
    }

    fn record(
        id: DbId,
        status: Status,
        department: Option<&str>,
        created: Timestamp,
        resolution_hours: i64,
    ) -> ComplaintRecord {
        ComplaintRecord {
            id,
            citizen_id: 1,
            category: Category::Garbage,
            description: String::new(),
            status,
            location: None,
            department: department.map(str::to_string),
            created_at: Some(created),
            updated_at: Some(created + chrono::Duration::hours(resolution_hours)),
        }
    }

    #[test]
    fn counters_tally_by_status() {
        let mut records = Vec::new();
        for i in 0..3 {
            records.push(record(i, Status::Pending, None, ts(1, 1), 0));
        }
        for i in 3..6 {
            records.push(record(i, Status::InProgress, None, ts(1, 1), 0));
        }
        for i in 6..10 {
            records.push(record(i, Status::Resolved, None, ts(1, 1), 1));
        }
        let c = counters(&records);
        assert_eq!(c.reported, 10);
        assert_eq!(c.in_progress, 3);
        assert_eq!(c.resolved, 4);
    }

    #[test]
    fn quick_stats_count_todays_submissions() {
        let now = ts(3, 15);
        let records = vec![
            record(1, Status::Pending, None, now, 0),
            record(2, Status::Resolved, None, ts(3, 14), 2),
        ];
        let s = quick_stats(&records, now);
        assert_eq!(s.pending, 1);
        assert_eq!(s.resolved, 1);
        assert_eq!(s.today, 1);
    }

    #[test]
    fn monthly_buckets_are_chronological_regardless_of_scan_order() {
        // March rows appear before January in the snapshot.
        let records = vec![
            record(1, Status::Pending, None, ts(3, 5), 0),
            record(2, Status::Resolved, None, ts(1, 9), 4),
            record(3, Status::Resolved, None, ts(3, 20), 4),
            record(4, Status::Pending, None, ts(2, 1), 0),
        ];
        let series = monthly_series(&records);
        let labels: Vec<_> = series.iter().map(|b| b.month.as_str()).collect();
        assert_eq!(labels, vec!["Jan", "Feb", "Mar"]);
        assert_eq!(series[0].reported, 1);
        assert_eq!(series[0].resolved, 1);
        assert_eq!(series[2].reported, 2);
        assert_eq!(series[2].resolved, 1);
    }

    #[test]
    fn public_score_is_resolution_rate_percentage() {
        let mut records = vec![
            record(1, Status::Resolved, Some("Sanitation"), ts(1, 1), 10),
            record(2, Status::Resolved, Some("Sanitation"), ts(1, 2), 20),
            record(3, Status::Resolved, Some("Sanitation"), ts(1, 3), 30),
            record(4, Status::Pending, Some("Sanitation"), ts(1, 4), 0),
        ];
        records.push(record(5, Status::Pending, Some("Roads"), ts(1, 5), 0));

        let board = public_leaderboard(&records);
        assert_eq!(board.len(), 2);

        // 3 of 4 resolved -> 75, ranked above the 0-score department.
        assert_eq!(board[0].department, "Sanitation");
        assert_eq!(board[0].score, 75);
        assert_eq!(board[0].avg_time_hours, Some(20.0));

        // Unresolved departments still appear, with the N/A sentinel.
        assert_eq!(board[1].department, "Roads");
        assert_eq!(board[1].score, 0);
        assert_eq!(board[1].avg_time_hours, None);
    }

    #[test]
    fn unassigned_complaints_are_excluded_from_leaderboards() {
        let records = vec![record(1, Status::Resolved, None, ts(1, 1), 5)];
        assert!(public_leaderboard(&records).is_empty());
        assert!(performance_leaderboard(&records).is_empty());
    }

    #[test]
    fn performance_board_ranks_fastest_first() {
        let records = vec![
            record(1, Status::Resolved, Some("Water"), ts(1, 1), 30),
            record(2, Status::Resolved, Some("Roads"), ts(1, 2), 6),
            record(3, Status::Resolved, Some("Roads"), ts(1, 3), 8),
        ];
        let board = performance_leaderboard(&records);
        assert_eq!(board[0].department, "Roads");
        assert_eq!(board[0].avg_time_hours, 7.0);
        assert_eq!(board[1].department, "Water");
        assert_eq!(board[1].avg_time_hours, 30.0);
    }

    #[test]
    fn performance_board_omits_departments_with_nothing_resolved() {
        let records = vec![
            record(1, Status::Pending, Some("Parks"), ts(1, 1), 0),
            record(2, Status::Resolved, Some("Roads"), ts(1, 2), 4),
        ];
        let board = performance_leaderboard(&records);
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].department, "Roads");
    }

    #[test]
    fn equal_scores_keep_encounter_order() {
        let records = vec![
            record(1, Status::Resolved, Some("Water"), ts(1, 1), 2),
            record(2, Status::Resolved, Some("Roads"), ts(1, 2), 2),
        ];
        let board = public_leaderboard(&records);
        assert_eq!(board[0].department, "Water");
        assert_eq!(board[1].department, "Roads");
    }

    #[test]
    fn avg_time_is_rounded_to_one_decimal() {
        let mut r = record(1, Status::Resolved, Some("Water"), ts(1, 1), 0);
        r.updated_at = Some(ts(1, 1) + chrono::Duration::minutes(100)); // 1.666... h
        let board = performance_leaderboard(&[r]);
        assert_eq!(board[0].avg_time_hours, 1.7);
    }

    #[test]
    fn missing_timestamps_do_not_fail_the_batch() {
        let mut bad = record(1, Status::Resolved, Some("Water"), ts(1, 1), 2);
        bad.created_at = None;
        bad.updated_at = None;
        let good = record(2, Status::Resolved, Some("Roads"), ts(1, 2), 4);

        let board = public_leaderboard(&[bad, good]);
        assert_eq!(board.len(), 2);

        let series = monthly_series(&[record(3, Status::Pending, None, ts(2, 1), 0)]);
        assert_eq!(series.len(), 1);
    }
}
