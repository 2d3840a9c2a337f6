//! Rule-based complaint triage.
//!
//! Pure logic — no database access. The caller fetches the snapshot and
//! passes an explicit evaluation time, so classification is deterministic
//! and re-runs produce identical annotations. Severity and urgency are
//! never stored: they are recomputed on every read.

use serde::Serialize;

use crate::complaint::{ComplaintRecord, Severity, Status, Urgency};
use crate::types::{Timestamp, EPOCH};

/// Age after which an unresolved complaint's urgency is forced up.
pub const ESCALATION_AGE_HOURS: i64 = 24;

/// Explanation attached when no keyword rule matches.
pub const EXPLANATION_NORMAL: &str = "normal issue";

/// Explanation attached by the age override.
pub const EXPLANATION_AGED: &str = "open > 24h, escalated urgency";

/// A keyword rule: if any keyword occurs in the description
/// (case-insensitive substring), the rule's outcome applies.
#[derive(Debug, Clone)]
pub struct KeywordRule {
    pub tag: &'static str,
    pub keywords: &'static [&'static str],
    pub severity: Severity,
    pub urgency: Urgency,
    pub explanation: &'static str,
}

/// Ordered rule table — first match wins.
///
/// Kept as data rather than branches so new rule sets can be added
/// without touching the evaluation loop.
pub const KEYWORD_RULES: &[KeywordRule] = &[
    KeywordRule {
        tag: "critical",
        keywords: &["accident", "fire", "flood", "danger", "blocked"],
        severity: Severity::High,
        urgency: Urgency::Urgent,
        explanation: "critical keywords detected",
    },
    KeywordRule {
        tag: "infrastructure",
        keywords: &["leakage", "broken", "overflow", "garbage"],
        severity: Severity::Medium,
        urgency: Urgency::Normal,
        explanation: "infrastructure issue detected",
    },
];

/// The classifier's verdict for one complaint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Triage {
    pub severity: Severity,
    pub urgency: Urgency,
    pub explanation: &'static str,
    /// Set when a missing `created_at` forced an epoch substitution.
    pub anomaly: bool,
}

/// Classify one complaint.
///
/// Severity comes from the keyword rules alone; the age override applied
/// afterwards may raise urgency but leaves severity untouched. The two
/// axes are decided independently on purpose.
pub fn classify(
    description: &str,
    created_at: Option<Timestamp>,
    status: Status,
    now: Timestamp,
) -> Triage {
    let lowered = description.to_lowercase();

    let matched = KEYWORD_RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|kw| lowered.contains(kw)));

    let (severity, mut urgency, mut explanation) = match matched {
        Some(rule) => (rule.severity, rule.urgency, rule.explanation),
        None => (Severity::Low, Urgency::Normal, EXPLANATION_NORMAL),
    };

    let anomaly = created_at.is_none();
    let created = created_at.unwrap_or(EPOCH);

    if status != Status::Resolved
        && now - created > chrono::Duration::hours(ESCALATION_AGE_HOURS)
    {
        urgency = Urgency::Urgent;
        explanation = EXPLANATION_AGED;
    }

    Triage {
        severity,
        urgency,
        explanation,
        anomaly,
    }
}

/// Classify a whole snapshot. The result is index-aligned with the input.
pub fn classify_all(records: &[ComplaintRecord], now: Timestamp) -> Vec<Triage> {
    records
        .iter()
        .map(|r| classify(&r.description, r.created_at, r.status, now))
        .collect()
}

/// Optional facets for narrowing an annotated snapshot.
///
/// Backs the authority dashboard's filter bar; empty fields match
/// everything.
#[derive(Debug, Clone, Copy, Default, serde::Deserialize)]
pub struct TriageFilter {
    pub category: Option<crate::complaint::Category>,
    pub status: Option<Status>,
    pub severity: Option<Severity>,
    pub urgency: Option<Urgency>,
}

impl TriageFilter {
    pub fn matches(&self, record: &ComplaintRecord, triage: &Triage) -> bool {
        self.category.map_or(true, |c| record.category == c)
            && self.status.map_or(true, |s| record.status == s)
            && self.severity.map_or(true, |s| triage.severity == s)
            && self.urgency.map_or(true, |u| triage.urgency == u)
    }
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn at(h: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2025, 3, 10, h, 0, 0).unwrap()
    }

    #[test]
    fn critical_keywords_give_high_urgent() {
        let t = classify("Fire near the market", Some(at(9)), Status::Pending, at(10));
        assert_eq!(t.severity, Severity::High);
        assert_eq!(t.urgency, Urgency::Urgent);
        assert_eq!(t.explanation, "critical keywords detected");
    }

    #[test]
    fn infrastructure_keywords_give_medium_normal() {
        let t = classify(
            "Water leakage in the main pipe",
            Some(at(9)),
            Status::Pending,
            at(10),
        );
        assert_eq!(t.severity, Severity::Medium);
        assert_eq!(t.urgency, Urgency::Normal);
        assert_eq!(t.explanation, "infrastructure issue detected");
    }

    #[test]
    fn unmatched_description_gives_low_normal() {
        let t = classify("Stray dogs in the park", Some(at(9)), Status::Pending, at(10));
        assert_eq!(t.severity, Severity::Low);
        assert_eq!(t.urgency, Urgency::Normal);
        assert_eq!(t.explanation, EXPLANATION_NORMAL);
    }

    #[test]
    fn critical_wins_over_infrastructure() {
        // Contains both "garbage" (infrastructure) and "fire" (critical):
        // the rule table is ordered and the critical set is checked first.
        let t = classify(
            "garbage pile caught fire",
            Some(at(9)),
            Status::Pending,
            at(10),
        );
        assert_eq!(t.severity, Severity::High);
        assert_eq!(t.urgency, Urgency::Urgent);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let t = classify("BLOCKED drain on 5th street", Some(at(9)), Status::Pending, at(10));
        assert_eq!(t.severity, Severity::High);
    }

    #[test]
    fn age_override_raises_urgency_but_not_severity() {
        let created = at(9);
        let now = created + chrono::Duration::hours(25);
        let t = classify("", Some(created), Status::Pending, now);
        assert_eq!(t.severity, Severity::Low);
        assert_eq!(t.urgency, Urgency::Urgent);
        assert_eq!(t.explanation, EXPLANATION_AGED);
    }

    #[test]
    fn age_override_skips_resolved_complaints() {
        let created = at(9);
        let now = created + chrono::Duration::hours(100);
        let t = classify("", Some(created), Status::Resolved, now);
        assert_eq!(t.urgency, Urgency::Normal);
        assert_eq!(t.explanation, EXPLANATION_NORMAL);
    }

    #[test]
    fn age_of_exactly_24_hours_does_not_escalate() {
        let created = at(9);
        let now = created + chrono::Duration::hours(24);
        let t = classify("", Some(created), Status::Pending, now);
        assert_eq!(t.urgency, Urgency::Normal);
    }

    #[test]
    fn classification_is_deterministic() {
        let a = classify("broken streetlight", Some(at(9)), Status::Pending, at(10));
        let b = classify("broken streetlight", Some(at(9)), Status::Pending, at(10));
        assert_eq!(a, b);
    }

    #[test]
    fn filter_narrows_an_annotated_snapshot() {
        use crate::complaint::{Category, ComplaintRecord};

        let records = vec![
            ComplaintRecord {
                id: 1,
                citizen_id: 1,
                category: Category::Road,
                description: "accident near the flyover".into(),
                status: Status::Pending,
                location: None,
                department: None,
                created_at: Some(at(9)),
                updated_at: Some(at(9)),
            },
            ComplaintRecord {
                id: 2,
                citizen_id: 2,
                category: Category::Water,
                description: "tap pressure is low".into(),
                status: Status::Pending,
                location: None,
                department: None,
                created_at: Some(at(9)),
                updated_at: Some(at(9)),
            },
        ];
        let triage = classify_all(&records, at(10));
        assert_eq!(triage.len(), 2);

        let filter = TriageFilter {
            severity: Some(Severity::High),
            ..TriageFilter::default()
        };
        let kept: Vec<_> = records
            .iter()
            .zip(&triage)
            .filter(|(r, t)| filter.matches(r, t))
            .map(|(r, _)| r.id)
            .collect();
        assert_eq!(kept, vec![1]);
    }

    #[test]
    fn missing_timestamp_is_flagged_not_fatal() {
        let t = classify("pothole", None, Status::Pending, at(10));
        assert!(t.anomaly);
        // Epoch substitution makes the record ancient, so the age
        // override fires for anything unresolved.
        assert_eq!(t.urgency, Urgency::Urgent);
        assert_eq!(t.severity, Severity::Low);
    }
}
