//! Complaint domain types and the status state machine.
//!
//! Statuses are stored as TEXT in the `complaints` table; the enums here
//! carry the canonical wire spellings (`pending`, `in-progress`,
//! `resolved`) on both the serde and database boundaries.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::geo::GeoPoint;
use crate::types::{DbId, Timestamp};

/* --------------------------------------------------------------------------
Enumerations
-------------------------------------------------------------------------- */

/// Complaint categories accepted at submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Road,
    Garbage,
    Water,
    Other,
}

impl Category {
    /// Canonical lowercase spelling, matching the database CHECK constraint.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Road => "road",
            Category::Garbage => "garbage",
            Category::Water => "water",
            Category::Other => "other",
        }
    }
}

impl FromStr for Category {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "road" => Ok(Category::Road),
            "garbage" => Ok(Category::Garbage),
            "water" => Ok(Category::Water),
            "other" => Ok(Category::Other),
            other => Err(CoreError::Validation(format!(
                "Unknown complaint category '{other}'"
            ))),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Complaint lifecycle status.
///
/// Only ever advances `pending -> in-progress -> resolved`; `resolved`
/// is terminal. Transitions go through [`TransitionAction::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    Pending,
    InProgress,
    Resolved,
}

impl Status {
    /// Canonical wire spelling, matching the database CHECK constraint.
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::InProgress => "in-progress",
            Status::Resolved => "resolved",
        }
    }
}

impl FromStr for Status {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Status::Pending),
            "in-progress" => Ok(Status::InProgress),
            "resolved" => Ok(Status::Resolved),
            other => Err(CoreError::Validation(format!(
                "Unknown complaint status '{other}'"
            ))),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Intrinsic seriousness of the reported issue. Derived from the
/// description by the classifier — never stored, never authoritative input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// Time-sensitivity of the response. Derived from the description and/or
/// the complaint's age — never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Normal,
    Urgent,
}

/* --------------------------------------------------------------------------
Snapshot record
-------------------------------------------------------------------------- */

/// The engine-facing view of a complaint row.
///
/// Timestamps are optional: the store is an external collaborator, and a
/// record with a malformed or missing timestamp must not crash the
/// pipeline. Analytic components substitute [`crate::types::EPOCH`] and
/// flag the affected output instead of failing the batch.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplaintRecord {
    pub id: DbId,
    pub citizen_id: DbId,
    pub category: Category,
    pub description: String,
    pub status: Status,
    pub location: Option<GeoPoint>,
    /// Department the complaint is assigned to. `None` means unassigned;
    /// unassigned complaints are excluded from department-scoped
    /// aggregates, never defaulted to a fabricated department.
    pub department: Option<String>,
    pub created_at: Option<Timestamp>,
    pub updated_at: Option<Timestamp>,
}

/* --------------------------------------------------------------------------
Status state machine
-------------------------------------------------------------------------- */

/// Authority-triggered status transitions.
///
/// `assign` moves a pending complaint into `in-progress` and records the
/// handling department; `resolve` closes an in-progress complaint. There
/// are no other edges — `resolved` is terminal and status never regresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionAction {
    Assign,
    Resolve,
}

impl TransitionAction {
    pub fn as_str(self) -> &'static str {
        match self {
            TransitionAction::Assign => "assign",
            TransitionAction::Resolve => "resolve",
        }
    }

    /// The status a complaint must currently hold for this action to apply.
    ///
    /// The store's conditional UPDATE compares against this value so that
    /// two concurrent actions on the same complaint cannot both succeed.
    pub fn expected_from(self) -> Status {
        match self {
            TransitionAction::Assign => Status::Pending,
            TransitionAction::Resolve => Status::InProgress,
        }
    }

    /// The status this action moves a complaint into.
    pub fn target(self) -> Status {
        match self {
            TransitionAction::Assign => Status::InProgress,
            TransitionAction::Resolve => Status::Resolved,
        }
    }

    /// Validate this action against a complaint's current status and
    /// return the resulting status.
    pub fn apply(self, current: Status) -> Result<Status, CoreError> {
        if current == self.expected_from() {
            Ok(self.target())
        } else {
            Err(CoreError::InvalidTransition(format!(
                "cannot {} a complaint in status '{current}'",
                self.as_str()
            )))
        }
    }
}

impl fmt::Display for TransitionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */
