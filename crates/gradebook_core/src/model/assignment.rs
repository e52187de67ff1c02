//! Assignment record.
//!
//! # Invariants
//! - Weeks are academic week numbers, not calendar weeks.
//! - `deadline_week` is never earlier than `start_week` once validated.

use super::Entity;
use serde::{Deserialize, Serialize};

/// Stable caller-assigned assignment identifier.
pub type AssignmentId = String;

/// Lab assignment with a start week and a deadline week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: AssignmentId,
    pub description: String,
    pub deadline_week: i32,
    pub start_week: i32,
}

impl Assignment {
    pub fn new(
        id: impl Into<AssignmentId>,
        description: impl Into<String>,
        deadline_week: i32,
        start_week: i32,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            deadline_week,
            start_week,
        }
    }

    /// Returns a copy with the deadline moved by `weeks`.
    ///
    /// Saturates at the `i32` bounds; the result still has to pass the
    /// week-range validation before it is stored.
    pub fn with_deadline_extended(&self, weeks: i32) -> Self {
        Self {
            deadline_week: self.deadline_week.saturating_add(weeks),
            ..self.clone()
        }
    }
}

impl Entity for Assignment {
    type Key = AssignmentId;

    const KIND: &'static str = "assignment";

    fn key(&self) -> &Self::Key {
        &self.id
    }
}
