//! Grade record keyed by `(student id, assignment id)`.
//!
//! # Invariants
//! - `value` is the stored (derived) grade, not the raw input.
//! - Both key components reference records stored elsewhere; the grade
//!   itself never checks that, the catalog service does.

use super::pair::Pair;
use super::Entity;
use serde::{Deserialize, Serialize};

/// Composite grade identity: `(student id, assignment id)`.
pub type GradeId = Pair<String, String>;

/// Grade recorded for one student on one assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grade {
    pub id: GradeId,
    pub value: f64,
    pub submission_week: i32,
    pub feedback: String,
}

impl Grade {
    pub fn new(
        student_id: impl Into<String>,
        assignment_id: impl Into<String>,
        value: f64,
        submission_week: i32,
        feedback: impl Into<String>,
    ) -> Self {
        Self {
            id: Pair::new(student_id.into(), assignment_id.into()),
            value,
            submission_week,
            feedback: feedback.into(),
        }
    }

    pub fn student_id(&self) -> &str {
        &self.id.first
    }

    pub fn assignment_id(&self) -> &str {
        &self.id.second
    }
}

impl Entity for Grade {
    type Key = GradeId;

    const KIND: &'static str = "grade";

    fn key(&self) -> &Self::Key {
        &self.id
    }
}
