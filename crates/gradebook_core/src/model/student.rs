//! Student record.

use super::Entity;
use serde::{Deserialize, Serialize};

/// Stable caller-assigned student identifier.
pub type StudentId = String;

/// Enrolled student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    /// Study group number; bounds come from `StudentRules`.
    pub group: i32,
}

impl Student {
    pub fn new(id: impl Into<StudentId>, name: impl Into<String>, group: i32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            group,
        }
    }
}

impl Entity for Student {
    type Key = StudentId;

    const KIND: &'static str = "student";

    fn key(&self) -> &Self::Key {
        &self.id
    }
}
