use super::{require_text, require_week, ValidationError, Validator};
use crate::config::GradeRules;
use crate::model::grade::Grade;
use crate::model::Entity;

/// Checks key components, stored value and submission week of a grade.
///
/// Whether the referenced student and assignment exist is not a field
/// check; the catalog service owns that rule.
#[derive(Debug, Clone, Default)]
pub struct GradeValidator {
    rules: GradeRules,
}

impl GradeValidator {
    pub fn new(rules: GradeRules) -> Self {
        Self { rules }
    }
}

impl Validator<Grade> for GradeValidator {
    fn validate(&self, grade: &Grade) -> Result<(), ValidationError> {
        require_text(grade.student_id(), Grade::KIND, "studentId")?;
        require_text(grade.assignment_id(), Grade::KIND, "assignmentId")?;

        let rules = &self.rules;
        if !(grade.value >= rules.min_value && grade.value <= rules.max_value) {
            return Err(ValidationError::GradeOutOfRange {
                value: grade.value,
                min: rules.min_value,
                max: rules.max_value,
            });
        }
        require_week(
            grade.submission_week,
            "submission week",
            rules.first_week,
            rules.last_week,
        )
    }
}
