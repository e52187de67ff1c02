use super::{require_text, require_week, ValidationError, Validator};
use crate::config::AssignmentRules;
use crate::model::assignment::Assignment;
use crate::model::Entity;

/// Checks text fields and the start/deadline window of an assignment.
#[derive(Debug, Clone, Default)]
pub struct AssignmentValidator {
    rules: AssignmentRules,
}

impl AssignmentValidator {
    pub fn new(rules: AssignmentRules) -> Self {
        Self { rules }
    }
}

impl Validator<Assignment> for AssignmentValidator {
    fn validate(&self, assignment: &Assignment) -> Result<(), ValidationError> {
        require_text(&assignment.id, Assignment::KIND, "id")?;
        require_text(&assignment.description, Assignment::KIND, "description")?;

        let rules = &self.rules;
        require_week(
            assignment.deadline_week,
            "deadline week",
            rules.first_week,
            rules.last_week,
        )?;
        require_week(
            assignment.start_week,
            "start week",
            rules.first_week,
            rules.last_week,
        )?;

        let earliest_deadline = i64::from(assignment.start_week) + i64::from(rules.min_gap_weeks);
        if i64::from(assignment.deadline_week) < earliest_deadline {
            return Err(ValidationError::DeadlineTooEarly {
                start_week: assignment.start_week,
                deadline_week: assignment.deadline_week,
                min_gap_weeks: rules.min_gap_weeks,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::AssignmentValidator;
    use crate::config::AssignmentRules;
    use crate::model::assignment::Assignment;
    use crate::validation::{ValidationError, Validator};

    #[test]
    fn rejects_weeks_outside_calendar() {
        let validator = AssignmentValidator::default();
        for (deadline, start) in [(0, 5), (15, 5), (5, 0), (5, 15)] {
            let err = validator
                .validate(&Assignment::new("4", "Ionut", deadline, start))
                .expect_err("week outside calendar should fail");
            assert!(matches!(err, ValidationError::WeekOutOfRange { .. }));
        }
    }

    #[test]
    fn rejects_deadline_before_start() {
        let err = AssignmentValidator::default()
            .validate(&Assignment::new("4", "Ionut", 5, 14))
            .expect_err("reversed window should fail");
        assert!(matches!(err, ValidationError::DeadlineTooEarly { .. }));
    }

    #[test]
    fn honors_configured_min_gap() {
        let validator = AssignmentValidator::new(AssignmentRules {
            min_gap_weeks: 2,
            ..AssignmentRules::default()
        });
        assert!(validator
            .validate(&Assignment::new("1", "lab", 4, 3))
            .is_err());
        assert!(validator
            .validate(&Assignment::new("1", "lab", 5, 3))
            .is_ok());
    }

    #[test]
    fn huge_min_gap_rejects_instead_of_overflowing() {
        let validator = AssignmentValidator::new(AssignmentRules {
            min_gap_weeks: i32::MAX,
            ..AssignmentRules::default()
        });
        let err = validator
            .validate(&Assignment::new("1", "lab", 14, 1))
            .expect_err("gap larger than the calendar should fail");
        assert!(matches!(
            err,
            ValidationError::DeadlineTooEarly {
                min_gap_weeks: i32::MAX,
                ..
            }
        ));
    }
}
