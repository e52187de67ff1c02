use super::{require_text, ValidationError, Validator};
use crate::config::StudentRules;
use crate::model::student::Student;
use crate::model::Entity;

/// Checks id, name and group bounds of a student.
#[derive(Debug, Clone, Default)]
pub struct StudentValidator {
    rules: StudentRules,
}

impl StudentValidator {
    pub fn new(rules: StudentRules) -> Self {
        Self { rules }
    }
}

impl Validator<Student> for StudentValidator {
    fn validate(&self, student: &Student) -> Result<(), ValidationError> {
        require_text(&student.id, Student::KIND, "id")?;
        require_text(&student.name, Student::KIND, "name")?;

        let StudentRules {
            min_group,
            max_group,
        } = self.rules;
        if student.group < min_group || student.group > max_group {
            return Err(ValidationError::GroupOutOfRange {
                group: student.group,
                min: min_group,
                max: max_group,
            });
        }
        Ok(())
    }
}
