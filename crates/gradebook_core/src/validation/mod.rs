//! Field-level validation for catalog records.
//!
//! # Responsibility
//! - Define the injectable `Validator` capability used by repositories.
//! - Provide one configured validator per record type.
//!
//! # Invariants
//! - Validators are pure: the same record always validates identically.
//! - Checks run in a fixed order and the first failure wins, so every error
//!   names exactly one cause.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod assignment;
pub mod grade;
pub mod student;

pub use assignment::AssignmentValidator;
pub use grade::GradeValidator;
pub use student::StudentValidator;

/// Single-cause validation failure.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Required text field is empty or whitespace-only.
    EmptyField {
        entity: &'static str,
        field: &'static str,
    },
    GroupOutOfRange {
        group: i32,
        min: i32,
        max: i32,
    },
    WeekOutOfRange {
        field: &'static str,
        week: i32,
        min: i32,
        max: i32,
    },
    /// Deadline does not leave the configured gap after the start week.
    DeadlineTooEarly {
        start_week: i32,
        deadline_week: i32,
        min_gap_weeks: i32,
    },
    GradeOutOfRange {
        value: f64,
        min: f64,
        max: f64,
    },
    SubmissionBeforeStart {
        submission_week: i32,
        start_week: i32,
    },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField { entity, field } => {
                write!(f, "invalid {entity}: `{field}` must not be empty")
            }
            Self::GroupOutOfRange { group, min, max } => {
                write!(f, "invalid group {group}: expected {min}..={max}")
            }
            Self::WeekOutOfRange {
                field,
                week,
                min,
                max,
            } => write!(f, "invalid {field} {week}: expected {min}..={max}"),
            Self::DeadlineTooEarly {
                start_week,
                deadline_week,
                min_gap_weeks,
            } => write!(
                f,
                "invalid deadline {deadline_week}: must be >= start week {start_week} + {min_gap_weeks}"
            ),
            Self::GradeOutOfRange { value, min, max } => {
                write!(f, "invalid grade {value}: expected {min}..={max}")
            }
            Self::SubmissionBeforeStart {
                submission_week,
                start_week,
            } => write!(
                f,
                "invalid submission week {submission_week}: assignment starts in week {start_week}"
            ),
        }
    }
}

impl Error for ValidationError {}

/// Write-path check injected into a repository.
///
/// Any `Fn(&E) -> Result<(), ValidationError>` closure is a validator, so
/// tests can plug ad-hoc constraint sets without new types.
pub trait Validator<E> {
    fn validate(&self, entity: &E) -> Result<(), ValidationError>;
}

impl<E, F> Validator<E> for F
where
    F: Fn(&E) -> Result<(), ValidationError>,
{
    fn validate(&self, entity: &E) -> Result<(), ValidationError> {
        self(entity)
    }
}

/// Accepts every record.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl<E> Validator<E> for AcceptAll {
    fn validate(&self, _entity: &E) -> Result<(), ValidationError> {
        Ok(())
    }
}

pub(crate) fn require_text(
    value: &str,
    entity: &'static str,
    field: &'static str,
) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField { entity, field });
    }
    Ok(())
}

pub(crate) fn require_week(
    week: i32,
    field: &'static str,
    min: i32,
    max: i32,
) -> Result<(), ValidationError> {
    if week < min || week > max {
        return Err(ValidationError::WeekOutOfRange {
            field,
            week,
            min,
            max,
        });
    }
    Ok(())
}
