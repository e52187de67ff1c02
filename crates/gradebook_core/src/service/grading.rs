//! Stored-value derivation for grades.
//!
//! # Invariants
//! - Submitting `n` weeks before the deadline adds `n * penalty_per_week`;
//!   submitting `n` weeks after removes it.
//! - Past `max_late_weeks` the value collapses to `late_floor_value`,
//!   whatever the raw input was.

use crate::config::GradingPolicy;

/// Computes the value persisted for a grade.
pub fn derive_grade_value(
    raw_value: f64,
    submission_week: i32,
    deadline_week: i32,
    policy: &GradingPolicy,
) -> f64 {
    let weeks_late = submission_week - deadline_week;
    if weeks_late > policy.max_late_weeks {
        return policy.late_floor_value;
    }
    raw_value - policy.penalty_per_week * f64::from(weeks_late)
}

/// Whether a deadline may still be moved in `current_week`.
pub fn deadline_open(current_week: i32, deadline_week: i32) -> bool {
    current_week <= deadline_week
}
