//! Catalog use-case service.
//!
//! # Responsibility
//! - Expose save/find/update/delete entry points for students, assignments
//!   and grades.
//! - Enforce that a grade only references stored students and assignments.
//! - Derive stored grade values from raw input and the assignment deadline.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Referential checks run before any repository mutation.
//! - The service only uses the public `CrudRepository` contract, so any
//!   implementation (or a borrowed `&mut` one) can be injected.

use crate::config::GradingPolicy;
use crate::model::assignment::Assignment;
use crate::model::grade::{Grade, GradeId};
use crate::model::student::Student;
use crate::repo::{CrudRepository, RepoError, SaveOutcome};
use crate::service::grading::{deadline_open, derive_grade_value};
use crate::validation::ValidationError;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Status returned by the `save_*` entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStatus {
    Created,
    /// A record with the same key already existed and was left untouched.
    AlreadyExists,
}

impl SaveStatus {
    /// Numeric status code: `0` created, `1` already existed.
    pub fn code(self) -> i32 {
        match self {
            Self::Created => 0,
            Self::AlreadyExists => 1,
        }
    }
}

impl<E> From<SaveOutcome<E>> for SaveStatus {
    fn from(value: SaveOutcome<E>) -> Self {
        match value {
            SaveOutcome::Created => Self::Created,
            SaveOutcome::Conflict(_) => Self::AlreadyExists,
        }
    }
}

#[derive(Debug)]
pub enum ServiceError {
    Validation(ValidationError),
    UnknownStudent(String),
    UnknownAssignment(String),
    /// Record cannot be deleted while grades still point at it.
    StillReferenced {
        kind: &'static str,
        id: String,
        grades: usize,
    },
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::UnknownStudent(id) => write!(f, "student not found: {id}"),
            Self::UnknownAssignment(id) => write!(f, "assignment not found: {id}"),
            Self::StillReferenced { kind, id, grades } => {
                write!(f, "{kind} {id} is still referenced by {grades} grade(s)")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Service facade over the student, assignment and grade repositories.
pub struct CatalogService<S, A, G> {
    students: S,
    assignments: A,
    grades: G,
    policy: GradingPolicy,
}

impl<S, A, G> CatalogService<S, A, G>
where
    S: CrudRepository<Student>,
    A: CrudRepository<Assignment>,
    G: CrudRepository<Grade>,
{
    /// Creates a service with the default grading policy.
    pub fn new(students: S, assignments: A, grades: G) -> Self {
        Self::with_policy(students, assignments, grades, GradingPolicy::default())
    }

    pub fn with_policy(students: S, assignments: A, grades: G, policy: GradingPolicy) -> Self {
        Self {
            students,
            assignments,
            grades,
            policy,
        }
    }

    pub fn students(&self) -> &S {
        &self.students
    }

    pub fn assignments(&self) -> &A {
        &self.assignments
    }

    pub fn grades(&self) -> &G {
        &self.grades
    }

    /// Hands the repositories back to the caller.
    pub fn into_parts(self) -> (S, A, G) {
        (self.students, self.assignments, self.grades)
    }

    /// Saves a new student.
    ///
    /// # Contract
    /// - Returns `SaveStatus::AlreadyExists` without overwriting when the id
    ///   is taken.
    /// - Validation failures surface as `ServiceError::Validation`.
    pub fn save_student(&mut self, id: &str, name: &str, group: i32) -> ServiceResult<SaveStatus> {
        let outcome = self.students.save(Student::new(id, name, group))?;
        Ok(outcome.into())
    }

    /// Saves a new assignment; same contract as `save_student`.
    pub fn save_assignment(
        &mut self,
        id: &str,
        description: &str,
        deadline_week: i32,
        start_week: i32,
    ) -> ServiceResult<SaveStatus> {
        let outcome = self.assignments.save(Assignment::new(
            id,
            description,
            deadline_week,
            start_week,
        ))?;
        Ok(outcome.into())
    }

    /// Records a grade for a stored student and a stored assignment.
    ///
    /// # Contract
    /// - Fails with `UnknownStudent`/`UnknownAssignment` before any write
    ///   when either reference is missing.
    /// - Fails with `SubmissionBeforeStart` when `submission_week` precedes
    ///   the assignment start.
    /// - The stored value is derived from `raw_value` by the grading policy
    ///   and then validated by the grade repository.
    pub fn save_grade(
        &mut self,
        student_id: &str,
        assignment_id: &str,
        raw_value: f64,
        submission_week: i32,
        feedback: &str,
    ) -> ServiceResult<SaveStatus> {
        if self.students.find_one(&student_id.to_string()).is_none() {
            warn!(
                "event=grade_save module=service status=error error_code=unknown_student student_id={}",
                student_id
            );
            return Err(ServiceError::UnknownStudent(student_id.to_string()));
        }
        let Some(assignment) = self.assignments.find_one(&assignment_id.to_string()) else {
            warn!(
                "event=grade_save module=service status=error error_code=unknown_assignment assignment_id={}",
                assignment_id
            );
            return Err(ServiceError::UnknownAssignment(assignment_id.to_string()));
        };

        if submission_week < assignment.start_week {
            return Err(ValidationError::SubmissionBeforeStart {
                submission_week,
                start_week: assignment.start_week,
            }
            .into());
        }

        let value = derive_grade_value(
            raw_value,
            submission_week,
            assignment.deadline_week,
            &self.policy,
        );
        let grade = Grade::new(
            student_id,
            assignment_id,
            value,
            submission_week,
            feedback,
        );
        let status = SaveStatus::from(self.grades.save(grade)?);

        info!(
            "event=grade_save module=service status=ok student_id={} assignment_id={} value={} result={:?}",
            student_id, assignment_id, value, status
        );
        Ok(status)
    }

    pub fn find_all_students(&self) -> impl Iterator<Item = &Student> {
        self.students.find_all()
    }

    pub fn find_all_assignments(&self) -> impl Iterator<Item = &Assignment> {
        self.assignments.find_all()
    }

    pub fn find_all_grades(&self) -> impl Iterator<Item = &Grade> {
        self.grades.find_all()
    }

    pub fn find_student(&self, id: &str) -> Option<&Student> {
        self.students.find_one(&id.to_string())
    }

    pub fn find_assignment(&self, id: &str) -> Option<&Assignment> {
        self.assignments.find_one(&id.to_string())
    }

    pub fn find_grade(&self, student_id: &str, assignment_id: &str) -> Option<&Grade> {
        self.grades.find_one(&grade_id(student_id, assignment_id))
    }

    /// Replaces a stored student; returns the previous record or `None`.
    pub fn update_student(
        &mut self,
        id: &str,
        name: &str,
        group: i32,
    ) -> ServiceResult<Option<Student>> {
        Ok(self.students.update(Student::new(id, name, group))?)
    }

    /// Replaces a stored assignment; returns the previous record or `None`.
    pub fn update_assignment(
        &mut self,
        id: &str,
        description: &str,
        deadline_week: i32,
        start_week: i32,
    ) -> ServiceResult<Option<Assignment>> {
        Ok(self.assignments.update(Assignment::new(
            id,
            description,
            deadline_week,
            start_week,
        ))?)
    }

    /// Deletes a student that no grade references.
    pub fn delete_student(&mut self, id: &str) -> ServiceResult<Option<Student>> {
        let referencing = self
            .grades
            .find_all()
            .filter(|grade| grade.student_id() == id)
            .count();
        if referencing > 0 {
            return Err(ServiceError::StillReferenced {
                kind: "student",
                id: id.to_string(),
                grades: referencing,
            });
        }
        Ok(self.students.delete(&id.to_string())?)
    }

    /// Deletes an assignment that no grade references.
    pub fn delete_assignment(&mut self, id: &str) -> ServiceResult<Option<Assignment>> {
        let referencing = self
            .grades
            .find_all()
            .filter(|grade| grade.assignment_id() == id)
            .count();
        if referencing > 0 {
            return Err(ServiceError::StillReferenced {
                kind: "assignment",
                id: id.to_string(),
                grades: referencing,
            });
        }
        Ok(self.assignments.delete(&id.to_string())?)
    }

    pub fn delete_grade(
        &mut self,
        student_id: &str,
        assignment_id: &str,
    ) -> ServiceResult<Option<Grade>> {
        Ok(self.grades.delete(&grade_id(student_id, assignment_id))?)
    }

    /// Moves an assignment deadline by `extra_weeks` while it is still open.
    ///
    /// Returns `Ok(false)` when `current_week` is already past the deadline.
    /// The moved deadline is revalidated, so it cannot leave the configured
    /// week range.
    pub fn extend_deadline(
        &mut self,
        assignment_id: &str,
        extra_weeks: i32,
        current_week: i32,
    ) -> ServiceResult<bool> {
        let Some(assignment) = self.assignments.find_one(&assignment_id.to_string()) else {
            return Err(ServiceError::UnknownAssignment(assignment_id.to_string()));
        };
        if !deadline_open(current_week, assignment.deadline_week) {
            info!(
                "event=deadline_extend module=service status=skipped assignment_id={} current_week={} deadline_week={}",
                assignment_id, current_week, assignment.deadline_week
            );
            return Ok(false);
        }

        let extended = assignment.with_deadline_extended(extra_weeks);
        let new_deadline = extended.deadline_week;
        self.assignments.update(extended)?;
        info!(
            "event=deadline_extend module=service status=ok assignment_id={} deadline_week={}",
            assignment_id, new_deadline
        );
        Ok(true)
    }
}

fn grade_id(student_id: &str, assignment_id: &str) -> GradeId {
    GradeId::new(student_id.to_string(), assignment_id.to_string())
}
