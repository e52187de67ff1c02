//! Domain model for the student catalog.
//!
//! # Responsibility
//! - Define the three managed records: students, assignments and grades.
//! - Expose identity through the narrow `Entity` capability.
//!
//! # Invariants
//! - Records never hold references to each other; relationships are key values.
//! - A record's key never changes; updates are replacements keyed by identity.

use std::fmt::{Debug, Display};

pub mod assignment;
pub mod grade;
pub mod pair;
pub mod student;

/// Identity capability shared by every stored record.
pub trait Entity: Clone + 'static {
    /// Unique identity inside one repository.
    type Key: Ord + Clone + Debug + Display;

    /// Short lowercase label used in errors and log events.
    const KIND: &'static str;

    /// Returns the identity key of this record.
    fn key(&self) -> &Self::Key;
}
