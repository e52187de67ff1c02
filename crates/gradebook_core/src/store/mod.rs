//! Persistence strategies plugged into repositories.
//!
//! # Responsibility
//! - Load the full record set once when a repository is built.
//! - Persist the full record set after every successful mutation.
//!
//! # Invariants
//! - `persist` receives the whole snapshot, never a diff.
//! - A store instance exclusively owns its backing location; two
//!   repositories must not share one.

use crate::model::Entity;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod memory;
pub mod xml;

pub use memory::MemoryStore;
pub use xml::{XmlFileStore, XmlRecord};

pub type StoreResult<T> = Result<T, StoreError>;

/// Full in-memory snapshot handed to `RecordStore::persist`.
pub type Snapshot<E> = BTreeMap<<E as Entity>::Key, E>;

#[derive(Debug)]
pub enum StoreError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Document is not well-formed.
    Malformed {
        path: PathBuf,
        message: String,
    },
    /// Record element is well-formed but a field is missing or unparsable.
    InvalidRecord {
        path: PathBuf,
        element: &'static str,
        message: String,
    },
    Encode {
        path: PathBuf,
        message: String,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "i/o error on `{}`: {source}", path.display()),
            Self::Malformed { path, message } => {
                write!(f, "malformed document `{}`: {message}", path.display())
            }
            Self::InvalidRecord {
                path,
                element,
                message,
            } => write!(
                f,
                "invalid `{element}` record in `{}`: {message}",
                path.display()
            ),
            Self::Encode { path, message } => {
                write!(f, "failed to encode `{}`: {message}", path.display())
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Load/persist strategy for one repository.
pub trait RecordStore<E: Entity> {
    /// Reads every stored record.
    fn load(&mut self) -> StoreResult<Vec<E>>;

    /// Replaces stored contents with `records`.
    fn persist(&mut self, records: &Snapshot<E>) -> StoreResult<()>;

    /// Short location description for log events.
    fn describe(&self) -> String;
}
