//! Core domain logic for the student gradebook.
//! This crate is the single source of truth for catalog invariants.

pub mod config;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;
pub mod validation;

pub use config::{
    AssignmentRules, CatalogConfig, CatalogPaths, ConfigError, GradeRules, GradingPolicy,
    LoggingConfig, StudentRules,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::assignment::{Assignment, AssignmentId};
pub use model::grade::{Grade, GradeId};
pub use model::pair::Pair;
pub use model::student::{Student, StudentId};
pub use model::Entity;
pub use repo::{
    AssignmentXmlRepository, CrudRepository, GradeXmlRepository, RepoError, RepoResult,
    Repository, SaveOutcome, StudentXmlRepository,
};
pub use service::catalog_service::{CatalogService, SaveStatus, ServiceError, ServiceResult};
pub use service::{open_xml_catalog, XmlCatalogService};
pub use store::{MemoryStore, RecordStore, StoreError, StoreResult, XmlFileStore, XmlRecord};
pub use validation::{
    AcceptAll, AssignmentValidator, GradeValidator, StudentValidator, ValidationError, Validator,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
