//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate the three repositories into catalog-level APIs.
//! - Own every rule that spans more than one record type.
//!
//! # Invariants
//! - Services never bypass repository validation/persistence contracts.

pub mod catalog_service;
pub mod grading;

use crate::config::{CatalogConfig, CatalogPaths};
use crate::repo::{
    AssignmentXmlRepository, GradeXmlRepository, RepoResult, Repository, StudentXmlRepository,
};
use crate::store::XmlFileStore;
use crate::validation::{AssignmentValidator, GradeValidator, StudentValidator};
use catalog_service::CatalogService;

/// Catalog service over the three XML-backed repositories.
pub type XmlCatalogService =
    CatalogService<StudentXmlRepository, AssignmentXmlRepository, GradeXmlRepository>;

/// Opens (or initializes) the three backing files and wires the service.
///
/// `config` is expected to have passed `CatalogConfig::validate()`.
///
/// # Errors
/// - Returns the first repository load failure; nothing is opened partially.
pub fn open_xml_catalog(
    config: &CatalogConfig,
    paths: &CatalogPaths,
) -> RepoResult<XmlCatalogService> {
    let students: StudentXmlRepository = Repository::open(
        StudentValidator::new(config.students.clone()),
        XmlFileStore::open(&paths.students)?,
    )?;
    let assignments: AssignmentXmlRepository = Repository::open(
        AssignmentValidator::new(config.assignments.clone()),
        XmlFileStore::open(&paths.assignments)?,
    )?;
    let grades: GradeXmlRepository = Repository::open(
        GradeValidator::new(config.grades.clone()),
        XmlFileStore::open(&paths.grades)?,
    )?;

    Ok(CatalogService::with_policy(
        students,
        assignments,
        grades,
        config.grading.clone(),
    ))
}
