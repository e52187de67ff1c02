//! Repository layer.
//!
//! # Responsibility
//! - Provide one generic CRUD container instantiated per record type.
//! - Keep validation and persistence strategy injectable at construction.
//!
//! # Invariants
//! - Repository writes must pass the injected validator before touching the
//!   map or the store.
//! - Repositories never reference each other; cross-record rules live in
//!   the service layer.

pub mod crud_repo;

use crate::model::assignment::Assignment;
use crate::model::grade::Grade;
use crate::model::student::Student;
use crate::store::XmlFileStore;
use crate::validation::{AssignmentValidator, GradeValidator, StudentValidator};

pub use crud_repo::{CrudRepository, RepoError, RepoResult, Repository, SaveOutcome};

pub type StudentXmlRepository = Repository<Student, StudentValidator, XmlFileStore<Student>>;
pub type AssignmentXmlRepository =
    Repository<Assignment, AssignmentValidator, XmlFileStore<Assignment>>;
pub type GradeXmlRepository = Repository<Grade, GradeValidator, XmlFileStore<Grade>>;
