//! Core domain logic for the course registrar.
//! This crate is the single source of truth for enrollment invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{DbError, DbResult, StorageErrorKind};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::course::{Course, CourseId, NewCourse};
pub use model::enrollment::{Enrollment, EnrollmentId, RosterEntry};
pub use repo::course_repo::{CourseRepository, RepoError, RepoResult, SqliteCourseRepository};
pub use service::enrollment_service::{
    create_course, enroll_student, get_enrollment_roster, EnrollmentError, EnrollmentService,
    ValidationError,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
