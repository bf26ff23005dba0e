//! Course registration use-case service.
//!
//! # Responsibility
//! - Validate and normalize caller input before any store access.
//! - Enforce course capacity and translate missing/full courses into
//!   domain errors.
//! - Return rosters in enrollment order.
//!
//! # Invariants
//! - Course codes are trimmed and upper-cased at every entry point.
//! - Titles and student names are trimmed, never case-changed.
//! - Course lookup, capacity count and enrollment insert share one write
//!   transaction, so capacity is never exceeded.
//! - Duplicate enrollment is rejected only by the storage uniqueness
//!   constraint and surfaces as `EnrollmentError::Storage`.

use crate::db::StorageErrorKind;
use crate::model::course::{Course, NewCourse};
use crate::model::enrollment::{Enrollment, RosterEntry};
use crate::repo::course_repo::{CourseRepository, RepoError, SqliteCourseRepository};
use log::{info, warn};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Caller input rejected before reaching storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Field is empty or whitespace-only.
    Blank { field: &'static str },
    NonPositiveCapacity { capacity: i64 },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Blank { field } => write!(f, "{field} must be a non-empty string"),
            Self::NonPositiveCapacity { capacity } => {
                write!(f, "capacity must be a positive integer, got {capacity}")
            }
        }
    }
}

impl Error for ValidationError {}

/// Service error for course registration use-cases.
#[derive(Debug)]
pub enum EnrollmentError {
    Validation(ValidationError),
    /// Enrollment target does not exist.
    CourseNotFound { code: String },
    /// Course already holds `capacity` enrollments.
    CourseFull { code: String, capacity: i64 },
    /// Persistence-layer failure, including constraint violations.
    Storage(RepoError),
}

impl EnrollmentError {
    /// Storage classification when this is a persistence failure.
    pub fn storage_kind(&self) -> Option<StorageErrorKind> {
        match self {
            Self::Storage(err) => Some(err.kind()),
            _ => None,
        }
    }

    fn log_reason(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::CourseNotFound { .. } => "course_not_found",
            Self::CourseFull { .. } => "course_full",
            Self::Storage(err) if err.kind() == StorageErrorKind::UniqueViolation => "duplicate",
            Self::Storage(_) => "storage",
        }
    }
}

impl Display for EnrollmentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::CourseNotFound { code } => write!(f, "course not found: {code}"),
            Self::CourseFull { code, capacity } => {
                write!(f, "course is full: {code} (capacity {capacity})")
            }
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for EnrollmentError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::CourseNotFound { .. } | Self::CourseFull { .. } => None,
        }
    }
}

impl From<ValidationError> for EnrollmentError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for EnrollmentError {
    fn from(value: RepoError) -> Self {
        Self::Storage(value)
    }
}

/// Enrollment service facade over repository implementations.
pub struct EnrollmentService<R: CourseRepository> {
    repo: R,
}

impl<R: CourseRepository> EnrollmentService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates, normalizes and persists a new course.
    ///
    /// Checks run in order code → title → capacity and report the first
    /// failure. A duplicate code surfaces as `Storage` with
    /// `StorageErrorKind::UniqueViolation`.
    pub fn create_course(&self, course: &NewCourse) -> Result<Course, EnrollmentError> {
        let code = normalize_course_code("code", &course.code)?;
        let title = require_text("title", &course.title)?;
        if course.capacity <= 0 {
            return Err(ValidationError::NonPositiveCapacity {
                capacity: course.capacity,
            }
            .into());
        }

        match self.repo.add_course(&code, title, course.capacity) {
            Ok(created) => {
                info!(
                    "event=course_create module=service status=ok course_id={} code={} capacity={}",
                    created.id, created.code, created.capacity
                );
                Ok(created)
            }
            Err(err) => {
                let err = EnrollmentError::from(err);
                warn!(
                    "event=course_create module=service status=error code={} reason={} error={}",
                    code,
                    err.log_reason(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Enrolls `student_name` into the course identified by `course_code`.
    ///
    /// # Errors
    /// - `Validation` for blank name or code.
    /// - `CourseNotFound` when no course matches the normalized code.
    /// - `CourseFull` when the course already holds `capacity` enrollments.
    /// - `Storage` for everything else, including a repeated
    ///   `(student_name, course)` pair.
    pub fn enroll_student(
        &self,
        student_name: &str,
        course_code: &str,
    ) -> Result<Enrollment, EnrollmentError> {
        let student_name = require_text("student_name", student_name)?;
        let code = normalize_course_code("course_code", course_code)?;

        let result = self
            .repo
            .in_write_transaction(|repo| -> Result<Enrollment, EnrollmentError> {
                let course = repo.find_course_by_code(&code)?.ok_or_else(|| {
                    EnrollmentError::CourseNotFound { code: code.clone() }
                })?;

                let enrolled = repo.count_enrollments(course.id)?;
                if enrolled >= course.capacity {
                    return Err(EnrollmentError::CourseFull {
                        code: course.code,
                        capacity: course.capacity,
                    });
                }

                Ok(repo.add_enrollment(student_name, course.id)?)
            });

        match &result {
            Ok(enrollment) => info!(
                "event=enroll module=service status=ok enrollment_id={} course_id={} code={}",
                enrollment.id, enrollment.course_id, code
            ),
            Err(err) if err.log_reason() == "storage" => warn!(
                "event=enroll module=service status=error code={} reason=storage error={}",
                code, err
            ),
            Err(err) => info!(
                "event=enroll module=service status=rejected code={} reason={}",
                code,
                err.log_reason()
            ),
        }

        result
    }

    /// Returns the roster for `course_code` in enrollment order.
    ///
    /// Unknown courses yield an empty roster.
    pub fn get_enrollment_roster(
        &self,
        course_code: &str,
    ) -> Result<Vec<RosterEntry>, EnrollmentError> {
        let code = normalize_course_code("course_code", course_code)?;
        let roster = self.repo.list_enrollments(&code)?;
        info!(
            "event=roster module=service status=ok code={} count={}",
            code,
            roster.len()
        );
        Ok(roster)
    }
}

/// Creates a course on `conn`.
pub fn create_course(conn: &Connection, course: &NewCourse) -> Result<Course, EnrollmentError> {
    EnrollmentService::new(SqliteCourseRepository::new(conn)).create_course(course)
}

/// Enrolls a student on `conn`.
pub fn enroll_student(
    conn: &Connection,
    student_name: &str,
    course_code: &str,
) -> Result<Enrollment, EnrollmentError> {
    EnrollmentService::new(SqliteCourseRepository::new(conn))
        .enroll_student(student_name, course_code)
}

/// Reads a course roster from `conn`.
pub fn get_enrollment_roster(
    conn: &Connection,
    course_code: &str,
) -> Result<Vec<RosterEntry>, EnrollmentError> {
    EnrollmentService::new(SqliteCourseRepository::new(conn)).get_enrollment_roster(course_code)
}

fn require_text<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Blank { field });
    }
    Ok(trimmed)
}

fn normalize_course_code(field: &'static str, value: &str) -> Result<String, ValidationError> {
    require_text(field, value).map(str::to_uppercase)
}
