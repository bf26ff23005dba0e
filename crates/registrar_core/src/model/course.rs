//! Course domain model.
//!
//! # Invariants
//! - `code` is stored trimmed and upper-cased, and is unique.
//! - `title` is stored trimmed and non-empty.
//! - `capacity` is positive and fixed at creation.

use serde::{Deserialize, Serialize};

/// Store-assigned course identity.
pub type CourseId = i64;

/// Persisted course record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: CourseId,
    pub code: String,
    pub title: String,
    /// Maximum number of enrollments the course may hold.
    pub capacity: i64,
}

/// Caller input for course creation.
///
/// Values are raw; the enrollment service validates and normalizes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCourse {
    pub code: String,
    pub title: String,
    pub capacity: i64,
}

impl NewCourse {
    pub fn new(code: impl Into<String>, title: impl Into<String>, capacity: i64) -> Self {
        Self {
            code: code.into(),
            title: title.into(),
            capacity,
        }
    }
}
