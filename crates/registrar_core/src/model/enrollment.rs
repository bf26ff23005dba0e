//! Enrollment and roster records.
//!
//! # Invariants
//! - `(student_name, course_id)` is unique across enrollments.
//! - `id` increases monotonically in insertion order; rosters sort by it.

use crate::model::course::CourseId;
use serde::{Deserialize, Serialize};

/// Store-assigned enrollment identity.
pub type EnrollmentId = i64;

/// Persisted enrollment of one student in one course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    pub id: EnrollmentId,
    /// Trimmed, case preserved.
    pub student_name: String,
    pub course_id: CourseId,
}

/// One row of a course roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntry {
    pub id: EnrollmentId,
    pub student_name: String,
    pub course_code: String,
}
