//! Course/enrollment repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Map course and enrollment use-cases onto parameterized statements.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - No validation or normalization happens here; inputs arrive normalized.
//! - Constraint failures are returned as `RepoError::Db`, classified by kind.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::{self, DbError, StorageErrorKind};
use crate::model::course::{Course, CourseId};
use crate::model::enrollment::{Enrollment, RosterEntry};
use rusqlite::{params, Connection, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

const REQUIRED_TABLES: &[&str] = &["courses", "enrollments"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for course and enrollment persistence.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
}

impl RepoError {
    /// Storage classification of the underlying failure.
    pub fn kind(&self) -> StorageErrorKind {
        match self {
            Self::Db(err) => err.kind(),
            _ => StorageErrorKind::Other,
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for course registration storage.
pub trait CourseRepository {
    /// Inserts a course and returns it with its assigned id.
    fn add_course(&self, code: &str, title: &str, capacity: i64) -> RepoResult<Course>;
    /// Exact, case-sensitive lookup by course code.
    fn find_course_by_code(&self, code: &str) -> RepoResult<Option<Course>>;
    /// Number of enrollments referencing `course_id`; zero when none.
    fn count_enrollments(&self, course_id: CourseId) -> RepoResult<i64>;
    /// Inserts an enrollment and returns it with its assigned id.
    fn add_enrollment(&self, student_name: &str, course_id: CourseId) -> RepoResult<Enrollment>;
    /// Roster for `course_code`, ordered by enrollment id ascending.
    fn list_enrollments(&self, course_code: &str) -> RepoResult<Vec<RosterEntry>>;
    /// Runs `op` while holding the store write lock.
    ///
    /// Everything `op` does commits together on `Ok` and rolls back on `Err`.
    fn in_write_transaction<T, E, F>(&self, op: F) -> Result<T, E>
    where
        F: FnOnce(&Self) -> Result<T, E>,
        E: From<RepoError>;
}

/// SQLite-backed course repository.
pub struct SqliteCourseRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCourseRepository<'conn> {
    /// Wraps a connection without checking its schema.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Constructs a repository from a connection with the schema applied.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl CourseRepository for SqliteCourseRepository<'_> {
    fn add_course(&self, code: &str, title: &str, capacity: i64) -> RepoResult<Course> {
        let outcome = db::execute(
            self.conn,
            "INSERT INTO courses (code, title, capacity) VALUES (?1, ?2, ?3);",
            params![code, title, capacity],
        )?;

        Ok(Course {
            id: outcome.last_insert_id,
            code: code.to_string(),
            title: title.to_string(),
            capacity,
        })
    }

    fn find_course_by_code(&self, code: &str) -> RepoResult<Option<Course>> {
        let course = db::query_one(
            self.conn,
            "SELECT id, code, title, capacity FROM courses WHERE code = ?1;",
            [code],
            |row| {
                Ok(Course {
                    id: row.get("id")?,
                    code: row.get("code")?,
                    title: row.get("title")?,
                    capacity: row.get("capacity")?,
                })
            },
        )?;

        match course {
            Some(course) if course.capacity <= 0 => Err(RepoError::InvalidData(format!(
                "invalid capacity `{}` in courses.capacity for id {}",
                course.capacity, course.id
            ))),
            other => Ok(other),
        }
    }

    fn count_enrollments(&self, course_id: CourseId) -> RepoResult<i64> {
        let total = db::query_one(
            self.conn,
            "SELECT COUNT(*) AS total FROM enrollments WHERE course_id = ?1;",
            [course_id],
            |row| row.get::<_, i64>("total"),
        )?;
        Ok(total.unwrap_or(0))
    }

    fn add_enrollment(&self, student_name: &str, course_id: CourseId) -> RepoResult<Enrollment> {
        let outcome = db::execute(
            self.conn,
            "INSERT INTO enrollments (student_name, course_id) VALUES (?1, ?2);",
            params![student_name, course_id],
        )?;

        Ok(Enrollment {
            id: outcome.last_insert_id,
            student_name: student_name.to_string(),
            course_id,
        })
    }

    fn list_enrollments(&self, course_code: &str) -> RepoResult<Vec<RosterEntry>> {
        let roster = db::query_many(
            self.conn,
            "SELECT e.id, e.student_name, c.code AS course_code
             FROM enrollments e
             JOIN courses c ON c.id = e.course_id
             WHERE c.code = ?1
             ORDER BY e.id ASC;",
            [course_code],
            |row| {
                Ok(RosterEntry {
                    id: row.get("id")?,
                    student_name: row.get("student_name")?,
                    course_code: row.get("course_code")?,
                })
            },
        )?;
        Ok(roster)
    }

    fn in_write_transaction<T, E, F>(&self, op: F) -> Result<T, E>
    where
        F: FnOnce(&Self) -> Result<T, E>,
        E: From<RepoError>,
    {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)
            .map_err(RepoError::from)?;
        let value = op(self)?;
        tx.commit().map_err(RepoError::from)?;
        Ok(value)
    }
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for &table in REQUIRED_TABLES {
        let exists: bool = conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1
            );",
            [table],
            |row| row.get(0),
        )?;
        if !exists {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }

    Ok(())
}
