//! SQLite storage gateway for registrar core.
//!
//! # Responsibility
//! - Open and configure SQLite connections.
//! - Apply the fixed `courses`/`enrollments` schema.
//! - Expose generic parameterized execute/query helpers and close.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - Callers branch on [`StorageErrorKind`], never on SQLite message text.

use rusqlite::ffi;
use rusqlite::ErrorCode;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod gateway;
pub mod migrations;
mod open;

pub use gateway::{close_db, execute, query_many, query_one, ExecOutcome};
pub use open::{open_db, open_db_in_memory, open_store, open_store_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// Schema DDL failed, typically because conflicting objects already exist.
    Schema(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

/// Storage failure classification derived from SQLite result codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageErrorKind {
    /// `UNIQUE` or `PRIMARY KEY` constraint rejected the write.
    UniqueViolation,
    /// `FOREIGN KEY` constraint rejected the write.
    ForeignKeyViolation,
    /// `NOT NULL` constraint rejected the write.
    NotNullViolation,
    /// Database stayed locked for longer than the busy timeout.
    Busy,
    Other,
}

impl DbError {
    /// Classifies this error by SQLite extended result code.
    pub fn kind(&self) -> StorageErrorKind {
        match self {
            Self::Sqlite(err) | Self::Schema(err) => classify_sqlite_error(err),
            Self::UnsupportedSchemaVersion { .. } => StorageErrorKind::Other,
        }
    }

    /// Returns whether a uniqueness constraint rejected the write.
    pub fn is_unique_violation(&self) -> bool {
        self.kind() == StorageErrorKind::UniqueViolation
    }
}

fn classify_sqlite_error(err: &rusqlite::Error) -> StorageErrorKind {
    let rusqlite::Error::SqliteFailure(failure, _) = err else {
        return StorageErrorKind::Other;
    };

    match failure.code {
        ErrorCode::ConstraintViolation => match failure.extended_code {
            ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                StorageErrorKind::UniqueViolation
            }
            ffi::SQLITE_CONSTRAINT_FOREIGNKEY => StorageErrorKind::ForeignKeyViolation,
            ffi::SQLITE_CONSTRAINT_NOTNULL => StorageErrorKind::NotNullViolation,
            _ => StorageErrorKind::Other,
        },
        ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked => StorageErrorKind::Busy,
        _ => StorageErrorKind::Other,
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::Schema(err) => write!(f, "schema setup failed: {err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) | Self::Schema(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
