//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Configure connection pragmas required by registrar behavior.
//! - Optionally apply the schema before returning a usable connection.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON`.
//! - `open_db*` connections have the schema fully applied;
//!   `open_store*` connections do not.

use super::migrations::apply_schema;
use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens a configured SQLite database file without touching the schema.
pub fn open_store(path: impl AsRef<Path>) -> DbResult<Connection> {
    let conn = Connection::open(path)?;
    configure_connection(&conn)?;
    Ok(conn)
}

/// Opens a configured in-memory SQLite database without touching the schema.
pub fn open_store_in_memory() -> DbResult<Connection> {
    let conn = Connection::open_in_memory()?;
    configure_connection(&conn)?;
    Ok(conn)
}

/// Opens a SQLite database file and applies the registrar schema.
///
/// # Side effects
/// - Performs connection bootstrap and schema checks.
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    open_logged("file", || open_store(path))
}

/// Opens an in-memory SQLite database and applies the registrar schema.
///
/// # Side effects
/// - Performs connection bootstrap and schema checks.
/// - Emits `db_open` logging events with duration and status.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_logged("memory", open_store_in_memory)
}

fn open_logged(
    mode: &'static str,
    open: impl FnOnce() -> DbResult<Connection>,
) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode={mode}");

    let mut conn = match open() {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_open_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err);
        }
    };

    match apply_schema(&mut conn) {
        Ok(()) => {
            info!(
                "event=db_open module=db status=ok mode={mode} duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error_code={} error={}",
                started_at.elapsed().as_millis(),
                bootstrap_error_code(&err),
                err
            );
            Err(err)
        }
    }
}

fn configure_connection(conn: &Connection) -> DbResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    Ok(())
}

fn bootstrap_error_code(err: &DbError) -> &'static str {
    match err {
        DbError::Schema(_) => "db_schema_conflict",
        DbError::UnsupportedSchemaVersion { .. } => "db_schema_too_new",
        DbError::Sqlite(_) => "db_bootstrap_failed",
    }
}
