//! Generic parameterized statement helpers.
//!
//! # Responsibility
//! - Run mutating statements and report affected rows + assigned identity.
//! - Run single-row and multi-row queries through caller-supplied row mappers.
//! - Release connections exactly once.
//!
//! # Invariants
//! - Zero rows from `query_one` is `Ok(None)`, never an error.
//! - `query_many` preserves the row order declared by the statement.

use super::DbResult;
use log::{error, info};
use rusqlite::{Connection, OptionalExtension, Params, Row};

/// Result of a mutating statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecOutcome {
    pub rows_affected: usize,
    /// Rowid assigned by the most recent successful insert on this connection.
    pub last_insert_id: i64,
}

/// Runs one mutating statement.
pub fn execute<P: Params>(conn: &Connection, sql: &str, params: P) -> DbResult<ExecOutcome> {
    let rows_affected = conn.execute(sql, params)?;
    Ok(ExecOutcome {
        rows_affected,
        last_insert_id: conn.last_insert_rowid(),
    })
}

/// Returns the first row mapped by `map`, or `None` when nothing matches.
pub fn query_one<T, P, F>(conn: &Connection, sql: &str, params: P, map: F) -> DbResult<Option<T>>
where
    P: Params,
    F: FnOnce(&Row<'_>) -> rusqlite::Result<T>,
{
    let row = conn.query_row(sql, params, map).optional()?;
    Ok(row)
}

/// Returns every row mapped by `map`, in statement order.
pub fn query_many<T, P, F>(conn: &Connection, sql: &str, params: P, map: F) -> DbResult<Vec<T>>
where
    P: Params,
    F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
{
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params, map)?
        .collect::<rusqlite::Result<Vec<T>>>()?;
    Ok(rows)
}

/// Closes the connection, flushing and releasing all SQLite resources.
///
/// Consumes the handle so it cannot be used or closed again.
pub fn close_db(conn: Connection) -> DbResult<()> {
    match conn.close() {
        Ok(()) => {
            info!("event=db_close module=db status=ok");
            Ok(())
        }
        Err((_conn, err)) => {
            error!("event=db_close module=db status=error error={err}");
            Err(err.into())
        }
    }
}
