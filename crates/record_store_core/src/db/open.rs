//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Configure connection pragmas required by cascade deletes.
//! - Trigger schema creation before returning a usable connection.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON`.
//! - Returned connections have migrations fully applied.

use super::migrations::apply_migrations;
use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::{Connection, ErrorCode};
use std::path::Path;
use std::time::{Duration, Instant};

const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens a SQLite database file and applies all pending migrations.
///
/// # Errors
/// - `DbError::Open` when the file cannot be opened or created, or exists
///   but is not a SQLite database.
/// - `DbError::UnsupportedSchemaVersion` when the file was written by a newer
///   schema than this binary knows.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    open_db_with_timeout(path, DEFAULT_BUSY_TIMEOUT)
}

/// Same as [`open_db`] with an explicit SQLite busy timeout.
pub fn open_db_with_timeout(path: impl AsRef<Path>, busy_timeout: Duration) -> DbResult<Connection> {
    let path = path.as_ref();
    let started_at = Instant::now();
    info!(
        "event=db_open module=db status=start mode=file path={}",
        path.display()
    );

    let mut conn = match Connection::open(path) {
        Ok(conn) => conn,
        Err(source) => {
            let err = DbError::Open {
                path: path.to_path_buf(),
                source,
            };
            error!(
                "event=db_open module=db status=error mode=file duration_ms={} error_code={} error={}",
                started_at.elapsed().as_millis(),
                err.code(),
                err
            );
            return Err(err);
        }
    };

    finish_open(&mut conn, busy_timeout, Some(path), started_at)?;
    Ok(conn)
}

/// Opens an in-memory SQLite database and applies all pending migrations.
pub fn open_db_in_memory() -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode=memory");

    let mut conn = match Connection::open_in_memory() {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode=memory duration_ms={} error_code=db_open_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    finish_open(&mut conn, DEFAULT_BUSY_TIMEOUT, None, started_at)?;
    Ok(conn)
}

fn finish_open(
    conn: &mut Connection,
    busy_timeout: Duration,
    path: Option<&Path>,
    started_at: Instant,
) -> DbResult<()> {
    let mode = if path.is_some() { "file" } else { "memory" };
    let outcome = bootstrap_connection(conn, busy_timeout).map_err(|err| match path {
        Some(path) => classify_open_failure(err, path),
        None => err,
    });

    match outcome {
        Ok(()) => {
            info!(
                "event=db_open module=db status=ok mode={} duration_ms={}",
                mode,
                started_at.elapsed().as_millis()
            );
            Ok(())
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={} duration_ms={} error_code={} error={}",
                mode,
                started_at.elapsed().as_millis(),
                err.code(),
                err
            );
            Err(err)
        }
    }
}

// `Connection::open` is lazy: a garbage or unreadable file only fails on the
// first statement, so those codes still mean the file cannot be opened.
fn classify_open_failure(err: DbError, path: &Path) -> DbError {
    match err {
        DbError::Sqlite(source)
            if matches!(
                source.sqlite_error_code(),
                Some(
                    ErrorCode::NotADatabase
                        | ErrorCode::CannotOpen
                        | ErrorCode::PermissionDenied
                )
            ) =>
        {
            DbError::Open {
                path: path.to_path_buf(),
                source,
            }
        }
        other => other,
    }
}

fn bootstrap_connection(conn: &mut Connection, busy_timeout: Duration) -> DbResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(busy_timeout)?;
    apply_migrations(conn)?;
    Ok(())
}
