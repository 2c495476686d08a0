//! Versioned schema for the `users`, `posts` and `comments` tables.
//!
//! # Invariants
//! - Step 1 creates the three tables with `ON DELETE CASCADE` foreign keys;
//!   step 2 indexes the foreign key columns used by joins and cascades.
//! - The highest applied step is stored in `PRAGMA user_version`.
//! - Every statement is `IF NOT EXISTS`, so a store whose tables were made
//!   by hand (version 0) upgrades without error and keeps its rows.
//! - All pending steps land in one transaction; a failed step leaves the
//!   previous version intact.

use crate::db::{DbError, DbResult};
use log::{debug, info};
use rusqlite::Connection;

struct SchemaStep {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const SCHEMA_STEPS: &[SchemaStep] = &[
    SchemaStep {
        version: 1,
        name: "users_posts_comments",
        sql: include_str!("0001_init.sql"),
    },
    SchemaStep {
        version: 2,
        name: "foreign_key_indexes",
        sql: include_str!("0002_fk_indexes.sql"),
    },
];

/// Schema version this build writes.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |step| step.version)
}

/// Brings the store up to [`latest_version`].
///
/// # Errors
/// - `DbError::UnsupportedSchemaVersion` when the store is newer than this
///   build.
/// - `DbError::Sqlite` when a step fails; nothing is committed in that case.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let stored = stored_schema_version(conn)?;
    let latest = latest_version();

    if stored > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: stored,
            latest_supported: latest,
        });
    }
    if stored == latest {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for step in SCHEMA_STEPS.iter().filter(|step| step.version > stored) {
        tx.execute_batch(step.sql)?;
        tx.pragma_update(None, "user_version", step.version)?;
        debug!(
            "event=schema_step module=db status=ok version={} name={}",
            step.version, step.name
        );
    }
    tx.commit()?;

    info!(
        "event=schema_migrate module=db status=ok from_version={} to_version={}",
        stored, latest
    );
    Ok(())
}

/// Ensures the users/posts/comments schema exists; safe to call repeatedly.
pub fn create_schema(conn: &mut Connection) -> DbResult<()> {
    apply_migrations(conn)
}

/// Schema version recorded in the store file, 0 for a fresh store.
pub fn stored_schema_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.pragma_query_value(None, "user_version", |row| row.get::<_, u32>(0))?;
    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::{latest_version, SCHEMA_STEPS};

    #[test]
    fn steps_are_strictly_increasing_from_one() {
        for (index, step) in SCHEMA_STEPS.iter().enumerate() {
            assert_eq!(step.version as usize, index + 1, "step {}", step.name);
        }
        assert_eq!(latest_version(), 2);
    }
}
