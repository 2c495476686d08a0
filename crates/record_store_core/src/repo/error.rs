//! Repository error type and SQLite constraint classification.

use crate::db::DbError;
use crate::model::validation::ValidationError;
use rusqlite::ffi;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Error kinds surfaced by repository and store operations.
#[derive(Debug)]
pub enum RepoError {
    /// Transport/bootstrap failure, including an unopenable store file.
    Db(DbError),
    /// Input rejected before touching storage.
    Validation(ValidationError),
    /// `UNIQUE` constraint violated, e.g. a duplicate username or email.
    UniqueViolation {
        table: String,
        column: String,
    },
    /// `FOREIGN KEY` constraint violated: referenced user/post is missing.
    ForeignKeyViolation { table: &'static str },
    /// Lookup by id found no row.
    NotFound { entity: &'static str, id: i64 },
}

impl RepoError {
    /// Stable error code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Db(err) => err.code(),
            Self::Validation(err) => err.code(),
            Self::UniqueViolation { .. } => "unique_violation",
            Self::ForeignKeyViolation { .. } => "foreign_key_violation",
            Self::NotFound { .. } => "not_found",
        }
    }

    /// Whether this failure is caused by caller input rather than the store.
    pub fn is_caller_error(&self) -> bool {
        !matches!(self, Self::Db(_))
    }

    /// Converts a raw SQLite error raised while writing into `table`.
    ///
    /// Constraint failures are classified by extended result code; anything
    /// else stays a transport error.
    pub(crate) fn from_write(err: rusqlite::Error, table: &'static str) -> Self {
        if let rusqlite::Error::SqliteFailure(failure, message) = &err {
            match failure.extended_code {
                ffi::SQLITE_CONSTRAINT_UNIQUE => {
                    let (table, column) = message
                        .as_deref()
                        .and_then(parse_unique_target)
                        .unwrap_or_else(|| (table.to_string(), "unknown".to_string()));
                    return Self::UniqueViolation { table, column };
                }
                ffi::SQLITE_CONSTRAINT_FOREIGNKEY => {
                    return Self::ForeignKeyViolation { table };
                }
                _ => {}
            }
        }
        Self::Db(DbError::Sqlite(err))
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::UniqueViolation { table, column } => {
                write!(f, "{table}.{column} already exists")
            }
            Self::ForeignKeyViolation { table } => {
                write!(f, "{table} row references a missing parent row")
            }
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
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

// SQLite reports "UNIQUE constraint failed: users.email".
fn parse_unique_target(message: &str) -> Option<(String, String)> {
    let target = message.strip_prefix("UNIQUE constraint failed: ")?;
    let first = target.split(',').next()?.trim();
    let (table, column) = first.split_once('.')?;
    Some((table.to_string(), column.to_string()))
}

#[cfg(test)]
mod tests {
    use super::parse_unique_target;

    #[test]
    fn parses_table_and_column_from_unique_message() {
        assert_eq!(
            parse_unique_target("UNIQUE constraint failed: users.email"),
            Some(("users".to_string(), "email".to_string()))
        );
        assert_eq!(parse_unique_target("NOT NULL constraint failed"), None);
    }
}
