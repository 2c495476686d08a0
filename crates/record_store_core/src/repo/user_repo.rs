//! User repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide insert/read/update/delete APIs over the `users` table.
//! - Classify uniqueness failures into `RepoError::UniqueViolation`.
//!
//! # Invariants
//! - Write paths validate inputs before SQL mutations.
//! - `update_user` only touches supplied columns.
//! - `delete_user` relies on `ON DELETE CASCADE` for posts and comments.

use crate::model::user::{NewUser, User, UserId, UserPostCount, UserUpdate};
use crate::repo::error::{RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

const USER_SELECT_SQL: &str = "SELECT id, username, email, created_at FROM users";

/// Repository interface for user operations.
pub trait UserRepository {
    fn insert_user(&self, user: &NewUser) -> RepoResult<UserId>;
    fn get_user(&self, id: UserId) -> RepoResult<Option<User>>;
    fn list_users(&self) -> RepoResult<Vec<User>>;
    /// Returns `false` when nothing was supplied or no row matched.
    fn update_user(&self, id: UserId, update: &UserUpdate) -> RepoResult<bool>;
    fn delete_user(&self, id: UserId) -> RepoResult<bool>;
    fn user_post_counts(&self) -> RepoResult<Vec<UserPostCount>>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn insert_user(&self, user: &NewUser) -> RepoResult<UserId> {
        user.validate()?;

        self.conn
            .execute(
                "INSERT INTO users (username, email) VALUES (?1, ?2);",
                params![user.username.as_str(), user.email.as_str()],
            )
            .map_err(|err| RepoError::from_write(err, "users"))?;

        Ok(self.conn.last_insert_rowid())
    }

    fn get_user(&self, id: UserId) -> RepoResult<Option<User>> {
        let user = self
            .conn
            .query_row(
                &format!("{USER_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_user_row,
            )
            .optional()?;
        Ok(user)
    }

    fn list_users(&self) -> RepoResult<Vec<User>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{USER_SELECT_SQL} ORDER BY id ASC;"))?;
        let users = stmt
            .query_map([], parse_user_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(users)
    }

    fn update_user(&self, id: UserId, update: &UserUpdate) -> RepoResult<bool> {
        let assignments = update.assignments();
        if assignments.is_empty() {
            return Ok(false);
        }

        let set_clause = assignments
            .iter()
            .map(|(column, _)| format!("{column} = ?"))
            .collect::<Vec<_>>()
            .join(", ");
        let mut bind_values: Vec<Value> = assignments
            .iter()
            .map(|(_, value)| Value::Text((*value).to_string()))
            .collect();
        bind_values.push(Value::Integer(id));

        let changed = self
            .conn
            .execute(
                &format!("UPDATE users SET {set_clause} WHERE id = ?;"),
                params_from_iter(bind_values),
            )
            .map_err(|err| RepoError::from_write(err, "users"))?;

        Ok(changed > 0)
    }

    fn delete_user(&self, id: UserId) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM users WHERE id = ?1;", [id])?;
        Ok(changed > 0)
    }

    fn user_post_counts(&self) -> RepoResult<Vec<UserPostCount>> {
        let mut stmt = self.conn.prepare(
            "SELECT u.id AS id, u.username AS username, u.email AS email,
                    COUNT(p.id) AS post_count
             FROM users u
             LEFT JOIN posts p ON p.user_id = u.id
             GROUP BY u.id
             ORDER BY post_count DESC, u.id ASC;",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(UserPostCount {
                    id: row.get("id")?,
                    username: row.get("username")?,
                    email: row.get("email")?,
                    post_count: row.get("post_count")?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

fn parse_user_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get("id")?,
        username: row.get("username")?,
        email: row.get("email")?,
        created_at: row.get("created_at")?,
    })
}
