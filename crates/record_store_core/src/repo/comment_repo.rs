//! Comment repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Every comment references an existing user and post; the store rejects
//!   anything else with `RepoError::ForeignKeyViolation`.
//! - Comments of one post are listed oldest first, ties broken by id.

use crate::model::comment::{AuthoredComment, Comment, CommentId, NewComment};
use crate::model::post::PostId;
use crate::repo::error::{RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

/// Repository interface for comment operations.
pub trait CommentRepository {
    fn insert_comment(&self, comment: &NewComment) -> RepoResult<CommentId>;
    fn list_comments(&self, post_id: PostId) -> RepoResult<Vec<AuthoredComment>>;
}

/// SQLite-backed comment repository.
pub struct SqliteCommentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCommentRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl CommentRepository for SqliteCommentRepository<'_> {
    fn insert_comment(&self, comment: &NewComment) -> RepoResult<CommentId> {
        comment.validate()?;

        self.conn
            .execute(
                "INSERT INTO comments (content, user_id, post_id) VALUES (?1, ?2, ?3);",
                params![comment.content.as_str(), comment.user_id, comment.post_id],
            )
            .map_err(|err| RepoError::from_write(err, "comments"))?;

        Ok(self.conn.last_insert_rowid())
    }

    fn list_comments(&self, post_id: PostId) -> RepoResult<Vec<AuthoredComment>> {
        let mut stmt = self.conn.prepare(
            "SELECT c.id AS id, c.content AS content, c.user_id AS user_id,
                    c.post_id AS post_id, c.created_at AS created_at, u.username AS username
             FROM comments c
             JOIN users u ON u.id = c.user_id
             WHERE c.post_id = ?1
             ORDER BY c.created_at ASC, c.id ASC;",
        )?;
        let comments = stmt
            .query_map([post_id], parse_authored_comment_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(comments)
    }
}

fn parse_authored_comment_row(row: &Row<'_>) -> rusqlite::Result<AuthoredComment> {
    Ok(AuthoredComment {
        comment: Comment {
            id: row.get("id")?,
            content: row.get("content")?,
            user_id: row.get("user_id")?,
            post_id: row.get("post_id")?,
            created_at: row.get("created_at")?,
        },
        username: row.get("username")?,
    })
}
