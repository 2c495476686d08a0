//! Post repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide insert/list/delete APIs over the `posts` table.
//! - Own post-centric joins: detail with comments, search, comment counts.
//!
//! # Invariants
//! - Post lists are newest first: `created_at DESC, id DESC`.
//! - Search is a case-insensitive literal substring match on title or
//!   content; LIKE wildcards in the term are escaped.
//! - `delete_post` relies on `ON DELETE CASCADE` for comments.

use crate::model::post::{AuthoredPost, NewPost, Post, PostCommentCount, PostId, PostWithComments};
use crate::model::user::UserId;
use crate::repo::comment_repo::{CommentRepository, SqliteCommentRepository};
use crate::repo::error::{RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const POST_COLUMNS_SQL: &str =
    "p.id AS id, p.title AS title, p.content AS content, p.user_id AS user_id, p.created_at AS created_at";
const LIKE_ESCAPE: char = '\\';

/// Repository interface for post operations.
pub trait PostRepository {
    fn insert_post(&self, post: &NewPost) -> RepoResult<PostId>;
    /// Lists posts newest first, optionally only those owned by `user_id`.
    fn list_posts(&self, user_id: Option<UserId>) -> RepoResult<Vec<Post>>;
    fn get_post_with_comments(&self, id: PostId) -> RepoResult<Option<PostWithComments>>;
    fn delete_post(&self, id: PostId) -> RepoResult<bool>;
    fn search_posts(&self, term: &str) -> RepoResult<Vec<AuthoredPost>>;
    fn post_comment_counts(&self) -> RepoResult<Vec<PostCommentCount>>;
}

/// SQLite-backed post repository.
pub struct SqlitePostRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePostRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl PostRepository for SqlitePostRepository<'_> {
    fn insert_post(&self, post: &NewPost) -> RepoResult<PostId> {
        post.validate()?;

        self.conn
            .execute(
                "INSERT INTO posts (title, content, user_id) VALUES (?1, ?2, ?3);",
                params![post.title.as_str(), post.content.as_str(), post.user_id],
            )
            .map_err(|err| RepoError::from_write(err, "posts"))?;

        Ok(self.conn.last_insert_rowid())
    }

    fn list_posts(&self, user_id: Option<UserId>) -> RepoResult<Vec<Post>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {POST_COLUMNS_SQL}
             FROM posts p
             WHERE (?1 IS NULL OR p.user_id = ?1)
             ORDER BY p.created_at DESC, p.id DESC;"
        ))?;
        let posts = stmt
            .query_map([user_id], parse_post_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(posts)
    }

    fn get_post_with_comments(&self, id: PostId) -> RepoResult<Option<PostWithComments>> {
        let authored = self
            .conn
            .query_row(
                &format!(
                    "SELECT {POST_COLUMNS_SQL}, u.username AS username
                     FROM posts p
                     JOIN users u ON u.id = p.user_id
                     WHERE p.id = ?1;"
                ),
                [id],
                parse_authored_post_row,
            )
            .optional()?;

        let Some(AuthoredPost { post, username }) = authored else {
            return Ok(None);
        };

        let comments = SqliteCommentRepository::new(self.conn).list_comments(post.id)?;
        Ok(Some(PostWithComments {
            post,
            username,
            comments,
        }))
    }

    fn delete_post(&self, id: PostId) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM posts WHERE id = ?1;", [id])?;
        Ok(changed > 0)
    }

    fn search_posts(&self, term: &str) -> RepoResult<Vec<AuthoredPost>> {
        let pattern = format!("%{}%", escape_like(term));
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {POST_COLUMNS_SQL}, u.username AS username
             FROM posts p
             JOIN users u ON u.id = p.user_id
             WHERE p.title LIKE ?1 ESCAPE '{LIKE_ESCAPE}'
                OR p.content LIKE ?1 ESCAPE '{LIKE_ESCAPE}'
             ORDER BY p.created_at DESC, p.id DESC;"
        ))?;
        let posts = stmt
            .query_map([pattern.as_str()], parse_authored_post_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(posts)
    }

    fn post_comment_counts(&self) -> RepoResult<Vec<PostCommentCount>> {
        let mut stmt = self.conn.prepare(
            "SELECT p.id AS id, p.title AS title, u.username AS author,
                    COUNT(c.id) AS comment_count, p.created_at AS created_at
             FROM posts p
             JOIN users u ON u.id = p.user_id
             LEFT JOIN comments c ON c.post_id = p.id
             GROUP BY p.id
             ORDER BY comment_count DESC, p.created_at DESC, p.id DESC;",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(PostCommentCount {
                    id: row.get("id")?,
                    title: row.get("title")?,
                    author: row.get("author")?,
                    comment_count: row.get("comment_count")?,
                    created_at: row.get("created_at")?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

/// Escapes LIKE wildcards so `term` matches literally.
pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(ch);
    }
    escaped
}

fn parse_post_row(row: &Row<'_>) -> rusqlite::Result<Post> {
    Ok(Post {
        id: row.get("id")?,
        title: row.get("title")?,
        content: row.get("content")?,
        user_id: row.get("user_id")?,
        created_at: row.get("created_at")?,
    })
}

fn parse_authored_post_row(row: &Row<'_>) -> rusqlite::Result<AuthoredPost> {
    Ok(AuthoredPost {
        post: parse_post_row(row)?,
        username: row.get("username")?,
    })
}

#[cfg(test)]
mod tests {
    use super::escape_like;

    #[test]
    fn escape_like_protects_wildcards() {
        assert_eq!(escape_like("100%_done\\"), "100\\%\\_done\\\\");
        assert_eq!(escape_like("plain"), "plain");
    }
}
