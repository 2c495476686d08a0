//! Record store facade over one owned SQLite connection.
//!
//! # Responsibility
//! - Own the connection lifecycle: open, schema creation, close.
//! - Expose typed CRUD, join and aggregate operations over users/posts/comments.
//! - Run the user -> post -> comment sequence as one atomic unit.
//!
//! # Invariants
//! - Every operation logs exactly one `event=... module=store` line and
//!   returns failures to the caller; nothing is retried.
//! - Multi-statement writes take `&mut self`, so no other borrow of the
//!   connection can interleave with an open transaction.

use crate::config::StoreConfig;
use crate::db::{self, DbError, DbResult};
use crate::model::comment::{CommentId, NewComment};
use crate::model::post::{AuthoredPost, NewPost, Post, PostCommentCount, PostId, PostWithComments};
use crate::model::user::{NewUser, User, UserId, UserPostCount, UserUpdate};
use crate::repo::comment_repo::{CommentRepository, SqliteCommentRepository};
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::post_repo::{PostRepository, SqlitePostRepository};
use crate::repo::user_repo::{SqliteUserRepository, UserRepository};
use log::{debug, error, info, warn};
use rusqlite::Connection;
use std::path::Path;
use std::time::Instant;

pub const SAMPLE_USERNAME: &str = "transaction_user";
pub const SAMPLE_EMAIL: &str = "transaction@example.com";
pub const SAMPLE_POST_TITLE: &str = "Transaction Post";
pub const SAMPLE_POST_CONTENT: &str = "This post is part of a transaction";
pub const SAMPLE_COMMENT: &str = "Transaction comment";

/// Ids of the rows written by one committed thread transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadIds {
    pub user_id: UserId,
    pub post_id: PostId,
    pub comment_id: CommentId,
}

/// Explicitly constructed handle owning the store connection.
pub struct RecordStore {
    conn: Connection,
}

impl RecordStore {
    /// Opens the store at `config.db_path` and applies the schema.
    pub fn connect(config: &StoreConfig) -> DbResult<Self> {
        let conn = db::open_db_with_timeout(&config.db_path, config.busy_timeout)?;
        Ok(Self { conn })
    }

    pub fn connect_path(path: impl AsRef<Path>) -> DbResult<Self> {
        let conn = db::open_db(path)?;
        Ok(Self { conn })
    }

    pub fn connect_in_memory() -> DbResult<Self> {
        let conn = db::open_db_in_memory()?;
        Ok(Self { conn })
    }

    /// Read access for callers that need raw SQL (diagnostics, tests).
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Idempotently ensures the three tables exist.
    pub fn create_schema(&mut self) -> DbResult<()> {
        let result = db::create_schema(&mut self.conn);
        match &result {
            Ok(()) => info!("event=schema_create module=store status=ok"),
            Err(err) => error!(
                "event=schema_create module=store status=error error_code={} error={}",
                err.code(),
                err
            ),
        }
        result
    }

    pub fn insert_user(&self, username: &str, email: &str) -> RepoResult<UserId> {
        let started_at = Instant::now();
        let user = NewUser::new(username, email);
        observe(
            "user_insert",
            started_at,
            self.users().insert_user(&user),
        )
    }

    pub fn insert_post(&self, title: &str, content: &str, user_id: UserId) -> RepoResult<PostId> {
        let started_at = Instant::now();
        let post = NewPost::new(title, content, user_id);
        observe("post_insert", started_at, self.posts().insert_post(&post))
    }

    pub fn insert_comment(
        &self,
        content: &str,
        user_id: UserId,
        post_id: PostId,
    ) -> RepoResult<CommentId> {
        let started_at = Instant::now();
        let comment = NewComment::new(content, user_id, post_id);
        observe(
            "comment_insert",
            started_at,
            self.comments().insert_comment(&comment),
        )
    }

    /// All users ordered by id.
    pub fn get_users(&self) -> RepoResult<Vec<User>> {
        observe("user_list", Instant::now(), self.users().list_users())
    }

    pub fn get_user(&self, id: UserId) -> RepoResult<Option<User>> {
        observe("user_get", Instant::now(), self.users().get_user(id))
    }

    /// Posts newest first, optionally restricted to one owner.
    pub fn get_posts(&self, user_id: Option<UserId>) -> RepoResult<Vec<Post>> {
        observe("post_list", Instant::now(), self.posts().list_posts(user_id))
    }

    /// Returns `Ok(None)` when the post does not exist.
    pub fn get_post_with_comments(&self, id: PostId) -> RepoResult<Option<PostWithComments>> {
        observe(
            "post_get",
            Instant::now(),
            self.posts().get_post_with_comments(id),
        )
    }

    /// Like [`Self::get_post_with_comments`], but a missing post is
    /// `RepoError::NotFound`.
    pub fn require_post(&self, id: PostId) -> RepoResult<PostWithComments> {
        let started_at = Instant::now();
        let result = self
            .posts()
            .get_post_with_comments(id)
            .and_then(|post| post.ok_or(RepoError::NotFound { entity: "post", id }));
        observe("post_require", started_at, result)
    }

    /// Updates only supplied fields; `Ok(false)` when nothing changed.
    pub fn update_user(&self, id: UserId, update: &UserUpdate) -> RepoResult<bool> {
        if update.is_empty() {
            info!("event=user_update module=store status=skipped reason=no_fields user_id={id}");
            return Ok(false);
        }
        observe(
            "user_update",
            Instant::now(),
            self.users().update_user(id, update),
        )
    }

    /// Removes a post and, by cascade, its comments.
    pub fn delete_post(&self, id: PostId) -> RepoResult<bool> {
        observe("post_delete", Instant::now(), self.posts().delete_post(id))
    }

    /// Removes a user and, by cascade, their posts and comments.
    pub fn delete_user(&self, id: UserId) -> RepoResult<bool> {
        observe("user_delete", Instant::now(), self.users().delete_user(id))
    }

    /// Case-insensitive substring search over title and content, newest first.
    pub fn search_posts(&self, term: &str) -> RepoResult<Vec<AuthoredPost>> {
        observe("post_search", Instant::now(), self.posts().search_posts(term))
    }

    pub fn user_post_counts(&self) -> RepoResult<Vec<UserPostCount>> {
        observe(
            "user_post_counts",
            Instant::now(),
            self.users().user_post_counts(),
        )
    }

    pub fn post_comment_counts(&self) -> RepoResult<Vec<PostCommentCount>> {
        observe(
            "post_comment_counts",
            Instant::now(),
            self.posts().post_comment_counts(),
        )
    }

    /// Inserts a user, one post by that user and one comment on that post
    /// inside a single transaction.
    ///
    /// Either all three rows are committed or none are: any failure rolls
    /// the whole unit back before the error is returned.
    pub fn create_thread(
        &mut self,
        user: &NewUser,
        title: &str,
        content: &str,
        comment: &str,
    ) -> RepoResult<ThreadIds> {
        let started_at = Instant::now();
        let result = self.run_thread_transaction(user, title, content, comment);
        observe("thread_create", started_at, result)
    }

    /// Runs [`Self::create_thread`] with the fixed sample values.
    ///
    /// A second call fails on the unique username and leaves no partial rows.
    pub fn run_sample_transaction(&mut self) -> RepoResult<ThreadIds> {
        let user = NewUser::new(SAMPLE_USERNAME, SAMPLE_EMAIL);
        self.create_thread(&user, SAMPLE_POST_TITLE, SAMPLE_POST_CONTENT, SAMPLE_COMMENT)
    }

    /// Closes the connection, surfacing any close failure.
    pub fn close(self) -> DbResult<()> {
        match self.conn.close() {
            Ok(()) => {
                info!("event=db_close module=store status=ok");
                Ok(())
            }
            Err((_, err)) => {
                error!("event=db_close module=store status=error error={err}");
                Err(DbError::Sqlite(err))
            }
        }
    }

    fn run_thread_transaction(
        &mut self,
        user: &NewUser,
        title: &str,
        content: &str,
        comment: &str,
    ) -> RepoResult<ThreadIds> {
        let tx = self.conn.transaction()?;

        let written = (|| -> RepoResult<ThreadIds> {
            let user_id = SqliteUserRepository::new(&tx).insert_user(user)?;
            let post_id =
                SqlitePostRepository::new(&tx).insert_post(&NewPost::new(title, content, user_id))?;
            let comment_id = SqliteCommentRepository::new(&tx)
                .insert_comment(&NewComment::new(comment, user_id, post_id))?;
            Ok(ThreadIds {
                user_id,
                post_id,
                comment_id,
            })
        })();

        match written {
            Ok(ids) => {
                tx.commit()?;
                Ok(ids)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback() {
                    error!(
                        "event=thread_rollback module=store status=error error={rollback_err}"
                    );
                }
                Err(err)
            }
        }
    }

    fn users(&self) -> SqliteUserRepository<'_> {
        SqliteUserRepository::new(&self.conn)
    }

    fn posts(&self) -> SqlitePostRepository<'_> {
        SqlitePostRepository::new(&self.conn)
    }

    fn comments(&self) -> SqliteCommentRepository<'_> {
        SqliteCommentRepository::new(&self.conn)
    }
}

fn observe<T>(event: &'static str, started_at: Instant, result: RepoResult<T>) -> RepoResult<T> {
    let duration_ms = started_at.elapsed().as_millis();
    match &result {
        Ok(_) => debug!("event={event} module=store status=ok duration_ms={duration_ms}"),
        Err(err) if err.is_caller_error() => warn!(
            "event={event} module=store status=rejected duration_ms={duration_ms} error_code={} error={}",
            err.code(),
            err
        ),
        Err(err) => error!(
            "event={event} module=store status=error duration_ms={duration_ms} error_code={} error={}",
            err.code(),
            err
        ),
    }
    result
}
