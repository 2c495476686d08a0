//! Record store: a small SQLite data-access layer over users, posts and
//! comments with cascading foreign keys.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod store;

pub use config::{ConfigError, StoreConfig};
pub use db::{DbError, DbResult};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::comment::{AuthoredComment, Comment, CommentId, NewComment};
pub use model::post::{AuthoredPost, NewPost, Post, PostCommentCount, PostId, PostWithComments};
pub use model::user::{NewUser, User, UserId, UserPostCount, UserUpdate};
pub use model::validation::ValidationError;
pub use repo::comment_repo::{CommentRepository, SqliteCommentRepository};
pub use repo::error::{RepoError, RepoResult};
pub use repo::post_repo::{PostRepository, SqlitePostRepository};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use store::{RecordStore, ThreadIds};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
