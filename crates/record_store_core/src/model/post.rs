//! Post rows, inputs and joined read models.

use super::comment::AuthoredComment;
use super::user::UserId;
use super::validation::{require_text, ValidationError};
use serde::{Deserialize, Serialize};

/// Store-generated post identifier.
pub type PostId = i64;

/// Persisted post row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub content: String,
    pub user_id: UserId,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

/// Input for inserting one post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub user_id: UserId,
}

impl NewPost {
    pub fn new(title: impl Into<String>, content: impl Into<String>, user_id: UserId) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            user_id,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("title", &self.title)?;
        require_text("content", &self.content)
    }
}

/// Post joined with its author's username.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthoredPost {
    #[serde(flatten)]
    pub post: Post,
    pub username: String,
}

/// Post detail: author plus all comments, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostWithComments {
    #[serde(flatten)]
    pub post: Post,
    pub username: String,
    pub comments: Vec<AuthoredComment>,
}

/// Aggregate row: one post with its author and number of comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostCommentCount {
    pub id: PostId,
    pub title: String,
    pub author: String,
    pub comment_count: i64,
    pub created_at: i64,
}
