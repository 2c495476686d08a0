//! Comment rows and inputs.

use super::post::PostId;
use super::user::UserId;
use super::validation::{require_text, ValidationError};
use serde::{Deserialize, Serialize};

/// Store-generated comment identifier.
pub type CommentId = i64;

/// Persisted comment row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub content: String,
    pub user_id: UserId,
    pub post_id: PostId,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewComment {
    pub content: String,
    pub user_id: UserId,
    pub post_id: PostId,
}

impl NewComment {
    pub fn new(content: impl Into<String>, user_id: UserId, post_id: PostId) -> Self {
        Self {
            content: content.into(),
            user_id,
            post_id,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("content", &self.content)
    }
}

/// Comment joined with its author's username.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthoredComment {
    #[serde(flatten)]
    pub comment: Comment,
    pub username: String,
}
