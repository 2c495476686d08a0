//! User rows and inputs.
//!
//! # Invariants
//! - `username` and `email` are each unique across all users.
//! - Removing a user cascades to the user's posts and comments.

use super::validation::{require_text, ValidationError};
use serde::{Deserialize, Serialize};

/// Store-generated user identifier.
pub type UserId = i64;

/// Persisted user row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

/// Input for inserting one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
}

impl NewUser {
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
        }
    }

    /// Rejects blank `username` or `email`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("username", &self.username)?;
        require_text("email", &self.email)
    }
}

/// Partial update for one user. `None` leaves the column untouched.
///
/// Blank strings are treated as "not supplied", so an update carrying only
/// blank values changes nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
}

impl UserUpdate {
    pub fn username(mut self, value: impl Into<String>) -> Self {
        self.username = Some(value.into());
        self
    }

    pub fn email(mut self, value: impl Into<String>) -> Self {
        self.email = Some(value.into());
        self
    }

    /// Returns `(column, value)` pairs for every supplied, non-blank field.
    pub fn assignments(&self) -> Vec<(&'static str, &str)> {
        [("username", &self.username), ("email", &self.email)]
            .into_iter()
            .filter_map(|(column, value)| {
                value
                    .as_deref()
                    .filter(|text| !text.trim().is_empty())
                    .map(|text| (column, text))
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments().is_empty()
    }
}

/// Aggregate row: one user with the number of posts they own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPostCount {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub post_count: i64,
}

#[cfg(test)]
mod tests {
    use super::{NewUser, UserUpdate};

    #[test]
    fn update_skips_missing_and_blank_fields() {
        let update = UserUpdate::default().username("  ").email("new@example.com");
        assert_eq!(update.assignments(), vec![("email", "new@example.com")]);
        assert!(UserUpdate::default().username("").is_empty());
    }

    #[test]
    fn new_user_rejects_blank_email() {
        let err = NewUser::new("john_doe", "").validate().unwrap_err();
        assert_eq!(err.to_string(), "`email` must not be blank");
    }
}
