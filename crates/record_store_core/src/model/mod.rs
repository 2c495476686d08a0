//! Row and input models for the users/posts/comments schema.
//!
//! # Responsibility
//! - Define typed rows returned by repository reads.
//! - Define insert/update inputs and their validation rules.
//!
//! # Invariants
//! - Ids are store-generated `INTEGER PRIMARY KEY` values, never reused.
//! - `created_at` is Unix epoch milliseconds assigned by the store.

pub mod comment;
pub mod post;
pub mod user;
pub mod validation;
