//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define per-table data access contracts.
//! - Isolate SQLite query details from the `RecordStore` facade.
//!
//! # Invariants
//! - Repositories borrow a connection; they never own or open one.
//! - Constraint failures surface as semantic errors (`UniqueViolation`,
//!   `ForeignKeyViolation`), not raw SQLite errors.

pub mod comment_repo;
pub mod error;
pub mod post_repo;
pub mod user_repo;
