//! # clima-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the `DecisionHistory` port defined in `clima-app::ports::history`
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between domain types and database rows
//!
//! ## Dependency rule
//! Depends on `clima-app` (for port traits) and `clima-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

pub mod decision_history_repo;
pub mod error;
pub mod pool;

pub use decision_history_repo::SqliteDecisionHistory;
pub use pool::{Config, Database};
