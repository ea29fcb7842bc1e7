//! # clima-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve liveness endpoints (`/`, `/health`) for uptime monitors
//! - Serve a JSON `/status` document naming the service and its version
//! - Serve the recorded fuzzy decision history under `/api/decisions`
//! - Map application results into HTTP responses
//!
//! ## Dependency rule
//! Depends on `clima-app` (for port traits) and `clima-domain` (for domain
//! types used in response mapping). Never leaks axum types into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
