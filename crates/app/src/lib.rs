//! # clima-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `DecisionPublisher`: deliver analysis, alerts, relay commands and fuzzy state
//!   - `DecisionHistory`: append & query fuzzy decision records
//! - Provide the two inference engines:
//!   - `RuleEngine`: bounded two-phase evaluation of the rule catalogue
//!   - `FuzzyEngine`: the fixed climate knowledge base
//! - Define the **driving/inbound** use-case `DecisionService`, which owns the
//!   controller state and runs one decision cycle per sensor sample
//! - Orchestrate domain objects without knowing *how* persistence or IO works
//!
//! ## Dependency rule
//! Depends on `clima-domain` only (plus `tokio::sync` for the state lock).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod decision_service;
pub mod fuzzy_engine;
pub mod ports;
pub mod rule_engine;
