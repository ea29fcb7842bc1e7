//! # clima-domain
//!
//! Pure domain model for the clima climate controller.
//!
//! ## Responsibilities
//! - Foundational types: error conventions, timestamps
//! - Define **Readings** and **Relays** (sensor samples, actuator wiring, relay states)
//! - Define **Facts** and the per-cycle **Fact Store**
//! - Define the **Rule** catalogue with its **Alerts** and **Actions**
//! - Provide **Fuzzy** inference primitives (membership, variables, rules, centroid)
//! - Define **Commands**, **Decisions** and the payloads published from them
//! - Contain all invariant enforcement and domain logic
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod time;

pub mod action;
pub mod alert;
pub mod command;
pub mod decision;
pub mod decision_history;
pub mod fact;
pub mod fuzzy;
pub mod message;
pub mod reading;
pub mod relay;
pub mod rule;
