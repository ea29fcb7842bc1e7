//! # clima-adapter-mqtt
//!
//! MQTT adapter: bridges the controller board and clima.
//!
//! ## Responsibilities
//! - Connect to an MQTT broker (optionally with credentials and TLS)
//! - Subscribe to the sensor, config, relay status and control topics
//! - Translate MQTT payloads into [`Inbound`](clima_domain::message::Inbound) messages
//! - Publish analysis, alerts, relay commands and fuzzy state back to MQTT topics
//!
//! ## Dependency rule
//! Same as other adapters: depends on `clima-app` and `clima-domain`.

pub mod bridge;
pub mod config;
pub mod error;
pub mod payload;
pub mod publisher;
pub mod topics;

pub use bridge::MqttBridge;
pub use config::MqttConfig;
pub use publisher::MqttPublisher;
