//! Payload codecs between MQTT messages and domain messages.

use std::collections::BTreeMap;

use clima_domain::message::{Inbound, Outbound};
use clima_domain::relay::{RelayId, RelayState, RelayStatuses};
use serde::Deserialize;

use crate::error::MqttError;
use crate::topics::{InboundTopic, Topics};

#[derive(Debug, Deserialize)]
struct SensorsPayload {
    #[serde(default, alias = "temp")]
    temperature: Option<f64>,
    #[serde(default, alias = "hum")]
    humidity: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ConfigPayload {
    #[serde(default)]
    setpoint: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct FuzzyControlPayload {
    #[serde(default, alias = "active")]
    activo: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct RelayStatusPayload {
    #[serde(default)]
    state: bool,
    #[serde(default)]
    time: serde_json::Value,
}

/// Decode a message received on `topic`.
///
/// Returns `Ok(None)` for well-formed payloads that carry nothing to apply
/// (for example a control message without `activo`).
///
/// # Errors
///
/// Returns [`MqttError::PayloadParse`] when the payload is not the expected
/// JSON object.
pub fn decode(topic: InboundTopic, payload: &[u8]) -> Result<Option<Inbound>, MqttError> {
    match topic {
        InboundTopic::Sensors => {
            let data: SensorsPayload = parse(payload)?;
            Ok(Some(Inbound::Sensors {
                temperature: data.temperature,
                humidity: data.humidity,
            }))
        }
        InboundTopic::Config => {
            let data: ConfigPayload = parse(payload)?;
            Ok(data.setpoint.map(|setpoint| Inbound::Config {
                setpoint: Some(setpoint),
            }))
        }
        InboundTopic::RelayStatus => {
            let data: BTreeMap<String, serde_json::Value> = parse(payload)?;
            let relays: RelayStatuses = data
                .into_iter()
                .filter_map(|(key, value)| relay_entry(&key, value))
                .collect();
            Ok((!relays.is_empty()).then_some(Inbound::RelayStatus(relays)))
        }
        InboundTopic::FuzzyControl => {
            let data: FuzzyControlPayload = parse(payload)?;
            Ok(data.activo.map(|active| Inbound::FuzzyControl { active }))
        }
    }
}

/// Keys that are not relay ids and values that are not objects are skipped.
fn relay_entry(key: &str, value: serde_json::Value) -> Option<(RelayId, RelayState)> {
    let relay: RelayId = match key.parse() {
        Ok(relay) => relay,
        Err(err) => {
            tracing::debug!(error = %err, key, "ignoring relay status entry");
            return None;
        }
    };
    let status: RelayStatusPayload = match serde_json::from_value(value) {
        Ok(status) => status,
        Err(err) => {
            tracing::debug!(error = %err, key, "ignoring relay status entry");
            return None;
        }
    };
    Some((relay, RelayState::new(status.state, on_seconds(key, &status.time))))
}

/// Fractional times are truncated, negative or non-numeric ones read as zero.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn on_seconds(key: &str, time: &serde_json::Value) -> u64 {
    if time.is_null() {
        return 0;
    }
    if let Some(seconds) = time.as_u64() {
        return seconds;
    }
    match time.as_f64() {
        Some(seconds) if seconds.is_finite() => {
            if seconds < 0.0 {
                tracing::debug!(key, seconds, "negative relay on-time read as zero");
            }
            seconds.max(0.0) as u64
        }
        _ => {
            tracing::debug!(key, %time, "relay on-time is not a number");
            0
        }
    }
}

fn parse<T: serde::de::DeserializeOwned>(payload: &[u8]) -> Result<T, MqttError> {
    serde_json::from_slice(payload).map_err(MqttError::PayloadParse)
}

/// Encode an outbound message into its topic and payload bytes.
///
/// Relay commands are sent as plain `ON` / `OFF` text, everything else as
/// JSON.
///
/// # Errors
///
/// Returns [`MqttError::PayloadEncode`] if serialisation fails.
pub fn encode(topics: &Topics, message: &Outbound) -> Result<(String, Vec<u8>), MqttError> {
    let encoded = match message {
        Outbound::Analysis(analysis) => (topics.analysis(), to_json(analysis)?),
        Outbound::Alerts(alerts) => (topics.alerts(), to_json(alerts)?),
        Outbound::RelayCommand { relay, command } => (
            topics.relay_command(*relay),
            command.as_str().as_bytes().to_vec(),
        ),
        Outbound::FuzzyState(state) => (topics.fuzzy_state(), to_json(state)?),
    };
    Ok(encoded)
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<Vec<u8>, MqttError> {
    serde_json::to_vec(value).map_err(MqttError::PayloadEncode)
}
