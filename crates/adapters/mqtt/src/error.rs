//! MQTT adapter error types.

use clima_domain::error::ClimateError;

/// Errors specific to the MQTT adapter.
#[derive(Debug, thiserror::Error)]
pub enum MqttError {
    /// The rumqttc client returned an error.
    #[error("MQTT client error")]
    Client(#[source] rumqttc::ClientError),

    /// The connection to the broker failed.
    #[error("MQTT connection error")]
    Connection(#[source] rumqttc::ConnectionError),

    /// Failed to parse an incoming MQTT payload as JSON.
    #[error("failed to parse MQTT payload")]
    PayloadParse(#[source] serde_json::Error),

    /// Failed to encode an outgoing payload.
    #[error("failed to encode MQTT payload")]
    PayloadEncode(#[source] serde_json::Error),

    /// A message arrived on a topic the bridge does not handle.
    #[error("unexpected topic {0}")]
    UnknownTopic(String),
}

impl From<MqttError> for ClimateError {
    fn from(err: MqttError) -> Self {
        ClimateError::Transport(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_display_unknown_topic_error() {
        let err = MqttError::UnknownTopic("esp32/other".to_string());
        assert_eq!(err.to_string(), "unexpected topic esp32/other");
    }

    #[test]
    fn should_convert_into_transport_error() {
        let err: ClimateError = MqttError::UnknownTopic("x".to_string()).into();
        assert!(matches!(err, ClimateError::Transport(_)));
    }

    #[test]
    fn should_display_payload_parse_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{{bad").unwrap_err();
        let err = MqttError::PayloadParse(json_err);
        assert_eq!(err.to_string(), "failed to parse MQTT payload");
    }
}
