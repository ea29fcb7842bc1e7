//! MQTT connection configuration.

use serde::Deserialize;

/// Configuration for the broker connection.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MqttConfig {
    /// MQTT broker hostname or IP address.
    pub broker_host: String,
    /// MQTT broker port.
    pub broker_port: u16,
    /// MQTT client identifier.
    pub client_id: String,
    /// Topic prefix shared with the controller board.
    pub base_topic: String,
    /// Keep-alive interval in seconds.
    pub keep_alive_secs: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Connect over TLS with the platform root certificates.
    pub tls: bool,
    /// Delay before polling again after a connection error, in seconds.
    pub reconnect_delay_secs: u16,
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            broker_host: "localhost".to_string(),
            broker_port: 1883,
            client_id: "clima".to_string(),
            base_topic: "esp32".to_string(),
            keep_alive_secs: 30,
            username: None,
            password: None,
            tls: false,
            reconnect_delay_secs: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_have_sensible_defaults() {
        let config = MqttConfig::default();
        assert_eq!(config.broker_host, "localhost");
        assert_eq!(config.broker_port, 1883);
        assert_eq!(config.client_id, "clima");
        assert_eq!(config.base_topic, "esp32");
        assert_eq!(config.keep_alive_secs, 30);
        assert!(config.username.is_none());
        assert!(!config.tls);
    }

    #[test]
    fn should_deserialize_from_toml() {
        let toml = r#"
            broker_host = "broker.hivemq.cloud"
            broker_port = 8883
            client_id = "greenhouse"
            base_topic = "board"
            keep_alive_secs = 60
            username = "esp32"
            password = "secret"
            tls = true
        "#;
        let config: MqttConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.broker_host, "broker.hivemq.cloud");
        assert_eq!(config.broker_port, 8883);
        assert_eq!(config.client_id, "greenhouse");
        assert_eq!(config.base_topic, "board");
        assert_eq!(config.username.as_deref(), Some("esp32"));
        assert_eq!(config.password.as_deref(), Some("secret"));
        assert!(config.tls);
    }

    #[test]
    fn should_use_defaults_for_missing_fields() {
        let toml = r#"broker_host = "192.168.1.100""#;
        let config: MqttConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.broker_host, "192.168.1.100");
        assert_eq!(config.broker_port, 1883);
        assert_eq!(config.reconnect_delay_secs, 5);
    }
}
