//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `clima.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use clima_adapter_mqtt::MqttConfig;
use clima_adapter_storage_sqlite_sqlx::pool::DEFAULT_MAX_CONNECTIONS;
use clima_domain::command::DEFAULT_ACTIVATION_THRESHOLD;
use clima_domain::reading::DEFAULT_SETPOINT;
use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Database settings.
    pub database: DatabaseConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Broker connection settings.
    pub mqtt: MqttConfig,
    /// Decision core tuning.
    pub control: ControlConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// `SQLite` database configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `SQLite` connection URL or file path.
    pub url: String,
    /// Size of the connection pool.
    pub max_connections: u32,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Decision core settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    /// Power a fuzzy output must exceed to switch its relay ON.
    pub threshold: f64,
    /// Setpoint used until the controller board sends one.
    pub setpoint: f64,
    /// Maximum number of cascade passes of the rule engine.
    pub cascade_limit: usize,
    /// Whether the fuzzy controller drives the relays at start-up.
    pub fuzzy_active: bool,
}

impl Config {
    /// Load configuration from `clima.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("clima.toml")?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("CLIMA_HOST") {
            self.server.host = val;
        }
        if let Some(port) = var("CLIMA_PORT").and_then(|val| val.parse().ok()) {
            self.server.port = port;
        }
        if let Some(val) = var("CLIMA_DATABASE_URL") {
            self.database.url = val;
        }
        if let Some(val) = var("CLIMA_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("CLIMA_MQTT_HOST") {
            self.mqtt.broker_host = val;
        }
        if let Some(port) = var("CLIMA_MQTT_PORT").and_then(|val| val.parse().ok()) {
            self.mqtt.broker_port = port;
        }
        if let Some(val) = var("CLIMA_MQTT_USER") {
            self.mqtt.username = Some(val);
        }
        if let Some(val) = var("CLIMA_MQTT_PASS") {
            self.mqtt.password = Some(val);
        }
        if let Some(tls) = var("CLIMA_MQTT_TLS").and_then(|val| parse_flag(&val)) {
            self.mqtt.tls = tls;
        }
        if let Some(threshold) = var("CLIMA_THRESHOLD").and_then(|val| val.parse().ok()) {
            self.control.threshold = threshold;
        }
        if let Some(setpoint) = var("CLIMA_SETPOINT").and_then(|val| val.parse().ok()) {
            self.control.setpoint = setpoint;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.mqtt.broker_port == 0 {
            return Err(ConfigError::Validation(
                "mqtt broker port must be non-zero".to_string(),
            ));
        }
        if !(0.0..=100.0).contains(&self.control.threshold) {
            return Err(ConfigError::Validation(format!(
                "threshold must be within [0, 100], got {}",
                self.control.threshold
            )));
        }
        if !self.control.setpoint.is_finite() {
            return Err(ConfigError::Validation(
                "setpoint must be a finite number".to_string(),
            ));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Validation(
                "database pool needs at least one connection".to_string(),
            ));
        }
        if self.control.cascade_limit == 0 {
            return Err(ConfigError::Validation(
                "cascade limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Return the database URL in `sqlx`-compatible format.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database.url
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:clima.db?mode=rwc".to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "climated=info,clima=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_ACTIVATION_THRESHOLD,
            setpoint: DEFAULT_SETPOINT,
            cascade_limit: clima_app::rule_engine::DEFAULT_CASCADE_LIMIT,
            fuzzy_active: true,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.url, "sqlite:clima.db?mode=rwc");
        assert_eq!(config.database.max_connections, 4);
        assert_eq!(config.mqtt.base_topic, "esp32");
        assert!((config.control.threshold - 30.0).abs() < f64::EPSILON);
        assert!((config.control.setpoint - 24.0).abs() < f64::EPSILON);
        assert_eq!(config.control.cascade_limit, 10);
        assert!(config.control.fuzzy_active);
    }

    #[test]
    fn should_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = "
            [server]
            host = '127.0.0.1'
            port = 9090

            [database]
            url = 'sqlite:test.db'
            max_connections = 8

            [logging]
            filter = 'debug'

            [mqtt]
            broker_host = 'broker.local'
            broker_port = 8883
            tls = true
            username = 'esp'

            [control]
            threshold = 45.0
            setpoint = 21.5
            cascade_limit = 3
            fuzzy_active = false
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.database.url, "sqlite:test.db");
        assert_eq!(config.database.max_connections, 8);
        assert_eq!(config.logging.filter, "debug");
        assert_eq!(config.mqtt.broker_host, "broker.local");
        assert_eq!(config.mqtt.broker_port, 8883);
        assert!(config.mqtt.tls);
        assert_eq!(config.mqtt.username.as_deref(), Some("esp"));
        assert!((config.control.threshold - 45.0).abs() < f64::EPSILON);
        assert!((config.control.setpoint - 21.5).abs() < f64::EPSILON);
        assert_eq!(config.control.cascade_limit, 3);
        assert!(!config.control.fuzzy_active);
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn should_apply_env_overrides() {
        let mut config = Config::default();
        config.apply_env_overrides(env(&[
            ("CLIMA_HOST", "127.0.0.1"),
            ("CLIMA_PORT", "9000"),
            ("CLIMA_MQTT_HOST", "mqtt.example.org"),
            ("CLIMA_MQTT_PORT", "8883"),
            ("CLIMA_MQTT_USER", "board"),
            ("CLIMA_MQTT_PASS", "secret"),
            ("CLIMA_MQTT_TLS", "true"),
            ("CLIMA_THRESHOLD", "50"),
            ("CLIMA_SETPOINT", "22"),
        ]));
        assert_eq!(config.bind_addr(), "127.0.0.1:9000");
        assert_eq!(config.mqtt.broker_host, "mqtt.example.org");
        assert_eq!(config.mqtt.broker_port, 8883);
        assert_eq!(config.mqtt.username.as_deref(), Some("board"));
        assert_eq!(config.mqtt.password.as_deref(), Some("secret"));
        assert!(config.mqtt.tls);
        assert!((config.control.threshold - 50.0).abs() < f64::EPSILON);
        assert!((config.control.setpoint - 22.0).abs() < f64::EPSILON);
    }

    #[test]
    fn should_prefer_rust_log_over_clima_log() {
        let mut config = Config::default();
        config.apply_env_overrides(env(&[("CLIMA_LOG", "info"), ("RUST_LOG", "trace")]));
        assert_eq!(config.logging.filter, "trace");
    }

    #[test]
    fn should_ignore_unparsable_env_values() {
        let mut config = Config::default();
        config.apply_env_overrides(env(&[("CLIMA_PORT", "http"), ("CLIMA_MQTT_TLS", "maybe")]));
        assert_eq!(config.server.port, 8080);
        assert!(!config.mqtt.tls);
    }

    #[test]
    fn should_reject_zero_port() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_threshold_outside_percentage() {
        let mut config = Config::default();
        config.control.threshold = 120.0;
        assert!(config.validate().is_err());
        config.control.threshold = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_empty_connection_pool() {
        let mut config = Config::default();
        config.database.max_connections = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_zero_cascade_limit() {
        let mut config = Config::default();
        config.control.cascade_limit = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_accept_defaults() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn should_format_bind_addr() {
        let config = Config::default();
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn should_return_database_url() {
        let config = Config::default();
        assert_eq!(config.database_url(), "sqlite:clima.db?mode=rwc");
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("invalid {{{");
        assert!(result.is_err());
    }
}
