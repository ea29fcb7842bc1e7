//! Topic layout shared with the controller board.

use clima_domain::relay::RelayId;

/// Inbound topic kinds the bridge subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboundTopic {
    Sensors,
    Config,
    RelayStatus,
    FuzzyControl,
}

/// Topic names derived from a base prefix (`esp32` by default).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topics {
    base: String,
}

impl Topics {
    #[must_use]
    pub fn new(base: impl Into<String>) -> Self {
        let base: String = base.into();
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    fn join(&self, suffix: &str) -> String {
        format!("{}/{suffix}", self.base)
    }

    #[must_use]
    pub fn sensors(&self) -> String {
        self.join("sensores")
    }

    #[must_use]
    pub fn config(&self) -> String {
        self.join("config")
    }

    #[must_use]
    pub fn relay_status(&self) -> String {
        self.join("relay/status")
    }

    #[must_use]
    pub fn fuzzy_control(&self) -> String {
        self.join("fuzzy/control")
    }

    #[must_use]
    pub fn analysis(&self) -> String {
        self.join("experto/analisis")
    }

    #[must_use]
    pub fn alerts(&self) -> String {
        self.join("experto/alertas")
    }

    /// `<base>/relay/<N>/cmd`.
    #[must_use]
    pub fn relay_command(&self, relay: RelayId) -> String {
        self.join(&format!("relay/{}/cmd", relay.number()))
    }

    #[must_use]
    pub fn fuzzy_state(&self) -> String {
        self.join("fuzzy/estado")
    }

    /// Every topic the bridge subscribes to.
    #[must_use]
    pub fn subscriptions(&self) -> [String; 4] {
        [
            self.sensors(),
            self.config(),
            self.relay_status(),
            self.fuzzy_control(),
        ]
    }

    /// Map an incoming topic to its kind.
    #[must_use]
    pub fn classify(&self, topic: &str) -> Option<InboundTopic> {
        let suffix = topic.strip_prefix(self.base.as_str())?.strip_prefix('/')?;
        match suffix {
            "sensores" => Some(InboundTopic::Sensors),
            "config" => Some(InboundTopic::Config),
            "relay/status" => Some(InboundTopic::RelayStatus),
            "fuzzy/control" => Some(InboundTopic::FuzzyControl),
            _ => None,
        }
    }
}

impl Default for Topics {
    fn default() -> Self {
        Self::new("esp32")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_build_board_topics() {
        let topics = Topics::default();
        assert_eq!(topics.sensors(), "esp32/sensores");
        assert_eq!(topics.analysis(), "esp32/experto/analisis");
        assert_eq!(topics.alerts(), "esp32/experto/alertas");
        assert_eq!(topics.fuzzy_state(), "esp32/fuzzy/estado");
        assert_eq!(
            topics.relay_command(RelayId::new(2).unwrap()),
            "esp32/relay/2/cmd"
        );
    }

    #[test]
    fn should_classify_inbound_topics() {
        let topics = Topics::new("esp32/");
        assert_eq!(topics.classify("esp32/sensores"), Some(InboundTopic::Sensors));
        assert_eq!(
            topics.classify("esp32/relay/status"),
            Some(InboundTopic::RelayStatus)
        );
        assert_eq!(
            topics.classify("esp32/fuzzy/control"),
            Some(InboundTopic::FuzzyControl)
        );
        assert_eq!(topics.classify("esp32/fuzzy/estado"), None);
        assert_eq!(topics.classify("esp32sensores"), None);
        assert_eq!(topics.classify("other/sensores"), None);
    }

    #[test]
    fn should_subscribe_to_every_inbound_topic() {
        let topics = Topics::default();
        for topic in topics.subscriptions() {
            assert!(topics.classify(&topic).is_some(), "{topic}");
        }
    }
}
