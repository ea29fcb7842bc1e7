//! Alert: a safety or comfort warning raised by the rule engine.

use serde::{Deserialize, Serialize};

use crate::time::Timestamp;

/// Ranking tag of an alert. Ordered `Medium < High < Critical`.
///
/// Severity only ranks alerts; several severities may coexist in one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Medium => f.write_str("MEDIUM"),
            Self::High => f.write_str("HIGH"),
            Self::Critical => f.write_str("CRITICAL"),
        }
    }
}

/// What an alert is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertKind {
    EmergencyTempExtreme,
    EmergencyTempExtremeLow,
    TempVeryHigh,
    TempVeryLow,
    HumidityCritical,
    HumidityVeryLow,
    ActuatorConflict,
}

impl AlertKind {
    /// Severity attached to this kind of alert.
    #[must_use]
    pub fn severity(self) -> Severity {
        match self {
            Self::EmergencyTempExtreme | Self::EmergencyTempExtremeLow => Severity::Critical,
            Self::TempVeryHigh | Self::TempVeryLow => Severity::High,
            Self::HumidityCritical | Self::HumidityVeryLow | Self::ActuatorConflict => {
                Severity::Medium
            }
        }
    }

    /// Wire tag, e.g. `EMERGENCY_TEMP_EXTREME`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EmergencyTempExtreme => "EMERGENCY_TEMP_EXTREME",
            Self::EmergencyTempExtremeLow => "EMERGENCY_TEMP_EXTREME_LOW",
            Self::TempVeryHigh => "TEMP_VERY_HIGH",
            Self::TempVeryLow => "TEMP_VERY_LOW",
            Self::HumidityCritical => "HUMIDITY_CRITICAL",
            Self::HumidityVeryLow => "HUMIDITY_VERY_LOW",
            Self::ActuatorConflict => "ACTUATOR_CONFLICT",
        }
    }
}

impl std::fmt::Display for AlertKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A raised alert.
///
/// Serialises with the transport field names (`tipo`, `severidad`,
/// `mensaje`, `timestamp`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    #[serde(rename = "tipo")]
    pub kind: AlertKind,
    #[serde(rename = "severidad")]
    pub severity: Severity,
    #[serde(rename = "mensaje")]
    pub message: String,
    pub timestamp: Timestamp,
}

impl Alert {
    /// Build an alert whose severity is derived from its kind.
    #[must_use]
    pub fn new(kind: AlertKind, message: impl Into<String>, timestamp: Timestamp) -> Self {
        Self {
            kind,
            severity: kind.severity(),
            message: message.into(),
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_order_severities_critical_first() {
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::High > Severity::Medium);
        let mut all = vec![Severity::Medium, Severity::Critical, Severity::High];
        all.sort_unstable_by(|a, b| b.cmp(a));
        assert_eq!(all, vec![Severity::Critical, Severity::High, Severity::Medium]);
    }

    #[test]
    fn should_derive_severity_from_kind() {
        assert_eq!(
            AlertKind::EmergencyTempExtremeLow.severity(),
            Severity::Critical
        );
        assert_eq!(AlertKind::TempVeryLow.severity(), Severity::High);
        assert_eq!(AlertKind::ActuatorConflict.severity(), Severity::Medium);
    }

    #[test]
    fn should_serialize_with_transport_field_names() {
        let ts = crate::time::now();
        let alert = Alert::new(AlertKind::HumidityCritical, "Humidity too high: 90%", ts);
        let json = serde_json::to_value(&alert).unwrap();
        assert_eq!(json["tipo"], "HUMIDITY_CRITICAL");
        assert_eq!(json["severidad"], "MEDIUM");
        assert_eq!(json["mensaje"], "Humidity too high: 90%");
        assert!(json["timestamp"].is_string());
    }

    #[test]
    fn should_match_serde_tag_and_display() {
        let kind = AlertKind::EmergencyTempExtremeLow;
        let json = serde_json::to_string(&kind).unwrap();
        assert_eq!(json, format!("\"{kind}\""));
    }
}
