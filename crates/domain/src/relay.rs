//! Relays and the actuators wired to them.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

/// Number of a relay channel on the controller board (`relay1`, `relay2`, …).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RelayId(u8);

impl RelayId {
    /// Wrap a relay number. Relay numbering starts at 1.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidRelayId`] for relay `0`.
    pub fn new(number: u8) -> Result<Self, ValidationError> {
        if number == 0 {
            return Err(ValidationError::InvalidRelayId(number.to_string()));
        }
        Ok(Self(number))
    }

    #[must_use]
    pub fn number(self) -> u8 {
        self.0
    }
}

impl fmt::Display for RelayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "relay{}", self.0)
    }
}

impl FromStr for RelayId {
    type Err = ValidationError;

    /// Accepts `relay1`, `r1` and `1`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("relay")
            .or_else(|| trimmed.strip_prefix('r'))
            .unwrap_or(trimmed);
        digits
            .parse::<u8>()
            .ok()
            .filter(|n| *n > 0)
            .map(Self)
            .ok_or_else(|| ValidationError::InvalidRelayId(s.to_string()))
    }
}

impl Serialize for RelayId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RelayId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// A climate actuator driven by one relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Actuator {
    Fan,
    Heater,
    Humidifier,
}

impl Actuator {
    /// Every actuator, in relay order.
    pub const ALL: [Self; 3] = [Self::Fan, Self::Heater, Self::Humidifier];

    /// The relay channel this actuator is wired to.
    #[must_use]
    pub fn relay(self) -> RelayId {
        match self {
            Self::Fan => RelayId(1),
            Self::Heater => RelayId(2),
            Self::Humidifier => RelayId(3),
        }
    }
}

impl fmt::Display for Actuator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fan => f.write_str("fan"),
            Self::Heater => f.write_str("heater"),
            Self::Humidifier => f.write_str("humidifier"),
        }
    }
}

/// Last reported state of one relay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayState {
    /// Whether the relay is energised.
    #[serde(rename = "state")]
    pub on: bool,
    /// Seconds the relay has been active.
    #[serde(rename = "time", default)]
    pub active_seconds: u64,
}

impl RelayState {
    #[must_use]
    pub fn new(on: bool, active_seconds: u64) -> Self {
        Self { on, active_seconds }
    }
}

/// Relay states keyed by relay, as reported by the board.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelayStatuses(BTreeMap<RelayId, RelayState>);

impl RelayStatuses {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, relay: RelayId, state: RelayState) -> Self {
        self.0.insert(relay, state);
        self
    }

    pub fn insert(&mut self, relay: RelayId, state: RelayState) {
        self.0.insert(relay, state);
    }

    #[must_use]
    pub fn get(&self, relay: RelayId) -> Option<&RelayState> {
        self.0.get(&relay)
    }

    /// State of the relay an actuator is wired to.
    #[must_use]
    pub fn actuator(&self, actuator: Actuator) -> Option<&RelayState> {
        self.get(actuator.relay())
    }

    /// Overwrite entries with those reported in `update`; others are kept.
    pub fn merge(&mut self, update: RelayStatuses) {
        self.0.extend(update.0);
    }

    pub fn iter(&self) -> impl Iterator<Item = (RelayId, &RelayState)> {
        self.0.iter().map(|(id, state)| (*id, state))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(RelayId, RelayState)> for RelayStatuses {
    fn from_iter<T: IntoIterator<Item = (RelayId, RelayState)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_every_relay_spelling() {
        let expected = RelayId::new(2).unwrap();
        assert_eq!("relay2".parse::<RelayId>().unwrap(), expected);
        assert_eq!("r2".parse::<RelayId>().unwrap(), expected);
        assert_eq!("2".parse::<RelayId>().unwrap(), expected);
    }

    #[test]
    fn should_reject_relay_zero_and_garbage() {
        assert!("relay0".parse::<RelayId>().is_err());
        assert!("fan".parse::<RelayId>().is_err());
        assert!(RelayId::new(0).is_err());
    }

    #[test]
    fn should_display_relay_with_prefix() {
        assert_eq!(Actuator::Humidifier.relay().to_string(), "relay3");
    }

    #[test]
    fn should_wire_actuators_to_first_three_relays() {
        let numbers: Vec<u8> = Actuator::ALL.iter().map(|a| a.relay().number()).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn should_deserialize_board_status_payload() {
        let json = serde_json::json!({
            "relay1": {"state": true, "time": 120},
            "r2": {"state": false},
        });
        let statuses: RelayStatuses = serde_json::from_value(json).unwrap();
        assert_eq!(
            statuses.actuator(Actuator::Fan),
            Some(&RelayState::new(true, 120))
        );
        assert_eq!(
            statuses.actuator(Actuator::Heater),
            Some(&RelayState::new(false, 0))
        );
        assert!(statuses.actuator(Actuator::Humidifier).is_none());
    }

    #[test]
    fn should_merge_updates_over_previous_states() {
        let fan = Actuator::Fan.relay();
        let heater = Actuator::Heater.relay();
        let mut statuses = RelayStatuses::new()
            .with(fan, RelayState::new(true, 10))
            .with(heater, RelayState::new(true, 5));
        statuses.merge(RelayStatuses::new().with(heater, RelayState::new(false, 5)));
        assert!(statuses.get(fan).unwrap().on);
        assert!(!statuses.get(heater).unwrap().on);
    }
}
