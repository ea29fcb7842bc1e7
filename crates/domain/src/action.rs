//! Action: an advisory actuator operation recommended by the rule engine.
//!
//! Actions never mutate relay state; a downstream driver applies them.

use serde::{Deserialize, Serialize};

use crate::time::Timestamp;

/// Recommended operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionKind {
    FanMaxUrgent,
    HeaterOffImmediate,
    NotifyUrgent,
    HeaterMaxUrgent,
    FanOffImmediate,
    IncreaseFan,
    ReduceHeater,
    IncreaseHeater,
    ReduceFan,
    HumidifierOff,
    FanForDrying,
    HumidifierOn,
    EnergySavingMode,
    ReduceActuatorPower,
    EnergySavingActivated,
    ResolveConflict,
    HeaterOff,
    KeepFan,
    FanOff,
    KeepHeater,
}

impl ActionKind {
    /// Wire tag, e.g. `FAN_MAX_URGENT`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FanMaxUrgent => "FAN_MAX_URGENT",
            Self::HeaterOffImmediate => "HEATER_OFF_IMMEDIATE",
            Self::NotifyUrgent => "NOTIFY_URGENT",
            Self::HeaterMaxUrgent => "HEATER_MAX_URGENT",
            Self::FanOffImmediate => "FAN_OFF_IMMEDIATE",
            Self::IncreaseFan => "INCREASE_FAN",
            Self::ReduceHeater => "REDUCE_HEATER",
            Self::IncreaseHeater => "INCREASE_HEATER",
            Self::ReduceFan => "REDUCE_FAN",
            Self::HumidifierOff => "HUMIDIFIER_OFF",
            Self::FanForDrying => "FAN_FOR_DRYING",
            Self::HumidifierOn => "HUMIDIFIER_ON",
            Self::EnergySavingMode => "ENERGY_SAVING_MODE",
            Self::ReduceActuatorPower => "REDUCE_ACTUATOR_POWER",
            Self::EnergySavingActivated => "ENERGY_SAVING_ACTIVATED",
            Self::ResolveConflict => "RESOLVE_CONFLICT",
            Self::HeaterOff => "HEATER_OFF",
            Self::KeepFan => "KEEP_FAN",
            Self::FanOff => "FAN_OFF",
            Self::KeepHeater => "KEEP_HEATER",
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recommended action, stamped with the cycle time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "tipo")]
    pub kind: ActionKind,
    pub timestamp: Timestamp,
}

impl Action {
    #[must_use]
    pub fn new(kind: ActionKind, timestamp: Timestamp) -> Self {
        Self { kind, timestamp }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_serialize_action_with_tipo_field() {
        let action = Action::new(ActionKind::FanForDrying, crate::time::now());
        let json = serde_json::to_value(action).unwrap();
        assert_eq!(json["tipo"], "FAN_FOR_DRYING");
        assert!(json["timestamp"].is_string());
    }

    #[test]
    fn should_keep_serde_tag_in_sync_with_display() {
        for kind in [
            ActionKind::HeaterOffImmediate,
            ActionKind::EnergySavingActivated,
            ActionKind::KeepHeater,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{kind}\""));
        }
    }
}
