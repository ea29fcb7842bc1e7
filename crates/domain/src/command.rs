//! Binary actuator commands derived from fuzzy power levels.

use serde::{Deserialize, Serialize};

use crate::relay::{Actuator, RelayId};

/// Power level (percent) a fuzzy output must strictly exceed to switch ON.
pub const DEFAULT_ACTIVATION_THRESHOLD: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Command {
    On,
    Off,
}

impl Command {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::On => "ON",
            Self::Off => "OFF",
        }
    }

    #[must_use]
    pub fn is_on(self) -> bool {
        matches!(self, Self::On)
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `ON` iff `power > threshold`.
#[must_use]
pub fn to_command(power: f64, threshold: f64) -> Command {
    if power > threshold {
        Command::On
    } else {
        Command::Off
    }
}

/// One command per actuator, serialised under its relay key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commands {
    #[serde(rename = "relay1")]
    pub fan: Command,
    #[serde(rename = "relay2")]
    pub heater: Command,
    #[serde(rename = "relay3")]
    pub humidifier: Command,
}

impl Commands {
    /// Map the three power levels independently with the same threshold.
    #[must_use]
    pub fn from_powers(fan: f64, heater: f64, humidifier: f64, threshold: f64) -> Self {
        Self {
            fan: to_command(fan, threshold),
            heater: to_command(heater, threshold),
            humidifier: to_command(humidifier, threshold),
        }
    }

    #[must_use]
    pub fn get(&self, actuator: Actuator) -> Command {
        match actuator {
            Actuator::Fan => self.fan,
            Actuator::Heater => self.heater,
            Actuator::Humidifier => self.humidifier,
        }
    }

    /// `(relay, command)` pairs in relay order.
    pub fn iter(&self) -> impl Iterator<Item = (RelayId, Command)> + '_ {
        Actuator::ALL
            .into_iter()
            .map(|actuator| (actuator.relay(), self.get(actuator)))
    }
}
