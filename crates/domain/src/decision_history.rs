//! Decision history: one time-series row per fuzzy control cycle.

use serde::{Deserialize, Serialize};

use crate::command::Command;
use crate::decision::{Decision, FuzzyStatus};
use crate::time::Timestamp;

/// A unique identifier for a [`DecisionRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DecisionId(uuid::Uuid);

impl Default for DecisionId {
    fn default() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl DecisionId {
    /// Generate a new random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }

    #[must_use]
    pub fn as_uuid(self) -> uuid::Uuid {
        self.0
    }
}

impl std::fmt::Display for DecisionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for DecisionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        uuid::Uuid::parse_str(s).map(Self)
    }
}

/// Inputs, power levels and commands of one fuzzy decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub id: DecisionId,
    pub recorded_at: Timestamp,
    #[serde(rename = "temperatura_actual")]
    pub temperature: f64,
    #[serde(rename = "humedad_actual")]
    pub humidity: f64,
    pub setpoint: f64,
    #[serde(rename = "diferencia_temp")]
    pub diff: f64,
    #[serde(rename = "potencia_ventilador")]
    pub fan_power: f64,
    #[serde(rename = "potencia_calefactor")]
    pub heater_power: f64,
    #[serde(rename = "potencia_humidificador")]
    pub humidifier_power: f64,
    #[serde(rename = "comando_ventilador")]
    pub fan_command: Command,
    #[serde(rename = "comando_calefactor")]
    pub heater_command: Command,
    #[serde(rename = "comando_humidificador")]
    pub humidifier_command: Command,
    #[serde(rename = "estado")]
    pub status: FuzzyStatus,
}

impl From<&Decision> for DecisionRecord {
    fn from(decision: &Decision) -> Self {
        Self {
            id: DecisionId::new(),
            recorded_at: decision.timestamp,
            temperature: decision.reading.temperature,
            humidity: decision.reading.humidity,
            setpoint: decision.reading.setpoint,
            diff: decision.fuzzy.diff,
            fan_power: decision.fuzzy.fan,
            heater_power: decision.fuzzy.heater,
            humidifier_power: decision.fuzzy.humidifier,
            fan_command: decision.commands.fan,
            heater_command: decision.commands.heater,
            humidifier_command: decision.commands.humidifier,
            status: decision.fuzzy.status,
        }
    }
}
