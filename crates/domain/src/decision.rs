//! Decision: the unified result of one evaluation cycle and the payloads
//! published from it.

use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::alert::Alert;
use crate::command::Commands;
use crate::reading::Reading;
use crate::rule::{MaintenanceFlag, RuleOutcome, SystemState};
use crate::time::Timestamp;

/// Outcome tag of a fuzzy computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FuzzyStatus {
    Ok,
    Error,
}

impl FuzzyStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for FuzzyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FuzzyStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OK" => Ok(Self::Ok),
            "ERROR" => Ok(Self::Error),
            other => Err(format!("unknown fuzzy status: {other}")),
        }
    }
}

/// Actuator power levels (percent) computed by the fuzzy engine.
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyResult {
    pub fan: f64,
    pub heater: f64,
    pub humidifier: f64,
    /// `temperature - setpoint`, rounded to two decimals.
    pub diff: f64,
    pub status: FuzzyStatus,
    /// Failure description, only set when `status` is `Error`.
    pub error: Option<String>,
}

impl FuzzyResult {
    #[must_use]
    pub fn ok(fan: f64, heater: f64, humidifier: f64, diff: f64) -> Self {
        Self {
            fan,
            heater,
            humidifier,
            diff,
            status: FuzzyStatus::Ok,
            error: None,
        }
    }

    /// Degraded result: every output forced to `0`.
    #[must_use]
    pub fn failed(diff: f64, error: impl std::fmt::Display) -> Self {
        Self {
            fan: 0.0,
            heater: 0.0,
            humidifier: 0.0,
            diff,
            status: FuzzyStatus::Error,
            error: Some(error.to_string()),
        }
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == FuzzyStatus::Ok
    }
}

/// Everything one cycle produced for one reading.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub timestamp: Timestamp,
    pub reading: Reading,
    pub rules: RuleOutcome,
    pub fuzzy: FuzzyResult,
    pub commands: Commands,
}

impl Decision {
    /// Rule-engine payload.
    #[must_use]
    pub fn analysis(&self) -> ExpertAnalysis {
        ExpertAnalysis {
            timestamp: self.timestamp,
            inputs: self.reading,
            alerts: self.rules.alerts.clone(),
            actions: self.rules.actions.clone(),
            fired_rules: self.rules.fired_count(),
            states: self.rules.states.clone(),
            maintenance: self.rules.maintenance.clone(),
        }
    }

    /// Fuzzy-engine payload.
    #[must_use]
    pub fn fuzzy_state(&self) -> FuzzyStatePayload {
        FuzzyStatePayload {
            timestamp: self.timestamp,
            inputs: FuzzyInputs {
                temperature: self.reading.temperature,
                humidity: self.reading.humidity,
                setpoint: self.reading.setpoint,
                diff: self.fuzzy.diff,
            },
            outputs: FuzzyOutputs {
                fan: self.fuzzy.fan,
                heater: self.fuzzy.heater,
                humidifier: self.fuzzy.humidifier,
            },
            commands: self.commands,
            status: self.fuzzy.status,
            error: self.fuzzy.error.clone(),
        }
    }
}

/// Rule-engine result as published on the analysis topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpertAnalysis {
    pub timestamp: Timestamp,
    pub inputs: Reading,
    pub alerts: Vec<Alert>,
    #[serde(rename = "acciones_recomendadas")]
    pub actions: Vec<Action>,
    #[serde(rename = "num_reglas_activadas")]
    pub fired_rules: usize,
    #[serde(rename = "estados", default)]
    pub states: Vec<SystemState>,
    #[serde(rename = "mantenimiento", default)]
    pub maintenance: Vec<MaintenanceFlag>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FuzzyInputs {
    #[serde(rename = "temperatura")]
    pub temperature: f64,
    #[serde(rename = "humedad")]
    pub humidity: f64,
    pub setpoint: f64,
    #[serde(rename = "diferencia")]
    pub diff: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FuzzyOutputs {
    #[serde(rename = "ventilador")]
    pub fan: f64,
    #[serde(rename = "calefactor")]
    pub heater: f64,
    #[serde(rename = "humidificador")]
    pub humidifier: f64,
}

/// Fuzzy-engine result as published on the fuzzy state topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuzzyStatePayload {
    pub timestamp: Timestamp,
    #[serde(rename = "entradas")]
    pub inputs: FuzzyInputs,
    #[serde(rename = "salidas")]
    pub outputs: FuzzyOutputs,
    #[serde(rename = "comandos")]
    pub commands: Commands,
    #[serde(rename = "estado")]
    pub status: FuzzyStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionKind;
    use crate::alert::AlertKind;
    use crate::command::{Command, DEFAULT_ACTIVATION_THRESHOLD};
    use crate::rule::Rule;
    use crate::time::now;

    fn decision(fuzzy: FuzzyResult) -> Decision {
        let ts = now();
        let commands = Commands::from_powers(
            fuzzy.fan,
            fuzzy.heater,
            fuzzy.humidifier,
            DEFAULT_ACTIVATION_THRESHOLD,
        );
        Decision {
            timestamp: ts,
            reading: Reading::new(36.0, 50.0, 24.0),
            rules: RuleOutcome {
                alerts: vec![Alert::new(AlertKind::TempVeryHigh, "hot", ts)],
                actions: vec![
                    Action::new(ActionKind::IncreaseFan, ts),
                    Action::new(ActionKind::ReduceHeater, ts),
                ],
                fired: vec![Rule::AlertHigh],
                ..RuleOutcome::default()
            },
            fuzzy,
            commands,
        }
    }

    #[test]
    fn should_build_analysis_payload_with_transport_names() {
        let json = serde_json::to_value(decision(FuzzyResult::ok(93.0, 3.0, 0.0, 12.0)).analysis())
            .unwrap();
        assert_eq!(json["inputs"]["temperature"], 36.0);
        assert_eq!(json["inputs"]["setpoint"], 24.0);
        assert_eq!(json["alerts"][0]["tipo"], "TEMP_VERY_HIGH");
        assert_eq!(json["acciones_recomendadas"][1]["tipo"], "REDUCE_HEATER");
        assert_eq!(json["num_reglas_activadas"], 1);
        assert!(json["estados"].as_array().unwrap().is_empty());
    }

    #[test]
    fn should_build_fuzzy_payload_without_error_field_when_ok() {
        let payload = decision(FuzzyResult::ok(93.0, 3.0, 0.0, 12.0)).fuzzy_state();
        assert_eq!(payload.commands.fan, Command::On);
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["entradas"]["temperatura"], 36.0);
        assert_eq!(json["entradas"]["diferencia"], 12.0);
        assert_eq!(json["salidas"]["ventilador"], 93.0);
        assert_eq!(json["comandos"]["relay1"], "ON");
        assert_eq!(json["estado"], "OK");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn should_zero_outputs_and_attach_error_on_failure() {
        let payload = decision(FuzzyResult::failed(12.0, "total area is zero")).fuzzy_state();
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["estado"], "ERROR");
        assert_eq!(json["error"], "total area is zero");
        assert_eq!(json["salidas"]["calefactor"], 0.0);
        assert_eq!(json["comandos"]["relay1"], "OFF");
    }

    #[test]
    fn should_parse_status_from_its_tag() {
        assert_eq!("OK".parse::<FuzzyStatus>(), Ok(FuzzyStatus::Ok));
        assert_eq!("ERROR".parse::<FuzzyStatus>(), Ok(FuzzyStatus::Error));
        assert!("ok".parse::<FuzzyStatus>().is_err());
    }
}
