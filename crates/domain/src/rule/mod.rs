//! Rule: condition → effect knowledge for the symbolic engine.
//!
//! The catalogue is closed: every rule is a variant of [`Rule`] and its
//! condition is an exhaustive `match` over the facts in a
//! [`FactStore`](crate::fact::FactStore). Rules are grouped into two
//! [`Phase`]s; within a phase higher [`salience`](Rule::salience) fires first.

mod catalog;
mod outcome;

pub use catalog::Rule;
pub use outcome::RuleOutcome;

use serde::{Deserialize, Serialize};

use crate::action::ActionKind;
use crate::alert::AlertKind;
use crate::relay::Actuator;

/// Evaluation phase a rule belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    /// Keyed directly off reading and relay facts.
    Primary,
    /// Keyed off `Derived` facts declared by earlier firings.
    Derived,
}

/// A notable condition that is neither an alert nor an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SystemState {
    OptimalTemperature,
    ComfortOptimal,
}

impl std::fmt::Display for SystemState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OptimalTemperature => f.write_str("OPTIMAL_TEMPERATURE"),
            Self::ComfortOptimal => f.write_str("COMFORT_OPTIMAL"),
        }
    }
}

/// Preventive-maintenance notice for an actuator with a long active time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceFlag {
    #[serde(rename = "actuador")]
    pub actuator: Actuator,
    #[serde(rename = "horas")]
    pub hours: f64,
    #[serde(rename = "mensaje")]
    pub message: String,
}

/// What one rule produces when its condition matches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Firing {
    pub alert: Option<(AlertKind, String)>,
    pub actions: Vec<ActionKind>,
    pub state: Option<SystemState>,
    pub maintenance: Option<MaintenanceFlag>,
}

impl Firing {
    #[must_use]
    pub fn alert(kind: AlertKind, message: impl Into<String>) -> Self {
        Self {
            alert: Some((kind, message.into())),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn state(state: SystemState) -> Self {
        Self {
            state: Some(state),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn maintenance(flag: MaintenanceFlag) -> Self {
        Self {
            maintenance: Some(flag),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn actions(actions: &[ActionKind]) -> Self {
        Self::default().with_actions(actions)
    }

    #[must_use]
    pub fn with_actions(mut self, actions: &[ActionKind]) -> Self {
        self.actions.extend_from_slice(actions);
        self
    }
}
