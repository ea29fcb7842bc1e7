//! Messages exchanged with the transport.

use crate::alert::Alert;
use crate::command::Command;
use crate::decision::{ExpertAnalysis, FuzzyStatePayload};
use crate::relay::{RelayId, RelayStatuses};

/// A message received from the controller board or the operator.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    /// New sensor sample; absent fields keep their previous value.
    Sensors {
        temperature: Option<f64>,
        humidity: Option<f64>,
    },
    /// Operator configuration update.
    Config { setpoint: Option<f64> },
    /// Relay states reported by the board.
    RelayStatus(RelayStatuses),
    /// Enable or disable automatic fuzzy control.
    FuzzyControl { active: bool },
}

impl Inbound {
    /// Short tag used in logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Sensors { .. } => "sensors",
            Self::Config { .. } => "config",
            Self::RelayStatus(_) => "relay_status",
            Self::FuzzyControl { .. } => "fuzzy_control",
        }
    }
}

/// A message produced by a decision cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum Outbound {
    Analysis(ExpertAnalysis),
    Alerts(Vec<Alert>),
    RelayCommand { relay: RelayId, command: Command },
    FuzzyState(FuzzyStatePayload),
}

impl Outbound {
    /// Short tag used in logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Analysis(_) => "analysis",
            Self::Alerts(_) => "alerts",
            Self::RelayCommand { .. } => "relay_command",
            Self::FuzzyState(_) => "fuzzy_state",
        }
    }
}
