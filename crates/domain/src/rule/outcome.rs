//! Result of one rule-engine evaluation.

use crate::action::{Action, ActionKind};
use crate::alert::{Alert, AlertKind, Severity};

use super::{MaintenanceFlag, Rule, SystemState};

/// Alerts, actions, states and maintenance flags produced in one cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleOutcome {
    pub alerts: Vec<Alert>,
    pub actions: Vec<Action>,
    pub states: Vec<SystemState>,
    pub maintenance: Vec<MaintenanceFlag>,
    /// Rules that fired, in firing order.
    pub fired: Vec<Rule>,
}

impl RuleOutcome {
    #[must_use]
    pub fn has_alert(&self, kind: AlertKind) -> bool {
        self.alerts.iter().any(|alert| alert.kind == kind)
    }

    #[must_use]
    pub fn has_action(&self, kind: ActionKind) -> bool {
        self.actions.iter().any(|action| action.kind == kind)
    }

    #[must_use]
    pub fn has_state(&self, state: SystemState) -> bool {
        self.states.contains(&state)
    }

    /// Highest severity among the raised alerts.
    #[must_use]
    pub fn highest_severity(&self) -> Option<Severity> {
        self.alerts.iter().map(|alert| alert.severity).max()
    }

    /// Alerts sorted from most to least severe, stable within a severity.
    #[must_use]
    pub fn alerts_by_severity(&self) -> Vec<&Alert> {
        let mut alerts: Vec<&Alert> = self.alerts.iter().collect();
        alerts.sort_by(|a, b| b.severity.cmp(&a.severity));
        alerts
    }

    #[must_use]
    pub fn fired_count(&self) -> usize {
        self.fired.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fired.is_empty()
    }
}
