//! Rule engine: bounded two-phase forward chaining over the Fact Store.
//!
//! Phase 1 runs every primary rule once, in salience order. Phase 2 then
//! repeats passes over the derived rules until a pass declares no new
//! `Derived` fact or the cascade limit is reached. A rule fires at most once
//! per cycle and phase 2 never re-enters phase 1.

use clima_domain::action::Action;
use clima_domain::alert::Alert;
use clima_domain::fact::{Fact, FactStore};
use clima_domain::rule::{Firing, Phase, Rule, RuleOutcome};
use clima_domain::time::{Timestamp, now};

/// Maximum number of phase-2 passes per cycle.
pub const DEFAULT_CASCADE_LIMIT: usize = 10;

/// Stateless evaluator of the rule catalogue.
#[derive(Debug, Clone, Copy)]
pub struct RuleEngine {
    cascade_limit: usize,
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new(DEFAULT_CASCADE_LIMIT)
    }
}

impl RuleEngine {
    /// Create an engine allowing at most `cascade_limit` phase-2 passes
    /// (at least one).
    #[must_use]
    pub fn new(cascade_limit: usize) -> Self {
        Self {
            cascade_limit: cascade_limit.max(1),
        }
    }

    #[must_use]
    pub fn cascade_limit(&self) -> usize {
        self.cascade_limit
    }

    /// Evaluate the catalogue against `facts`, stamping output with the
    /// current time.
    pub fn evaluate(&self, facts: &mut FactStore) -> RuleOutcome {
        self.evaluate_at(facts, now())
    }

    /// Evaluate the catalogue against `facts`.
    ///
    /// Derived facts declared by firing rules are added to `facts`. A store
    /// without any reading fact yields an empty outcome.
    pub fn evaluate_at(&self, facts: &mut FactStore, timestamp: Timestamp) -> RuleOutcome {
        let mut outcome = RuleOutcome::default();
        if !facts.has_reading() {
            tracing::debug!("no reading facts, skipping rule evaluation");
            return outcome;
        }

        for rule in Rule::in_phase(Phase::Primary) {
            if let Some(firing) = rule.evaluate(facts) {
                apply(rule, firing, facts, &mut outcome, timestamp);
            }
        }

        let mut passes = 0;
        while passes < self.cascade_limit {
            passes += 1;
            let mut declared = false;
            for rule in Rule::in_phase(Phase::Derived) {
                if outcome.fired.contains(&rule) {
                    continue;
                }
                if let Some(firing) = rule.evaluate(facts) {
                    declared |= apply(rule, firing, facts, &mut outcome, timestamp);
                }
            }
            if !declared {
                break;
            }
        }

        tracing::debug!(
            fired = outcome.fired_count(),
            alerts = outcome.alerts.len(),
            actions = outcome.actions.len(),
            passes,
            "rule evaluation finished"
        );
        outcome
    }
}

/// Record one firing. Returns `true` when it declared a new `Derived` fact.
fn apply(
    rule: Rule,
    firing: Firing,
    facts: &mut FactStore,
    outcome: &mut RuleOutcome,
    timestamp: Timestamp,
) -> bool {
    tracing::trace!(rule = rule.name(), "rule fired");
    outcome.fired.push(rule);

    if let Some((kind, message)) = firing.alert {
        outcome.alerts.push(Alert::new(kind, message, timestamp));
    }
    if let Some(state) = firing.state {
        outcome.states.push(state);
    }
    if let Some(flag) = firing.maintenance {
        outcome.maintenance.push(flag);
    }

    let mut declared = false;
    for kind in firing.actions {
        declared |= facts.declare(Fact::Derived(kind));
        if !outcome.has_action(kind) {
            outcome.actions.push(Action::new(kind, timestamp));
        }
    }
    declared
}
