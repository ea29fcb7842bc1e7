//! Facts and the per-cycle working memory the rule engine matches against.
//!
//! The [`FactStore`] is stateless across cycles: callers [`populate`](FactStore::populate)
//! it at the start of every cycle, which clears whatever the previous cycle
//! declared.

use crate::action::ActionKind;
use crate::reading::PartialReading;
use crate::relay::{Actuator, RelayId, RelayState, RelayStatuses};

/// A typed assertion about the current system state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fact {
    Temperature(f64),
    Humidity(f64),
    Setpoint(f64),
    RelayStatus {
        relay: RelayId,
        on: bool,
        active_seconds: u64,
    },
    /// Declared by a firing rule so that dependent rules can react to it.
    Derived(ActionKind),
}

impl std::fmt::Display for Fact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Temperature(value) => write!(f, "temperature({value})"),
            Self::Humidity(value) => write!(f, "humidity({value})"),
            Self::Setpoint(value) => write!(f, "setpoint({value})"),
            Self::RelayStatus {
                relay,
                on,
                active_seconds,
            } => {
                let state = if *on { "on" } else { "off" };
                write!(f, "relay_status({relay}, {state}, {active_seconds}s)")
            }
            Self::Derived(kind) => write!(f, "derived({kind})"),
        }
    }
}

/// Working memory for one evaluation cycle.
///
/// Facts have set semantics: declaring a fact equal to one already present
/// is a no-op.
#[derive(Debug, Clone, Default)]
pub struct FactStore {
    facts: Vec<Fact>,
}

impl FactStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every fact.
    pub fn reset(&mut self) {
        self.facts.clear();
    }

    /// Reset, then declare the reading fields and relay states of a cycle.
    pub fn populate(&mut self, reading: &PartialReading, relays: &RelayStatuses) {
        self.reset();
        self.declare_reading(reading);
        self.declare_relays(relays);
    }

    /// Declare a fact. Returns `true` when the fact was not already present.
    pub fn declare(&mut self, fact: Fact) -> bool {
        if self.facts.contains(&fact) {
            return false;
        }
        self.facts.push(fact);
        true
    }

    /// Declare one fact per present reading field.
    pub fn declare_reading(&mut self, reading: &PartialReading) {
        if let Some(value) = reading.temperature {
            self.declare(Fact::Temperature(value));
        }
        if let Some(value) = reading.humidity {
            self.declare(Fact::Humidity(value));
        }
        if let Some(value) = reading.setpoint {
            self.declare(Fact::Setpoint(value));
        }
    }

    pub fn declare_relays(&mut self, relays: &RelayStatuses) {
        for (relay, state) in relays.iter() {
            self.declare(Fact::RelayStatus {
                relay,
                on: state.on,
                active_seconds: state.active_seconds,
            });
        }
    }

    #[must_use]
    pub fn temperature(&self) -> Option<f64> {
        self.facts.iter().find_map(|fact| match fact {
            Fact::Temperature(value) => Some(*value),
            _ => None,
        })
    }

    #[must_use]
    pub fn humidity(&self) -> Option<f64> {
        self.facts.iter().find_map(|fact| match fact {
            Fact::Humidity(value) => Some(*value),
            _ => None,
        })
    }

    #[must_use]
    pub fn setpoint(&self) -> Option<f64> {
        self.facts.iter().find_map(|fact| match fact {
            Fact::Setpoint(value) => Some(*value),
            _ => None,
        })
    }

    #[must_use]
    pub fn relay(&self, id: RelayId) -> Option<RelayState> {
        self.facts.iter().find_map(|fact| match fact {
            Fact::RelayStatus {
                relay,
                on,
                active_seconds,
            } if *relay == id => Some(RelayState::new(*on, *active_seconds)),
            _ => None,
        })
    }

    /// Relay state of the relay an actuator is wired to.
    #[must_use]
    pub fn actuator(&self, actuator: Actuator) -> Option<RelayState> {
        self.relay(actuator.relay())
    }

    #[must_use]
    pub fn has_derived(&self, kind: ActionKind) -> bool {
        self.facts.contains(&Fact::Derived(kind))
    }

    /// Whether at least one reading field was declared.
    #[must_use]
    pub fn has_reading(&self) -> bool {
        self.facts.iter().any(|fact| {
            matches!(
                fact,
                Fact::Temperature(_) | Fact::Humidity(_) | Fact::Setpoint(_)
            )
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Fact> {
        self.facts.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.facts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }
}
