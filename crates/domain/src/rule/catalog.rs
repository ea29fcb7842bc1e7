//! The climate rule catalogue.
//!
//! Thresholds are part of the transport contract and must stay bit-exact.

use crate::action::ActionKind;
use crate::alert::AlertKind;
use crate::fact::FactStore;
use crate::relay::Actuator;

use super::{Firing, MaintenanceFlag, Phase, SystemState};

/// Above this temperature (°C) the emergency shutoff fires.
const EMERGENCY_HIGH: f64 = 40.0;
/// Below this temperature (°C) the freeze emergency fires.
const EMERGENCY_LOW: f64 = 5.0;
const ALERT_HIGH: f64 = 35.0;
const ALERT_LOW: f64 = 12.0;
const HUMIDITY_HIGH: f64 = 85.0;
const HUMIDITY_LOW: f64 = 20.0;
/// Maximum `|temperature - setpoint|` considered on target.
const OPTIMAL_BAND: f64 = 0.5;
/// Ten hours of continuous fan use.
const FAN_MAINTENANCE_SECONDS: u64 = 36_000;
const COMFORT_TEMPERATURE: (f64, f64) = (22.0, 25.0);
const COMFORT_HUMIDITY: (f64, f64) = (40.0, 60.0);

/// One rule of the catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    EmergencyHigh,
    EmergencyLow,
    AlertHigh,
    AlertLow,
    HumidityHigh,
    HumidityLow,
    ActuatorConflict,
    FanMaintenance,
    OptimalTemperature,
    Comfort,
    ResolveConflictCooling,
    ResolveConflictHeating,
    EnergySaving,
}

impl Rule {
    /// Every rule, sorted by phase then descending salience.
    pub const ALL: [Self; 13] = [
        Self::EmergencyHigh,
        Self::EmergencyLow,
        Self::AlertHigh,
        Self::AlertLow,
        Self::HumidityHigh,
        Self::HumidityLow,
        Self::ActuatorConflict,
        Self::FanMaintenance,
        Self::OptimalTemperature,
        Self::Comfort,
        Self::ResolveConflictCooling,
        Self::ResolveConflictHeating,
        Self::EnergySaving,
    ];

    #[must_use]
    pub fn phase(self) -> Phase {
        match self {
            Self::ResolveConflictCooling | Self::ResolveConflictHeating | Self::EnergySaving => {
                Phase::Derived
            }
            _ => Phase::Primary,
        }
    }

    /// Priority within the phase; higher fires first.
    #[must_use]
    pub fn salience(self) -> i32 {
        match self {
            Self::EmergencyHigh | Self::EmergencyLow => 100,
            Self::AlertHigh | Self::AlertLow => 80,
            Self::HumidityHigh | Self::HumidityLow => 70,
            Self::ActuatorConflict | Self::ResolveConflictCooling | Self::ResolveConflictHeating => {
                60
            }
            Self::FanMaintenance => 50,
            Self::OptimalTemperature | Self::EnergySaving => 40,
            Self::Comfort => 30,
        }
    }

    /// Stable snake-case name, used in logs.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::EmergencyHigh => "emergency_high",
            Self::EmergencyLow => "emergency_low",
            Self::AlertHigh => "alert_high",
            Self::AlertLow => "alert_low",
            Self::HumidityHigh => "humidity_high",
            Self::HumidityLow => "humidity_low",
            Self::ActuatorConflict => "actuator_conflict",
            Self::FanMaintenance => "fan_maintenance",
            Self::OptimalTemperature => "optimal_temperature",
            Self::Comfort => "comfort",
            Self::ResolveConflictCooling => "resolve_conflict_cooling",
            Self::ResolveConflictHeating => "resolve_conflict_heating",
            Self::EnergySaving => "energy_saving",
        }
    }

    /// Rules of one phase, in firing order.
    pub fn in_phase(phase: Phase) -> impl Iterator<Item = Self> {
        let mut rules: Vec<Self> = Self::ALL
            .into_iter()
            .filter(|rule| rule.phase() == phase)
            .collect();
        rules.sort_by_key(|rule| std::cmp::Reverse(rule.salience()));
        rules.into_iter()
    }

    /// Match the rule against the facts. Returns `None` when it does not fire.
    ///
    /// A rule whose facts are absent simply does not match.
    #[must_use]
    pub fn evaluate(self, facts: &FactStore) -> Option<Firing> {
        match self {
            Self::EmergencyHigh => {
                let t = facts.temperature().filter(|t| *t > EMERGENCY_HIGH)?;
                Some(
                    Firing::alert(
                        AlertKind::EmergencyTempExtreme,
                        format!("Critical temperature: {t}°C"),
                    )
                    .with_actions(&[
                        ActionKind::FanMaxUrgent,
                        ActionKind::HeaterOffImmediate,
                        ActionKind::NotifyUrgent,
                    ]),
                )
            }
            Self::EmergencyLow => {
                let t = facts.temperature().filter(|t| *t < EMERGENCY_LOW)?;
                Some(
                    Firing::alert(
                        AlertKind::EmergencyTempExtremeLow,
                        format!("Freezing risk: {t}°C"),
                    )
                    .with_actions(&[
                        ActionKind::HeaterMaxUrgent,
                        ActionKind::FanOffImmediate,
                        ActionKind::NotifyUrgent,
                    ]),
                )
            }
            Self::AlertHigh => {
                let t = facts
                    .temperature()
                    .filter(|t| *t > ALERT_HIGH && *t <= EMERGENCY_HIGH)?;
                Some(
                    Firing::alert(
                        AlertKind::TempVeryHigh,
                        format!("Very high temperature: {t}°C"),
                    )
                    .with_actions(&[ActionKind::IncreaseFan, ActionKind::ReduceHeater]),
                )
            }
            Self::AlertLow => {
                let t = facts
                    .temperature()
                    .filter(|t| *t >= EMERGENCY_LOW && *t < ALERT_LOW)?;
                Some(
                    Firing::alert(
                        AlertKind::TempVeryLow,
                        format!("Very low temperature: {t}°C"),
                    )
                    .with_actions(&[ActionKind::IncreaseHeater, ActionKind::ReduceFan]),
                )
            }
            Self::HumidityHigh => {
                let h = facts.humidity().filter(|h| *h > HUMIDITY_HIGH)?;
                Some(
                    Firing::alert(
                        AlertKind::HumidityCritical,
                        format!("Excessive humidity: {h}%"),
                    )
                    .with_actions(&[ActionKind::HumidifierOff, ActionKind::FanForDrying]),
                )
            }
            Self::HumidityLow => {
                let h = facts.humidity().filter(|h| *h < HUMIDITY_LOW)?;
                Some(
                    Firing::alert(AlertKind::HumidityVeryLow, format!("Very dry air: {h}%"))
                        .with_actions(&[ActionKind::HumidifierOn]),
                )
            }
            Self::ActuatorConflict => {
                let fan = facts.actuator(Actuator::Fan)?;
                let heater = facts.actuator(Actuator::Heater)?;
                (fan.on && heater.on).then(|| {
                    Firing::alert(
                        AlertKind::ActuatorConflict,
                        "Fan and heater active at the same time: wasted energy",
                    )
                    .with_actions(&[ActionKind::ResolveConflict])
                })
            }
            Self::FanMaintenance => {
                let fan = facts
                    .actuator(Actuator::Fan)
                    .filter(|fan| fan.active_seconds > FAN_MAINTENANCE_SECONDS)?;
                #[allow(clippy::cast_precision_loss)]
                let hours = (fan.active_seconds as f64 / 3600.0 * 10.0).round() / 10.0;
                Some(Firing::maintenance(MaintenanceFlag {
                    actuator: Actuator::Fan,
                    hours,
                    message: format!("Inspect fan: prolonged use ({hours:.1}h)"),
                }))
            }
            Self::OptimalTemperature => {
                let t = facts.temperature()?;
                let sp = facts.setpoint()?;
                ((t - sp).abs() < OPTIMAL_BAND).then(|| {
                    Firing::state(SystemState::OptimalTemperature).with_actions(&[
                        ActionKind::EnergySavingMode,
                        ActionKind::ReduceActuatorPower,
                    ])
                })
            }
            Self::Comfort => {
                let t = facts.temperature()?;
                let h = facts.humidity()?;
                let (t_min, t_max) = COMFORT_TEMPERATURE;
                let (h_min, h_max) = COMFORT_HUMIDITY;
                ((t_min..=t_max).contains(&t) && (h_min..=h_max).contains(&h))
                    .then(|| Firing::state(SystemState::ComfortOptimal))
            }
            Self::ResolveConflictCooling => {
                if !facts.has_derived(ActionKind::ResolveConflict) {
                    return None;
                }
                let t = facts.temperature()?;
                let sp = facts.setpoint()?;
                (t > sp).then(|| Firing::actions(&[ActionKind::HeaterOff, ActionKind::KeepFan]))
            }
            Self::ResolveConflictHeating => {
                if !facts.has_derived(ActionKind::ResolveConflict) {
                    return None;
                }
                let t = facts.temperature()?;
                let sp = facts.setpoint()?;
                (t < sp).then(|| Firing::actions(&[ActionKind::FanOff, ActionKind::KeepHeater]))
            }
            Self::EnergySaving => facts
                .has_derived(ActionKind::EnergySavingMode)
                .then(|| Firing::actions(&[ActionKind::EnergySavingActivated])),
        }
    }
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
