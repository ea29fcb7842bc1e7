//! Fuzzy engine: the fixed climate knowledge base and its evaluation.

use clima_domain::decision::FuzzyResult;
use clima_domain::error::ValidationError;
use clima_domain::fuzzy::{Antecedent, FuzzyRule, FuzzySystem, LinguisticVariable, Universe};

const TEMPERATURE: &str = "temperature";
const HUMIDITY: &str = "humidity";
const DIFF: &str = "diff";
const FAN: &str = "fan";
const HEATER: &str = "heater";
const HUMIDIFIER: &str = "humidifier";

/// Mamdani controller computing fan, heater and humidifier power (0-100%).
///
/// The knowledge base is built once in [`FuzzyEngine::new`] and never
/// mutated, so one engine can be shared between concurrent cycles.
#[derive(Debug, Clone)]
pub struct FuzzyEngine {
    system: FuzzySystem,
}

impl FuzzyEngine {
    /// Build the climate knowledge base.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if a variable or rule definition is
    /// inconsistent.
    pub fn new() -> Result<Self, ValidationError> {
        let system = FuzzySystem::new(
            vec![temperature()?, humidity()?, diff()?],
            vec![power(FAN)?, power(HEATER)?, humidifier()?],
            rules(),
        )?;
        Ok(Self { system })
    }

    #[must_use]
    pub fn system(&self) -> &FuzzySystem {
        &self.system
    }

    /// Compute actuator power levels for one reading.
    ///
    /// Inputs are clamped to their universes. Failures never escape: the
    /// result carries `status = ERROR`, zeroed outputs and the reason.
    #[must_use]
    pub fn compute(&self, temperature: f64, humidity: f64, setpoint: f64) -> FuzzyResult {
        let raw_diff = temperature - setpoint;
        let diff = if raw_diff.is_finite() {
            round_to(raw_diff, 2)
        } else {
            0.0
        };

        let crisp = [(TEMPERATURE, temperature), (HUMIDITY, humidity), (DIFF, raw_diff)];
        match self.system.infer(&crisp) {
            Ok(outputs) => {
                let value = |name: &str| {
                    outputs
                        .iter()
                        .find(|output| output.variable == name)
                        .map_or(0.0, |output| round_to(output.value.clamp(0.0, 100.0), 1))
                };
                let result = FuzzyResult::ok(value(FAN), value(HEATER), value(HUMIDIFIER), diff);
                tracing::debug!(
                    temperature,
                    humidity,
                    setpoint,
                    fan = result.fan,
                    heater = result.heater,
                    humidifier = result.humidifier,
                    "fuzzy inference finished"
                );
                result
            }
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    temperature,
                    humidity,
                    setpoint,
                    "fuzzy inference failed"
                );
                FuzzyResult::failed(diff, err)
            }
        }
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round() / factor
}

fn temperature() -> Result<LinguisticVariable, ValidationError> {
    LinguisticVariable::new(TEMPERATURE, Universe::new(15.0, 35.0, 0.1)?)
        .with_set("very_cold", 15.0, 15.0, 20.0)?
        .with_set("cold", 18.0, 21.0, 24.0)?
        .with_set("comfortable", 22.0, 24.0, 26.0)?
        .with_set("hot", 24.0, 27.0, 30.0)?
        .with_set("very_hot", 28.0, 35.0, 35.0)
}

fn humidity() -> Result<LinguisticVariable, ValidationError> {
    LinguisticVariable::new(HUMIDITY, Universe::new(0.0, 100.0, 1.0)?)
        .with_set("very_low", 0.0, 0.0, 30.0)?
        .with_set("low", 20.0, 35.0, 50.0)?
        .with_set("normal", 40.0, 50.0, 60.0)?
        .with_set("high", 50.0, 65.0, 80.0)?
        .with_set("very_high", 70.0, 100.0, 100.0)
}

fn diff() -> Result<LinguisticVariable, ValidationError> {
    LinguisticVariable::new(DIFF, Universe::new(-10.0, 10.0, 0.1)?)
        .with_set("very_low", -10.0, -10.0, -3.0)?
        .with_set("low", -5.0, -2.0, 0.0)?
        .with_set("ok", -1.0, 0.0, 1.0)?
        .with_set("high", 0.0, 2.0, 5.0)?
        .with_set("very_high", 3.0, 10.0, 10.0)
}

/// Fan and heater share the same five power levels.
fn power(name: &'static str) -> Result<LinguisticVariable, ValidationError> {
    LinguisticVariable::new(name, Universe::new(0.0, 100.0, 1.0)?)
        .with_set("off", 0.0, 0.0, 10.0)?
        .with_set("low", 5.0, 25.0, 45.0)?
        .with_set("medium", 35.0, 50.0, 65.0)?
        .with_set("high", 55.0, 75.0, 95.0)?
        .with_set("max", 85.0, 100.0, 100.0)
}

fn humidifier() -> Result<LinguisticVariable, ValidationError> {
    LinguisticVariable::new(HUMIDIFIER, Universe::new(0.0, 100.0, 1.0)?)
        .with_set("off", 0.0, 0.0, 10.0)?
        .with_set("low", 5.0, 30.0, 55.0)?
        .with_set("high", 45.0, 75.0, 100.0)
}

fn rules() -> Vec<FuzzyRule> {
    let is = Antecedent::is;
    vec![
        // fan follows the temperature excess
        FuzzyRule::when(is(DIFF, "very_high")).then(FAN, "max"),
        FuzzyRule::when(is(DIFF, "high")).then(FAN, "high"),
        FuzzyRule::when(is(DIFF, "ok")).then(FAN, "low"),
        FuzzyRule::when(is(DIFF, "low").or(is(DIFF, "very_low"))).then(FAN, "off"),
        // heater mirrors it
        FuzzyRule::when(is(DIFF, "very_low")).then(HEATER, "max"),
        FuzzyRule::when(is(DIFF, "low")).then(HEATER, "high"),
        FuzzyRule::when(is(DIFF, "ok")).then(HEATER, "low"),
        FuzzyRule::when(is(DIFF, "high").or(is(DIFF, "very_high"))).then(HEATER, "off"),
        FuzzyRule::when(is(HUMIDITY, "very_low")).then(HUMIDIFIER, "high"),
        FuzzyRule::when(is(HUMIDITY, "low")).then(HUMIDIFIER, "low"),
        FuzzyRule::when(
            is(HUMIDITY, "normal")
                .or(is(HUMIDITY, "high"))
                .or(is(HUMIDITY, "very_high")),
        )
        .then(HUMIDIFIER, "off"),
        FuzzyRule::when(is(TEMPERATURE, "very_hot").and(is(HUMIDITY, "very_high")))
            .then(FAN, "max")
            .then(HEATER, "off"),
        FuzzyRule::when(is(TEMPERATURE, "very_cold").and(is(HUMIDITY, "very_low")))
            .then(HEATER, "max")
            .then(HUMIDIFIER, "high"),
        FuzzyRule::when(is(TEMPERATURE, "comfortable").and(is(HUMIDITY, "normal")))
            .then(FAN, "low")
            .then(HEATER, "low")
            .then(HUMIDIFIER, "off"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use clima_domain::decision::FuzzyStatus;

    fn engine() -> FuzzyEngine {
        FuzzyEngine::new().unwrap()
    }

    #[test]
    fn should_build_fourteen_rules() {
        assert_eq!(engine().system().rule_count(), 14);
        assert_eq!(engine().system().inputs().count(), 3);
        assert_eq!(engine().system().outputs().count(), 3);
    }

    #[test]
    fn should_drive_fan_high_and_heater_off_when_hot() {
        let result = engine().compute(32.0, 60.0, 24.0);
        assert_eq!(result.status, FuzzyStatus::Ok);
        assert!(result.fan > 75.0, "fan = {}", result.fan);
        assert!(result.heater < 10.0, "heater = {}", result.heater);
        assert!((result.diff - 8.0).abs() < f64::EPSILON);
    }

    #[test]
    fn should_drive_heater_high_and_fan_off_when_cold() {
        let result = engine().compute(16.0, 60.0, 24.0);
        assert!(result.heater > 75.0, "heater = {}", result.heater);
        assert!(result.fan < 10.0, "fan = {}", result.fan);
    }

    #[test]
    fn should_run_humidifier_in_dry_air() {
        let result = engine().compute(24.0, 10.0, 24.0);
        assert!(result.humidifier > 50.0, "humidifier = {}", result.humidifier);
    }

    #[test]
    fn should_clamp_out_of_range_inputs() {
        let clamped = engine().compute(42.0, 60.0, 24.0);
        let at_bound = engine().compute(35.0, 60.0, 25.0);
        assert_eq!(clamped.status, FuzzyStatus::Ok);
        assert!((clamped.fan - at_bound.fan).abs() < f64::EPSILON);
        assert!((clamped.diff - 18.0).abs() < f64::EPSILON);

        let wet = engine().compute(24.0, 150.0, 24.0);
        assert_eq!(wet.status, FuzzyStatus::Ok);
        assert!(wet.humidifier < 10.0);
    }

    #[test]
    fn should_report_error_for_non_finite_input() {
        let result = engine().compute(f64::NAN, 50.0, 24.0);
        assert_eq!(result.status, FuzzyStatus::Error);
        assert!(result.error.is_some());
        assert!(result.fan.abs() < f64::EPSILON);
        assert!(result.heater.abs() < f64::EPSILON);
        assert!(result.humidifier.abs() < f64::EPSILON);
    }

    #[test]
    fn should_name_non_finite_input_in_error() {
        let result = engine().compute(24.0, f64::INFINITY, 24.0);
        assert_eq!(result.status, FuzzyStatus::Error);
        let error = result.error.unwrap();
        assert!(error.contains("humidity is not a finite number"), "{error}");
    }

    #[test]
    fn should_round_outputs_to_one_decimal() {
        let result = engine().compute(25.3, 47.0, 24.0);
        for value in [result.fan, result.heater, result.humidifier] {
            assert!(((value * 10.0).round() - value * 10.0).abs() < 1e-9);
        }
        assert!((result.diff - 1.3).abs() < 1e-9);
    }

    #[test]
    fn should_be_deterministic() {
        let engine = engine();
        assert_eq!(engine.compute(27.4, 33.0, 22.5), engine.compute(27.4, 33.0, 22.5));
    }
}
