//! Mamdani fuzzy inference primitives.
//!
//! A [`FuzzySystem`] owns input and output [`LinguisticVariable`]s and a rule
//! base. It is validated once at construction and immutable afterwards, so
//! a single instance can be shared read-only between cycles.

pub mod defuzz;
pub mod membership;
pub mod rule;
pub mod variable;

pub use membership::Triangular;
pub use rule::{Antecedent, Consequent, FuzzyRule};
pub use variable::{FuzzySet, LinguisticVariable, Memberships, Universe};

use crate::error::{ComputationError, ValidationError};

/// Crisp value of one output variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrispOutput {
    pub variable: &'static str,
    pub value: f64,
}

#[derive(Debug, Clone)]
pub struct FuzzySystem {
    inputs: Vec<LinguisticVariable>,
    outputs: Vec<LinguisticVariable>,
    rules: Vec<FuzzyRule>,
}

impl FuzzySystem {
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownFuzzySet`] when a rule references a
    /// variable or set that is not defined on the matching side.
    pub fn new(
        inputs: Vec<LinguisticVariable>,
        outputs: Vec<LinguisticVariable>,
        rules: Vec<FuzzyRule>,
    ) -> Result<Self, ValidationError> {
        for rule in &rules {
            for (variable, set) in rule.antecedent.terms() {
                ensure_defined(&inputs, variable, set)?;
            }
            for consequent in &rule.consequents {
                ensure_defined(&outputs, consequent.variable, consequent.set)?;
            }
        }
        Ok(Self {
            inputs,
            outputs,
            rules,
        })
    }

    pub fn inputs(&self) -> impl Iterator<Item = &LinguisticVariable> {
        self.inputs.iter()
    }

    pub fn outputs(&self) -> impl Iterator<Item = &LinguisticVariable> {
        self.outputs.iter()
    }

    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Fuzzify `crisp`, fire every rule, then defuzzify each output by
    /// centroid. Outputs come back in declaration order and unrounded.
    ///
    /// # Errors
    ///
    /// - [`ComputationError::MissingInput`] if an input variable has no
    ///   crisp value;
    /// - [`ComputationError::InvalidInput`] for non-finite values;
    /// - [`ComputationError::EmptyAggregate`] when no rule reaches an output.
    pub fn infer(&self, crisp: &[(&str, f64)]) -> Result<Vec<CrispOutput>, ComputationError> {
        let memberships = self
            .inputs
            .iter()
            .map(|variable| {
                let value = crisp
                    .iter()
                    .find(|(name, _)| *name == variable.name())
                    .map(|(_, value)| *value)
                    .ok_or(ComputationError::MissingInput {
                        variable: variable.name(),
                    })?;
                Ok(variable.fuzzify(value)?)
            })
            .collect::<Result<Vec<_>, ComputationError>>()?;

        let strengths: Vec<f64> = self
            .rules
            .iter()
            .map(|rule| rule.antecedent.strength(&memberships))
            .collect();

        self.outputs
            .iter()
            .map(|output| {
                let samples = output.universe().samples();
                let clipped = self
                    .rules
                    .iter()
                    .zip(&strengths)
                    .flat_map(move |(rule, strength)| {
                        rule.consequents
                            .iter()
                            .filter(move |consequent| consequent.variable == output.name())
                            .filter_map(move |consequent| output.set(consequent.set))
                            .map(move |set| (*strength, &set.membership))
                    });
                let shape = defuzz::aggregate(&samples, clipped);
                let value = defuzz::centroid(output.name(), &samples, &shape)?;
                Ok(CrispOutput {
                    variable: output.name(),
                    value,
                })
            })
            .collect()
    }
}

fn ensure_defined(
    variables: &[LinguisticVariable],
    variable: &'static str,
    set: &'static str,
) -> Result<(), ValidationError> {
    let defined = variables
        .iter()
        .find(|candidate| candidate.name() == variable)
        .and_then(|candidate| candidate.set(set))
        .is_some();
    if defined {
        Ok(())
    } else {
        Err(ValidationError::UnknownFuzzySet { variable, set })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn system() -> FuzzySystem {
        let error = LinguisticVariable::new("error", Universe::new(-10.0, 10.0, 0.1).unwrap())
            .with_set("negative", -10.0, -10.0, 0.0)
            .unwrap()
            .with_set("positive", 0.0, 10.0, 10.0)
            .unwrap();
        let power = LinguisticVariable::new("power", Universe::new(0.0, 100.0, 1.0).unwrap())
            .with_set("off", 0.0, 0.0, 10.0)
            .unwrap()
            .with_set("max", 85.0, 100.0, 100.0)
            .unwrap();
        FuzzySystem::new(
            vec![error],
            vec![power],
            vec![
                FuzzyRule::when(Antecedent::is("error", "positive")).then("power", "max"),
                FuzzyRule::when(Antecedent::is("error", "negative")).then("power", "off"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn should_infer_high_output_for_positive_error() {
        let outputs = system().infer(&[("error", 10.0)]).unwrap();
        assert_eq!(outputs.len(), 1);
        assert_eq!(outputs[0].variable, "power");
        assert!(outputs[0].value > 90.0);
    }

    #[test]
    fn should_fail_when_no_rule_fires() {
        let err = system().infer(&[("error", 0.0)]).unwrap_err();
        assert_eq!(err, ComputationError::EmptyAggregate { variable: "power" });
    }

    #[test]
    fn should_report_missing_input() {
        let err = system().infer(&[("other", 1.0)]).unwrap_err();
        assert_eq!(err, ComputationError::MissingInput { variable: "error" });
    }

    #[test]
    fn should_propagate_non_finite_input() {
        let err = system().infer(&[("error", f64::INFINITY)]).unwrap_err();
        assert!(matches!(err, ComputationError::InvalidInput(_)));
    }

    #[test]
    fn should_reject_rule_with_undefined_set() {
        let power = LinguisticVariable::new("power", Universe::new(0.0, 100.0, 1.0).unwrap())
            .with_set("off", 0.0, 0.0, 10.0)
            .unwrap();
        let err = FuzzySystem::new(
            vec![],
            vec![power],
            vec![FuzzyRule::when(Antecedent::is("error", "positive")).then("power", "max")],
        )
        .unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnknownFuzzySet {
                variable: "error",
                set: "positive"
            }
        );
    }
}
