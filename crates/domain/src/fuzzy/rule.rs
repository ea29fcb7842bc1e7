//! Mamdani fuzzy rules.

use super::variable::Memberships;

/// Antecedent expression of a fuzzy rule.
#[derive(Debug, Clone, PartialEq)]
pub enum Antecedent {
    /// `variable IS set`.
    Is {
        variable: &'static str,
        set: &'static str,
    },
    /// Minimum of both operands.
    And(Box<Antecedent>, Box<Antecedent>),
    /// Maximum of both operands.
    Or(Box<Antecedent>, Box<Antecedent>),
}

impl Antecedent {
    #[must_use]
    pub fn is(variable: &'static str, set: &'static str) -> Self {
        Self::Is { variable, set }
    }

    #[must_use]
    pub fn and(self, other: Self) -> Self {
        Self::And(Box::new(self), Box::new(other))
    }

    #[must_use]
    pub fn or(self, other: Self) -> Self {
        Self::Or(Box::new(self), Box::new(other))
    }

    /// Firing strength given the fuzzified inputs.
    ///
    /// A term naming a variable absent from `inputs` contributes `0`.
    #[must_use]
    pub fn strength(&self, inputs: &[Memberships]) -> f64 {
        match self {
            Self::Is { variable, set } => inputs
                .iter()
                .find(|memberships| memberships.variable == *variable)
                .map_or(0.0, |memberships| memberships.degree(set)),
            Self::And(left, right) => left.strength(inputs).min(right.strength(inputs)),
            Self::Or(left, right) => left.strength(inputs).max(right.strength(inputs)),
        }
    }

    /// Every `(variable, set)` term in the expression.
    #[must_use]
    pub fn terms(&self) -> Vec<(&'static str, &'static str)> {
        match self {
            Self::Is { variable, set } => vec![(*variable, *set)],
            Self::And(left, right) | Self::Or(left, right) => {
                let mut terms = left.terms();
                terms.extend(right.terms());
                terms
            }
        }
    }
}

/// `(output variable, set)` assigned when a rule fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Consequent {
    pub variable: &'static str,
    pub set: &'static str,
}

/// `IF antecedent THEN consequent, …`.
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyRule {
    pub antecedent: Antecedent,
    pub consequents: Vec<Consequent>,
}

impl FuzzyRule {
    #[must_use]
    pub fn when(antecedent: Antecedent) -> Self {
        Self {
            antecedent,
            consequents: Vec::new(),
        }
    }

    #[must_use]
    pub fn then(mut self, variable: &'static str, set: &'static str) -> Self {
        self.consequents.push(Consequent { variable, set });
        self
    }
}
