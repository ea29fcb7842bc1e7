//! Linguistic variables: a universe of discourse plus named fuzzy sets.

use crate::error::ValidationError;

use super::membership::Triangular;

/// Closed interval a variable is defined on, sampled at a fixed step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Universe {
    min: f64,
    max: f64,
    step: f64,
}

impl Universe {
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyUniverse`] unless `min < max` and
    /// `step` is positive and finite.
    pub fn new(min: f64, max: f64, step: f64) -> Result<Self, ValidationError> {
        let bounded = min.is_finite() && max.is_finite() && min < max;
        if bounded && step.is_finite() && step > 0.0 {
            Ok(Self { min, max, step })
        } else {
            Err(ValidationError::EmptyUniverse { min, max })
        }
    }

    #[must_use]
    pub fn min(&self) -> f64 {
        self.min
    }

    #[must_use]
    pub fn max(&self) -> f64 {
        self.max
    }

    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    /// Sample points `min, min + step, …` up to and including `max`.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn samples(&self) -> Vec<f64> {
        let count = ((self.max - self.min) / self.step).round() as usize;
        (0..=count)
            .map(|i| (self.min + i as f64 * self.step).min(self.max))
            .collect()
    }
}

/// A named fuzzy set of a linguistic variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuzzySet {
    pub name: &'static str,
    pub membership: Triangular,
}

/// Membership degrees of one crisp value in every set of a variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Memberships {
    pub variable: &'static str,
    degrees: Vec<(&'static str, f64)>,
}

impl Memberships {
    /// Degree for `set`, `0` when the variable has no such set.
    #[must_use]
    pub fn degree(&self, set: &str) -> f64 {
        self.degrees
            .iter()
            .find(|(name, _)| *name == set)
            .map_or(0.0, |(_, degree)| *degree)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.degrees.iter().copied()
    }
}

/// A named variable with a universe and triangular fuzzy sets.
#[derive(Debug, Clone, PartialEq)]
pub struct LinguisticVariable {
    name: &'static str,
    universe: Universe,
    sets: Vec<FuzzySet>,
}

impl LinguisticVariable {
    #[must_use]
    pub fn new(name: &'static str, universe: Universe) -> Self {
        Self {
            name,
            universe,
            sets: Vec::new(),
        }
    }

    /// Add a triangular set with breakpoints `[a, b, c]`.
    ///
    /// # Errors
    ///
    /// Propagates [`Triangular::new`] failures.
    pub fn with_set(
        mut self,
        name: &'static str,
        a: f64,
        b: f64,
        c: f64,
    ) -> Result<Self, ValidationError> {
        self.sets.push(FuzzySet {
            name,
            membership: Triangular::new(a, b, c)?,
        });
        Ok(self)
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn universe(&self) -> &Universe {
        &self.universe
    }

    #[must_use]
    pub fn set(&self, name: &str) -> Option<&FuzzySet> {
        self.sets.iter().find(|set| set.name == name)
    }

    pub fn sets(&self) -> impl Iterator<Item = &FuzzySet> {
        self.sets.iter()
    }

    /// Clamp `value` into the universe and compute every set's degree.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NonFinite`] for NaN or infinite values,
    /// which cannot be clamped.
    pub fn fuzzify(&self, value: f64) -> Result<Memberships, ValidationError> {
        if !value.is_finite() {
            return Err(ValidationError::NonFinite { field: self.name });
        }
        let value = self.universe.clamp(value);
        Ok(Memberships {
            variable: self.name,
            degrees: self
                .sets
                .iter()
                .map(|set| (set.name, set.membership.degree(value)))
                .collect(),
        })
    }
}
