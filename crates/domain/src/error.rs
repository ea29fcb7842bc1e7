//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`ClimateError`] via `#[from]` (no `String` variants at the top level).

/// Top-level error for the clima workspace.
#[derive(Debug, thiserror::Error)]
pub enum ClimateError {
    /// A value fell outside its declared domain.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// An inference step produced no well-defined result.
    #[error("computation error")]
    Computation(#[from] ComputationError),

    /// Persistence layer failure (adapter-specific source).
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Transport layer failure (adapter-specific source).
    #[error("transport error")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// A reading, relay status or knowledge-base definition is invalid.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// A numeric field is NaN or infinite.
    #[error("{field} is not a finite number")]
    NonFinite { field: &'static str },

    /// A numeric field lies outside its domain.
    #[error("{field} = {value} is outside [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// A relay identifier could not be parsed.
    #[error("invalid relay identifier: {0:?}")]
    InvalidRelayId(String),

    /// Triangular membership breakpoints are not non-decreasing.
    #[error("membership breakpoints must be non-decreasing, got [{a}, {b}, {c}]")]
    UnorderedBreakpoints { a: f64, b: f64, c: f64 },

    /// A universe of discourse has an empty or inverted interval.
    #[error("universe [{min}, {max}] is empty")]
    EmptyUniverse { min: f64, max: f64 },

    /// A fuzzy rule references a set the variable does not define.
    #[error("variable {variable} has no fuzzy set named {set}")]
    UnknownFuzzySet {
        variable: &'static str,
        set: &'static str,
    },
}

/// The fuzzy inference could not produce a crisp value.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ComputationError {
    /// The aggregated membership of an output variable has zero area.
    #[error("total area is zero for output {variable}")]
    EmptyAggregate { variable: &'static str },

    /// No crisp value for an input the engine requires.
    #[error("missing crisp input for {variable}")]
    MissingInput { variable: &'static str },

    /// An input could not be fuzzified.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] ValidationError),
}
