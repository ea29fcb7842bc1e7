//! Reading: one sensor sample plus the operator setpoint.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Relative humidity domain, in percent.
pub const HUMIDITY_RANGE: (f64, f64) = (0.0, 100.0);

/// Setpoint used until the operator sends one.
pub const DEFAULT_SETPOINT: f64 = 24.0;

/// A complete sensor reading, consumed once per evaluation cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Air temperature in °C.
    pub temperature: f64,
    /// Relative humidity in %.
    pub humidity: f64,
    /// Target temperature in °C.
    pub setpoint: f64,
}

impl Reading {
    #[must_use]
    pub fn new(temperature: f64, humidity: f64, setpoint: f64) -> Self {
        Self {
            temperature,
            humidity,
            setpoint,
        }
    }

    /// Signed distance to the setpoint (`temperature - setpoint`).
    #[must_use]
    pub fn diff(&self) -> f64 {
        self.temperature - self.setpoint
    }

    /// Check every field is finite and humidity lies in [`HUMIDITY_RANGE`].
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        finite("temperature", self.temperature)?;
        finite("humidity", self.humidity)?;
        finite("setpoint", self.setpoint)?;
        let (min, max) = HUMIDITY_RANGE;
        if !(min..=max).contains(&self.humidity) {
            return Err(ValidationError::OutOfRange {
                field: "humidity",
                value: self.humidity,
                min,
                max,
            });
        }
        Ok(())
    }
}

/// A reading where some fields may be missing.
///
/// Missing fields produce no fact, so rules depending on them don't fire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialReading {
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub setpoint: Option<f64>,
}

impl PartialReading {
    /// Whether no field at all is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.temperature.is_none() && self.humidity.is_none() && self.setpoint.is_none()
    }

    /// Promote to a [`Reading`] when every field is present.
    #[must_use]
    pub fn complete(&self) -> Option<Reading> {
        Some(Reading::new(self.temperature?, self.humidity?, self.setpoint?))
    }
}

impl From<Reading> for PartialReading {
    fn from(reading: Reading) -> Self {
        Self {
            temperature: Some(reading.temperature),
            humidity: Some(reading.humidity),
            setpoint: Some(reading.setpoint),
        }
    }
}

fn finite(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::NonFinite { field })
    }
}
