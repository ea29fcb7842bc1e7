//! Triangular membership functions.

use crate::error::ValidationError;

/// Triangular membership function with breakpoints `a <= b <= c`.
///
/// The degree is `1` at the peak `b`, rises linearly on `(a, b)`, falls
/// linearly on `(b, c)` and is `0` elsewhere. A shoulder (`a == b` or
/// `b == c`) keeps full membership at the shared breakpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangular {
    a: f64,
    b: f64,
    c: f64,
}

impl Triangular {
    /// # Errors
    ///
    /// Returns [`ValidationError::UnorderedBreakpoints`] unless `a <= b <= c`
    /// (which also rejects NaN breakpoints).
    pub fn new(a: f64, b: f64, c: f64) -> Result<Self, ValidationError> {
        if a <= b && b <= c {
            Ok(Self { a, b, c })
        } else {
            Err(ValidationError::UnorderedBreakpoints { a, b, c })
        }
    }

    #[must_use]
    pub fn breakpoints(&self) -> (f64, f64, f64) {
        (self.a, self.b, self.c)
    }

    /// Membership degree of `x`, in `[0, 1]`.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn degree(&self, x: f64) -> f64 {
        let Self { a, b, c } = *self;
        if x == b {
            1.0
        } else if a < x && x < b {
            (x - a) / (b - a)
        } else if b < x && x < c {
            (c - x) / (c - b)
        } else {
            0.0
        }
    }
}
