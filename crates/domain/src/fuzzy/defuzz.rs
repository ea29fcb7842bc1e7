//! Aggregation and centroid defuzzification over a sampled universe.

use crate::error::ComputationError;

use super::membership::Triangular;

/// Pointwise maximum of every consequent set clipped at its firing strength.
#[must_use]
pub fn aggregate<'a>(
    samples: &[f64],
    clipped: impl IntoIterator<Item = (f64, &'a Triangular)>,
) -> Vec<f64> {
    let mut shape = vec![0.0_f64; samples.len()];
    for (strength, membership) in clipped {
        if strength <= 0.0 {
            continue;
        }
        for (y, x) in shape.iter_mut().zip(samples) {
            *y = (*y).max(strength.min(membership.degree(*x)));
        }
    }
    shape
}

/// Centre of gravity of the piecewise-linear shape through `(xs[i], ys[i])`.
///
/// Each segment is integrated as a trapezoid, so the result does not depend
/// on how finely flat regions are sampled.
///
/// # Errors
///
/// Returns [`ComputationError::EmptyAggregate`] when the shape has zero area
/// or the centroid is not finite.
pub fn centroid(
    variable: &'static str,
    xs: &[f64],
    ys: &[f64],
) -> Result<f64, ComputationError> {
    let mut moment = 0.0;
    let mut area = 0.0;
    for (x, y) in xs.windows(2).zip(ys.windows(2)) {
        let (x1, x2, y1, y2) = (x[0], x[1], y[0], y[1]);
        let width = x2 - x1;
        if width <= 0.0 || (y1 <= 0.0 && y2 <= 0.0) {
            continue;
        }
        let (segment_moment, segment_area) = if (y1 - y2).abs() < f64::EPSILON {
            (0.5 * (x1 + x2), width * y1)
        } else if y1 <= 0.0 {
            (x1 + 2.0 / 3.0 * width, 0.5 * width * y2)
        } else if y2 <= 0.0 {
            (x1 + width / 3.0, 0.5 * width * y1)
        } else {
            (
                x1 + (2.0 / 3.0 * width * (y2 + 0.5 * y1)) / (y1 + y2),
                0.5 * width * (y1 + y2),
            )
        };
        moment += segment_moment * segment_area;
        area += segment_area;
    }
    if area <= 0.0 {
        return Err(ComputationError::EmptyAggregate { variable });
    }
    let value = moment / area;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ComputationError::EmptyAggregate { variable })
    }
}
