//! Piecewise-linear curves evaluated over normalized level progress.

use serde::{Deserialize, Serialize};

/// Single control point of a [`Curve`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CurveKey {
    /// Position of the key along the curve, usually level progress.
    pub at: f32,
    /// Value of the curve at `at`.
    pub value: f32,
}

impl CurveKey {
    /// Creates a control point.
    #[must_use]
    pub const fn new(at: f32, value: f32) -> Self {
        Self { at, value }
    }
}

/// Piecewise-linear curve that holds its first and last values outside the key range.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Curve {
    keys: Vec<CurveKey>,
}

/// Reasons a curve cannot be evaluated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CurveError {
    /// The curve contains no keys.
    #[error("curve has no keys")]
    Empty,
    /// A key position or value is NaN or infinite.
    #[error("curve key {index} is not finite")]
    NonFinite {
        /// Index of the offending key.
        index: usize,
    },
    /// Key positions are not strictly increasing.
    #[error("curve key {index} does not come after the previous key")]
    Unordered {
        /// Index of the offending key.
        index: usize,
    },
    /// A key value is below the permitted minimum.
    #[error("curve key {index} is negative")]
    Negative {
        /// Index of the offending key.
        index: usize,
    },
}

impl Curve {
    /// Creates a curve from keys. Call [`Curve::validate`] before evaluating untrusted data.
    #[must_use]
    pub fn new(keys: Vec<CurveKey>) -> Self {
        Self { keys }
    }

    /// Creates a curve that evaluates to `value` everywhere.
    #[must_use]
    pub fn constant(value: f32) -> Self {
        Self::new(vec![CurveKey::new(0.0, value)])
    }

    /// Creates a curve from `(at, value)` pairs.
    #[must_use]
    pub fn from_points(points: &[(f32, f32)]) -> Self {
        Self::new(
            points
                .iter()
                .map(|&(at, value)| CurveKey::new(at, value))
                .collect(),
        )
    }

    /// Checks that the curve is non-empty, finite, ordered, and never negative.
    pub fn validate(&self) -> Result<(), CurveError> {
        if self.keys.is_empty() {
            return Err(CurveError::Empty);
        }

        let mut previous: Option<f32> = None;
        for (index, key) in self.keys.iter().enumerate() {
            if !key.at.is_finite() || !key.value.is_finite() {
                return Err(CurveError::NonFinite { index });
            }
            if key.value < 0.0 {
                return Err(CurveError::Negative { index });
            }
            if previous.is_some_and(|at| key.at <= at) {
                return Err(CurveError::Unordered { index });
            }
            previous = Some(key.at);
        }

        Ok(())
    }

    /// Evaluates the curve at `x`. An empty curve evaluates to zero.
    #[must_use]
    pub fn sample(&self, x: f32) -> f32 {
        let Some(first) = self.keys.first() else {
            return 0.0;
        };
        if x <= first.at {
            return first.value;
        }

        let upper = self.keys.partition_point(|key| key.at <= x);
        let Some(next) = self.keys.get(upper) else {
            return self.keys[self.keys.len() - 1].value;
        };
        let previous = self.keys[upper - 1];

        let span = next.at - previous.at;
        if span <= 0.0 {
            return next.value;
        }
        let t = (x - previous.at) / span;
        previous.value + (next.value - previous.value) * t
    }
}
