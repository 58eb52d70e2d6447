//! Statistical index vector describing a series window.

use serde::{Deserialize, Serialize};

/// The six shape statistics computed over the most recent window.
///
/// Collaborators that produce a positional array use the order of
/// `From<[f64; 6]>`: variance coefficient, burstiness, relative monotonicity,
/// zero-value rate, quartile dispersion, relative gradient.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexVector {
    pub variance_coefficient: f64,
    pub burstiness: f64,
    pub relative_monotonicity: f64,
    pub zero_value_rate: f64,
    pub quartile_dispersion: f64,
    pub relative_gradient: f64,
}

impl From<[f64; 6]> for IndexVector {
    fn from(v: [f64; 6]) -> Self {
        Self {
            variance_coefficient: v[0],
            burstiness: v[1],
            relative_monotonicity: v[2],
            zero_value_rate: v[3],
            quartile_dispersion: v[4],
            relative_gradient: v[5],
        }
    }
}

impl From<IndexVector> for [f64; 6] {
    fn from(v: IndexVector) -> Self {
        [
            v.variance_coefficient,
            v.burstiness,
            v.relative_monotonicity,
            v.zero_value_rate,
            v.quartile_dispersion,
            v.relative_gradient,
        ]
    }
}

impl IndexVector {
    /// True if every index is a finite number.
    pub fn is_finite(&self) -> bool {
        <[f64; 6]>::from(*self).iter().all(|v| v.is_finite())
    }
}
