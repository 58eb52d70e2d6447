//! Workload time series.

use serde::{Deserialize, Serialize};

/// Ordered observations of a workload's intensity.
///
/// Smoothing replaces raw observations with fewer, aggregated ones and adds
/// the difference to `skipped_values`, so [`TimeSeries::position`] keeps
/// counting in the original, unsmoothed time base. Aggregates always form a
/// prefix of the retained values; observations appended later are raw.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    values: Vec<f64>,
    /// Seasonal period length in observations (0 = unknown)
    #[serde(default)]
    frequency: usize,
    /// Observations dropped or aggregated away by earlier smoothing passes
    #[serde(default)]
    skipped_values: usize,
    /// Leading retained values that are smoothing aggregates
    #[serde(default)]
    smoothed_len: usize,
}

impl TimeSeries {
    /// Create a series with a known seasonal frequency.
    pub fn new(values: Vec<f64>, frequency: usize) -> Self {
        Self {
            values,
            frequency,
            skipped_values: 0,
            smoothed_len: 0,
        }
    }

    /// Create a series that has already lost `skipped_values` observations.
    pub fn with_skipped(values: Vec<f64>, frequency: usize, skipped_values: usize) -> Self {
        Self {
            values,
            frequency,
            skipped_values,
            smoothed_len: 0,
        }
    }

    /// Result of a smoothing pass: every value in `values` is an aggregate.
    pub fn smoothed(values: Vec<f64>, frequency: usize, skipped_values: usize) -> Self {
        Self {
            smoothed_len: values.len(),
            values,
            frequency,
            skipped_values,
        }
    }

    /// Number of retained observations.
    pub fn size(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn frequency(&self) -> usize {
        self.frequency
    }

    pub fn set_frequency(&mut self, frequency: usize) {
        self.frequency = frequency;
    }

    pub fn skipped_values(&self) -> usize {
        self.skipped_values
    }

    /// Position in the original time base: retained plus skipped observations.
    pub fn position(&self) -> usize {
        self.values.len() + self.skipped_values
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of leading values produced by earlier smoothing passes.
    fn smoothed_len(&self) -> usize {
        self.smoothed_len.min(self.values.len())
    }

    /// Aggregates left by earlier smoothing passes.
    pub fn smoothed_values(&self) -> &[f64] {
        &self.values[..self.smoothed_len()]
    }

    /// Raw observations appended since the last smoothing pass.
    pub fn unsmoothed_values(&self) -> &[f64] {
        &self.values[self.smoothed_len()..]
    }

    /// Append one observation.
    pub fn push(&mut self, value: f64) {
        self.values.push(value);
    }

    /// Append many observations.
    pub fn extend_from_slice(&mut self, values: &[f64]) {
        self.values.extend_from_slice(values);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_counts_skipped() {
        let series = TimeSeries::with_skipped(vec![1.0, 2.0, 3.0], 4, 6);
        assert_eq!(series.size(), 3);
        assert_eq!(series.position(), 9);
        assert_eq!(series.frequency(), 4);
    }

    #[test]
    fn test_appended_values_are_unsmoothed() {
        let mut series = TimeSeries::smoothed(vec![2.0, 5.0], 0, 4);
        series.extend_from_slice(&[3.0, 4.0]);
        series.push(5.0);

        assert_eq!(series.smoothed_values(), &[2.0, 5.0]);
        assert_eq!(series.unsmoothed_values(), &[3.0, 4.0, 5.0]);
        assert_eq!(series.position(), 9);
        assert!(TimeSeries::new(vec![1.0], 0).smoothed_values().is_empty());
    }

    #[test]
    fn test_deserialize_defaults() {
        let series: TimeSeries = serde_json::from_str(r#"{"values":[1.0,0.0]}"#).unwrap();
        assert_eq!(series.frequency(), 0);
        assert_eq!(series.skipped_values(), 0);
        assert_eq!(series.size(), 2);
    }
}
