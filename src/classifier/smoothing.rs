//! Reference moving-average smoother.

use super::collaborators::Smoother;
use super::series::TimeSeries;

/// Replaces each block of `window` consecutive raw observations by its mean.
///
/// Only values appended since the previous pass are folded; earlier
/// aggregates are kept as they are. A trailing partial block is averaged on
/// its own. Every observation folded away is added to the skipped count, so
/// the original-time-base position of the series is preserved.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockMovingAverage;

impl Smoother for BlockMovingAverage {
    fn apply_moving_average(&self, series: &TimeSeries, window: usize) -> TimeSeries {
        let raw = series.unsmoothed_values();
        if window <= 1 || raw.is_empty() {
            return series.clone();
        }

        let mut values = series.smoothed_values().to_vec();
        values.extend(
            raw.chunks(window)
                .map(|block| block.iter().sum::<f64>() / block.len() as f64),
        );
        let folded = series.size() - values.len();

        TimeSeries::smoothed(values, series.frequency(), series.skipped_values() + folded)
    }
}
