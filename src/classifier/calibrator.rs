//! Horizon calibration on entry into the Fast tier.
//!
//! The Fast tier widens the forecast lookahead and the sampling period by
//! `period_factor_fast`, unless that would push the horizon past
//! `max_horizon`, in which case the horizon is clamped and the period kept.
//!
//! ```text
//! recent' = min(recent × factor, max)
//! period' = period × factor   iff recent × factor ≤ max
//! ```

use std::time::Duration;

use super::objectives::ForecastObjectives;

/// Result of one calibration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calibration {
    pub recent_horizon: u32,
    pub period: Duration,
    /// True if the horizon hit `max_horizon` and the period was left alone
    pub clamped: bool,
}

/// Scale horizon and period by `factor` without breaching `max_horizon`.
///
/// Total over all inputs: a product that overflows `u32` exceeds any
/// `max_horizon` and clamps.
pub fn calibrate_horizon(
    objectives: &mut ForecastObjectives,
    period: &mut Duration,
    factor: u32,
) -> Calibration {
    let widened = objectives
        .recent_horizon
        .checked_mul(factor)
        .filter(|h| *h <= objectives.max_horizon);

    let clamped = match widened {
        Some(horizon) => {
            objectives.recent_horizon = horizon;
            *period = period.checked_mul(factor).unwrap_or(Duration::MAX);
            false
        }
        None => {
            objectives.recent_horizon = objectives.max_horizon;
            true
        }
    };

    Calibration {
        recent_horizon: objectives.recent_horizon,
        period: *period,
        clamped,
    }
}
