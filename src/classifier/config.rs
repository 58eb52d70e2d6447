//! Thresholds for the Fast classification tier.

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Tunable thresholds and constants for the Fast classification tier.
///
/// A workload's [`ClassificationSetting`](super::ClassificationSetting) is seeded
/// from this record. Validation happens once, at load time; the decision
/// procedure assumes a validated config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationConfig {
    // === Horizon calibration ===
    /// Factor applied to the recent horizon and sampling period on Fast activation
    pub period_factor_fast: u32,

    // === Escalation ===
    /// Series size at which escalation to the Complex tier is considered.
    /// Tightened per workload to 3 × frequency once the frequency is known.
    pub size_threshold_fast: usize,

    /// Overhead above which escalation to the Complex tier is allowed
    pub overhead_threshold_fast: f64,

    // === Smoothing ===
    /// Moving-average window, also the index computation window
    pub last_x_values: usize,

    /// Quartile dispersion above this votes for smoothing
    pub quartile_dispersion_threshold_smoothing: f64,

    /// Burstiness below this votes for smoothing
    pub burstiness_threshold_smoothing: f64,

    /// Variance coefficient above this votes for smoothing
    pub variance_coefficient_threshold_smoothing: f64,

    /// Relative monotonicity below this votes for smoothing
    pub relative_monotonicity_smoothing: f64,

    // === Strategy selection ===
    /// Zero-value rate above this selects Croston's method
    pub rate_of_zero_values_threshold: f64,

    /// Minimum relative gradient for cubic spline eligibility
    pub relative_gradient_threshold_cs: f64,

    /// Minimum burstiness for cubic spline eligibility
    pub burstiness_threshold_cs: f64,

    /// Minimum relative monotonicity for cubic spline eligibility
    pub relative_monotonicity_cs: f64,

    /// Observed MASE above which an implausible cubic spline result is abandoned
    pub cs_error_threshold: f64,

    /// Freeze strategy selection (indices are still refreshed)
    pub fixed_forecast_strategy: bool,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            period_factor_fast: 2,

            size_threshold_fast: 50,
            overhead_threshold_fast: 1.0,

            last_x_values: 3, // MA(3)
            quartile_dispersion_threshold_smoothing: 0.5,
            burstiness_threshold_smoothing: 0.05,
            variance_coefficient_threshold_smoothing: 0.5,
            relative_monotonicity_smoothing: 0.3,

            rate_of_zero_values_threshold: 0.25,
            relative_gradient_threshold_cs: 0.5,
            burstiness_threshold_cs: 0.05,
            relative_monotonicity_cs: 0.3,
            cs_error_threshold: 1.0,

            fixed_forecast_strategy: false,
        }
    }
}

impl ClassificationConfig {
    /// Escalate early and smooth eagerly. Suited to short-period series.
    pub fn responsive() -> Self {
        Self {
            size_threshold_fast: 30,
            overhead_threshold_fast: 0.5,
            quartile_dispersion_threshold_smoothing: 0.3,
            variance_coefficient_threshold_smoothing: 0.3,
            ..Default::default()
        }
    }

    /// Stay in the Fast tier longer and smooth reluctantly.
    pub fn conservative() -> Self {
        Self {
            size_threshold_fast: 100,
            overhead_threshold_fast: 2.0,
            quartile_dispersion_threshold_smoothing: 0.8,
            variance_coefficient_threshold_smoothing: 0.8,
            ..Default::default()
        }
    }

    /// Pin strategy selection.
    pub fn with_fixed_strategy(mut self, fixed: bool) -> Self {
        self.fixed_forecast_strategy = fixed;
        self
    }

    /// Override the smoothing / index window.
    pub fn with_last_x_values(mut self, window: usize) -> Self {
        self.last_x_values = window;
        self
    }

    /// Parse a TOML document and validate it.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s).map_err(|e| ConfigError::Toml(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make the decision procedure degenerate.
    ///
    /// A zero size threshold escalates every workload on its first cycle, so it
    /// is refused here rather than at classification time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.period_factor_fast == 0 {
            return Err(ConfigError::ZeroPeriodFactor);
        }
        if self.last_x_values == 0 {
            return Err(ConfigError::ZeroSmoothingWindow);
        }
        if self.size_threshold_fast == 0 {
            return Err(ConfigError::InvalidThreshold {
                name: "size_threshold_fast",
                reason: "must be > 0".to_string(),
            });
        }

        let finite = [
            ("overhead_threshold_fast", self.overhead_threshold_fast),
            (
                "quartile_dispersion_threshold_smoothing",
                self.quartile_dispersion_threshold_smoothing,
            ),
            (
                "burstiness_threshold_smoothing",
                self.burstiness_threshold_smoothing,
            ),
            (
                "variance_coefficient_threshold_smoothing",
                self.variance_coefficient_threshold_smoothing,
            ),
            (
                "relative_monotonicity_smoothing",
                self.relative_monotonicity_smoothing,
            ),
            (
                "rate_of_zero_values_threshold",
                self.rate_of_zero_values_threshold,
            ),
            (
                "relative_gradient_threshold_cs",
                self.relative_gradient_threshold_cs,
            ),
            ("burstiness_threshold_cs", self.burstiness_threshold_cs),
            ("relative_monotonicity_cs", self.relative_monotonicity_cs),
            ("cs_error_threshold", self.cs_error_threshold),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(ConfigError::InvalidThreshold {
                    name,
                    reason: format!("must be finite, got {value}"),
                });
            }
        }

        if !(0.0..=1.0).contains(&self.rate_of_zero_values_threshold) {
            return Err(ConfigError::InvalidThreshold {
                name: "rate_of_zero_values_threshold",
                reason: format!(
                    "must be in [0.0, 1.0], got {}",
                    self.rate_of_zero_values_threshold
                ),
            });
        }
        Ok(())
    }
}
