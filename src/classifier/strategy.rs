//! Forecast strategies, classification levels and forecast results.

use serde::{Deserialize, Serialize};

/// Forecasting algorithm occupying a strategy slot.
///
/// The Fast tier only ever selects cubic spline, SES, ARIMA(1,0,1) and Croston.
/// `Naive`, `Arima`, `Ets` and `Tbats` are assigned by the external Complex
/// tier and are carried here so its choices survive in the workload state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastStrategy {
    /// Slot disabled
    Inactive,
    /// Last value repeated
    Naive,
    /// Cubic spline interpolation
    CubicSpline,
    /// Simple exponential smoothing
    Ses,
    /// ARIMA(1,0,1)
    Arima101,
    /// Croston's method for intermittent demand
    Croston,
    /// Seasonal ARIMA with fitted orders
    Arima,
    /// Exponential smoothing state space model
    Ets,
    /// Trigonometric seasonal exponential smoothing
    Tbats,
}

impl ForecastStrategy {
    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            ForecastStrategy::Inactive => "inactive",
            ForecastStrategy::Naive => "naive",
            ForecastStrategy::CubicSpline => "cs",
            ForecastStrategy::Ses => "ses",
            ForecastStrategy::Arima101 => "arima101",
            ForecastStrategy::Croston => "croston",
            ForecastStrategy::Arima => "arima",
            ForecastStrategy::Ets => "ets",
            ForecastStrategy::Tbats => "tbats",
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, ForecastStrategy::Inactive)
    }
}

/// Classification tier currently responsible for a workload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationLevel {
    /// Cheap index heuristics
    #[default]
    Fast,
    /// Deeper analysis, entered once the series is large enough
    Complex,
}

impl ClassificationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassificationLevel::Fast => "fast",
            ClassificationLevel::Complex => "complex",
        }
    }
}

/// Outcome of a previously run strategy slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    /// Strategy that produced the forecast
    pub strategy: ForecastStrategy,
    /// Whether the forecast passed the plausibility check
    pub plausible: bool,
}

impl ForecastResult {
    pub fn new(strategy: ForecastStrategy, plausible: bool) -> Self {
        Self {
            strategy,
            plausible,
        }
    }
}
