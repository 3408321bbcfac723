//! Holt linear (additive trend) exponential smoothing.
//!
//! Pure math, no IO. The smoothing parameters are chosen by grid search over
//! `0.05..=0.95` (step `0.05`) minimising the one-step-ahead squared error.

use serde::Serialize;

pub const DEFAULT_FORECAST_PERIODS: usize = 12;

const GRID_STEPS: usize = 19;

/// A fitted model, ready to project forward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HoltModel {
    pub alpha: f64,
    pub beta: f64,
    pub level: f64,
    pub trend: f64,
    /// One-step-ahead sum of squared errors over the history.
    pub sse: f64,
}

impl HoltModel {
    pub fn forecast(&self, periods: usize) -> Vec<f64> {
        (1..=periods)
            .map(|h| self.level + h as f64 * self.trend)
            .collect()
    }
}

fn grid() -> impl Iterator<Item = f64> + Clone {
    (1..=GRID_STEPS).map(|i| i as f64 * 0.05)
}

/// Run the recursion with fixed parameters. `series.len() >= 2`.
fn smooth(series: &[f64], alpha: f64, beta: f64) -> HoltModel {
    let mut level = series[0];
    let mut trend = series[1] - series[0];
    let mut sse = 0.0;

    for &y in &series[1..] {
        let predicted = level + trend;
        let err = y - predicted;
        sse += err * err;

        let prev_level = level;
        level = alpha * y + (1.0 - alpha) * (level + trend);
        trend = beta * (level - prev_level) + (1.0 - beta) * trend;
    }

    HoltModel {
        alpha,
        beta,
        level,
        trend,
        sse,
    }
}

/// Fit the model, or `None` for an empty series.
///
/// A single observation gives a flat model at that value.
pub fn fit(series: &[f64]) -> Option<HoltModel> {
    match series {
        [] => None,
        [only] => Some(HoltModel {
            alpha: 1.0,
            beta: 0.0,
            level: *only,
            trend: 0.0,
            sse: 0.0,
        }),
        _ => {
            let mut best: Option<HoltModel> = None;
            for alpha in grid() {
                for beta in grid() {
                    let candidate = smooth(series, alpha, beta);
                    if best.is_none_or(|b| candidate.sse < b.sse) {
                        best = Some(candidate);
                    }
                }
            }
            best
        }
    }
}

/// Fit and project `periods` steps ahead. Empty history yields an empty forecast.
pub fn holt_forecast(series: &[f64], periods: usize) -> Vec<f64> {
    fit(series).map(|m| m.forecast(periods)).unwrap_or_default()
}
