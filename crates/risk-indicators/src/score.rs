//! Composite health score (V1).
//!
//! Four normalized sub-scores weighted into a single 0-100 reading:
//! return 40%, trend 25%, risk 20%, data quality 15%. Each sub-score maps
//! its input from a fixed plausible range onto [0, 1] and clamps outside
//! it. A missing sub-score input substitutes the neutral midpoint 0.5;
//! this is the one documented place where `None` does not propagate. The
//! score itself is `None` only when premium and slope are both missing,
//! meaning there is no price information to grade at all.

/// Inputs the scorer pulls from the windowed metrics.
#[derive(Debug, Clone, Default)]
pub struct ScoreInputs {
    pub premium_30d: Option<f64>,
    pub slope_30d: Option<f64>,
    pub volatility_30d: Option<f64>,
    pub max_drawdown_90d: Option<f64>,
    pub coverage_30d: Option<f64>,
    pub freshness_days: Option<i64>,
}

const WEIGHT_RETURN: f64 = 0.40;
const WEIGHT_TREND: f64 = 0.25;
const WEIGHT_RISK: f64 = 0.20;
const WEIGHT_QUALITY: f64 = 0.15;

const NEUTRAL: f64 = 0.5;

/// Freshness decays linearly to 0 at 14 stale days.
const FRESHNESS_HORIZON_DAYS: f64 = 14.0;

fn unit_scale(value: f64, lo: f64, hi: f64) -> f64 {
    ((value - lo) / (hi - lo)).clamp(0.0, 1.0)
}

pub fn score_composite(inputs: &ScoreInputs) -> Option<i32> {
    if inputs.premium_30d.is_none() && inputs.slope_30d.is_none() {
        return None;
    }

    let return_score = inputs
        .premium_30d
        .map(|p| unit_scale(p, -0.50, 1.50))
        .unwrap_or(NEUTRAL);

    let trend_score = inputs
        .slope_30d
        .map(|s| unit_scale(s, -0.01, 0.01))
        .unwrap_or(NEUTRAL);

    // Lower risk scores higher.
    let volatility_score = inputs
        .volatility_30d
        .map(|v| 1.0 - unit_scale(v, 0.0, 0.10))
        .unwrap_or(NEUTRAL);
    let drawdown_score = inputs
        .max_drawdown_90d
        .map(|d| 1.0 - unit_scale(d, 0.0, 0.50))
        .unwrap_or(NEUTRAL);
    let risk_score = 0.55 * volatility_score + 0.45 * drawdown_score;

    let coverage_score = inputs
        .coverage_30d
        .map(|c| c.clamp(0.0, 1.0))
        .unwrap_or(NEUTRAL);
    let freshness_score = inputs
        .freshness_days
        .map(|d| (1.0 - d as f64 / FRESHNESS_HORIZON_DAYS).clamp(0.0, 1.0))
        .unwrap_or(NEUTRAL);
    let quality_score = 0.65 * coverage_score + 0.35 * freshness_score;

    let total = WEIGHT_RETURN * return_score
        + WEIGHT_TREND * trend_score
        + WEIGHT_RISK * risk_score
        + WEIGHT_QUALITY * quality_score;

    Some(((total * 100.0).round() as i32).clamp(0, 100))
}
