use market_core::{stats, PriceSeries};

/// Fractional change from `a` to `b`.
pub fn simple_return(a: f64, b: f64) -> f64 {
    b / a - 1.0
}

/// Log returns over adjacent pairs of strictly positive prices.
pub fn log_returns(series: &PriceSeries) -> Vec<f64> {
    if series.len() < 2 {
        return vec![];
    }
    series
        .points
        .windows(2)
        .filter(|w| w[0].price > 0.0 && w[1].price > 0.0)
        .map(|w| (w[1].price / w[0].price).ln())
        .collect()
}

/// Price at the most recent point at or before `last.day_index - days`.
///
/// Sparse data means this anchor can sit further back than `days` calendar
/// days; that approximation is accepted instead of interpolating prices
/// that were never observed.
pub fn price_at_days_back(series: &PriceSeries, days: i64) -> Option<f64> {
    let last = series.last()?;
    let target = last.day_index - days;
    series
        .points
        .iter()
        .rev()
        .find(|p| p.day_index <= target)
        .map(|p| p.price)
}

/// Return over a trailing day span, against the anchor point.
pub fn return_over_days(series: &PriceSeries, days: i64) -> Option<f64> {
    let last = series.last()?;
    let anchor = price_at_days_back(series, days)?;
    if anchor <= 0.0 {
        return None;
    }
    Some(simple_return(anchor, last.price))
}

/// Sample standard deviation of the series' log returns.
pub fn volatility_from_log_returns(series: &PriceSeries) -> Option<f64> {
    stats::sample_stdev(&log_returns(series))
}

/// Largest peak-to-trough decline as a fraction of the running peak, in
/// [0, 1]. A monotonically non-decreasing series has drawdown 0.
pub fn max_drawdown(series: &PriceSeries) -> Option<f64> {
    if series.len() < 2 {
        return None;
    }
    let mut peak = series.points[0].price;
    let mut max_dd = 0.0_f64;
    for point in &series.points {
        if point.price > peak {
            peak = point.price;
        }
        let drawdown = (peak - point.price) / peak;
        if drawdown > max_dd {
            max_dd = drawdown;
        }
    }
    Some(max_dd)
}

/// OLS slope of ln(price) on the absolute day index, in log-price units
/// per day. Centered on the means to keep large day indices from eating
/// the significand.
pub fn slope_log_price_per_day(series: &PriceSeries) -> Option<f64> {
    if series.len() < 2 {
        return None;
    }
    let n = series.len() as f64;
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    for point in &series.points {
        if point.price <= 0.0 {
            return None;
        }
        sum_x += point.day_index as f64;
        sum_y += point.price.ln();
    }
    let mean_x = sum_x / n;
    let mean_y = sum_y / n;

    let mut covariance = 0.0;
    let mut x_variance = 0.0;
    for point in &series.points {
        let dx = point.day_index as f64 - mean_x;
        covariance += dx * (point.price.ln() - mean_y);
        x_variance += dx * dx;
    }
    if x_variance < f64::EPSILON {
        return None;
    }
    Some(covariance / x_variance)
}
