use statrs::statistics::Statistics;

use market_core::{stats, PriceSeries, RsiSignal};

/// Daily sampling cadence: collectible sales happen on calendar days, not
/// exchange sessions.
const PERIODS_PER_YEAR: f64 = 365.0;

fn ratio(numer: Option<f64>, denom: Option<f64>) -> Option<f64> {
    let (n, d) = (numer?, denom?);
    if d <= 0.0 {
        return None;
    }
    Some(n / d)
}

/// Sharpe-shaped return-to-volatility ratio. No risk-free leg: a sealed
/// product market has no meaningful funding rate to subtract.
pub fn return_to_volatility(ret: Option<f64>, volatility: Option<f64>) -> Option<f64> {
    ratio(ret, volatility)
}

/// Sortino-shaped return-to-downside-deviation ratio.
pub fn return_to_downside(ret: Option<f64>, downside_dev: Option<f64>) -> Option<f64> {
    ratio(ret, downside_dev)
}

/// Calmar-shaped return-to-drawdown ratio. Undefined at zero drawdown
/// rather than unbounded.
pub fn return_to_drawdown(ret: Option<f64>, drawdown: Option<f64>) -> Option<f64> {
    ratio(ret, drawdown)
}

/// Scale a per-observation volatility to an annual figure.
pub fn annualized_volatility(volatility: Option<f64>) -> Option<f64> {
    Some(volatility? * PERIODS_PER_YEAR.sqrt())
}

/// Sample standard deviation over the negative log returns only.
pub fn downside_deviation(returns: &[f64]) -> Option<f64> {
    let negatives: Vec<f64> = returns.iter().copied().filter(|r| *r < 0.0).collect();
    stats::sample_stdev(&negatives)
}

/// Relative Strength Index with Wilder smoothing, over the entire series.
///
/// Period-over-period price changes, not calendar-day changes. The full
/// history is used instead of a fixed lookback window: observations are
/// sparse enough that a strict window would leave RSI undefined for most
/// products.
pub fn rsi(series: &PriceSeries, period: usize) -> Option<f64> {
    if period == 0 || series.len() < period + 1 {
        return None;
    }

    let prices = series.prices();
    let mut gains = Vec::with_capacity(prices.len() - 1);
    let mut losses = Vec::with_capacity(prices.len() - 1);
    for w in prices.windows(2) {
        let change = w[1] - w[0];
        if change > 0.0 {
            gains.push(change);
            losses.push(0.0);
        } else {
            gains.push(0.0);
            losses.push(change.abs());
        }
    }

    let mut avg_gain = gains[..period].iter().sum::<f64>() / period as f64;
    let mut avg_loss = losses[..period].iter().sum::<f64>() / period as f64;
    for i in period..gains.len() {
        avg_gain = (avg_gain * (period - 1) as f64 + gains[i]) / period as f64;
        avg_loss = (avg_loss * (period - 1) as f64 + losses[i]) / period as f64;
    }

    if avg_loss == 0.0 {
        return Some(100.0);
    }
    let rs = avg_gain / avg_loss;
    Some(100.0 - 100.0 / (1.0 + rs))
}

/// Classify an RSI reading at the classic 30/70 bounds.
pub fn classify_rsi(value: f64) -> RsiSignal {
    if value < 30.0 {
        RsiSignal::Oversold
    } else if value > 70.0 {
        RsiSignal::Overbought
    } else {
        RsiSignal::Neutral
    }
}

/// 95% Value-at-Risk: magnitude of the 5th-percentile log return.
pub fn var_95(returns: &[f64]) -> Option<f64> {
    if returns.len() < 2 {
        return None;
    }
    let mut sorted = returns.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let index = (returns.len() as f64 * 0.05) as usize;
    Some(sorted[index.min(sorted.len() - 1)].abs())
}

/// 95% Conditional VaR: mean magnitude of the tail at or below the 5th
/// percentile.
pub fn cvar_95(returns: &[f64]) -> Option<f64> {
    if returns.len() < 2 {
        return None;
    }
    let mut sorted = returns.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let cutoff = ((returns.len() as f64 * 0.05).ceil() as usize).clamp(1, sorted.len());
    let tail = &sorted[..cutoff];
    Some((tail.iter().sum::<f64>() / tail.len() as f64).abs())
}

/// Third standardized moment of the return distribution.
pub fn skewness(returns: &[f64]) -> Option<f64> {
    standardized_moment(returns, 3)
}

/// Excess kurtosis: fourth standardized moment minus 3 (normal = 0).
pub fn kurtosis(returns: &[f64]) -> Option<f64> {
    Some(standardized_moment(returns, 4)? - 3.0)
}

fn standardized_moment(returns: &[f64], order: i32) -> Option<f64> {
    if returns.len() < 3 {
        return None;
    }
    let mean = returns.mean();
    let std_dev = returns.std_dev();
    if !(std_dev > 0.0) {
        return None;
    }
    let n = returns.len() as f64;
    Some(
        returns
            .iter()
            .map(|r| ((r - mean) / std_dev).powi(order))
            .sum::<f64>()
            / n,
    )
}

/// Covariance with a market-return series over the market's variance,
/// aligned on the trailing overlap of the two series.
pub fn beta(returns: &[f64], market_returns: &[f64]) -> Option<f64> {
    let n = returns.len().min(market_returns.len());
    if n < 2 {
        return None;
    }
    let own = &returns[returns.len() - n..];
    let market = &market_returns[market_returns.len() - n..];

    let own_mean = own.mean();
    let market_mean = market.mean();

    let mut covariance = 0.0;
    let mut market_variance = 0.0;
    for i in 0..n {
        let own_diff = own[i] - own_mean;
        let market_diff = market[i] - market_mean;
        covariance += own_diff * market_diff;
        market_variance += market_diff * market_diff;
    }

    if market_variance == 0.0 {
        return None;
    }
    Some(covariance / market_variance)
}

/// Fractional excess of a market price over the original retail price.
/// `None` unless both values are finite and retail is positive: an unknown
/// or zero retail price must never turn into a division.
pub fn premium_vs_retail(price: Option<f64>, retail: Option<f64>) -> Option<f64> {
    let (p, r) = (price?, retail?);
    if !p.is_finite() || !r.is_finite() || r <= 0.0 {
        return None;
    }
    Some(p / r - 1.0)
}
