use chrono::{DateTime, Utc};
use rayon::prelude::*;

use market_core::{FinanceMetrics, PriceSeries, RawPricePoint};
use price_series::{
    coverage, freshness_days, log_returns, max_drawdown, normalize, price_at_days_back,
    return_over_days, slice_last_n_days, slope_log_price_per_day, volatility_from_log_returns,
};

use crate::indicators::{
    annualized_volatility, beta, classify_rsi, cvar_95, downside_deviation, kurtosis,
    premium_vs_retail, return_to_downside, return_to_drawdown, return_to_volatility, rsi,
    skewness, var_95,
};
use crate::score::{score_composite, ScoreInputs};

/// Everything the assembler needs for one product.
pub struct MetricsInput<'a> {
    pub prices: &'a [RawPricePoint],
    /// Original retail price; absent or non-positive means "unknown" and
    /// nulls out every retail-relative field.
    pub retail_price: Option<f64>,
    /// Optional market-return series for beta.
    pub market_returns: Option<&'a [f64]>,
    /// Injectable clock for deterministic freshness; defaults to now.
    pub now: Option<DateTime<Utc>>,
}

/// Assemble the full metrics record for one product's raw observations.
pub fn compute_finance_metrics(input: &MetricsInput) -> FinanceMetrics {
    let series = normalize(input.prices);
    metrics_over_series(&series, input.retail_price, input.market_returns, input.now)
}

/// Same assembly over an already-normalized series. The series rollup uses
/// this directly after aggregating constituents into one daily series.
///
/// Returns and volatility read the 30-day window, drawdown the 90-day
/// window; RSI and the distribution-tail indicators read the full series,
/// where a 30-day slice of sparse data is usually too thin to say anything.
pub fn metrics_over_series(
    series: &PriceSeries,
    retail_price: Option<f64>,
    market_returns: Option<&[f64]>,
    now: Option<DateTime<Utc>>,
) -> FinanceMetrics {
    let now = now.unwrap_or_else(Utc::now);

    let window_30 = slice_last_n_days(series, 30);
    let window_90 = slice_last_n_days(series, 90);

    let last_price = series.last().map(|p| p.price);
    let retail = retail_price.filter(|r| r.is_finite() && *r > 0.0);

    let premium_now = premium_vs_retail(last_price, retail);
    let premium_30d = premium_vs_retail(price_at_days_back(series, 30), retail);

    let return_7d = return_over_days(series, 7);
    let return_30d = return_over_days(series, 30);
    let volatility_30d = volatility_from_log_returns(&window_30);
    let max_drawdown_90d = max_drawdown(&window_90);
    let slope_30d = slope_log_price_per_day(&window_30);
    let coverage_30d = coverage(series, 30);
    let freshness = freshness_days(series, now);

    let window_returns = log_returns(&window_30);
    let full_returns = log_returns(series);

    let downside = downside_deviation(&window_returns);
    let rsi_14 = rsi(series, 14);

    let score = score_composite(&ScoreInputs {
        premium_30d,
        slope_30d,
        volatility_30d,
        max_drawdown_90d,
        coverage_30d,
        freshness_days: freshness,
    });

    FinanceMetrics {
        last_price,
        retail_price: retail,
        premium_now,
        premium_30d,
        return_7d,
        return_30d,
        volatility_30d,
        max_drawdown_90d,
        slope_30d,
        coverage_30d,
        freshness_days: freshness,
        score,
        sharpe_like: return_to_volatility(return_30d, volatility_30d),
        sortino_like: return_to_downside(return_30d, downside),
        calmar_like: return_to_drawdown(return_30d, max_drawdown_90d),
        annualized_volatility: annualized_volatility(volatility_30d),
        downside_deviation: downside,
        rsi_14,
        rsi_signal: rsi_14.map(classify_rsi),
        var_95: var_95(&full_returns),
        cvar_95: cvar_95(&full_returns),
        skewness: skewness(&full_returns),
        kurtosis: kurtosis(&full_returns),
        beta: market_returns.and_then(|market| beta(&full_returns, market)),
    }
}

/// Metrics for many products at once. Every input is independent, so the
/// batch fans out across the rayon pool with no coordination and the
/// output order matches the input order.
pub fn compute_metrics_batch(inputs: &[MetricsInput]) -> Vec<FinanceMetrics> {
    inputs.par_iter().map(compute_finance_metrics).collect()
}
