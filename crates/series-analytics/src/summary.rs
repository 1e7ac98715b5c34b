use chrono::{DateTime, Utc};

use market_core::{stats, RawPricePoint, TrendTag};
use market_index::daily_median_series;
use price_series::normalize;
use risk_indicators::metrics_over_series;

use crate::models::{SeriesFinanceSummary, SeriesGroup, SeriesKpis};

/// Roll one series group up into its financial summary.
///
/// Constituents are collapsed into the group's own daily median series,
/// and the full metrics record is computed over that aggregate against the
/// median constituent retail price.
pub fn summarize_series(group: &SeriesGroup, now: DateTime<Utc>) -> SeriesFinanceSummary {
    let retail_prices: Vec<f64> = group
        .items
        .iter()
        .filter_map(|i| i.retail_price)
        .filter(|r| r.is_finite() && *r > 0.0)
        .collect();
    let retail_price = stats::median(&retail_prices);

    let items_prices: Vec<Vec<RawPricePoint>> =
        group.items.iter().map(|i| i.prices.clone()).collect();
    let aggregate = daily_median_series(&items_prices);

    let metrics = metrics_over_series(&aggregate, retail_price, None, Some(now));

    let last_prices: Vec<f64> = group
        .items
        .iter()
        .filter_map(|i| normalize(&i.prices).last().map(|p| p.price))
        .collect();

    tracing::debug!(
        "series {}: {} items over {} aggregated days",
        group.name,
        group.items.len(),
        aggregate.len()
    );

    SeriesFinanceSummary {
        name: group.name.clone(),
        retail_price,
        index_count: aggregate.len(),
        index_last_date: aggregate.last().map(|p| p.date),
        trend_7d: TrendTag::from_return(metrics.return_7d),
        trend_30d: TrendTag::from_return(metrics.return_30d),
        min_price: last_prices.iter().copied().reduce(f64::min),
        max_price: last_prices.iter().copied().reduce(f64::max),
        item_count: group.items.len(),
        metrics,
    }
}

/// Roll up every group.
pub fn summarize_all(groups: &[SeriesGroup], now: DateTime<Utc>) -> Vec<SeriesFinanceSummary> {
    groups.iter().map(|g| summarize_series(g, now)).collect()
}

/// Aggregate KPIs across all series summaries. A missing score, premium,
/// or volatility drops that series from the corresponding aggregate; it is
/// never counted as 0.
pub fn compute_series_kpis(summaries: &[SeriesFinanceSummary]) -> SeriesKpis {
    let scores: Vec<f64> = summaries
        .iter()
        .filter_map(|s| s.metrics.score.map(|v| v as f64))
        .collect();
    let premiums: Vec<f64> = summaries
        .iter()
        .filter_map(|s| s.metrics.premium_now)
        .collect();
    let volatilities: Vec<f64> = summaries
        .iter()
        .filter_map(|s| s.metrics.volatility_30d)
        .collect();

    SeriesKpis {
        series_count: summaries.len(),
        item_count: summaries.iter().map(|s| s.item_count).sum(),
        up_trend_7d: summaries.iter().filter(|s| s.trend_7d == TrendTag::Up).count(),
        down_trend_7d: summaries.iter().filter(|s| s.trend_7d == TrendTag::Down).count(),
        avg_score: stats::mean(&scores),
        median_premium: stats::median(&premiums),
        median_volatility_30d: stats::median(&volatilities),
    }
}
