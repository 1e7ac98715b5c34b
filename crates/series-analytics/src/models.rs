use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use market_core::{FinanceMetrics, RawPricePoint, TrendTag};

/// One constituent product of a named series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesItem {
    pub name: String,
    pub prices: Vec<RawPricePoint>,
    pub retail_price: Option<f64>,
}

/// A named product series with its already-grouped constituents.
///
/// Grouping a product's display name into a series name (case and
/// diacritic folding, alias resolution) happens upstream; the rollup is
/// agnostic to how groups were formed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesGroup {
    pub name: String,
    pub items: Vec<SeriesItem>,
}

/// Aggregated financial view of one series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesFinanceSummary {
    pub name: String,
    /// Median of the constituents' known retail prices.
    pub retail_price: Option<f64>,
    /// Number of days in the series' aggregated daily index.
    pub index_count: usize,
    pub index_last_date: Option<NaiveDate>,
    pub metrics: FinanceMetrics,
    pub trend_7d: TrendTag,
    pub trend_30d: TrendTag,
    /// Cheapest and dearest last-known constituent price.
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub item_count: usize,
}

/// Cross-series KPI aggregates. Every aggregate skips series whose input
/// is missing instead of counting it as 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesKpis {
    pub series_count: usize,
    pub item_count: usize,
    pub up_trend_7d: usize,
    pub down_trend_7d: usize,
    pub avg_score: Option<f64>,
    pub median_premium: Option<f64>,
    pub median_volatility_30d: Option<f64>,
}
