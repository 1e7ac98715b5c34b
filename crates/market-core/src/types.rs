use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One raw scraped price observation, as delivered by the ingestion jobs.
///
/// `date` is ISO-8601-ish: an RFC 3339 timestamp, a naive datetime, or a
/// plain calendar date. Duplicates per day and arbitrary ordering are
/// expected; the normalizer sorts that out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPricePoint {
    pub date: String,
    pub price: f64,
}

/// One normalized observation: at most one per UTC calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    /// Whole days since the Unix epoch of the UTC calendar date. Absolute
    /// counter, not a position: gaps between consecutive points carry
    /// meaning for coverage and freshness.
    pub day_index: i64,
    pub date: NaiveDate,
    pub price: f64,
}

/// A normalized price series, ascending by day index, one point per day.
///
/// Immutable once built; windowing produces a fresh series instead of
/// mutating the source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub points: Vec<SeriesPoint>,
}

impl PriceSeries {
    pub fn new(points: Vec<SeriesPoint>) -> Self {
        Self { points }
    }

    pub fn last(&self) -> Option<&SeriesPoint> {
        self.points.last()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn prices(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.price).collect()
    }
}

/// Qualitative RSI classification at the classic 30/70 bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RsiSignal {
    Oversold,
    Neutral,
    Overbought,
}

/// Direction tag for a windowed return, with a dead band so small moves
/// read as stable. `Na` marks a return that could not be computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendTag {
    Up,
    Down,
    Stable,
    Na,
}

impl TrendTag {
    /// Tag a fractional return with a ±2% dead band.
    pub fn from_return(ret: Option<f64>) -> Self {
        match ret {
            Some(r) if r > 0.02 => TrendTag::Up,
            Some(r) if r < -0.02 => TrendTag::Down,
            Some(_) => TrendTag::Stable,
            None => TrendTag::Na,
        }
    }
}

/// Valuation label for the catalog index level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketStatus {
    Overvalued,
    Undervalued,
    FairlyValued,
}

impl MarketStatus {
    pub fn from_index_value(value: f64) -> Self {
        if value >= 150.0 {
            MarketStatus::Overvalued
        } else if value <= 80.0 {
            MarketStatus::Undervalued
        } else {
            MarketStatus::FairlyValued
        }
    }
}

/// Derived indicators for one product or one aggregated series.
///
/// Every field that can be undefined is an `Option`. `None` means the
/// underlying computation had nothing to work with; it must never be
/// flattened to 0, because 0 is a meaningful reading for most of these
/// fields (a 0% return, a 0 premium, a score of 0).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FinanceMetrics {
    pub last_price: Option<f64>,
    pub retail_price: Option<f64>,
    pub premium_now: Option<f64>,
    pub premium_30d: Option<f64>,
    pub return_7d: Option<f64>,
    pub return_30d: Option<f64>,
    pub volatility_30d: Option<f64>,
    pub max_drawdown_90d: Option<f64>,
    pub slope_30d: Option<f64>,
    /// Fraction of the trailing 30-day window with an observation, 0..1.
    pub coverage_30d: Option<f64>,
    /// Whole calendar days since the most recent observation.
    pub freshness_days: Option<i64>,
    /// Composite health score, 0..100.
    pub score: Option<i32>,
    pub sharpe_like: Option<f64>,
    pub sortino_like: Option<f64>,
    pub calmar_like: Option<f64>,
    pub annualized_volatility: Option<f64>,
    pub downside_deviation: Option<f64>,
    pub rsi_14: Option<f64>,
    pub rsi_signal: Option<RsiSignal>,
    pub var_95: Option<f64>,
    pub cvar_95: Option<f64>,
    pub skewness: Option<f64>,
    pub kurtosis: Option<f64>,
    pub beta: Option<f64>,
}
