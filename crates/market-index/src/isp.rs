//! ISP-FR: the catalog-wide chained price index, base 100.
//!
//! The index compounds day-over-day relative changes averaged across the
//! items priced on both of two consecutive observed days. Chaining instead
//! of repricing a fixed basket keeps catalog growth from distorting
//! history: an item entering on day D contributes from day D onward and can
//! never alter index values before its first observation.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use market_core::{MarketStatus, RawPricePoint, TrendTag};
use price_series::normalize;

/// One catalog item as the index builder sees it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexItem {
    pub name: String,
    pub prices: Vec<RawPricePoint>,
    pub retail_price: Option<f64>,
}

/// One day of the chained index (100 = baseline).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexPoint {
    pub date: NaiveDate,
    pub value: f64,
    /// Items priced on both this day and its predecessor (for the first
    /// day: items priced that day).
    pub item_count: usize,
    pub daily_change: f64,
}

/// Derived view over the full index history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexSummary {
    pub current: f64,
    pub change_7d: Option<f64>,
    pub change_30d: Option<f64>,
    pub change_90d: Option<f64>,
    pub change_ytd: Option<f64>,
    pub change_since_base: Option<f64>,
    pub last_update: Option<NaiveDate>,
    pub trend: TrendTag,
    pub market_status: MarketStatus,
    pub history: Vec<IndexPoint>,
}

/// One row of the day-over-day variation audit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemVariation {
    pub name: String,
    pub before: f64,
    pub after: f64,
    pub change: f64,
}

fn qualifies(item: &IndexItem) -> bool {
    !item.prices.is_empty() && item.retail_price.map_or(false, |r| r.is_finite() && r > 0.0)
}

/// Build the chained index over every qualifying item (at least one valid
/// observation and a positive retail price).
pub fn build_isp_index(items: &[IndexItem]) -> Vec<IndexPoint> {
    let day_maps: Vec<BTreeMap<i64, (NaiveDate, f64)>> = items
        .par_iter()
        .filter(|item| qualifies(item))
        .map(|item| {
            normalize(&item.prices)
                .points
                .into_iter()
                .map(|p| (p.day_index, (p.date, p.price)))
                .collect::<BTreeMap<_, _>>()
        })
        .filter(|map| !map.is_empty())
        .collect();

    if day_maps.is_empty() {
        return vec![];
    }
    tracing::debug!("isp: chaining {} qualifying items", day_maps.len());

    // Sorted union of every day with data anywhere in the qualifying set.
    let mut days: BTreeMap<i64, NaiveDate> = BTreeMap::new();
    for map in &day_maps {
        for (day, (date, _)) in map {
            days.entry(*day).or_insert(*date);
        }
    }
    let days: Vec<(i64, NaiveDate)> = days.into_iter().collect();

    let mut history = Vec::with_capacity(days.len());
    let base_count = day_maps.iter().filter(|m| m.contains_key(&days[0].0)).count();
    let mut value = 100.0;
    history.push(IndexPoint {
        date: days[0].1,
        value,
        item_count: base_count,
        daily_change: 0.0,
    });

    for pair in days.windows(2) {
        let (prev_day, _) = pair[0];
        let (day, date) = pair[1];

        let mut changes = Vec::new();
        for map in &day_maps {
            if let (Some((_, before)), Some((_, after))) = (map.get(&prev_day), map.get(&day)) {
                if *before > 0.0 {
                    changes.push(after / before - 1.0);
                }
            }
        }

        // No overlap between consecutive observed days: carry the index
        // forward flat rather than fabricating a move.
        let avg_change = if changes.is_empty() {
            0.0
        } else {
            changes.iter().sum::<f64>() / changes.len() as f64
        };

        value *= 1.0 + avg_change;
        history.push(IndexPoint {
            date,
            value,
            item_count: changes.len(),
            daily_change: avg_change,
        });
    }

    history
}

/// Convenience entry: keep only items with both a price history and a
/// positive retail price, then build.
pub fn isp_from_items(items: &[IndexItem]) -> Vec<IndexPoint> {
    let qualifying: Vec<IndexItem> = items.iter().filter(|i| qualifies(i)).cloned().collect();
    build_isp_index(&qualifying)
}

/// Summarize the index history as of `now`. An empty history yields the
/// neutral summary: value 100, every change absent, fairly valued.
pub fn isp_summary(history: &[IndexPoint], now: DateTime<Utc>) -> IndexSummary {
    let Some(last) = history.last() else {
        return IndexSummary {
            current: 100.0,
            change_7d: None,
            change_30d: None,
            change_90d: None,
            change_ytd: None,
            change_since_base: None,
            last_update: None,
            trend: TrendTag::Stable,
            market_status: MarketStatus::FairlyValued,
            history: vec![],
        };
    };

    let current = last.value;
    let today = now.date_naive();

    let change_7d = change_over_days(history, current, today, 7);
    let trend = match change_7d {
        Some(c) if c > 0.02 => TrendTag::Up,
        Some(c) if c < -0.02 => TrendTag::Down,
        _ => TrendTag::Stable,
    };

    IndexSummary {
        current,
        change_7d,
        change_30d: change_over_days(history, current, today, 30),
        change_90d: change_over_days(history, current, today, 90),
        change_ytd: change_year_to_date(history, current, today),
        change_since_base: Some((current - 100.0) / 100.0),
        last_update: Some(last.date),
        trend,
        market_status: MarketStatus::from_index_value(current),
        history: history.to_vec(),
    }
}

/// Relative change against the nearest point at or before `today - days`,
/// scanning backward from the most recent point.
fn change_over_days(
    history: &[IndexPoint],
    current: f64,
    today: NaiveDate,
    days: i64,
) -> Option<f64> {
    let cutoff = today - Duration::days(days);
    let reference = history.iter().rev().find(|p| p.date <= cutoff)?;
    if reference.value <= 0.0 {
        return None;
    }
    Some((current - reference.value) / reference.value)
}

/// Relative change against the first point on or after January 1st of
/// `today`'s year.
fn change_year_to_date(history: &[IndexPoint], current: f64, today: NaiveDate) -> Option<f64> {
    let jan_first = NaiveDate::from_ymd_opt(today.year(), 1, 1)?;
    let reference = history.iter().find(|p| p.date >= jan_first)?;
    if reference.value <= 0.0 {
        return None;
    }
    Some((current - reference.value) / reference.value)
}

/// Per-item price moves between two observed dates, largest movers first.
/// Audit helper for explaining which items drove an index move.
pub fn variation_between_dates(
    items: &[IndexItem],
    from: NaiveDate,
    to: NaiveDate,
) -> Vec<ItemVariation> {
    let mut variations: Vec<ItemVariation> = items
        .iter()
        .filter_map(|item| {
            let series = normalize(&item.prices);
            let before = series.points.iter().find(|p| p.date == from)?.price;
            let after = series.points.iter().find(|p| p.date == to)?.price;
            if before <= 0.0 {
                return None;
            }
            Some(ItemVariation {
                name: item.name.clone(),
                before,
                after,
                change: after / before - 1.0,
            })
        })
        .collect();

    variations.sort_by(|a, b| {
        b.change
            .abs()
            .partial_cmp(&a.change.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    variations
}
