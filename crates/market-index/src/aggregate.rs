use std::collections::BTreeMap;

use chrono::NaiveDate;

use market_core::{stats, PriceSeries, RawPricePoint, SeriesPoint};
use price_series::normalize;

/// Collapse many products into one daily series: for every calendar day any
/// product was observed, the median price across the products observed that
/// day. Days with no observation anywhere are simply absent; nothing is
/// interpolated or forward-filled.
pub fn daily_median_series(items_prices: &[Vec<RawPricePoint>]) -> PriceSeries {
    let mut by_day: BTreeMap<i64, (NaiveDate, Vec<f64>)> = BTreeMap::new();

    for prices in items_prices {
        let series = normalize(prices);
        for point in series.points {
            by_day
                .entry(point.day_index)
                .or_insert_with(|| (point.date, Vec::new()))
                .1
                .push(point.price);
        }
    }

    let points = by_day
        .into_iter()
        .filter_map(|(day_index, (date, prices))| {
            stats::median(&prices).map(|price| SeriesPoint {
                day_index,
                date,
                price,
            })
        })
        .collect();
    PriceSeries::new(points)
}
