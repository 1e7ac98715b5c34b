use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use market_core::{PriceSeries, RawPricePoint, SeriesPoint};

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Whole days since the Unix epoch for a UTC calendar date.
pub fn day_index(date: NaiveDate) -> i64 {
    let millis = date.and_time(NaiveTime::MIN).and_utc().timestamp_millis();
    millis.div_euclid(MILLIS_PER_DAY)
}

/// Parse the date formats the scrapers have produced: RFC 3339, a naive
/// datetime, or a plain calendar date (taken as UTC midnight).
pub fn parse_observation_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.and_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(dt.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date.and_time(NaiveTime::MIN).and_utc());
    }
    None
}

/// Normalize raw observations into an ascending one-point-per-day series.
///
/// Entries with an unparseable date or a non-positive/non-finite price are
/// dropped. Within a calendar day the observation with the latest timestamp
/// wins. Dirty upstream data degrades the series, it never fails it.
pub fn normalize(raw: &[RawPricePoint]) -> PriceSeries {
    let mut by_day: HashMap<i64, (DateTime<Utc>, SeriesPoint)> = HashMap::new();
    let mut dropped = 0usize;

    for point in raw {
        if !point.price.is_finite() || point.price <= 0.0 {
            dropped += 1;
            continue;
        }
        let Some(ts) = parse_observation_date(&point.date) else {
            dropped += 1;
            continue;
        };
        let date = ts.date_naive();
        let idx = day_index(date);
        let newer = by_day.get(&idx).map_or(true, |(seen, _)| ts > *seen);
        if newer {
            by_day.insert(
                idx,
                (
                    ts,
                    SeriesPoint {
                        day_index: idx,
                        date,
                        price: point.price,
                    },
                ),
            );
        }
    }

    if dropped > 0 {
        tracing::debug!("normalize: dropped {} invalid observations", dropped);
    }

    let mut points: Vec<SeriesPoint> = by_day.into_values().map(|(_, p)| p).collect();
    points.sort_by_key(|p| p.day_index);
    PriceSeries::new(points)
}
