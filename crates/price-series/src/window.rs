use chrono::{DateTime, Utc};

use market_core::PriceSeries;

use crate::normalize::day_index;

/// Trailing calendar window anchored to the series' own last point, not to
/// "today": a stale series windows relative to its own last observation.
pub fn slice_last_n_days(series: &PriceSeries, days: i64) -> PriceSeries {
    let Some(last) = series.last() else {
        return PriceSeries::default();
    };
    let cutoff = last.day_index - (days - 1);
    let points = series
        .points
        .iter()
        .filter(|p| p.day_index >= cutoff)
        .cloned()
        .collect();
    PriceSeries::new(points)
}

/// Denominator for coverage: the window length whenever the series has any
/// data at all. Not a strict calendar check.
pub fn expected_days_in_window(series: &PriceSeries, days: i64) -> i64 {
    if series.is_empty() {
        0
    } else {
        days
    }
}

/// Fraction of expected days inside the trailing window that actually have
/// an observation.
pub fn coverage(series: &PriceSeries, days: i64) -> Option<f64> {
    let expected = expected_days_in_window(series, days);
    if expected <= 0 {
        return None;
    }
    let observed = slice_last_n_days(series, days).len();
    Some(observed as f64 / expected as f64)
}

/// Whole calendar days from the last observation's date to `now`'s UTC date.
pub fn freshness_days(series: &PriceSeries, now: DateTime<Utc>) -> Option<i64> {
    let last = series.last()?;
    Some(day_index(now.date_naive()) - last.day_index)
}
