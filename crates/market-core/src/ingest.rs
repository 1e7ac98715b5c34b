//! Adapter from loosely-shaped scraped payloads to the closed
//! `RawPricePoint` contract.
//!
//! Upstream marketplace scrapers have shipped several field spellings over
//! time, and prices arrive as numbers or numeric strings (sometimes with a
//! decimal comma). Entries that carry neither a usable date nor a usable
//! price are skipped, not fatal; only a payload that is not an array of
//! objects is rejected.

use serde_json::Value;

use crate::error::MarketError;
use crate::types::RawPricePoint;

const DATE_FIELDS: [&str; 4] = ["date", "day", "observed_at", "scraped_at"];
const PRICE_FIELDS: [&str; 3] = ["price", "lowest_price", "amount"];

/// Parse a raw scraped payload (JSON text) into typed observations.
pub fn raw_points_from_str(payload: &str) -> Result<Vec<RawPricePoint>, MarketError> {
    let value: Value = serde_json::from_str(payload)?;
    raw_points_from_json(&value)
}

pub fn raw_points_from_json(payload: &Value) -> Result<Vec<RawPricePoint>, MarketError> {
    let entries = payload
        .as_array()
        .ok_or_else(|| MarketError::Shape("expected an array of observations".to_string()))?;

    let mut points = Vec::with_capacity(entries.len());
    let mut skipped = 0usize;
    for entry in entries {
        match adapt_entry(entry) {
            Some(point) => points.push(point),
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        tracing::debug!("ingest: skipped {} unusable scraped entries", skipped);
    }
    Ok(points)
}

fn adapt_entry(entry: &Value) -> Option<RawPricePoint> {
    let obj = entry.as_object()?;

    let date = DATE_FIELDS
        .iter()
        .find_map(|key| obj.get(*key))
        .and_then(Value::as_str)?;

    let price = match PRICE_FIELDS.iter().find_map(|key| obj.get(*key))? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().replace(',', ".").parse().ok()?,
        _ => return None,
    };

    Some(RawPricePoint {
        date: date.to_string(),
        price,
    })
}
