//! Small distribution helpers shared by the indicator crates.
//!
//! Sample standard deviation divides by n-1; the median of an even-length
//! set is the mean of the two middle values. Everything returns `None` on
//! inputs too small to carry the statistic.

pub fn mean(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    Some(data.iter().sum::<f64>() / data.len() as f64)
}

pub fn sample_stdev(data: &[f64]) -> Option<f64> {
    if data.len() < 2 {
        return None;
    }
    let m = data.iter().sum::<f64>() / data.len() as f64;
    let variance =
        data.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (data.len() - 1) as f64;
    Some(variance.sqrt())
}

pub fn median(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    let mut sorted = data.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}
