//! Cross-run statistics.
//!
//! Shared numeric helpers plus the two aggregation views: per-test
//! run tables and A/B delta tables.

pub mod aggregator;
pub mod deltas;

pub use aggregator::*;
pub use deltas::*;

/// Median of a sequence; `None` when empty.
///
/// An even-length sequence averages the two middle elements of the
/// sorted values.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    }
}

/// Round to 6 decimal places, applied to every derived value before
/// formatting.
pub fn round6(value: f64) -> f64 {
    (value * 1_000_000.0).round() / 1_000_000.0
}
