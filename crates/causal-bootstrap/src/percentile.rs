//! Empirical percentiles with interpolated order statistics

use causal_core::{Error, Result};

/// Percentile of a sample with linear interpolation between order statistics
///
/// Uses rank `(n - 1) * p / 100`; when the rank falls between two sorted
/// samples the result interpolates linearly between them. A single-element
/// sample returns that element for any percentile.
pub fn percentile(values: &[f64], pct: f64) -> Result<f64> {
    if values.is_empty() {
        return Err(Error::empty_input());
    }
    if !(0.0..=100.0).contains(&pct) {
        return Err(Error::InvalidParameter(format!(
            "percentile {pct} must be in [0, 100]"
        )));
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    Ok(percentile_of_sorted(&sorted, pct))
}

/// Percentile of an already sorted sample (no validation)
pub(crate) fn percentile_of_sorted(sorted: &[f64], pct: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }

    let rank = (n - 1) as f64 * pct / 100.0;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    let weight = rank - lo as f64;
    sorted[lo] + weight * (sorted[hi] - sorted[lo])
}
