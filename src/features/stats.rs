//! Numeric kernels for the windowed statistics engine.

use chrono::NaiveDate;
use std::ops::Range;

pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (ddof = 1).
///
/// `None` with fewer than two points. Exactly `0.0` when every value is equal,
/// so callers can test for zero variance without tolerance games.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let first = values[0];
    if values.iter().all(|&v| v == first) {
        return Some(0.0);
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some((ss / (values.len() - 1) as f64).sqrt())
}

/// Fractional rank of every value within `values`, average method, scaled by N.
/// Results lie in (0, 1]; the maximum (when unique) is exactly 1.
pub fn average_pct_ranks(values: &[f64]) -> Vec<f64> {
    let n = values.len() as f64;
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    values
        .iter()
        .map(|v| {
            let less = sorted.partition_point(|x| x < v);
            let less_or_equal = sorted.partition_point(|x| x <= v);
            let ties = (less_or_equal - less) as f64;
            (less as f64 + (ties + 1.0) / 2.0) / n
        })
        .collect()
}

/// Quantile `q` in [0, 1] with linear interpolation between order statistics.
/// `None` for an empty slice.
pub fn quantile_linear(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64))
}

/// Index range of the trailing window `(dates[i] - days, dates[i]]` over an
/// ascending date slice. Later rows sharing `dates[i]` fall inside the window.
pub fn trailing_window(dates: &[NaiveDate], i: usize, days: i64) -> Range<usize> {
    let t = dates[i];
    let start = dates.partition_point(|d| (t - *d).num_days() >= days);
    let end = dates.partition_point(|d| *d <= t);
    start..end
}
