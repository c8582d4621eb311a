//! Per-ticker windowed statistics: trailing means, rolling z-score, percentile
//! rank and the unusual-volume flag.
//!
//! Rows are grouped by `entity_id` and stably sorted by `timestamp` inside each
//! group. Trailing windows are time-based, `(t - days, t]`, so sparse history
//! simply contributes fewer points. The output frame is ordered by
//! (entity_id, timestamp, input position).

use super::stats::{average_pct_ranks, mean, quantile_linear, sample_std, trailing_window};
use crate::error::SchemaError;
use crate::table::{names, Column, Frame};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::debug;

pub const SHORT_WINDOW_DAYS: i64 = 7;
pub const LONG_WINDOW_DAYS: i64 = 30;
pub const UNUSUAL_VOLUME_QUANTILE: f64 = 0.95;

/// Counters for the degenerate cases, all of which produce a missing cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WindowSummary {
    pub groups: usize,
    pub rows: usize,
    /// Rows whose long window held only the row itself
    pub single_point_windows: usize,
    /// Rows whose long window held ≥ 2 identical values
    pub zero_variance_windows: usize,
    /// Rows whose window statistics overflowed to a non-finite value
    pub non_finite_windows: usize,
    pub unusual_rows: usize,
}

/// Derived values for one row, in group-sorted order.
#[derive(Debug, Clone, PartialEq)]
struct RowStats {
    mean_short: Option<f64>,
    mean_long: Option<f64>,
    zscore: Option<f64>,
    pct_rank: f64,
    unusual: bool,
}

#[derive(Debug, Clone, Default)]
pub struct WindowedStatsEngine;

impl WindowedStatsEngine {
    pub fn new() -> Self {
        Self
    }

    /// Returns a new frame: `frame`'s rows in group order plus the five
    /// statistical columns. Fails before computing anything if `entity_id`,
    /// `timestamp` or `trade_value` is missing, mistyped, or has a null cell.
    pub fn compute(&self, frame: &Frame) -> Result<Frame, SchemaError> {
        self.compute_with_summary(frame).map(|(f, _)| f)
    }

    pub fn compute_with_summary(&self, frame: &Frame) -> Result<(Frame, WindowSummary), SchemaError> {
        let entities = frame.utf8(names::ENTITY_ID)?;
        let dates = frame.date(names::TIMESTAMP)?;
        let values = frame.float64(names::TRADE_VALUE)?;

        let mut groups: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
        for row in 0..frame.height() {
            let entity = entities[row].as_deref().ok_or_else(|| null(names::ENTITY_ID, row))?;
            dates[row].ok_or_else(|| null(names::TIMESTAMP, row))?;
            values[row].ok_or_else(|| null(names::TRADE_VALUE, row))?;
            groups.entry(entity).or_default().push(row);
        }

        let mut summary = WindowSummary {
            groups: groups.len(),
            rows: frame.height(),
            ..WindowSummary::default()
        };
        let mut order = Vec::with_capacity(frame.height());
        let mut stats = Vec::with_capacity(frame.height());

        for (_, mut rows) in groups {
            // stable: equal timestamps keep input order
            rows.sort_by_key(|&r| dates[r]);
            let group_dates: Vec<NaiveDate> = rows.iter().filter_map(|&r| dates[r]).collect();
            let group_values: Vec<f64> = rows.iter().filter_map(|&r| values[r]).collect();
            stats.extend(group_stats(&group_dates, &group_values, &mut summary));
            order.extend(rows);
        }

        let out = frame
            .take(&order)
            .with_column(
                names::TRADE_VALUE_7D_MEAN,
                Column::Float64(stats.iter().map(|s| s.mean_short).collect()),
            )?
            .with_column(
                names::TRADE_VALUE_30D_MEAN,
                Column::Float64(stats.iter().map(|s| s.mean_long).collect()),
            )?
            .with_column(
                names::TRADE_VALUE_ZSCORE,
                Column::Float64(stats.iter().map(|s| s.zscore).collect()),
            )?
            .with_column(
                names::TRADE_VALUE_PCT_RANK,
                Column::Float64(stats.iter().map(|s| Some(s.pct_rank)).collect()),
            )?
            .with_column(
                names::UNUSUAL_VOLUME,
                Column::Int64(stats.iter().map(|s| Some(i64::from(s.unusual))).collect()),
            )?;

        debug!(
            groups = summary.groups,
            rows = summary.rows,
            single_point_windows = summary.single_point_windows,
            zero_variance_windows = summary.zero_variance_windows,
            non_finite_windows = summary.non_finite_windows,
            unusual_rows = summary.unusual_rows,
            "windowed statistics computed"
        );
        Ok((out, summary))
    }
}

fn null(column: &str, row: usize) -> SchemaError {
    SchemaError::NullValue {
        column: column.to_string(),
        row,
    }
}

/// Overflowed sums and quotients become the missing sentinel, never a value.
fn finite(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}

/// Statistics for one entity group already sorted by date.
fn group_stats(dates: &[NaiveDate], values: &[f64], summary: &mut WindowSummary) -> Vec<RowStats> {
    let ranks = average_pct_ranks(values);
    // A group always has at least one row, so the threshold exists.
    let threshold = quantile_linear(values, UNUSUAL_VOLUME_QUANTILE).unwrap_or(f64::INFINITY);

    (0..values.len())
        .map(|i| {
            let short = &values[trailing_window(dates, i, SHORT_WINDOW_DAYS)];
            let long = &values[trailing_window(dates, i, LONG_WINDOW_DAYS)];
            let mean_short = finite(mean(short));
            let mean_long = finite(mean(long));

            let zscore = match sample_std(long) {
                None => {
                    summary.single_point_windows += 1;
                    None
                }
                Some(sd) if sd == 0.0 => {
                    summary.zero_variance_windows += 1;
                    None
                }
                Some(sd) => {
                    let z = mean_long
                        .filter(|_| sd.is_finite())
                        .and_then(|mu| finite((values[i] - mu) / sd));
                    if z.is_none() {
                        summary.non_finite_windows += 1;
                    }
                    z
                }
            };

            let unusual = values[i] > threshold;
            if unusual {
                summary.unusual_rows += 1;
            }

            RowStats {
                mean_short,
                mean_long,
                zscore,
                pct_rank: ranks[i],
                unusual,
            }
        })
        .collect()
}
