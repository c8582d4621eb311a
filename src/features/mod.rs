//! Statistical feature engines and the feature matrix pipeline.

mod pipeline;
pub mod stats;
mod temporal;
mod windowed;

pub use pipeline::{FeaturePipeline, DROPPED_COLUMNS};
pub use temporal::TemporalGapEngine;
pub use windowed::{
    WindowSummary, WindowedStatsEngine, LONG_WINDOW_DAYS, SHORT_WINDOW_DAYS, UNUSUAL_VOLUME_QUANTILE,
};

use crate::table::names;

/// Numeric columns of the feature matrix, in model-input order.
pub const MODEL_COLUMNS: [&str; 15] = [
    names::SHARES,
    names::PRICE,
    names::TRADE_VALUE,
    names::IS_BUY,
    names::IS_SELL,
    names::TRADE_VALUE_7D_MEAN,
    names::TRADE_VALUE_30D_MEAN,
    names::TRADE_VALUE_ZSCORE,
    names::TRADE_VALUE_PCT_RANK,
    names::UNUSUAL_VOLUME,
    names::YEAR,
    names::MONTH,
    names::DAY,
    names::WEEKDAY,
    names::DAYS_SINCE_LAST_TRADE,
];
