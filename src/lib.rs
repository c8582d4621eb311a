//! Insider trading feature matrix for anomaly detection.
//!
//! Modular structure:
//! - [`ingest`] - CSV source loading with union-of-columns concatenation
//! - [`normalize`] - Column resolution and typed trade records
//! - [`table`] - In-memory columnar frame
//! - [`features`] - Windowed statistics, temporal gaps, feature matrix pipeline
//! - [`logging`] - Structured JSON logging

pub mod config;
pub mod error;
pub mod features;
pub mod ingest;
pub mod logging;
pub mod normalize;
pub mod table;

pub use config::PipelineConfig;
pub use error::{FeatureError, SchemaError};
pub use features::{FeaturePipeline, TemporalGapEngine, WindowedStatsEngine};
pub use ingest::RawTable;
pub use logging::StructuredLogger;
pub use normalize::{NormalizedTrades, Normalizer, TradeRecord, TransactionType};
pub use table::{Column, ColumnKind, Frame};
