//! Feature matrix pipeline: load → normalize → windowed stats → temporal gaps → prune.

use super::{TemporalGapEngine, WindowedStatsEngine, MODEL_COLUMNS};
use crate::config::PipelineConfig;
use crate::error::{Result, SchemaError};
use crate::ingest::{load_trade_csvs, RawTable};
use crate::normalize::{NormalizedTrades, Normalizer};
use crate::table::{names, Frame};
use ndarray::Array2;
use tracing::{debug, info};

/// Identity and free-text columns removed from the final matrix.
pub const DROPPED_COLUMNS: [&str; 3] = [names::ACTOR_ID, names::RELATIONSHIP, names::REMARKS];

pub struct FeaturePipeline {
    config: PipelineConfig,
    normalizer: Normalizer,
    windowed: WindowedStatsEngine,
    temporal: TemporalGapEngine,
}

impl FeaturePipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            normalizer: Normalizer::new(config.normalize.clone()),
            windowed: WindowedStatsEngine::new(),
            temporal: TemporalGapEngine::new(),
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Load every source file under the configured data directory and build the matrix.
    pub fn build_feature_matrix(&self) -> Result<Frame> {
        let raw = load_trade_csvs(&self.config.data_dir)?;
        self.run(&raw)
    }

    /// Build the matrix from already-loaded raw rows. Empty input yields an empty frame.
    pub fn run(&self, raw: &RawTable) -> Result<Frame> {
        if raw.is_empty() {
            debug!("no raw rows; returning empty feature matrix");
            return Ok(Frame::empty());
        }
        let trades = self.normalizer.normalize(raw)?;
        info!(
            raw_rows = raw.len(),
            kept = trades.len(),
            dropped = trades.dropped.total(),
            "records normalized"
        );
        Ok(self.assemble(&trades)?)
    }

    /// Run both engines over normalized trades and prune identity/free-text columns.
    pub fn assemble(&self, trades: &NormalizedTrades) -> std::result::Result<Frame, SchemaError> {
        if trades.is_empty() {
            debug!("no trades after normalization; skipping feature engines");
            return Ok(Frame::empty());
        }
        let table = trades.to_frame()?;
        let stats = self.windowed.compute(&table)?;
        let dated = self.temporal.compute(&stats)?;
        let matrix = dated.drop_columns(&DROPPED_COLUMNS);
        info!(rows = matrix.height(), columns = matrix.width(), "feature matrix assembled");
        Ok(matrix)
    }

    /// Dense model input over [`MODEL_COLUMNS`]; missing cells are NaN.
    pub fn model_input(matrix: &Frame) -> std::result::Result<Array2<f64>, SchemaError> {
        if matrix.is_empty() {
            return Ok(Array2::zeros((0, MODEL_COLUMNS.len())));
        }
        matrix.to_array2(&MODEL_COLUMNS)
    }
}
