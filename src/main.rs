//! Builds the insider trading feature matrix from the configured data directory
//! and prints a short preview.

use insider_features::{
    config::PipelineConfig,
    features::FeaturePipeline,
    logging::{MatrixSummary, StructuredLogger},
    table::{names, Frame},
};
use std::collections::HashSet;
use tracing::info;

const PREVIEW_ROWS: usize = 5;

fn count_entities(matrix: &Frame) -> usize {
    matrix
        .utf8(names::ENTITY_ID)
        .map(|v| v.iter().flatten().collect::<HashSet<_>>().len())
        .unwrap_or(0)
}

fn count_unusual(matrix: &Frame) -> usize {
    matrix
        .int64(names::UNUSUAL_VOLUME)
        .map(|v| v.iter().filter(|f| **f == Some(1)).count())
        .unwrap_or(0)
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config_path = std::env::var("INSIDER_FEATURES_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| std::path::PathBuf::from("config.json"));
    let config = PipelineConfig::load(&config_path);

    StructuredLogger::init(config.log.json, &config.log.level);
    info!(data_dir = ?config.data_dir, "building feature matrix");

    let data_dir = config.data_dir.display().to_string();
    let pipeline = FeaturePipeline::new(config);
    let mut stdout = std::io::stdout();

    let matrix = match pipeline.build_feature_matrix() {
        Ok(m) => m,
        Err(e) => {
            let msg = e.to_string();
            StructuredLogger::emit_json(
                &MatrixSummary {
                    ts: chrono::Utc::now().to_rfc3339(),
                    data_dir: &data_dir,
                    rows: 0,
                    columns: 0,
                    entities: 0,
                    unusual_rows: 0,
                    fingerprint: "",
                    error: Some(&msg),
                },
                &mut stdout,
            );
            return Err(e.into());
        }
    };

    let fingerprint = matrix.fingerprint();
    info!(rows = matrix.height(), columns = matrix.width(), %fingerprint, "feature matrix shape");
    StructuredLogger::emit_json(
        &MatrixSummary {
            ts: chrono::Utc::now().to_rfc3339(),
            data_dir: &data_dir,
            rows: matrix.height(),
            columns: matrix.width(),
            entities: count_entities(&matrix),
            unusual_rows: count_unusual(&matrix),
            fingerprint: &fingerprint,
            error: None,
        },
        &mut stdout,
    );
    print!("{}", matrix.head(PREVIEW_ROWS));

    Ok(())
}
