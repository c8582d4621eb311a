//! Integration test: config load, CSV ingest, full feature matrix pipeline.

use insider_features::{
    config::PipelineConfig,
    features::{stats, FeaturePipeline, MODEL_COLUMNS},
    ingest::{load_trade_csvs, RawTable},
    table::{names, Frame},
    FeatureError, SchemaError,
};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

const HEADER: &str = "Ticker,Date,Transaction,Shares,Price,Insider,Relationship,Remarks";

fn write_csv(dir: &Path, name: &str, lines: &[String]) {
    let mut body = String::from(HEADER);
    body.push('\n');
    for l in lines {
        body.push_str(l);
        body.push('\n');
    }
    fs::write(dir.join(name), body).unwrap();
}

fn pipeline_for(dir: &Path) -> FeaturePipeline {
    let config = PipelineConfig {
        data_dir: dir.to_path_buf(),
        ..PipelineConfig::default()
    };
    FeaturePipeline::new(config)
}

/// Three tickers, unique (ticker, date) pairs, irregular spacing, three insiders.
fn synthetic_lines() -> Vec<String> {
    let mut lines = Vec::new();
    for (t, ticker) in ["AAA", "BBB", "CCC"].iter().enumerate() {
        let mut day = 1u32;
        for i in 0..25u32 {
            day += 1 + (i * 7 + t as u32) % 5;
            let date = chrono::NaiveDate::from_ymd_opt(2023, 1, 1).unwrap() + chrono::Duration::days(day as i64);
            let kind = if i % 3 == 0 { "Sale" } else { "Buy" };
            let shares = 100 + (i * 37 + t as u32 * 11) % 400;
            let price = 10.0 + ((i * 13) % 7) as f64;
            let insider = ["alice", "bob", "carol"][(i as usize + t) % 3];
            lines.push(format!("{ticker},{date},{kind},{shares},{price},{insider},Director,note {i}"));
        }
    }
    lines
}

fn f64_col(f: &Frame, name: &str) -> Vec<Option<f64>> {
    f.float64(name).unwrap().to_vec()
}

#[test]
fn config_load_default() {
    let c = PipelineConfig::load(Path::new("nonexistent.json"));
    assert_eq!(c.data_dir, Path::new("data/processed"));
    assert!(c.log.json);
    assert!(!c.normalize.date_formats.is_empty());
}

#[test]
fn config_load_partial_file_keeps_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{"data_dir": "/tmp/trades", "log": {"level": "debug"}}"#).unwrap();
    let c = PipelineConfig::load(&path);
    assert_eq!(c.data_dir, Path::new("/tmp/trades"));
    assert_eq!(c.log.level, "debug");
    assert!(c.log.json);
}

#[test]
fn config_load_unreadable_path_uses_defaults() {
    // a directory exists but cannot be read as a file
    let dir = tempfile::tempdir().unwrap();
    let c = PipelineConfig::load(dir.path());
    assert_eq!(c.data_dir, Path::new("data/processed"));
    assert_eq!(c.log.level, "info");
}

#[test]
fn missing_directory_gives_empty_matrix() {
    let dir = tempfile::tempdir().unwrap();
    let matrix = pipeline_for(&dir.path().join("nope")).build_feature_matrix().unwrap();
    assert!(matrix.is_empty());
    assert_eq!(matrix.width(), 0);
}

#[test]
fn empty_input_short_circuits() {
    let pipeline = pipeline_for(Path::new("unused"));
    assert!(pipeline.run(&RawTable::default()).unwrap().is_empty());

    // every row filtered out by normalization
    let dir = tempfile::tempdir().unwrap();
    write_csv(dir.path(), "a.csv", &["AAA,2024-01-02,Gift,10,1,alice,CEO,".to_string()]);
    let matrix = pipeline_for(dir.path()).build_feature_matrix().unwrap();
    assert!(matrix.is_empty());
}

#[test]
fn missing_ticker_column_is_schema_error() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.csv"), "Date,Transaction,Shares,Price\n2024-01-02,Buy,1,1\n").unwrap();
    let err = pipeline_for(dir.path()).build_feature_matrix().unwrap_err();
    assert!(matches!(
        err,
        FeatureError::Schema(SchemaError::MissingColumn(ref c)) if c == "ticker"
    ));
}

#[test]
fn gap_sequence_and_pruned_columns() {
    let dir = tempfile::tempdir().unwrap();
    write_csv(
        dir.path(),
        "trades.csv",
        &[
            "X,2024-01-10,Buy,10,5,A,CEO,".to_string(),
            "X,2024-01-05,Sale,20,5,B,CFO,".to_string(),
            "X,2024-01-01,Buy,30,5,A,CEO,late filing".to_string(),
            "X,2024-01-03,Buy,40,5,A,CEO,".to_string(),
        ],
    );
    let matrix = pipeline_for(dir.path()).build_feature_matrix().unwrap();
    assert_eq!(matrix.height(), 4);
    for dropped in [names::ACTOR_ID, names::RELATIONSHIP, names::REMARKS] {
        assert!(!matrix.has_column(dropped), "{dropped} should be pruned");
    }
    for kept in [names::INSIDER_ROLE, names::IS_BUY, names::UNUSUAL_VOLUME, names::WEEKDAY] {
        assert!(matrix.has_column(kept), "{kept} should be present");
    }

    // actor A's rows come first (days 1, 3, 10), then B's single trade
    let days = matrix.int64(names::DAY).unwrap().to_vec();
    assert_eq!(days, vec![Some(1), Some(3), Some(10), Some(5)]);
    assert_eq!(
        f64_col(&matrix, names::DAYS_SINCE_LAST_TRADE),
        vec![None, Some(2.0), Some(7.0), None]
    );
    let roles: Vec<_> = matrix.utf8(names::INSIDER_ROLE).unwrap().iter().flatten().cloned().collect();
    assert_eq!(roles, vec!["CEO", "CEO", "CEO", "CFO"]);
}

#[test]
fn union_of_columns_across_files() {
    let dir = tempfile::tempdir().unwrap();
    write_csv(dir.path(), "a.csv", &["AAA,2024-01-02,Buy,10,1,alice,CEO,".to_string()]);
    fs::write(
        dir.path().join("b.csv"),
        "ticker,date,transaction,shares,price\nAAA,2024-01-04,Sell,10,3\n",
    )
    .unwrap();
    let raw = load_trade_csvs(dir.path()).unwrap();
    assert_eq!(raw.len(), 2);
    let matrix = pipeline_for(dir.path()).run(&raw).unwrap();
    assert_eq!(matrix.height(), 2);
    // second file has no insider: it sorts after alice and has no gap
    assert_eq!(f64_col(&matrix, names::DAYS_SINCE_LAST_TRADE), vec![None, None]);
    assert_eq!(f64_col(&matrix, names::TRADE_VALUE_7D_MEAN), vec![Some(10.0), Some(20.0)]);
}

#[test]
fn output_is_independent_of_input_row_order() {
    let lines = synthetic_lines();
    let dir = tempfile::tempdir().unwrap();
    write_csv(dir.path(), "a.csv", &lines);
    let reference = pipeline_for(dir.path()).build_feature_matrix().unwrap();
    assert_eq!(reference.height(), lines.len());

    let mut rng = StdRng::seed_from_u64(7);
    for round in 0..3 {
        let mut shuffled = lines.clone();
        shuffled.shuffle(&mut rng);
        let dir = tempfile::tempdir().unwrap();
        // split across two files as well
        let (left, right) = shuffled.split_at(shuffled.len() / 2);
        write_csv(dir.path(), "a.csv", left);
        write_csv(dir.path(), "b.csv", right);
        let matrix = pipeline_for(dir.path()).build_feature_matrix().unwrap();
        assert_eq!(matrix.fingerprint(), reference.fingerprint(), "round {round}");
    }
}

#[test]
fn rank_and_flag_properties_hold_per_ticker() {
    let dir = tempfile::tempdir().unwrap();
    write_csv(dir.path(), "a.csv", &synthetic_lines());
    let matrix = pipeline_for(dir.path()).build_feature_matrix().unwrap();

    let tickers = matrix.utf8(names::ENTITY_ID).unwrap();
    let values = matrix.float64(names::TRADE_VALUE).unwrap();
    let ranks = matrix.float64(names::TRADE_VALUE_PCT_RANK).unwrap();
    let flags = matrix.int64(names::UNUSUAL_VOLUME).unwrap();
    let zscores = matrix.float64(names::TRADE_VALUE_ZSCORE).unwrap();

    let mut groups: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (row, t) in tickers.iter().enumerate() {
        groups.entry(t.as_deref().unwrap()).or_default().push(row);
    }
    assert_eq!(groups.len(), 3);

    for rows in groups.values() {
        let group_values: Vec<f64> = rows.iter().map(|&r| values[r].unwrap()).collect();
        let threshold = stats::quantile_linear(&group_values, 0.95).unwrap();
        let max = group_values.iter().cloned().fold(f64::MIN, f64::max);
        let max_count = group_values.iter().filter(|v| **v == max).count();
        for &r in rows {
            let rank = ranks[r].unwrap();
            assert!(rank > 0.0 && rank <= 1.0);
            if values[r] == Some(max) && max_count == 1 {
                assert_eq!(rank, 1.0);
            }
            assert_eq!(flags[r], Some(i64::from(values[r].unwrap() > threshold)));
            if let Some(z) = zscores[r] {
                assert!(z.is_finite());
            }
        }
    }
}

#[test]
fn model_input_matches_matrix_shape() {
    let dir = tempfile::tempdir().unwrap();
    write_csv(dir.path(), "a.csv", &synthetic_lines());
    let matrix = pipeline_for(dir.path()).build_feature_matrix().unwrap();
    let x = FeaturePipeline::model_input(&matrix).unwrap();
    assert_eq!(x.shape(), &[matrix.height(), MODEL_COLUMNS.len()]);

    let empty = FeaturePipeline::model_input(&Frame::empty()).unwrap();
    assert_eq!(empty.shape(), &[0, MODEL_COLUMNS.len()]);
}
