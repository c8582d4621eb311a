//! Source loading: every `*.csv` directly inside a directory, concatenated by
//! union of columns. A missing directory is not an error.

mod raw;

pub use raw::RawTable;

use crate::error::{FeatureError, Result};
use csv::{ReaderBuilder, Trim};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

const SOURCE_EXTENSION: &str = "csv";

/// CSV files directly inside `dir`, sorted by file name.
pub fn list_csv_files(dir: &Path) -> Vec<PathBuf> {
    if !dir.is_dir() {
        return Vec::new();
    }
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .and_then(|x| x.to_str())
                .is_some_and(|x| x.eq_ignore_ascii_case(SOURCE_EXTENSION))
        })
        .collect()
}

/// Read one CSV file. `Ok(None)` when the file disappeared before it could be opened.
pub fn read_csv(path: &Path) -> Result<Option<RawTable>> {
    let csv_err = |source: csv::Error| FeatureError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = match ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_path(path)
    {
        Ok(r) => r,
        Err(e) => {
            if let csv::ErrorKind::Io(io) = e.kind() {
                if io.kind() == ErrorKind::NotFound {
                    debug!(path = %path.display(), "source file vanished; skipping");
                    return Ok(None);
                }
            }
            return Err(csv_err(e));
        }
    };

    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(String::from)
        .collect();
    let mut table = RawTable::new(headers);
    for record in reader.records() {
        let record = record.map_err(csv_err)?;
        table.push_row(
            record
                .iter()
                .map(|cell| (!cell.is_empty()).then(|| cell.to_string()))
                .collect(),
        );
    }
    Ok(Some(table))
}

/// Load and concatenate all CSV files in `dir`. Empty table when the directory is
/// absent or holds no CSV files.
pub fn load_trade_csvs(dir: &Path) -> Result<RawTable> {
    if !dir.is_dir() {
        warn!(dir = %dir.display(), "data directory not found; no trades loaded");
        return Ok(RawTable::default());
    }

    let files = list_csv_files(dir);
    let mut tables = Vec::with_capacity(files.len());
    for path in &files {
        if let Some(t) = read_csv(path)? {
            debug!(path = %path.display(), rows = t.len(), "loaded source file");
            tables.push(t);
        }
    }
    let table = RawTable::concat(tables);
    info!(files = files.len(), rows = table.len(), columns = table.headers.len(), "sources loaded");
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn missing_directory_yields_empty_table() {
        let dir = tempfile::tempdir().unwrap();
        let t = load_trade_csvs(&dir.path().join("absent")).unwrap();
        assert!(t.is_empty());
    }

    #[test]
    fn loads_only_csv_files_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.csv"), "ticker,price\nBBB,2\n").unwrap();
        fs::write(dir.path().join("a.csv"), "ticker,shares\nAAA,10\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("c.csv"), "ticker\nCCC\n").unwrap();

        let t = load_trade_csvs(dir.path()).unwrap();
        assert_eq!(t.headers, vec!["ticker", "shares", "price"]);
        assert_eq!(t.len(), 2);
        assert_eq!(t.rows[0][0].as_deref(), Some("AAA"));
        assert_eq!(t.rows[1][2].as_deref(), Some("2"));
    }

    #[test]
    fn blank_cells_are_missing() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.csv"), "ticker,price\nAAA,\n").unwrap();
        let t = load_trade_csvs(dir.path()).unwrap();
        assert_eq!(t.rows[0], vec![Some("AAA".to_string()), None]);
    }
}
