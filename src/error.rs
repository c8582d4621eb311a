//! Error taxonomy. Schema problems are fatal and surface before any column is added;
//! numeric degeneracy is never an error (it yields a missing cell instead).

use crate::table::ColumnKind;
use std::path::PathBuf;

/// A required column is absent, has the wrong kind, or carries a null where the
/// contract forbids one.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
    #[error("missing required column `{0}`")]
    MissingColumn(String),

    #[error("column `{name}` is {found}, expected {expected}")]
    WrongKind {
        name: String,
        expected: ColumnKind,
        found: ColumnKind,
    },

    #[error("column `{column}` is null at row {row}")]
    NullValue { column: String, row: usize },

    #[error("column `{name}` has {found} rows, frame has {expected}")]
    LengthMismatch {
        name: String,
        expected: usize,
        found: usize,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum FeatureError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("failed to read {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

pub type Result<T> = std::result::Result<T, FeatureError>;
