//! In-memory columnar frame shared by every stage.
//!
//! Stages never mutate a frame they were handed: they clone/reorder it with
//! [`Frame::take`] and append columns with [`Frame::with_column`].

mod column;
pub mod names;

pub use column::{Column, ColumnKind};

use crate::error::SchemaError;
use chrono::NaiveDate;
use ndarray::Array2;
use sha2::{Digest, Sha256};
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    columns: Vec<(String, Column)>,
}

impl Frame {
    /// Frame with no columns and no rows.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from named columns; all columns must share one length.
    pub fn new(columns: Vec<(String, Column)>) -> Result<Self, SchemaError> {
        let mut frame = Self::empty();
        for (name, col) in columns {
            frame = frame.with_column(name, col)?;
        }
        Ok(frame)
    }

    pub fn height(&self) -> usize {
        self.columns.first().map(|(_, c)| c.len()).unwrap_or(0)
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.height() == 0
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|(n, _)| n == name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|(n, _)| n == name).map(|(_, c)| c)
    }

    fn require(&self, name: &str) -> Result<&Column, SchemaError> {
        self.column(name)
            .ok_or_else(|| SchemaError::MissingColumn(name.to_string()))
    }

    fn wrong_kind(name: &str, expected: ColumnKind, found: &Column) -> SchemaError {
        SchemaError::WrongKind {
            name: name.to_string(),
            expected,
            found: found.kind(),
        }
    }

    pub fn utf8(&self, name: &str) -> Result<&[Option<String>], SchemaError> {
        match self.require(name)? {
            Column::Utf8(v) => Ok(v),
            other => Err(Self::wrong_kind(name, ColumnKind::Utf8, other)),
        }
    }

    pub fn float64(&self, name: &str) -> Result<&[Option<f64>], SchemaError> {
        match self.require(name)? {
            Column::Float64(v) => Ok(v),
            other => Err(Self::wrong_kind(name, ColumnKind::Float64, other)),
        }
    }

    pub fn int64(&self, name: &str) -> Result<&[Option<i64>], SchemaError> {
        match self.require(name)? {
            Column::Int64(v) => Ok(v),
            other => Err(Self::wrong_kind(name, ColumnKind::Int64, other)),
        }
    }

    pub fn bool(&self, name: &str) -> Result<&[Option<bool>], SchemaError> {
        match self.require(name)? {
            Column::Bool(v) => Ok(v),
            other => Err(Self::wrong_kind(name, ColumnKind::Bool, other)),
        }
    }

    pub fn date(&self, name: &str) -> Result<&[Option<NaiveDate>], SchemaError> {
        match self.require(name)? {
            Column::Date(v) => Ok(v),
            other => Err(Self::wrong_kind(name, ColumnKind::Date, other)),
        }
    }

    /// Append a column, or replace one with the same name in place.
    pub fn with_column(mut self, name: impl Into<String>, column: Column) -> Result<Self, SchemaError> {
        let name = name.into();
        if !self.columns.is_empty() && column.len() != self.height() {
            return Err(SchemaError::LengthMismatch {
                name,
                expected: self.height(),
                found: column.len(),
            });
        }
        match self.columns.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = column,
            None => self.columns.push((name, column)),
        }
        Ok(self)
    }

    /// Rows at `indices`, in that order, across every column.
    pub fn take(&self, indices: &[usize]) -> Frame {
        Frame {
            columns: self
                .columns
                .iter()
                .map(|(n, c)| (n.clone(), c.take(indices)))
                .collect(),
        }
    }

    pub fn head(&self, n: usize) -> Frame {
        let rows: Vec<usize> = (0..n.min(self.height())).collect();
        self.take(&rows)
    }

    /// Remove the named columns; names that are not present are ignored.
    pub fn drop_columns(mut self, names: &[&str]) -> Frame {
        self.columns.retain(|(n, _)| !names.contains(&n.as_str()));
        self
    }

    /// Dense `[rows, names.len()]` matrix for model input. Missing cells become NaN.
    pub fn to_array2(&self, names: &[&str]) -> Result<Array2<f64>, SchemaError> {
        let cols = names
            .iter()
            .map(|&name| {
                let col = self.require(name)?;
                if matches!(col.kind(), ColumnKind::Utf8 | ColumnKind::Date) {
                    return Err(Self::wrong_kind(name, ColumnKind::Float64, col));
                }
                Ok(col)
            })
            .collect::<Result<Vec<_>, _>>()?;
        let height = self.height();
        Ok(Array2::from_shape_fn((height, cols.len()), |(r, c)| {
            cols[c].as_f64(r).unwrap_or(f64::NAN)
        }))
    }

    /// SHA-256 over column names, kinds and exact cell contents.
    pub fn fingerprint(&self) -> String {
        let mut h = Sha256::new();
        for (name, col) in &self.columns {
            h.update(name.as_bytes());
            h.update(col.kind().to_string().as_bytes());
            for row in 0..col.len() {
                h.update(col.canonical_cell(row).as_bytes());
                h.update([0x1f]);
            }
            h.update([0x1e]);
        }
        format!("{:x}", h.finalize())
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header: Vec<&str> = self.names().collect();
        writeln!(f, "{}", header.join("\t"))?;
        for row in 0..self.height() {
            let cells: Vec<String> = self.columns.iter().map(|(_, c)| c.display_cell(row)).collect();
            writeln!(f, "{}", cells.join("\t"))?;
        }
        Ok(())
    }
}
