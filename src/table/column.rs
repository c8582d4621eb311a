//! Typed column storage. `None` is the missing sentinel in every kind.

use chrono::NaiveDate;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Utf8,
    Float64,
    Int64,
    Bool,
    Date,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ColumnKind::Utf8 => "utf8",
            ColumnKind::Float64 => "float64",
            ColumnKind::Int64 => "int64",
            ColumnKind::Bool => "bool",
            ColumnKind::Date => "date",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Utf8(Vec<Option<String>>),
    Float64(Vec<Option<f64>>),
    Int64(Vec<Option<i64>>),
    Bool(Vec<Option<bool>>),
    Date(Vec<Option<NaiveDate>>),
}

impl Column {
    pub fn kind(&self) -> ColumnKind {
        match self {
            Column::Utf8(_) => ColumnKind::Utf8,
            Column::Float64(_) => ColumnKind::Float64,
            Column::Int64(_) => ColumnKind::Int64,
            Column::Bool(_) => ColumnKind::Bool,
            Column::Date(_) => ColumnKind::Date,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Column::Utf8(v) => v.len(),
            Column::Float64(v) => v.len(),
            Column::Int64(v) => v.len(),
            Column::Bool(v) => v.len(),
            Column::Date(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_null(&self, row: usize) -> bool {
        match self {
            Column::Utf8(v) => v[row].is_none(),
            Column::Float64(v) => v[row].is_none(),
            Column::Int64(v) => v[row].is_none(),
            Column::Bool(v) => v[row].is_none(),
            Column::Date(v) => v[row].is_none(),
        }
    }

    /// New column holding the rows at `indices`, in that order.
    pub fn take(&self, indices: &[usize]) -> Column {
        fn pick<T: Clone>(v: &[Option<T>], indices: &[usize]) -> Vec<Option<T>> {
            indices.iter().map(|&i| v[i].clone()).collect()
        }
        match self {
            Column::Utf8(v) => Column::Utf8(pick(v, indices)),
            Column::Float64(v) => Column::Float64(pick(v, indices)),
            Column::Int64(v) => Column::Int64(pick(v, indices)),
            Column::Bool(v) => Column::Bool(pick(v, indices)),
            Column::Date(v) => Column::Date(pick(v, indices)),
        }
    }

    /// Numeric view used for model input: missing cells become NaN, bools 0/1.
    pub fn as_f64(&self, row: usize) -> Option<f64> {
        match self {
            Column::Float64(v) => Some(v[row].unwrap_or(f64::NAN)),
            Column::Int64(v) => Some(v[row].map(|x| x as f64).unwrap_or(f64::NAN)),
            Column::Bool(v) => Some(v[row].map(|b| if b { 1.0 } else { 0.0 }).unwrap_or(f64::NAN)),
            Column::Utf8(_) | Column::Date(_) => None,
        }
    }

    /// Human-readable cell; missing renders as `<NA>`.
    pub fn display_cell(&self, row: usize) -> String {
        const NA: &str = "<NA>";
        match self {
            Column::Utf8(v) => v[row].clone().unwrap_or_else(|| NA.to_string()),
            Column::Float64(v) => v[row].map(|x| x.to_string()).unwrap_or_else(|| NA.to_string()),
            Column::Int64(v) => v[row].map(|x| x.to_string()).unwrap_or_else(|| NA.to_string()),
            Column::Bool(v) => v[row].map(|x| x.to_string()).unwrap_or_else(|| NA.to_string()),
            Column::Date(v) => v[row].map(|d| d.to_string()).unwrap_or_else(|| NA.to_string()),
        }
    }

    /// Exact cell encoding for hashing (floats by bit pattern).
    pub(crate) fn canonical_cell(&self, row: usize) -> String {
        match self {
            Column::Float64(v) => v[row]
                .map(|x| format!("{:016x}", x.to_bits()))
                .unwrap_or_else(|| "\u{0}".to_string()),
            Column::Utf8(v) => v[row]
                .as_ref()
                .map(|s| format!("s{}:{}", s.len(), s))
                .unwrap_or_else(|| "\u{0}".to_string()),
            _ if self.is_null(row) => "\u{0}".to_string(),
            _ => self.display_cell(row),
        }
    }
}
