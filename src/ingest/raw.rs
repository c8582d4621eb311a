//! Untyped rows as read from source files, before normalization.

use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    /// One entry per header; blank cells are `None`.
    pub rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Append a row, padding or truncating to the header width.
    pub fn push_row(&mut self, mut row: Vec<Option<String>>) {
        row.resize(self.headers.len(), None);
        self.rows.push(row);
    }

    /// Union-of-columns concatenation: columns keep first-appearance order and
    /// cells absent from a table become `None`.
    pub fn concat(tables: Vec<RawTable>) -> RawTable {
        let mut headers: Vec<String> = Vec::new();
        let mut position: HashMap<String, usize> = HashMap::new();
        for t in &tables {
            for h in &t.headers {
                if !position.contains_key(h) {
                    position.insert(h.clone(), headers.len());
                    headers.push(h.clone());
                }
            }
        }

        let mut out = RawTable::new(headers);
        for t in tables {
            let map: Vec<usize> = t.headers.iter().map(|h| position[h]).collect();
            for row in t.rows {
                let mut merged = vec![None; out.headers.len()];
                for (cell, &dst) in row.into_iter().zip(map.iter()) {
                    merged[dst] = cell;
                }
                out.rows.push(merged);
            }
        }
        out
    }
}
