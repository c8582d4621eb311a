//! Record normalization: raw source rows → validated [`TradeRecord`]s → typed frame.
//!
//! All fuzzy column matching happens here (see [`ColumnResolver`]); the feature
//! engines downstream only ever look up canonical names from [`crate::table::names`].

mod columns;
mod record;

pub use columns::{normalize_header, ColumnResolver};
pub use record::{InsiderRole, TradeRecord, TransactionType};

use crate::config::NormalizeConfig;
use crate::error::SchemaError;
use crate::ingest::RawTable;
use crate::table::{names, Column, Frame};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::debug;

/// Why a source row was rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DropCounts {
    pub missing_essential: usize,
    pub unparseable: usize,
    pub blank_entity: usize,
    pub other_transaction: usize,
}

impl DropCounts {
    pub fn total(&self) -> usize {
        self.missing_essential + self.unparseable + self.blank_entity + self.other_transaction
    }
}

/// Normalized trades plus which optional source columns existed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedTrades {
    pub records: Vec<TradeRecord>,
    pub has_actor: bool,
    pub has_relationship: bool,
    pub has_remarks: bool,
    pub dropped: DropCounts,
}

impl NormalizedTrades {
    /// Wrap already-typed records; an optional column is emitted when any record carries it.
    pub fn from_records(records: Vec<TradeRecord>) -> Self {
        Self {
            has_actor: records.iter().any(|r| r.actor_id.is_some()),
            has_relationship: records.iter().any(|r| r.relationship.is_some()),
            has_remarks: records.iter().any(|r| r.remarks.is_some()),
            records,
            dropped: DropCounts::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Typed trade table with the basic per-row features (`is_buy`, `is_sell`,
    /// `insider_role`). Optional columns appear only if their source column did.
    pub fn to_frame(&self) -> Result<Frame, SchemaError> {
        let r = &self.records;
        let mut cols = vec![
            (
                names::ENTITY_ID.to_string(),
                Column::Utf8(r.iter().map(|t| Some(t.entity_id.clone())).collect()),
            ),
            (
                names::TIMESTAMP.to_string(),
                Column::Date(r.iter().map(|t| Some(t.timestamp)).collect()),
            ),
            (
                names::TRANSACTION_TYPE.to_string(),
                Column::Utf8(r.iter().map(|t| Some(t.transaction_type.to_string())).collect()),
            ),
            (names::SHARES.to_string(), Column::Float64(r.iter().map(|t| Some(t.shares)).collect())),
            (names::PRICE.to_string(), Column::Float64(r.iter().map(|t| Some(t.price)).collect())),
            (
                names::TRADE_VALUE.to_string(),
                Column::Float64(r.iter().map(|t| Some(t.trade_value)).collect()),
            ),
            (
                names::IS_BUY.to_string(),
                Column::Bool(r.iter().map(|t| Some(t.transaction_type == TransactionType::Buy)).collect()),
            ),
            (
                names::IS_SELL.to_string(),
                Column::Bool(r.iter().map(|t| Some(t.transaction_type == TransactionType::Sell)).collect()),
            ),
        ];
        if self.has_actor {
            cols.push((
                names::ACTOR_ID.to_string(),
                Column::Utf8(r.iter().map(|t| t.actor_id.clone()).collect()),
            ));
        }
        if self.has_relationship {
            cols.push((
                names::RELATIONSHIP.to_string(),
                Column::Utf8(r.iter().map(|t| t.relationship.clone()).collect()),
            ));
            cols.push((
                names::INSIDER_ROLE.to_string(),
                Column::Utf8(
                    r.iter()
                        .map(|t| Some(t.insider_role().unwrap_or(InsiderRole::Other).as_str().to_string()))
                        .collect(),
                ),
            ));
        }
        if self.has_remarks {
            cols.push((
                names::REMARKS.to_string(),
                Column::Utf8(r.iter().map(|t| t.remarks.clone()).collect()),
            ));
        }
        Frame::new(cols)
    }
}

pub struct Normalizer {
    config: NormalizeConfig,
}

impl Normalizer {
    pub fn new(config: NormalizeConfig) -> Self {
        Self { config }
    }

    /// Date-granularity timestamp; date-time inputs are truncated to their date.
    pub fn parse_date(&self, raw: &str) -> Option<NaiveDate> {
        let raw = raw.trim();
        self.config
            .date_formats
            .iter()
            .find_map(|f| NaiveDate::parse_from_str(raw, f).ok())
            .or_else(|| {
                self.config
                    .datetime_formats
                    .iter()
                    .find_map(|f| NaiveDateTime::parse_from_str(raw, f).ok())
                    .map(|dt| dt.date())
            })
            .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
    }

    fn parse_amount(raw: &str) -> Option<f64> {
        raw.trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v >= 0.0)
            // -0 becomes +0 so equal amounts compare and rank as ties
            .map(|v| v + 0.0)
    }

    /// Validate and type every raw row. Rows with missing/unparseable essentials,
    /// a blank ticker, or a transaction other than buy/sale are dropped.
    pub fn normalize(&self, raw: &RawTable) -> Result<NormalizedTrades, SchemaError> {
        let raw = fold_headers(raw);
        let cols = ColumnResolver::resolve(&raw.headers)?;

        let text = |row: &[Option<String>], idx: usize| -> Option<String> {
            row.get(idx)
                .cloned()
                .flatten()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        let mut out = NormalizedTrades {
            records: Vec::with_capacity(raw.len()),
            has_actor: cols.actor.is_some(),
            has_relationship: cols.relationship.is_some(),
            has_remarks: cols.remarks.is_some(),
            dropped: DropCounts::default(),
        };

        for row in raw.rows.iter().map(Vec::as_slice) {
            let (Some(date), Some(shares), Some(price)) =
                (text(row, cols.date), text(row, cols.shares), text(row, cols.price))
            else {
                out.dropped.missing_essential += 1;
                continue;
            };
            let (Some(timestamp), Some(shares), Some(price)) =
                (self.parse_date(&date), Self::parse_amount(&shares), Self::parse_amount(&price))
            else {
                out.dropped.unparseable += 1;
                continue;
            };
            let trade_value = shares * price;
            if !trade_value.is_finite() {
                out.dropped.unparseable += 1;
                continue;
            }
            let Some(transaction_type) = text(row, cols.transaction).as_deref().and_then(TransactionType::parse)
            else {
                out.dropped.other_transaction += 1;
                continue;
            };
            let Some(entity_id) = text(row, cols.entity) else {
                out.dropped.blank_entity += 1;
                continue;
            };

            out.records.push(TradeRecord {
                entity_id,
                actor_id: cols.actor.and_then(|i| text(row, i)),
                timestamp,
                transaction_type,
                shares,
                price,
                trade_value,
                relationship: cols.relationship.and_then(|i| text(row, i)),
                remarks: cols.remarks.and_then(|i| text(row, i)),
            });
        }

        debug!(
            kept = out.records.len(),
            missing_essential = out.dropped.missing_essential,
            unparseable = out.dropped.unparseable,
            blank_entity = out.dropped.blank_entity,
            other_transaction = out.dropped.other_transaction,
            "normalized trade records"
        );
        Ok(out)
    }
}

/// Normalize header names and merge columns that collapse to the same name
/// (e.g. `Ticker` and `ticker` from different source files). The first
/// non-missing cell wins.
fn fold_headers(raw: &RawTable) -> RawTable {
    let mut headers: Vec<String> = Vec::new();
    let targets: Vec<usize> = raw
        .headers
        .iter()
        .map(|h| {
            let h = normalize_header(h);
            match headers.iter().position(|x| *x == h) {
                Some(i) => i,
                None => {
                    headers.push(h);
                    headers.len() - 1
                }
            }
        })
        .collect();

    let mut out = RawTable::new(headers);
    for row in &raw.rows {
        let mut merged: Vec<Option<String>> = vec![None; out.headers.len()];
        for (cell, &dst) in row.iter().zip(targets.iter()) {
            if merged[dst].is_none() {
                merged[dst] = cell.clone();
            }
        }
        out.push_row(merged);
    }
    out
}
