//! Calendar parts of each trade date and the gap since the same insider's
//! previous trade in the same ticker.

use crate::error::SchemaError;
use crate::table::{names, Column, Frame};
use chrono::Datelike;
use std::cmp::Ordering;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default)]
pub struct TemporalGapEngine;

impl TemporalGapEngine {
    pub fn new() -> Self {
        Self
    }

    /// Returns a new frame with `year`, `month`, `day`, `weekday` (0 = Monday) and
    /// `days_since_last_trade`.
    ///
    /// With an `actor_id` column, rows come back ordered by
    /// (actor_id, entity_id, timestamp, input position); rows lacking an actor
    /// sort last and have no gap. Without one, input order is kept and every gap
    /// is missing.
    pub fn compute(&self, frame: &Frame) -> Result<Frame, SchemaError> {
        let entities = frame.utf8(names::ENTITY_ID)?;
        let dates = frame.date(names::TIMESTAMP)?;
        let actors = if frame.has_column(names::ACTOR_ID) {
            Some(frame.utf8(names::ACTOR_ID)?)
        } else {
            None
        };

        let mut valid_dates = Vec::with_capacity(frame.height());
        for row in 0..frame.height() {
            if entities[row].is_none() {
                return Err(SchemaError::NullValue {
                    column: names::ENTITY_ID.to_string(),
                    row,
                });
            }
            valid_dates.push(dates[row].ok_or_else(|| SchemaError::NullValue {
                column: names::TIMESTAMP.to_string(),
                row,
            })?);
        }

        let mut order: Vec<usize> = (0..frame.height()).collect();
        let mut gaps: Vec<Option<f64>> = vec![None; frame.height()];

        match actors {
            Some(actors) => {
                order.sort_by(|&a, &b| {
                    cmp_actor(&actors[a], &actors[b])
                        .then_with(|| entities[a].cmp(&entities[b]))
                        .then_with(|| valid_dates[a].cmp(&valid_dates[b]))
                });
                for pair in order.windows(2) {
                    let (prev, cur) = (pair[0], pair[1]);
                    if actors[cur].is_some() && actors[cur] == actors[prev] && entities[cur] == entities[prev] {
                        gaps[cur] = Some((valid_dates[cur] - valid_dates[prev]).num_days() as f64);
                    }
                }
            }
            None => warn!("no actor column; days_since_last_trade is missing for every row"),
        }

        let ordered_dates: Vec<_> = order.iter().map(|&r| valid_dates[r]).collect();
        let part = |f: fn(&chrono::NaiveDate) -> i64| -> Column {
            Column::Int64(ordered_dates.iter().map(|d| Some(f(d))).collect())
        };

        let out = frame
            .take(&order)
            .with_column(names::YEAR, part(|d| i64::from(d.year())))?
            .with_column(names::MONTH, part(|d| i64::from(d.month())))?
            .with_column(names::DAY, part(|d| i64::from(d.day())))?
            .with_column(names::WEEKDAY, part(|d| i64::from(d.weekday().num_days_from_monday())))?
            .with_column(
                names::DAYS_SINCE_LAST_TRADE,
                Column::Float64(order.iter().map(|&r| gaps[r]).collect()),
            )?;

        debug!(
            rows = out.height(),
            gaps = gaps.iter().filter(|g| g.is_some()).count(),
            "temporal features computed"
        );
        Ok(out)
    }
}

/// Present actors first, in lexical order; missing actors last.
fn cmp_actor(a: &Option<String>, b: &Option<String>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.cmp(y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
