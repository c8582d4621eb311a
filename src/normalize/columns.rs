//! Source column resolution, done once at the boundary.
//!
//! Policy for each logical field: exact header name first, then the first
//! header containing the keyword, otherwise the field is absent. Headers are
//! compared after trimming and lowercasing.

use crate::error::SchemaError;

/// Header positions of the logical fields in a raw table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnResolver {
    pub date: usize,
    pub transaction: usize,
    pub entity: usize,
    pub shares: usize,
    pub price: usize,
    pub actor: Option<usize>,
    pub relationship: Option<usize>,
    pub remarks: Option<usize>,
}

pub fn normalize_header(h: &str) -> String {
    h.trim().to_lowercase()
}

fn exact(headers: &[String], name: &str) -> Option<usize> {
    headers.iter().position(|h| h == name)
}

fn exact_or_contains(headers: &[String], name: &str) -> Option<usize> {
    exact(headers, name).or_else(|| headers.iter().position(|h| h.contains(name)))
}

fn required(found: Option<usize>, name: &str) -> Result<usize, SchemaError> {
    found.ok_or_else(|| SchemaError::MissingColumn(name.to_string()))
}

impl ColumnResolver {
    const ACTOR_CANDIDATES: [&'static str; 4] = ["insider", "insider_name", "reporting_owner", "owner"];

    /// `headers` must already be normalized with [`normalize_header`].
    pub fn resolve(headers: &[String]) -> Result<Self, SchemaError> {
        // Essential numeric/date fields must match exactly before any fallback is considered.
        let date = required(exact(headers, "date"), "date")?;
        let shares = required(exact(headers, "shares"), "shares")?;
        let price = required(exact(headers, "price"), "price")?;

        let transaction = required(exact_or_contains(headers, "transaction"), "transaction")?;
        let entity = required(exact_or_contains(headers, "ticker"), "ticker")?;

        let actor = Self::ACTOR_CANDIDATES
            .iter()
            .find_map(|c| exact(headers, c))
            .or_else(|| headers.iter().position(|h| h.contains("insider")));

        Ok(Self {
            date,
            transaction,
            entity,
            shares,
            price,
            actor,
            relationship: exact_or_contains(headers, "relationship"),
            remarks: exact_or_contains(headers, "remarks"),
        })
    }
}
