//! Strongly typed trade record produced at the normalization boundary.

use chrono::NaiveDate;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionType {
    Buy,
    Sell,
}

impl TransactionType {
    /// Case/whitespace-insensitive parse; `Sale` and `Sell` both map to `Sell`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "buy" => Some(TransactionType::Buy),
            "sale" | "sell" => Some(TransactionType::Sell),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Buy => "Buy",
            TransactionType::Sell => "Sell",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsiderRole {
    Ceo,
    Cfo,
    Director,
    Officer,
    Other,
}

impl InsiderRole {
    /// Role from free-text relationship; first keyword match wins.
    pub fn from_relationship(text: &str) -> Self {
        let t = text.to_lowercase();
        if t.contains("ceo") {
            InsiderRole::Ceo
        } else if t.contains("cfo") {
            InsiderRole::Cfo
        } else if t.contains("director") {
            InsiderRole::Director
        } else if t.contains("officer") {
            InsiderRole::Officer
        } else {
            InsiderRole::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InsiderRole::Ceo => "CEO",
            InsiderRole::Cfo => "CFO",
            InsiderRole::Director => "Director",
            InsiderRole::Officer => "Officer",
            InsiderRole::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TradeRecord {
    pub entity_id: String,
    pub actor_id: Option<String>,
    pub timestamp: NaiveDate,
    pub transaction_type: TransactionType,
    pub shares: f64,
    pub price: f64,
    /// `shares * price`
    pub trade_value: f64,
    pub relationship: Option<String>,
    pub remarks: Option<String>,
}

impl TradeRecord {
    pub fn new(
        entity_id: impl Into<String>,
        timestamp: NaiveDate,
        transaction_type: TransactionType,
        shares: f64,
        price: f64,
    ) -> Self {
        Self {
            entity_id: entity_id.into(),
            actor_id: None,
            timestamp,
            transaction_type,
            shares,
            price,
            trade_value: shares * price,
            relationship: None,
            remarks: None,
        }
    }

    pub fn with_actor(mut self, actor_id: impl Into<String>) -> Self {
        self.actor_id = Some(actor_id.into());
        self
    }

    pub fn with_relationship(mut self, relationship: impl Into<String>) -> Self {
        self.relationship = Some(relationship.into());
        self
    }

    pub fn insider_role(&self) -> Option<InsiderRole> {
        self.relationship.as_deref().map(InsiderRole::from_relationship)
    }
}
