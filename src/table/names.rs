//! Canonical column names of the normalized trade table and the feature matrix.

pub const ENTITY_ID: &str = "entity_id";
pub const ACTOR_ID: &str = "actor_id";
pub const TIMESTAMP: &str = "timestamp";
pub const TRANSACTION_TYPE: &str = "transaction_type";
pub const SHARES: &str = "shares";
pub const PRICE: &str = "price";
pub const TRADE_VALUE: &str = "trade_value";
pub const RELATIONSHIP: &str = "relationship";
pub const REMARKS: &str = "remarks";

pub const INSIDER_ROLE: &str = "insider_role";
pub const IS_BUY: &str = "is_buy";
pub const IS_SELL: &str = "is_sell";

pub const TRADE_VALUE_7D_MEAN: &str = "trade_value_7d_mean";
pub const TRADE_VALUE_30D_MEAN: &str = "trade_value_30d_mean";
pub const TRADE_VALUE_ZSCORE: &str = "trade_value_zscore";
pub const TRADE_VALUE_PCT_RANK: &str = "trade_value_pct_rank";
pub const UNUSUAL_VOLUME: &str = "unusual_volume";

pub const YEAR: &str = "year";
pub const MONTH: &str = "month";
pub const DAY: &str = "day";
pub const WEEKDAY: &str = "weekday";
pub const DAYS_SINCE_LAST_TRADE: &str = "days_since_last_trade";
