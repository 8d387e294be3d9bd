//! Record types shared between the storage backends and the public API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One synthetic market reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct DataPoint {
    pub id: i64,
    pub value: f64,
    pub timestamp: DateTime<Utc>,
}

/// An accepted trade, as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Trade {
    pub id: i64,
    pub user_id: String,
    pub price: f64,
    pub created_at: DateTime<Utc>,
}

/// A trade that has passed validation and is about to be stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTrade {
    pub user_id: String,
    pub price: f64,
}
