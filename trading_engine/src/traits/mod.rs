//! Storage backend traits.
//!
//! Backends (e.g. SQLite) implement these traits; the API structs in [`crate::api`] and the
//! server's handlers are generic over them, which is also what makes the endpoints mockable in
//! tests.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::db_types::{DataPoint, NewTrade};

#[derive(Debug, Clone, Error)]
pub enum DataApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("No readings were recorded inside the requested window")]
    NoDataInWindow,
}

#[derive(Debug, Clone, Error)]
pub enum TradeApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
}

#[allow(async_fn_in_trait)]
pub trait DataManagement {
    /// Store a reading taken at `timestamp` and return its id.
    async fn insert_data_point(&self, value: f64, timestamp: DateTime<Utc>) -> Result<i64, DataApiError>;
    /// Fetch up to `limit` readings, newest first.
    async fn fetch_recent_data_points(&self, limit: i64) -> Result<Vec<DataPoint>, DataApiError>;
    /// Fetch every reading taken at or after `since`, newest first.
    async fn fetch_data_points_since(&self, since: DateTime<Utc>) -> Result<Vec<DataPoint>, DataApiError>;
}

#[allow(async_fn_in_trait)]
pub trait TradeManagement {
    /// Store an accepted trade and return its id.
    async fn insert_trade(&self, trade: NewTrade) -> Result<i64, TradeApiError>;
}
