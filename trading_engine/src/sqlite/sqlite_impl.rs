//! `SqliteDatabase` is the concrete storage backend for the trading gateway. It implements the
//! traits defined in the [`crate::traits`] module over a shared connection pool, so it is cheap to
//! clone and hand to each worker.

use std::fmt::Debug;

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use super::db::{data_points, new_pool, trades};
use crate::{
    db_types::{DataPoint, NewTrade},
    traits::{DataApiError, DataManagement, TradeApiError, TradeManagement},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = new_pool(url, max_connections).await?;
        Ok(Self { url: url.to_string(), pool })
    }

    /// An in-memory database for tests. The pool is capped at a single connection, since every
    /// connection to `sqlite::memory:` would otherwise see its own empty database.
    pub async fn new_in_memory() -> Result<Self, sqlx::Error> {
        Self::new_with_url("sqlite::memory:", 1).await
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl DataManagement for SqliteDatabase {
    async fn insert_data_point(&self, value: f64, timestamp: DateTime<Utc>) -> Result<i64, DataApiError> {
        let mut conn = self.pool.acquire().await.map_err(|e| DataApiError::DatabaseError(e.to_string()))?;
        data_points::insert_data_point(value, timestamp, &mut conn).await
    }

    async fn fetch_recent_data_points(&self, limit: i64) -> Result<Vec<DataPoint>, DataApiError> {
        let mut conn = self.pool.acquire().await.map_err(|e| DataApiError::DatabaseError(e.to_string()))?;
        data_points::fetch_recent(limit, &mut conn).await
    }

    async fn fetch_data_points_since(&self, since: DateTime<Utc>) -> Result<Vec<DataPoint>, DataApiError> {
        let mut conn = self.pool.acquire().await.map_err(|e| DataApiError::DatabaseError(e.to_string()))?;
        data_points::fetch_since(since, &mut conn).await
    }
}

impl TradeManagement for SqliteDatabase {
    async fn insert_trade(&self, trade: NewTrade) -> Result<i64, TradeApiError> {
        let mut conn = self.pool.acquire().await.map_err(|e| TradeApiError::DatabaseError(e.to_string()))?;
        trades::insert_trade(trade, &mut conn).await
    }
}
