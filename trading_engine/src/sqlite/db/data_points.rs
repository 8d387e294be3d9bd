use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;

use crate::{db_types::DataPoint, traits::DataApiError};

pub async fn insert_data_point(
    value: f64,
    timestamp: DateTime<Utc>,
    conn: &mut SqliteConnection,
) -> Result<i64, DataApiError> {
    let result = sqlx::query("INSERT INTO data_points (value, timestamp) VALUES ($1, $2)")
        .bind(value)
        .bind(timestamp)
        .execute(conn)
        .await
        .map_err(|e| DataApiError::DatabaseError(e.to_string()))?;
    Ok(result.last_insert_rowid())
}

pub async fn fetch_recent(limit: i64, conn: &mut SqliteConnection) -> Result<Vec<DataPoint>, DataApiError> {
    sqlx::query_as::<_, DataPoint>(
        "SELECT id, value, timestamp FROM data_points ORDER BY timestamp DESC LIMIT $1",
    )
    .bind(limit)
    .fetch_all(conn)
    .await
    .map_err(|e| DataApiError::DatabaseError(e.to_string()))
}

pub async fn fetch_since(
    since: DateTime<Utc>,
    conn: &mut SqliteConnection,
) -> Result<Vec<DataPoint>, DataApiError> {
    sqlx::query_as::<_, DataPoint>(
        "SELECT id, value, timestamp FROM data_points WHERE timestamp >= $1 ORDER BY timestamp DESC",
    )
    .bind(since)
    .fetch_all(conn)
    .await
    .map_err(|e| DataApiError::DatabaseError(e.to_string()))
}
