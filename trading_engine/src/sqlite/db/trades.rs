use chrono::Utc;
use sqlx::SqliteConnection;

use crate::{db_types::NewTrade, traits::TradeApiError};

pub async fn insert_trade(trade: NewTrade, conn: &mut SqliteConnection) -> Result<i64, TradeApiError> {
    let result = sqlx::query("INSERT INTO trades (user_id, price, created_at) VALUES ($1, $2, $3)")
        .bind(trade.user_id)
        .bind(trade.price)
        .bind(Utc::now())
        .execute(conn)
        .await
        .map_err(|e| TradeApiError::DatabaseError(e.to_string()))?;
    Ok(result.last_insert_rowid())
}
