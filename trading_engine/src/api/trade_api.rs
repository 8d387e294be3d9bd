use std::fmt::Debug;

use crate::{
    db_types::NewTrade,
    traits::{TradeApiError, TradeManagement},
};

/// Public API for persisting accepted trades.
pub struct TradeApi<B> {
    db: B,
}

impl<B: Debug> Debug for TradeApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TradeApi ({:?})", self.db)
    }
}

impl<B> TradeApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> TradeApi<B>
where B: TradeManagement
{
    pub async fn save_trade(&self, user_id: &str, price: f64) -> Result<i64, TradeApiError> {
        self.db.insert_trade(NewTrade { user_id: user_id.to_string(), price }).await
    }
}
