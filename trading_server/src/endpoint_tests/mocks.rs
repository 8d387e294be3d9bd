use chrono::{DateTime, Utc};
use mockall::mock;
use trading_engine::{
    db_types::{DataPoint, NewTrade},
    traits::{DataApiError, DataManagement, TradeApiError, TradeManagement},
};

mock! {
    pub DataManager {}
    impl DataManagement for DataManager {
        async fn insert_data_point(&self, value: f64, timestamp: DateTime<Utc>) -> Result<i64, DataApiError>;
        async fn fetch_recent_data_points(&self, limit: i64) -> Result<Vec<DataPoint>, DataApiError>;
        async fn fetch_data_points_since(&self, since: DateTime<Utc>) -> Result<Vec<DataPoint>, DataApiError>;
    }
}

mock! {
    pub TradeManager {}
    impl TradeManagement for TradeManager {
        async fn insert_trade(&self, trade: NewTrade) -> Result<i64, TradeApiError>;
    }
}
