//! Synthetic market data generator.
//!
//! A background task that inserts one pseudo-random reading in [0, 10000) per interval, starting
//! with one immediately at startup. Failed inserts are logged and skipped; the generator never
//! takes the server down.

use std::time::Duration;

use log::{debug, warn};
use rand::{thread_rng, Rng};
use tokio::task::JoinHandle;
use trading_engine::{DataApi, SqliteDatabase};

pub fn start_data_generator(db: SqliteDatabase, interval: Duration) -> JoinHandle<()> {
    let api = DataApi::new(db);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            // thread_rng is not Send, so the value is drawn before the await point.
            let value = thread_rng().gen::<f64>() * 10_000.0;
            match api.record(value).await {
                Ok(id) => debug!("📊️ Recorded synthetic reading #{id}: {value:.2}"),
                Err(e) => warn!("📊️ Could not record synthetic reading. {e}"),
            }
        }
    })
}
