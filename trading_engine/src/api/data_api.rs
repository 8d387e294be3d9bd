use std::fmt::Debug;

use chrono::{Duration, Utc};

use crate::{
    db_types::DataPoint,
    traits::{DataApiError, DataManagement},
};

/// Public API for recording and querying market readings.
pub struct DataApi<B> {
    db: B,
}

impl<B: Debug> Debug for DataApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DataApi ({:?})", self.db)
    }
}

impl<B> DataApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> DataApi<B>
where B: DataManagement
{
    /// Record a reading taken now.
    pub async fn record(&self, value: f64) -> Result<i64, DataApiError> {
        self.db.insert_data_point(value, Utc::now()).await
    }

    /// The most recent readings, newest first.
    pub async fn recent(&self, limit: i64) -> Result<Vec<DataPoint>, DataApiError> {
        self.db.fetch_recent_data_points(limit).await
    }

    /// The lowest reading observed inside the trailing `window`.
    ///
    /// Readings older than the window never contribute. An empty window is reported as
    /// [`DataApiError::NoDataInWindow`] rather than a sentinel value, so a genuine 0.0 reading is
    /// a perfectly valid minimum.
    pub async fn lowest_in_window(&self, window: Duration) -> Result<f64, DataApiError> {
        let since = Utc::now() - window;
        let data = self.db.fetch_data_points_since(since).await?;
        data.iter().map(|dp| dp.value).reduce(f64::min).ok_or(DataApiError::NoDataInWindow)
    }
}
