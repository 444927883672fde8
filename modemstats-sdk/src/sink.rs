//! The seam between the poll loop and wherever points end up.

use std::fmt::Debug;

use async_trait::async_trait;
use chrono::NaiveDateTime;

use modemstats_types::{ConnectionStats, Point};

use crate::SinkError;

/// Destination for points.
#[async_trait]
pub trait MetricSink: Send + Sync + Debug {
    /// Write one point.
    async fn write(&self, point: &Point) -> Result<(), SinkError>;

    /// Build the point for `stats` at `timestamp` and write it.
    ///
    /// Returns the point that was written.
    async fn emit(
        &self,
        stats: &ConnectionStats,
        timestamp: NaiveDateTime,
    ) -> Result<Point, SinkError> {
        let point = Point::from_stats(stats, timestamp);
        self.write(&point).await?;
        Ok(point)
    }
}
