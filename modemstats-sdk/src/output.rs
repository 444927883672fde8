//! Output backends for emitting points.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;

use modemstats_types::Point;

use crate::{InfluxWriter, MetricSink, SinkError};

/// Output destination for points.
#[derive(Debug)]
pub enum Output {
    /// Write points to an InfluxDB v2 bucket.
    Influx(InfluxWriter),

    /// Append points to a file, one JSON object per line.
    File(PathBuf),

    /// Send points through a channel.
    ///
    /// Use `Output::channel()` to create this variant and get the receiver.
    Channel(mpsc::Sender<Point>),
}

impl Output {
    /// Create an InfluxDB output.
    pub fn influx(writer: InfluxWriter) -> Self {
        Output::Influx(writer)
    }

    /// Create a file output.
    ///
    /// # Example
    ///
    /// ```rust
    /// use modemstats_sdk::Output;
    ///
    /// let output = Output::file("points.jsonl");
    /// ```
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Output::File(path.into())
    }

    /// Create a channel output and return both the output and receiver.
    ///
    /// # Example
    ///
    /// ```rust
    /// use modemstats_sdk::Output;
    ///
    /// let (output, mut rx) = Output::channel(16);
    ///
    /// // Later, receive points
    /// // while let Some(point) = rx.recv().await {
    /// //     println!("{} fields at {}", point.fields.len(), point.timestamp_string());
    /// // }
    /// ```
    pub fn channel(buffer: usize) -> (Self, mpsc::Receiver<Point>) {
        let (tx, rx) = mpsc::channel(buffer);
        (Output::Channel(tx), rx)
    }

    /// Short description for logs.
    pub fn describe(&self) -> String {
        match self {
            Output::Influx(writer) => format!("influx {} ({})", writer.write_url(), writer.bucket()),
            Output::File(path) => format!("file {}", path.display()),
            Output::Channel(_) => "channel".to_string(),
        }
    }
}

#[async_trait]
impl MetricSink for Output {
    async fn write(&self, point: &Point) -> Result<(), SinkError> {
        match self {
            Output::Influx(writer) => writer.write(point).await,
            Output::File(path) => {
                let mut json = serde_json::to_string(point)?;
                json.push('\n');
                let mut file = tokio::fs::OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .await?;
                file.write_all(json.as_bytes()).await?;
                file.flush().await?;
                Ok(())
            }
            Output::Channel(tx) => tx.send(point.clone()).await.map_err(|_| SinkError::Closed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use modemstats_types::{ConnectionStats, FieldValue};

    fn ts() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 17)
            .unwrap()
            .and_hms_opt(21, 4, 9)
            .unwrap()
    }

    #[tokio::test]
    async fn test_channel_output_delivers_point() {
        let (output, mut rx) = Output::channel(4);
        let stats = ConnectionStats::LinkDown {
            system_uptime_secs: 12.5,
        };

        let written = output.emit(&stats, ts()).await.unwrap();
        let received = rx.recv().await.unwrap();
        assert_eq!(received, written);
        assert_eq!(received.fields.get("SystemUptime"), Some(&FieldValue::Float(12.5)));
        assert_eq!(received.fields.get("MaxUp"), Some(&FieldValue::Integer(-1)));
    }

    #[tokio::test]
    async fn test_closed_channel_is_an_error() {
        let (output, rx) = Output::channel(1);
        drop(rx);

        let point = Point::new("connection", ts()).field("MaxUp", FieldValue::Integer(1));
        assert!(matches!(output.write(&point).await, Err(SinkError::Closed)));
    }

    #[tokio::test]
    async fn test_file_output_appends_json_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("points.jsonl");
        let output = Output::file(&path);

        let first = Point::new("connection", ts()).field("MaxUp", FieldValue::Integer(1180));
        let second = Point::new("connection", ts()).field("SNRDown", FieldValue::Float(6.2));
        output.write(&first).await.unwrap();
        output.write(&second).await.unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);

        let decoded: Point = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(decoded, first);
        let value: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(value["timestamp"], "2024-05-17T21:04:09");
        assert_eq!(value["fields"]["SNRDown"], 6.2);
    }

    #[tokio::test]
    async fn test_file_output_reports_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let output = Output::file(dir.path().join("missing").join("points.jsonl"));

        let point = Point::new("connection", ts()).field("MaxUp", FieldValue::Integer(1));
        assert!(matches!(output.write(&point).await, Err(SinkError::Io(_))));
    }

    #[test]
    fn test_describe() {
        assert_eq!(Output::file("/tmp/p.jsonl").describe(), "file /tmp/p.jsonl");
        let (output, _rx) = Output::channel(1);
        assert_eq!(output.describe(), "channel");
    }
}
