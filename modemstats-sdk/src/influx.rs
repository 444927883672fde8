//! InfluxDB v2 writer.
//!
//! Points are encoded as line protocol and POSTed to the `/api/v2/write`
//! endpoint with second precision.
//!
//! # Example
//!
//! ```rust,no_run
//! use modemstats_sdk::InfluxWriter;
//!
//! let writer = InfluxWriter::builder()
//!     .url("localhost:8086")
//!     .token("my-token")
//!     .org("organisation")
//!     .bucket("modemstats")
//!     .build()
//!     .expect("http client");
//!
//! assert_eq!(writer.write_url(), "http://localhost:8086/api/v2/write");
//! ```

use std::fmt::Write as _;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use tracing::debug;

use modemstats_types::{FieldValue, Point};

use crate::SinkError;

/// Writes points to an InfluxDB v2 bucket.
#[derive(Debug, Clone)]
pub struct InfluxWriter {
    client: Client,
    write_url: String,
    token: String,
    org: String,
    bucket: String,
}

impl InfluxWriter {
    /// Create a new builder for configuring the writer.
    pub fn builder() -> InfluxWriterBuilder {
        InfluxWriterBuilder::default()
    }

    /// Full URL of the write endpoint, without query parameters.
    pub fn write_url(&self) -> &str {
        &self.write_url
    }

    pub fn org(&self) -> &str {
        &self.org
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Write a single point.
    pub async fn write(&self, point: &Point) -> Result<(), SinkError> {
        let body = to_line_protocol(point)?;
        debug!(bucket = %self.bucket, fields = point.fields.len(), "writing point");

        let response = self
            .client
            .post(&self.write_url)
            .query(&[
                ("org", self.org.as_str()),
                ("bucket", self.bucket.as_str()),
                ("precision", "s"),
            ])
            .header("Authorization", format!("Token {}", self.token))
            .header("Content-Type", "text/plain; charset=utf-8")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(SinkError::Unauthorized {
                status: status.as_u16(),
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SinkError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}

/// Builder for InfluxWriter.
#[derive(Debug, Default)]
pub struct InfluxWriterBuilder {
    url: Option<String>,
    token: Option<String>,
    org: Option<String>,
    bucket: Option<String>,
    timeout: Option<Duration>,
}

impl InfluxWriterBuilder {
    /// Set the server URL (default: "localhost:8086"). `http://` is assumed
    /// when no scheme is given.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the API token (default: empty).
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the organisation (default: "organisation").
    pub fn org(mut self, org: impl Into<String>) -> Self {
        self.org = Some(org.into());
        self
    }

    /// Set the bucket (default: "modemstats").
    pub fn bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = Some(bucket.into());
        self
    }

    /// Set the request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the writer.
    pub fn build(self) -> Result<InfluxWriter, SinkError> {
        let timeout = self.timeout.unwrap_or(Duration::from_secs(10));
        let client = Client::builder().timeout(timeout).build()?;

        let base = normalize_url(self.url.as_deref().unwrap_or("localhost:8086"));

        Ok(InfluxWriter {
            client,
            write_url: format!("{}/api/v2/write", base),
            token: self.token.unwrap_or_default(),
            org: self.org.unwrap_or_else(|| "organisation".to_string()),
            bucket: self.bucket.unwrap_or_else(|| "modemstats".to_string()),
        })
    }
}

fn normalize_url(url: &str) -> String {
    let url = url.trim().trim_end_matches('/');
    if url.contains("://") {
        url.to_string()
    } else {
        format!("http://{}", url)
    }
}

/// Encode a point as one line of InfluxDB line protocol.
///
/// Integers carry the `i` suffix. Non-finite floats cannot be represented
/// and fail the whole point, as does a point with no fields. The naive
/// timestamp is read as UTC and written in seconds.
pub fn to_line_protocol(point: &Point) -> Result<String, SinkError> {
    let mut line = escape(&point.measurement, &[',', ' ']);
    let mut first = true;

    for (key, value) in &point.fields {
        let encoded = match *value {
            FieldValue::Integer(v) => format!("{}i", v),
            FieldValue::Float(v) if v.is_finite() => format!("{}", v),
            FieldValue::Float(v) => {
                return Err(SinkError::Serialize(format!(
                    "field {:?} is not a finite number: {}",
                    key, v
                )))
            }
        };
        line.push(if first { ' ' } else { ',' });
        first = false;
        let _ = write!(line, "{}={}", escape(key, &[',', '=', ' ']), encoded);
    }

    if first {
        return Err(SinkError::Serialize(format!(
            "point {:?} has no writable fields",
            point.measurement
        )));
    }

    let _ = write!(line, " {}", point.timestamp.and_utc().timestamp());
    Ok(line)
}

fn escape(raw: &str, special: &[char]) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c == '\\' || special.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
