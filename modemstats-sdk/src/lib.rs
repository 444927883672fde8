//! # modemstats-sdk
//!
//! Output backends for DSL modem statistics.
//!
//! A [`MetricSink`] takes a [`Point`] (or the [`ConnectionStats`] it is built
//! from) and writes it somewhere. [`Output`] is the stock implementation:
//!
//! - **InfluxDB** - line protocol over the v2 HTTP write API
//! - **File** - one JSON object per line, for offline inspection
//! - **Channel** - hand points to your own code
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use modemstats_sdk::{InfluxWriter, MetricSink, Output};
//! use modemstats_types::ConnectionStats;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let writer = InfluxWriter::builder()
//!         .url("localhost:8086")
//!         .token("my-token")
//!         .build()?;
//!     let output = Output::influx(writer);
//!
//!     let stats = ConnectionStats::LinkDown { system_uptime_secs: 3600.0 };
//!     output.emit(&stats, chrono::Local::now().naive_local()).await?;
//!     Ok(())
//! }
//! ```

mod error;
mod influx;
mod output;
mod sink;

pub use error::SinkError;
pub use influx::{to_line_protocol, InfluxWriter, InfluxWriterBuilder};
pub use output::Output;
pub use sink::MetricSink;

// Re-export types for convenience
pub use modemstats_types::{ConnectionStats, FieldValue, Point};
