//! # modemstats-adapters
//!
//! Collects connection statistics from a DSL modem's diagnostic shell.
//!
//! The crate is split in two halves:
//!
//! - **Fetching** (`telnet` feature, on by default) - [`TelnetSource`] logs
//!   into the modem and returns the raw output of the diagnostic and uptime
//!   commands as [`RawStats`]
//! - **Parsing** - [`StatsParser`] turns that raw output into
//!   [`ConnectionStats`] using a fixed-line [`Layout`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use modemstats_adapters::{StatsParser, StatsSource, TelnetSource};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = TelnetSource::builder()
//!         .host("192.168.100.1")
//!         .credentials("admin", "admin")
//!         .build();
//!
//!     let raw = source.fetch().await?;
//!     let stats = StatsParser::default().parse(&raw.diagnostics, &raw.uptime)?;
//!
//!     println!("link up: {}", stats.is_link_up());
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod layout;
pub mod parser;

#[cfg(any(test, feature = "testkit"))]
pub mod fixtures;

#[cfg(feature = "telnet")]
mod source;

#[cfg(feature = "telnet")]
pub mod telnet;

pub use error::{ParseError, TransportError};
pub use layout::{Layout, LineSpec, REFERENCE_LINE_COUNT};
pub use parser::{parse, parse_uptime, StatsParser};

#[cfg(feature = "telnet")]
pub use source::{RawStats, StatsSource};
#[cfg(feature = "telnet")]
pub use telnet::{SessionScript, TelnetSource};

// Re-export types for convenience
pub use modemstats_types::{ConnectionStats, Field, FieldValue, LinkMetrics};
