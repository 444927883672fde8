//! # modemstats-types
//!
//! Core types for DSL modem line statistics. This crate defines the record
//! produced by parsing a modem's diagnostic dump and the point that record is
//! turned into before it is written to a time-series store.
//!
//! ## Design Goals
//!
//! - **No I/O**: everything here is plain data and pure conversions
//! - **Two explicit link states**: a parse yields either [`ConnectionStats::LinkUp`]
//!   with every metric present, or [`ConnectionStats::LinkDown`] with none
//! - **Stable field keys**: [`Field::key`] is the name dashboards query, so it
//!   never changes with the Rust field names
//! - **Optional serialization**: enable the `serde` feature for JSON output
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use modemstats_types::{ConnectionStats, FieldValue, Point, MEASUREMENT};
//!
//! let stats = ConnectionStats::LinkDown { system_uptime_secs: 812.5 };
//! let timestamp = NaiveDate::from_ymd_opt(2024, 3, 1)
//!     .unwrap()
//!     .and_hms_opt(12, 0, 0)
//!     .unwrap();
//!
//! let point = Point::from_stats(&stats, timestamp);
//! assert_eq!(point.measurement, MEASUREMENT);
//! assert_eq!(point.fields["SNRDown"], FieldValue::Float(-1.0));
//! assert_eq!(point.fields["SystemUptime"], FieldValue::Float(812.5));
//! ```

mod field;
mod point;
mod stats;

pub use field::*;
pub use point::*;
pub use stats::*;

/// Measurement name every point is written under.
pub const MEASUREMENT: &str = "connection";

/// Value substituted for every link metric while the link is down.
///
/// Keeping the fields present with a reserved value gives dashboards a
/// continuous series instead of gaps.
pub const SENTINEL: i64 = -1;
