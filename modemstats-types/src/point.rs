//! Point - one timestamped row for the time-series store.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDateTime;

use crate::{ConnectionStats, Field, FieldKind, MEASUREMENT, SENTINEL};

/// Key of the uptime field, present on every point.
pub const UPTIME_KEY: &str = "SystemUptime";

/// Format of [`Point::timestamp`] when rendered as text.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// A numeric field value.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum FieldValue {
    Integer(i64),
    Float(f64),
}

impl FieldValue {
    /// The sentinel value for a field of the given kind.
    ///
    /// Integer fields get `-1`, float fields `-1.0`, so a field never changes
    /// type between link-up and link-down points.
    pub fn sentinel(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Integer => FieldValue::Integer(SENTINEL),
            FieldKind::Float => FieldValue::Float(SENTINEL as f64),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Integer(v) => write!(f, "{}", v),
            FieldValue::Float(v) => write!(f, "{}", v),
        }
    }
}

/// A single measurement written once per poll cycle.
///
/// The timestamp is the local wall-clock time of the cycle, without an
/// offset.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub measurement: String,
    #[cfg_attr(feature = "serde", serde(with = "timestamp_format"))]
    pub timestamp: NaiveDateTime,
    pub fields: BTreeMap<String, FieldValue>,
}

impl Point {
    /// Create an empty point.
    pub fn new(measurement: impl Into<String>, timestamp: NaiveDateTime) -> Self {
        Self {
            measurement: measurement.into(),
            timestamp,
            fields: BTreeMap::new(),
        }
    }

    /// Build the point for a parsed poll.
    ///
    /// Every link field is always present: with its parsed value while the
    /// link is up, with [`SENTINEL`] while it is down. `SystemUptime` is the
    /// real value in both cases.
    pub fn from_stats(stats: &ConnectionStats, timestamp: NaiveDateTime) -> Self {
        let mut point = Point::new(MEASUREMENT, timestamp);

        for field in Field::ALL {
            let value = match stats.link() {
                Some(link) => link.get(field),
                None => FieldValue::sentinel(field.kind()),
            };
            point.fields.insert(field.key().to_string(), value);
        }

        point.fields.insert(
            UPTIME_KEY.to_string(),
            FieldValue::Float(stats.system_uptime_secs()),
        );

        point
    }

    /// Add or replace a field.
    pub fn field(mut self, key: impl Into<String>, value: FieldValue) -> Self {
        self.fields.insert(key.into(), value);
        self
    }

    /// Timestamp rendered as `YYYY-MM-DDTHH:MM:SS`.
    pub fn timestamp_string(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}

#[cfg(feature = "serde")]
mod timestamp_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::TIMESTAMP_FORMAT;

    pub fn serialize<S: Serializer>(ts: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&ts.format(TIMESTAMP_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT).map_err(serde::de::Error::custom)
    }
}
