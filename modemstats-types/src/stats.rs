//! Connection statistics - the typed result of parsing one diagnostic dump.

use crate::{Field, FieldKind, FieldValue};

/// Line statistics for one poll of the modem.
///
/// Exactly one variant is produced per parse. Both carry the system uptime,
/// which is read from a separate command and does not depend on link state.
///
/// # Example
///
/// ```rust
/// use modemstats_types::ConnectionStats;
///
/// let stats = ConnectionStats::LinkDown { system_uptime_secs: 42.0 };
/// assert!(!stats.is_link_up());
/// assert!(stats.link().is_none());
/// assert_eq!(stats.system_uptime_secs(), 42.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "state", rename_all = "snake_case"))]
pub enum ConnectionStats {
    /// The modem has DSL sync; every link metric was read.
    LinkUp {
        link: LinkMetrics,
        system_uptime_secs: f64,
    },
    /// The modem reported no sync; no link metrics are available.
    LinkDown { system_uptime_secs: f64 },
}

impl ConnectionStats {
    /// Seconds since the modem booted.
    pub fn system_uptime_secs(&self) -> f64 {
        match self {
            ConnectionStats::LinkUp {
                system_uptime_secs, ..
            }
            | ConnectionStats::LinkDown { system_uptime_secs } => *system_uptime_secs,
        }
    }

    /// The link metrics, if the link is up.
    pub fn link(&self) -> Option<&LinkMetrics> {
        match self {
            ConnectionStats::LinkUp { link, .. } => Some(link),
            ConnectionStats::LinkDown { .. } => None,
        }
    }

    /// Whether the modem had DSL sync.
    pub fn is_link_up(&self) -> bool {
        matches!(self, ConnectionStats::LinkUp { .. })
    }
}

/// Every metric read from the diagnostic dump while the link is up.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinkMetrics {
    pub interleave_depth: i64,
    pub interleaving: f64,
    /// Interleaving delay in milliseconds.
    pub delay: f64,
    pub fec_error_count: i64,

    /// Attainable rates negotiated at sync time.
    pub max_upstream_kbps: i64,
    pub max_downstream_kbps: i64,
    /// Rates of the active bearer.
    pub current_upstream_kbps: i64,
    pub current_downstream_kbps: i64,

    pub snr_down_db: f64,
    pub snr_up_db: f64,
    pub attenuation_down_db: f64,
    pub attenuation_up_db: f64,
    pub power_down_dbm: f64,
    pub power_up_dbm: f64,

    pub error_seconds_up: i64,
    pub error_seconds_down: i64,
    pub serious_error_seconds_up: i64,
    pub serious_error_seconds_down: i64,
    pub unavailable_seconds_up: i64,
    pub unavailable_seconds_down: i64,
    pub available_seconds: i64,
}

impl LinkMetrics {
    /// Create a builder that collects fields one at a time.
    pub fn builder() -> LinkMetricsBuilder {
        LinkMetricsBuilder::new()
    }

    /// Read a metric by identifier.
    pub fn get(&self, field: Field) -> FieldValue {
        match field {
            Field::InterleaveDepth => FieldValue::Integer(self.interleave_depth),
            Field::Interleaving => FieldValue::Float(self.interleaving),
            Field::Delay => FieldValue::Float(self.delay),
            Field::FecErrorCount => FieldValue::Integer(self.fec_error_count),
            Field::MaxUpstreamKbps => FieldValue::Integer(self.max_upstream_kbps),
            Field::MaxDownstreamKbps => FieldValue::Integer(self.max_downstream_kbps),
            Field::CurrentUpstreamKbps => FieldValue::Integer(self.current_upstream_kbps),
            Field::CurrentDownstreamKbps => FieldValue::Integer(self.current_downstream_kbps),
            Field::SnrDownDb => FieldValue::Float(self.snr_down_db),
            Field::SnrUpDb => FieldValue::Float(self.snr_up_db),
            Field::AttenuationDownDb => FieldValue::Float(self.attenuation_down_db),
            Field::AttenuationUpDb => FieldValue::Float(self.attenuation_up_db),
            Field::PowerDownDbm => FieldValue::Float(self.power_down_dbm),
            Field::PowerUpDbm => FieldValue::Float(self.power_up_dbm),
            Field::ErrorSecondsUp => FieldValue::Integer(self.error_seconds_up),
            Field::ErrorSecondsDown => FieldValue::Integer(self.error_seconds_down),
            Field::SeriousErrorSecondsUp => FieldValue::Integer(self.serious_error_seconds_up),
            Field::SeriousErrorSecondsDown => {
                FieldValue::Integer(self.serious_error_seconds_down)
            }
            Field::UnavailableSecondsUp => FieldValue::Integer(self.unavailable_seconds_up),
            Field::UnavailableSecondsDown => FieldValue::Integer(self.unavailable_seconds_down),
            Field::AvailableSeconds => FieldValue::Integer(self.available_seconds),
        }
    }
}

/// Builder for [`LinkMetrics`].
///
/// Fields can be set in any order; [`build`](Self::build) only succeeds
/// once every field has a value of the right kind, so a partially read dump
/// can never turn into a record.
#[derive(Debug, Clone, Default)]
pub struct LinkMetricsBuilder {
    values: [Option<FieldValue>; Field::COUNT],
}

impl LinkMetricsBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing any earlier value.
    pub fn set(&mut self, field: Field, value: FieldValue) -> &mut Self {
        self.values[field.index()] = Some(value);
        self
    }

    /// Build the record.
    ///
    /// Returns the first field that is missing or holds a value of the
    /// wrong kind.
    pub fn build(&self) -> Result<LinkMetrics, Field> {
        let int = |field: Field| match self.values[field.index()] {
            Some(FieldValue::Integer(v)) if field.kind() == FieldKind::Integer => Ok(v),
            _ => Err(field),
        };
        let float = |field: Field| match self.values[field.index()] {
            Some(FieldValue::Float(v)) if field.kind() == FieldKind::Float => Ok(v),
            _ => Err(field),
        };

        Ok(LinkMetrics {
            interleave_depth: int(Field::InterleaveDepth)?,
            interleaving: float(Field::Interleaving)?,
            delay: float(Field::Delay)?,
            fec_error_count: int(Field::FecErrorCount)?,
            max_upstream_kbps: int(Field::MaxUpstreamKbps)?,
            max_downstream_kbps: int(Field::MaxDownstreamKbps)?,
            current_upstream_kbps: int(Field::CurrentUpstreamKbps)?,
            current_downstream_kbps: int(Field::CurrentDownstreamKbps)?,
            snr_down_db: float(Field::SnrDownDb)?,
            snr_up_db: float(Field::SnrUpDb)?,
            attenuation_down_db: float(Field::AttenuationDownDb)?,
            attenuation_up_db: float(Field::AttenuationUpDb)?,
            power_down_dbm: float(Field::PowerDownDbm)?,
            power_up_dbm: float(Field::PowerUpDbm)?,
            error_seconds_up: int(Field::ErrorSecondsUp)?,
            error_seconds_down: int(Field::ErrorSecondsDown)?,
            serious_error_seconds_up: int(Field::SeriousErrorSecondsUp)?,
            serious_error_seconds_down: int(Field::SeriousErrorSecondsDown)?,
            unavailable_seconds_up: int(Field::UnavailableSecondsUp)?,
            unavailable_seconds_down: int(Field::UnavailableSecondsDown)?,
            available_seconds: int(Field::AvailableSeconds)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_builder() -> LinkMetricsBuilder {
        let mut b = LinkMetrics::builder();
        for field in Field::ALL {
            let value = match field.kind() {
                FieldKind::Integer => FieldValue::Integer(field.index() as i64),
                FieldKind::Float => FieldValue::Float(field.index() as f64 + 0.5),
            };
            b.set(field, value);
        }
        b
    }

    #[test]
    fn test_builder_round_trips_every_field() {
        let metrics = full_builder().build().unwrap();
        for field in Field::ALL {
            let expected = match field.kind() {
                FieldKind::Integer => FieldValue::Integer(field.index() as i64),
                FieldKind::Float => FieldValue::Float(field.index() as f64 + 0.5),
            };
            assert_eq!(metrics.get(field), expected, "{field}");
        }
    }

    #[test]
    fn test_builder_reports_missing_field() {
        let mut b = LinkMetrics::builder();
        b.set(Field::InterleaveDepth, FieldValue::Integer(1));
        assert_eq!(b.build(), Err(Field::Interleaving));
    }

    #[test]
    fn test_builder_rejects_wrong_kind() {
        let mut b = full_builder();
        b.set(Field::SnrUpDb, FieldValue::Integer(7));
        assert_eq!(b.build(), Err(Field::SnrUpDb));
    }

    #[test]
    fn test_uptime_is_available_in_both_states() {
        let up = ConnectionStats::LinkUp {
            link: full_builder().build().unwrap(),
            system_uptime_secs: 10.5,
        };
        let down = ConnectionStats::LinkDown {
            system_uptime_secs: 3.25,
        };

        assert!(up.is_link_up());
        assert!(up.link().is_some());
        assert_eq!(up.system_uptime_secs(), 10.5);
        assert!(!down.is_link_up());
        assert_eq!(down.system_uptime_secs(), 3.25);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_json_round_trip_for_both_states() {
        let up = ConnectionStats::LinkUp {
            link: full_builder().build().unwrap(),
            system_uptime_secs: 10.5,
        };
        let json = serde_json::to_value(&up).unwrap();
        assert_eq!(json["state"], "link_up");
        assert_eq!(json["system_uptime_secs"], 10.5);
        assert_eq!(json["link"]["snr_down_db"], up.link().unwrap().snr_down_db);
        let back: ConnectionStats = serde_json::from_value(json).unwrap();
        assert_eq!(back, up);

        let down = ConnectionStats::LinkDown {
            system_uptime_secs: 3.25,
        };
        let json = serde_json::to_value(&down).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "state": "link_down", "system_uptime_secs": 3.25 })
        );
        let back: ConnectionStats = serde_json::from_value(json).unwrap();
        assert_eq!(back, down);
    }
}
