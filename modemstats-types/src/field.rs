//! Link metric identifiers.

use core::fmt;

/// Numeric kind of a link metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum FieldKind {
    /// Whole number (rates, counters, depths).
    Integer,
    /// Floating point (dB, dBm, ms).
    Float,
}

/// One of the link metrics carried by [`LinkMetrics`](crate::LinkMetrics).
///
/// The order of [`Field::ALL`] is the order points list their fields in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Field {
    InterleaveDepth,
    Interleaving,
    Delay,
    FecErrorCount,
    MaxUpstreamKbps,
    MaxDownstreamKbps,
    CurrentUpstreamKbps,
    CurrentDownstreamKbps,
    SnrDownDb,
    SnrUpDb,
    AttenuationDownDb,
    AttenuationUpDb,
    PowerDownDbm,
    PowerUpDbm,
    ErrorSecondsUp,
    ErrorSecondsDown,
    SeriousErrorSecondsUp,
    SeriousErrorSecondsDown,
    UnavailableSecondsUp,
    UnavailableSecondsDown,
    AvailableSeconds,
}

impl Field {
    /// Number of link metrics.
    pub const COUNT: usize = 21;

    /// Every link metric, in declaration order.
    pub const ALL: [Field; Field::COUNT] = [
        Field::InterleaveDepth,
        Field::Interleaving,
        Field::Delay,
        Field::FecErrorCount,
        Field::MaxUpstreamKbps,
        Field::MaxDownstreamKbps,
        Field::CurrentUpstreamKbps,
        Field::CurrentDownstreamKbps,
        Field::SnrDownDb,
        Field::SnrUpDb,
        Field::AttenuationDownDb,
        Field::AttenuationUpDb,
        Field::PowerDownDbm,
        Field::PowerUpDbm,
        Field::ErrorSecondsUp,
        Field::ErrorSecondsDown,
        Field::SeriousErrorSecondsUp,
        Field::SeriousErrorSecondsDown,
        Field::UnavailableSecondsUp,
        Field::UnavailableSecondsDown,
        Field::AvailableSeconds,
    ];

    /// Position of this field in [`Field::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Whether the metric is a whole number or a float.
    pub const fn kind(self) -> FieldKind {
        match self {
            Field::Interleaving
            | Field::Delay
            | Field::SnrDownDb
            | Field::SnrUpDb
            | Field::AttenuationDownDb
            | Field::AttenuationUpDb
            | Field::PowerDownDbm
            | Field::PowerUpDbm => FieldKind::Float,
            _ => FieldKind::Integer,
        }
    }

    /// Snake-case name used in diagnostics and error messages.
    pub const fn name(self) -> &'static str {
        match self {
            Field::InterleaveDepth => "interleave_depth",
            Field::Interleaving => "interleaving",
            Field::Delay => "delay",
            Field::FecErrorCount => "fec_error_count",
            Field::MaxUpstreamKbps => "max_upstream_kbps",
            Field::MaxDownstreamKbps => "max_downstream_kbps",
            Field::CurrentUpstreamKbps => "current_upstream_kbps",
            Field::CurrentDownstreamKbps => "current_downstream_kbps",
            Field::SnrDownDb => "snr_down_db",
            Field::SnrUpDb => "snr_up_db",
            Field::AttenuationDownDb => "attenuation_down_db",
            Field::AttenuationUpDb => "attenuation_up_db",
            Field::PowerDownDbm => "power_down_dbm",
            Field::PowerUpDbm => "power_up_dbm",
            Field::ErrorSecondsUp => "error_seconds_up",
            Field::ErrorSecondsDown => "error_seconds_down",
            Field::SeriousErrorSecondsUp => "serious_error_seconds_up",
            Field::SeriousErrorSecondsDown => "serious_error_seconds_down",
            Field::UnavailableSecondsUp => "unavailable_seconds_up",
            Field::UnavailableSecondsDown => "unavailable_seconds_down",
            Field::AvailableSeconds => "available_seconds",
        }
    }

    /// Key the metric is stored under in the time-series database.
    ///
    /// These keys are what existing dashboards query, including the
    /// inconsistent `AttDown` / `AttnUp` pair.
    pub const fn key(self) -> &'static str {
        match self {
            Field::InterleaveDepth => "InterleaveDepth",
            Field::Interleaving => "Interleaving",
            Field::Delay => "Delay",
            Field::FecErrorCount => "FECError",
            Field::MaxUpstreamKbps => "MaxUp",
            Field::MaxDownstreamKbps => "MaxDown",
            Field::CurrentUpstreamKbps => "CurrUp",
            Field::CurrentDownstreamKbps => "CurrDown",
            Field::SnrDownDb => "SNRDown",
            Field::SnrUpDb => "SNRUp",
            Field::AttenuationDownDb => "AttDown",
            Field::AttenuationUpDb => "AttnUp",
            Field::PowerDownDbm => "PwrDown",
            Field::PowerUpDbm => "PwrUp",
            Field::ErrorSecondsUp => "ErrSecsUp",
            Field::ErrorSecondsDown => "ErrSecsDown",
            Field::SeriousErrorSecondsUp => "SeriousErrSecsUp",
            Field::SeriousErrorSecondsDown => "SeriousErrSecsDown",
            Field::UnavailableSecondsUp => "UnavailableSecsUp",
            Field::UnavailableSecondsDown => "UnavailableSecsDown",
            Field::AvailableSeconds => "AvailableSecs",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
