//! Declarative description of where each metric sits in the diagnostic dump.
//!
//! The modem's `xdslcmd info --stats` output has no machine-readable
//! structure, so metrics are read from fixed line indices. Each line is
//! described by a [`LineSpec`]: which index it lives at, the literal label it
//! must start with, the literal separator between its values, and which
//! value feeds which [`Field`]. Supporting a firmware that moved lines is a
//! change to this table, not to the parser.

use modemstats_types::Field;

/// Line count of a link-up dump from the reference firmware, counting the
/// empty string after the final CR+LF.
pub const REFERENCE_LINE_COUNT: usize = 118;

/// Location and shape of one diagnostic line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineSpec {
    /// Short name used in errors.
    pub name: &'static str,
    /// Zero-based index of the line after splitting on CR+LF.
    pub index: usize,
    /// Literal text the line must start with.
    pub label: &'static str,
    /// Literal text between values.
    pub separator: &'static str,
    /// Suffix stripped from each value before parsing (e.g. `" Kbps"`).
    pub unit: Option<&'static str>,
    /// One entry per value on the line. `None` marks a value that is
    /// present but not recorded.
    pub columns: &'static [Option<Field>],
}

impl LineSpec {
    /// Fields this line produces.
    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.columns.iter().flatten().copied()
    }
}

/// A firmware dialect: the link-up line count plus every line to read.
///
/// Link state is decided by line count alone. A dump with exactly
/// `line_count` lines is treated as link up and every [`LineSpec`] must then
/// match; any other count is link down. This is fragile by construction: a
/// firmware change that adds or removes an unrelated line makes every dump
/// look like link down. Label checks on each line at least guarantee that a
/// shifted dump fails loudly instead of reporting wrong numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub line_count: usize,
    pub lines: Vec<LineSpec>,
}

impl Layout {
    /// Create a layout from its parts.
    pub fn new(line_count: usize, lines: Vec<LineSpec>) -> Self {
        Self { line_count, lines }
    }

    /// The layout of the reference firmware.
    pub fn reference() -> Self {
        Self::new(REFERENCE_LINE_COUNT, REFERENCE_LINES.to_vec())
    }

    /// Fields that no line in this layout produces.
    pub fn unmapped_fields(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|f| !self.lines.iter().any(|l| l.fields().any(|g| g == *f)))
            .collect()
    }

    /// Fields that more than one column in this layout produces, in
    /// [`Field::ALL`] order.
    pub fn duplicate_fields(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|f| {
                self.lines
                    .iter()
                    .flat_map(|l| l.fields())
                    .filter(|g| g == f)
                    .count()
                    > 1
            })
            .collect()
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::reference()
    }
}

const RATE_SEPARATOR: &str = ", Downstream rate = ";
const KBPS: Option<&str> = Some(" Kbps");

/// Lines read from the reference firmware's link-up dump.
pub const REFERENCE_LINES: &[LineSpec] = &[
    LineSpec {
        name: "max_rate",
        index: 5,
        label: "Max:\tUpstream rate = ",
        separator: RATE_SEPARATOR,
        unit: KBPS,
        columns: &[Some(Field::MaxUpstreamKbps), Some(Field::MaxDownstreamKbps)],
    },
    LineSpec {
        name: "bearer_rate",
        index: 6,
        label: "Bearer:\t0, Upstream rate = ",
        separator: RATE_SEPARATOR,
        unit: KBPS,
        columns: &[
            Some(Field::CurrentUpstreamKbps),
            Some(Field::CurrentDownstreamKbps),
        ],
    },
    LineSpec {
        name: "snr",
        index: 16,
        label: "SNR (dB):\t ",
        separator: "\t\t ",
        unit: None,
        columns: &[Some(Field::SnrDownDb), Some(Field::SnrUpDb)],
    },
    LineSpec {
        name: "attenuation",
        index: 17,
        label: "Attn(dB):\t ",
        separator: "\t\t ",
        unit: None,
        columns: &[
            Some(Field::AttenuationDownDb),
            Some(Field::AttenuationUpDb),
        ],
    },
    LineSpec {
        name: "power",
        index: 18,
        label: "Pwr(dBm):\t ",
        separator: "\t\t ",
        unit: None,
        columns: &[Some(Field::PowerDownDbm), Some(Field::PowerUpDbm)],
    },
    LineSpec {
        name: "interleave_depth",
        index: 28,
        label: "D:\t\t",
        separator: "\t\t",
        unit: None,
        columns: &[Some(Field::InterleaveDepth), None],
    },
    LineSpec {
        name: "errored_seconds",
        index: 48,
        label: "ES:\t\t",
        separator: "\t\t",
        unit: None,
        columns: &[Some(Field::ErrorSecondsUp), Some(Field::ErrorSecondsDown)],
    },
    LineSpec {
        name: "severely_errored_seconds",
        index: 49,
        label: "SES:\t\t",
        separator: "\t\t",
        unit: None,
        columns: &[
            Some(Field::SeriousErrorSecondsUp),
            Some(Field::SeriousErrorSecondsDown),
        ],
    },
    LineSpec {
        name: "unavailable_seconds",
        index: 50,
        label: "UAS:\t\t",
        separator: "\t\t",
        unit: None,
        columns: &[
            Some(Field::UnavailableSecondsUp),
            Some(Field::UnavailableSecondsDown),
        ],
    },
    LineSpec {
        name: "available_seconds",
        index: 51,
        label: "AS:\t\t",
        separator: "\t\t",
        unit: None,
        columns: &[Some(Field::AvailableSeconds)],
    },
    LineSpec {
        name: "impulse_noise_protection",
        index: 54,
        label: "INP:\t\t",
        separator: "\t\t",
        unit: None,
        columns: &[Some(Field::Interleaving), None],
    },
    LineSpec {
        name: "delay",
        index: 56,
        label: "delay:\t\t",
        separator: "\t\t",
        unit: None,
        columns: &[Some(Field::Delay), None],
    },
    LineSpec {
        name: "fec_errors",
        index: 82,
        label: "FEC:\t\t",
        separator: "\t\t",
        unit: None,
        columns: &[Some(Field::FecErrorCount), None],
    },
];
