//! Parser for the modem's diagnostic and uptime output.
//!
//! ## Example
//!
//! ```rust
//! use modemstats_adapters::parser::StatsParser;
//!
//! let parser = StatsParser::default();
//! let diagnostics = b"xdslcmd info --stats\r\nxdslcmd: ADSL driver and PHY status\r\nStatus: Idle\r\n# ";
//! let uptime = b"cat /proc/uptime\r\n5012.37 4890.11\r\n# ";
//!
//! let stats = parser.parse(diagnostics, uptime).unwrap();
//! assert!(!stats.is_link_up());
//! assert_eq!(stats.system_uptime_secs(), 5012.37);
//! ```

use modemstats_types::{
    ConnectionStats, Field, FieldKind, FieldValue, LinkMetrics, LinkMetricsBuilder,
};

use crate::layout::{Layout, LineSpec};
use crate::ParseError;

/// Line terminator used by the modem shell.
pub const LINE_TERMINATOR: &str = "\r\n";

/// Parse output from the reference firmware.
///
/// Shorthand for `StatsParser::default().parse(..)`.
pub fn parse(diagnostics: &[u8], uptime: &[u8]) -> Result<ConnectionStats, ParseError> {
    StatsParser::default().parse(diagnostics, uptime)
}

/// Turns raw command output into [`ConnectionStats`] using a [`Layout`].
#[derive(Debug, Clone, Default)]
pub struct StatsParser {
    layout: Layout,
}

impl StatsParser {
    /// Create a parser for a specific layout.
    pub fn new(layout: Layout) -> Self {
        Self { layout }
    }

    /// The layout in use.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Parse one poll's worth of output.
    ///
    /// A diagnostic dump whose line count differs from the layout's is link
    /// down and its content is not looked at. Uptime is parsed in both cases
    /// and a bad uptime fails the whole parse.
    pub fn parse(&self, diagnostics: &[u8], uptime: &[u8]) -> Result<ConnectionStats, ParseError> {
        let link = self.parse_link(diagnostics)?;
        let system_uptime_secs = parse_uptime(uptime)?;

        Ok(match link {
            Some(link) => ConnectionStats::LinkUp {
                link,
                system_uptime_secs,
            },
            None => ConnectionStats::LinkDown { system_uptime_secs },
        })
    }

    /// Parse the diagnostic dump alone. `Ok(None)` means link down.
    ///
    /// A layout that maps one field from two columns is rejected before the
    /// dump is looked at.
    pub fn parse_link(&self, diagnostics: &[u8]) -> Result<Option<LinkMetrics>, ParseError> {
        if let Some(field) = self.layout.duplicate_fields().first() {
            return Err(ParseError::DuplicateField(*field));
        }

        let text = decode("diagnostic", diagnostics)?;
        let lines: Vec<&str> = text.split(LINE_TERMINATOR).collect();

        if lines.len() != self.layout.line_count {
            return Ok(None);
        }

        let mut builder = LinkMetrics::builder();
        for spec in &self.layout.lines {
            read_line(spec, &lines, &mut builder)?;
        }

        builder.build().map(Some).map_err(ParseError::Unmapped)
    }
}

/// Parse `cat /proc/uptime` output: the first number on the second line.
pub fn parse_uptime(uptime: &[u8]) -> Result<f64, ParseError> {
    let text = decode("uptime", uptime)?;
    let Some(line) = text.split(LINE_TERMINATOR).nth(1) else {
        return Err(ParseError::Uptime {
            reason: "missing value line",
            line: text.to_string(),
        });
    };

    let Some(token) = line.split_whitespace().next() else {
        return Err(ParseError::Uptime {
            reason: "value line is empty",
            line: line.to_string(),
        });
    };

    let value = token.parse::<f64>().map_err(|_| ParseError::Uptime {
        reason: "not a number",
        line: line.to_string(),
    })?;

    if !value.is_finite() {
        return Err(ParseError::Uptime {
            reason: "not a finite number",
            line: line.to_string(),
        });
    }

    Ok(value)
}

fn decode<'a>(source_name: &'static str, raw: &'a [u8]) -> Result<&'a str, ParseError> {
    std::str::from_utf8(raw).map_err(|e| ParseError::Encoding {
        source_name,
        reason: e.to_string(),
    })
}

fn read_line(
    spec: &LineSpec,
    lines: &[&str],
    builder: &mut LinkMetricsBuilder,
) -> Result<(), ParseError> {
    let line = *lines.get(spec.index).ok_or(ParseError::LineMissing {
        name: spec.name,
        index: spec.index,
    })?;

    let rest = line
        .strip_prefix(spec.label)
        .ok_or_else(|| ParseError::LabelMismatch {
            name: spec.name,
            index: spec.index,
            label: spec.label,
            line: line.to_string(),
        })?;

    let values: Vec<&str> = rest.split(spec.separator).collect();
    if values.len() != spec.columns.len() {
        return Err(ParseError::ColumnCount {
            name: spec.name,
            index: spec.index,
            expected: spec.columns.len(),
            found: values.len(),
            line: line.to_string(),
        });
    }

    for (value, column) in values.iter().zip(spec.columns) {
        let Some(field) = column else { continue };
        let parsed = parse_value(*field, value, spec.unit).ok_or_else(|| {
            ParseError::InvalidNumber {
                field: *field,
                index: spec.index,
                value: value.to_string(),
                line: line.to_string(),
            }
        })?;
        builder.set(*field, parsed);
    }

    Ok(())
}

fn parse_value(field: Field, raw: &str, unit: Option<&str>) -> Option<FieldValue> {
    let raw = match unit {
        Some(unit) => raw.strip_suffix(unit)?,
        None => raw,
    };
    let raw = raw.trim();

    match field.kind() {
        FieldKind::Integer => raw.parse().ok().map(FieldValue::Integer),
        // NaN and inf parse as f64 but are not readings.
        FieldKind::Float => raw
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(FieldValue::Float),
    }
}
