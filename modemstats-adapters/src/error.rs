//! Error types for adapters.

use thiserror::Error;

use modemstats_types::Field;

/// Errors raised while turning raw modem output into [`ConnectionStats`].
///
/// Every variant that concerns a diagnostic line carries the line's name,
/// its index and its raw content, which is what is needed to spot a firmware
/// update that moved things around.
///
/// [`ConnectionStats`]: modemstats_types::ConnectionStats
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// Output was not valid UTF-8.
    #[error("{source_name} output is not valid UTF-8: {reason}")]
    Encoding {
        source_name: &'static str,
        reason: String,
    },

    /// The layout expects a line the dump does not have.
    #[error("{name}: line {index} is missing from the diagnostic output")]
    LineMissing { name: &'static str, index: usize },

    /// The line at the expected index does not start with the expected label.
    #[error("{name}: line {index} does not start with label {label:?}: {line:?}")]
    LabelMismatch {
        name: &'static str,
        index: usize,
        label: &'static str,
        line: String,
    },

    /// Splitting the line produced the wrong number of values.
    #[error("{name}: expected {expected} value(s) on line {index}, found {found}: {line:?}")]
    ColumnCount {
        name: &'static str,
        index: usize,
        expected: usize,
        found: usize,
        line: String,
    },

    /// A value could not be parsed as the field's numeric kind.
    #[error("{field}: invalid number {value:?} on line {index}: {line:?}")]
    InvalidNumber {
        field: Field,
        index: usize,
        value: String,
        line: String,
    },

    /// The layout never assigns this field.
    #[error("{0}: not produced by the diagnostic layout")]
    Unmapped(Field),

    /// The layout assigns this field from more than one column.
    #[error("{0}: produced more than once by the diagnostic layout")]
    DuplicateField(Field),

    /// The uptime output could not be read.
    #[error("system uptime: {reason}: {line:?}")]
    Uptime { reason: &'static str, line: String },
}

impl ParseError {
    /// The link metric the error is about, when it concerns a single one.
    pub fn field(&self) -> Option<Field> {
        match self {
            ParseError::InvalidNumber { field, .. }
            | ParseError::Unmapped(field)
            | ParseError::DuplicateField(field) => Some(*field),
            _ => None,
        }
    }

    /// The layout line name the error is about, if any.
    pub fn line_name(&self) -> Option<&'static str> {
        match self {
            ParseError::LineMissing { name, .. }
            | ParseError::LabelMismatch { name, .. }
            | ParseError::ColumnCount { name, .. } => Some(name),
            _ => None,
        }
    }
}

/// Errors raised while talking to the modem.
#[derive(Debug, Error)]
pub enum TransportError {
    /// TCP connection could not be established.
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// Read or write on an established session failed.
    #[error("session I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// A prompt did not arrive within the configured timeout.
    #[error("timed out waiting for {waiting_for:?}")]
    Timeout { waiting_for: String },

    /// The modem closed the connection before a prompt arrived.
    #[error("connection closed while waiting for {waiting_for:?}")]
    Closed { waiting_for: String },

    /// The modem asked for the login again after the password was sent.
    #[error("login rejected for user {username:?}")]
    LoginRejected { username: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_mismatch_message_names_line_and_content() {
        let err = ParseError::LabelMismatch {
            name: "snr",
            index: 16,
            label: "SNR (dB):\t ",
            line: "Noise (dB):\t 6.2\t\t 8.1".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("snr: line 16"));
        assert!(msg.contains("Noise (dB)"));
        assert_eq!(err.line_name(), Some("snr"));
        assert_eq!(err.field(), None);
    }

    #[test]
    fn test_invalid_number_names_field() {
        let err = ParseError::InvalidNumber {
            field: Field::SnrUpDb,
            index: 16,
            value: "n/a".to_string(),
            line: "SNR (dB):\t 6.2\t\t n/a".to_string(),
        };
        assert!(err.to_string().starts_with("snr_up_db: invalid number \"n/a\""));
        assert_eq!(err.field(), Some(Field::SnrUpDb));
    }

    #[test]
    fn test_transport_error_messages() {
        let err = TransportError::Timeout {
            waiting_for: "ATP>".to_string(),
        };
        assert_eq!(err.to_string(), "timed out waiting for \"ATP>\"");

        let err = TransportError::LoginRejected {
            username: "admin".to_string(),
        };
        assert_eq!(err.to_string(), "login rejected for user \"admin\"");
    }
}
