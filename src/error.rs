//! The error a single poll cycle can end with.

use thiserror::Error;

use modemstats_adapters::{ParseError, TransportError};
use modemstats_sdk::SinkError;

/// Why a poll cycle produced no point.
#[derive(Debug, Error)]
pub enum CycleError {
    /// The modem could not be reached or the session failed.
    #[error("modem session failed: {0}")]
    Transport(#[from] TransportError),

    /// The modem answered with output that does not fit the layout.
    #[error("failed to parse modem output: {0}")]
    Parse(#[from] ParseError),

    /// The point could not be written.
    #[error("failed to write point: {0}")]
    Sink(#[from] SinkError),
}

impl CycleError {
    /// Short name of the failing stage, for logs and counters.
    pub fn stage(&self) -> &'static str {
        match self {
            CycleError::Transport(_) => "transport",
            CycleError::Parse(_) => "parse",
            CycleError::Sink(_) => "sink",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_keeps_context() {
        let err: CycleError = ParseError::LineMissing {
            name: "fec_errors",
            index: 82,
        }
        .into();
        assert_eq!(err.stage(), "parse");
        assert!(err.to_string().contains("fec_errors"));
    }

    #[test]
    fn test_stage_names() {
        let transport: CycleError = TransportError::Closed {
            waiting_for: "Login:".to_string(),
        }
        .into();
        assert_eq!(transport.stage(), "transport");
        assert_eq!(CycleError::from(SinkError::Closed).stage(), "sink");
    }
}
