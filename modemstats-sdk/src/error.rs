//! Error types for outputs.

use thiserror::Error;

/// Errors that can occur when writing a point.
#[derive(Debug, Error)]
pub enum SinkError {
    /// HTTP request could not be sent or timed out.
    #[error("request to metrics store failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The store rejected the token.
    #[error("metrics store rejected credentials (status {status})")]
    Unauthorized { status: u16 },

    /// The store answered with a non-success status.
    #[error("metrics store returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// Writing to a local file failed.
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),

    /// The point could not be encoded.
    #[error("failed to encode point: {0}")]
    Serialize(String),

    /// The receiving end of a channel output was dropped.
    #[error("output channel closed")]
    Closed,
}

impl From<serde_json::Error> for SinkError {
    fn from(err: serde_json::Error) -> Self {
        SinkError::Serialize(err.to_string())
    }
}
