//! The seam between fetching modem output and parsing it.

use std::fmt::Debug;

use async_trait::async_trait;

use crate::TransportError;

/// Raw output of the two commands run on each poll.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawStats {
    /// Output of the diagnostic command, up to and including the next prompt.
    pub diagnostics: Vec<u8>,
    /// Output of the uptime command, up to and including the next prompt.
    pub uptime: Vec<u8>,
}

/// Something that can fetch one poll's worth of raw modem output.
///
/// Implementations do I/O only; parsing is left to
/// [`StatsParser`](crate::parser::StatsParser).
#[async_trait]
pub trait StatsSource: Send + Sync + Debug {
    /// Fetch the diagnostic and uptime output.
    async fn fetch(&self) -> Result<RawStats, TransportError>;

    /// Human-readable description of where the output comes from.
    fn description(&self) -> &str;
}
