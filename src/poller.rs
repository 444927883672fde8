//! The poll loop.
//!
//! Each cycle fetches raw output from a [`StatsSource`], parses it with a
//! [`StatsParser`] and writes one point to a [`MetricSink`]. A failing cycle
//! is logged and counted; it never ends the loop.

use std::future::Future;
use std::time::Duration;

use chrono::Local;
use parking_lot::RwLock;
use tracing::{debug, error, info};

use modemstats_adapters::{StatsParser, StatsSource};
use modemstats_sdk::MetricSink;

use crate::CycleError;

/// What a successful cycle observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    LinkUp,
    LinkDown,
}

/// Counters kept across cycles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollerStats {
    pub cycles: u64,
    pub link_up: u64,
    pub link_down: u64,
    pub transport_errors: u64,
    pub parse_errors: u64,
    pub sink_errors: u64,
    /// Message of the most recent failure.
    pub last_error: Option<String>,
}

impl PollerStats {
    /// Total number of failed cycles.
    pub fn errors(&self) -> u64 {
        self.transport_errors + self.parse_errors + self.sink_errors
    }

    fn record(&mut self, result: &Result<CycleOutcome, CycleError>) {
        self.cycles += 1;
        match result {
            Ok(CycleOutcome::LinkUp) => self.link_up += 1,
            Ok(CycleOutcome::LinkDown) => self.link_down += 1,
            Err(err) => {
                match err {
                    CycleError::Transport(_) => self.transport_errors += 1,
                    CycleError::Parse(_) => self.parse_errors += 1,
                    CycleError::Sink(_) => self.sink_errors += 1,
                }
                self.last_error = Some(err.to_string());
            }
        }
    }
}

/// Polls a modem and writes what it finds.
#[derive(Debug)]
pub struct Poller {
    source: Box<dyn StatsSource>,
    sink: Box<dyn MetricSink>,
    parser: StatsParser,
    interval: Duration,
    stats: RwLock<PollerStats>,
}

impl Poller {
    /// Create a poller using the reference layout.
    pub fn new(
        source: Box<dyn StatsSource>,
        sink: Box<dyn MetricSink>,
        interval: Duration,
    ) -> Self {
        Self {
            source,
            sink,
            parser: StatsParser::default(),
            interval,
            stats: RwLock::new(PollerStats::default()),
        }
    }

    /// Replace the parser, e.g. for a firmware with a different layout.
    pub fn with_parser(mut self, parser: StatsParser) -> Self {
        self.parser = parser;
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Snapshot of the counters.
    pub fn stats(&self) -> PollerStats {
        self.stats.read().clone()
    }

    /// Run exactly one cycle.
    ///
    /// The result is counted and failures are logged before being returned.
    pub async fn run_cycle(&self) -> Result<CycleOutcome, CycleError> {
        let result = self.poll_once().await;
        self.stats.write().record(&result);

        match &result {
            Ok(outcome) => debug!(?outcome, "cycle complete"),
            Err(err) => log_failure(err),
        }

        result
    }

    /// Run cycles until `shutdown` resolves.
    ///
    /// Shutdown is only observed between cycles: a cycle in flight always
    /// completes.
    pub async fn run_until<F>(&self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        info!(
            source = self.source.description(),
            interval_secs = self.interval.as_secs(),
            "poller started"
        );

        loop {
            let _ = self.run_cycle().await;

            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                _ = tokio::time::sleep(self.interval) => {}
            }
        }

        info!("poller stopped");
    }

    async fn poll_once(&self) -> Result<CycleOutcome, CycleError> {
        let timestamp = Local::now().naive_local();

        let raw = self.source.fetch().await?;
        let stats = self.parser.parse(&raw.diagnostics, &raw.uptime)?;
        let point = self.sink.emit(&stats, timestamp).await?;

        debug!(
            timestamp = %point.timestamp_string(),
            fields = point.fields.len(),
            "point written"
        );

        Ok(if stats.is_link_up() {
            CycleOutcome::LinkUp
        } else {
            CycleOutcome::LinkDown
        })
    }
}

fn log_failure(err: &CycleError) {
    match err {
        CycleError::Parse(parse) => error!(
            stage = err.stage(),
            field = parse.field().map(|f| f.key()),
            line = parse.line_name(),
            "{}",
            err
        ),
        _ => error!(stage = err.stage(), "{}", err),
    }
}
