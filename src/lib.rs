//! # modemstats
//!
//! Polls line statistics from a DSL modem and writes them to InfluxDB.
//!
//! Every cycle logs into the modem over telnet, runs its diagnostic and
//! uptime commands, parses the output and writes one `connection` point.
//! Failures are logged and the next cycle is the retry.
//!
//! ```text
//! TelnetSource ──▶ StatsParser ──▶ Point ──▶ Output (InfluxDB | file | channel)
//!        └────────────── Poller (one cycle per interval) ──────────────┘
//! ```
//!
//! - **[`config`]**: layered [`Settings`] (defaults, TOML file, environment)
//! - **[`poller`]**: the cycle and the loop around it
//! - **[`logging`]**: console and error-log tracing layers
//! - **[`supervisor`]**: readiness notification for systemd
//!
//! ## As a library
//!
//! ```no_run
//! use std::time::Duration;
//! use modemstats::{Poller, Settings};
//! use modemstats_sdk::Output;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let settings = Settings::load(None)?;
//! let poller = Poller::new(
//!     Box::new(settings.telnet_source()),
//!     Box::new(Output::influx(settings.influx_writer()?)),
//!     Duration::from_secs(60),
//! );
//! let outcome = poller.run_cycle().await?;
//! println!("{:?}", outcome);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod poller;
pub mod supervisor;

pub use config::Settings;
pub use error::CycleError;
pub use poller::{CycleOutcome, Poller, PollerStats};
