use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use modemstats::{logging, supervisor, Poller, Settings};
use modemstats_sdk::Output;

#[derive(Parser, Debug)]
#[command(name = "modemstats")]
#[command(about = "Poll DSL line statistics from a modem and write them to InfluxDB")]
struct Args {
    /// TOML settings file, applied over defaults and under environment variables
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Run a single cycle and exit; a failed cycle exits non-zero
    #[arg(long)]
    once: bool,

    /// Append points as JSON lines to this file instead of writing to InfluxDB
    #[arg(short, long)]
    output_file: Option<PathBuf>,

    /// Console log level (overridden by RUST_LOG)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings =
        Settings::load(args.config.as_deref()).context("failed to load settings")?;
    if let Some(level) = args.log_level {
        settings.log_level = level;
    }

    let _guards = logging::init_logging(&settings.log_level, &settings.error_log)?;
    debug!(?settings, "settings loaded");

    let output = match args.output_file {
        Some(path) => Output::file(path),
        None => Output::influx(
            settings
                .influx_writer()
                .context("failed to build InfluxDB client")?,
        ),
    };
    info!(
        modem = %settings.telnet_source().addr(),
        output = %output.describe(),
        "starting"
    );

    let poller = Poller::new(
        Box::new(settings.telnet_source()),
        Box::new(output),
        settings.poll_interval(),
    );

    if args.once {
        let outcome = poller.run_cycle().await?;
        info!(?outcome, "cycle complete");
        return Ok(());
    }

    match supervisor::notify_ready() {
        Ok(true) => debug!("readiness sent to supervisor"),
        Ok(false) => {}
        Err(e) => warn!(error = %e, "failed to notify supervisor"),
    }

    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
        shutdown_signal().await;
        let _ = tx.send(());
    });

    poller
        .run_until(async {
            let _ = rx.await;
        })
        .await;

    let stats = poller.stats();
    info!(
        cycles = stats.cycles,
        link_up = stats.link_up,
        link_down = stats.link_down,
        errors = stats.errors(),
        "shutdown complete"
    );
    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received ctrl-c"),
        _ = terminate => info!("received SIGTERM"),
    }
}
