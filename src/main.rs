//! memwatch - process memory growth monitor.
//!
//! Entry point: parses arguments, resolves configuration, checks the
//! requested PIDs exist, then hands off to the watcher loop.

use std::time::Duration;

use clap::Parser;
use tracing::{debug, info, Level};

use memwatch::cli::{Args, LogLevel};
use memwatch::config::{resolve_config, validate_effective_config, Config};
use memwatch::process::ProcessProbe;
use memwatch::sink::OutputSink;
use memwatch::tracker::normalize_pids;
use memwatch::watcher::{run, ShutdownFlag, WatchOptions};
use memwatch::WatchError;

/// Initializes tracing logging subsystem with configured log level.
///
/// Diagnostics go to stderr so they never mix with sample rows on stdout;
/// the default is quiet because stderr also carries mirrored rows and the
/// summary.
fn setup_logging(config: &Config, args: &Args) {
    let level = args.log_level.or_else(|| match config.log_level.as_deref() {
        Some("off") => Some(LogLevel::Off),
        Some("error") => Some(LogLevel::Error),
        Some("warn") => Some(LogLevel::Warn),
        Some("info") => Some(LogLevel::Info),
        Some("debug") => Some(LogLevel::Debug),
        Some("trace") => Some(LogLevel::Trace),
        _ => None,
    });

    let log_level = match level.unwrap_or(LogLevel::Warn) {
        LogLevel::Off => Level::ERROR,
        LogLevel::Error => Level::ERROR,
        LogLevel::Warn => Level::WARN,
        LogLevel::Info => Level::INFO,
        LogLevel::Debug => Level::DEBUG,
        LogLevel::Trace => Level::TRACE,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Main application entry point.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = resolve_config(&args)?;
    validate_effective_config(&config)?;

    if args.check_config {
        println!("Configuration is valid");
        return Ok(());
    }

    setup_logging(&config, &args);
    if let Some(path) = &args.config {
        debug!(path = %path.display(), "loaded config file");
    }
    debug!(?config, "effective configuration");

    let probe = ProcessProbe::new();
    let pids = normalize_pids(&args.pid);
    for &pid in &pids {
        if !probe.is_alive(pid) {
            return Err(WatchError::ProcessNotFound(pid).into());
        }
    }

    let include_children = config.include_children();
    let mut sink = match &config.log_file {
        Some(path) => OutputSink::file(path, include_children)?,
        None => OutputSink::stdout(include_children),
    };

    let shutdown = ShutdownFlag::new();
    shutdown.install_ctrl_c();

    let opts = WatchOptions {
        pids,
        interval: Duration::from_secs_f64(config.interval_secs()),
        duration: config.duration_secs().map(Duration::from_secs_f64),
        include_children,
    };

    info!(
        pids = ?opts.pids,
        interval_secs = config.interval_secs(),
        "starting memwatch"
    );

    let (_summary, reason) = run(&opts, &probe, &mut sink, &shutdown).await?;
    debug!(?reason, "run finished");

    // Duration stop, vanish stop, and interrupt all exit successfully
    Ok(())
}
