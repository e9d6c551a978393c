//! Scan the OSC option catalog and report which options the camera
//! supports.
//!
//! Probes one option per request so an unsupported name cannot hide the
//! others. When the firmware drops the connection on an unsupported name
//! (observed on vendor options), the scan reconnects and continues; see
//! `osc_client::probe_all`.

use std::time::Duration;

use anyhow::Result;
use clap::Parser;

use osc_client::{probe_all, HttpConnector, OscConfig, ReconnectPolicy, ThreadSleeper, DEFAULT_HOST, OPTION_CATALOG};

/// OSC option support scanner
#[derive(Parser, Debug)]
#[command(name = "osc_options")]
#[command(about = "Probe every known OSC option for camera support")]
#[command(version)]
struct Args {
    /// Camera address (host or host:port)
    #[arg(long, default_value = DEFAULT_HOST)]
    host: String,

    /// Verbosity level 0-3 (warn, info, debug, trace)
    #[arg(short, long, default_value_t = 1)]
    verbose: u8,

    /// Delay between command status polls in milliseconds
    #[arg(long, default_value_t = 1000)]
    poll_ms: u64,

    /// Abort the scan after this many reconnects (default: unlimited)
    #[arg(long)]
    max_reconnects: Option<u32>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = OscConfig {
        host: args.host,
        poll_interval: Duration::from_millis(args.poll_ms),
        ..OscConfig::default()
    };
    let connector = HttpConnector::new(config.clone());
    let policy = match args.max_reconnects {
        Some(max) => ReconnectPolicy::limited(max),
        None => ReconnectPolicy::default(),
    };

    let report = probe_all(
        &connector,
        OPTION_CATALOG,
        config.poll_interval,
        &ThreadSleeper,
        &policy,
    )?;

    println!("Supported options:");
    println!("{}", serde_json::to_string_pretty(&report.supported)?);
    println!("Unsupported options:");
    for name in &report.unsupported {
        println!("  {name}");
    }
    println!(
        "Total {} supported and {} unsupported of {} options ({} reconnects)",
        report.supported.len(),
        report.unsupported.len(),
        report.total(),
        report.reconnects,
    );

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
