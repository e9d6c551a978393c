//! Command-line OSC camera control.
//!
//! Operations are positional and consumed left-to-right, so several can be
//! chained over one connection:
//!
//! ```text
//! osc_cmd info state
//! osc_cmd checkForUpdates FIG_0001
//! osc_cmd command camera.takePicture '{}'
//! osc_cmd -v2 command camera.getOptions '{"optionNames":["iso"]}'
//! ```

use std::path::PathBuf;
use std::process::exit;
use std::time::Duration;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use serde_json::Value;

use osc_client::{HttpConnection, OscClient, OscConfig, DEFAULT_HOST};

/// Open Spherical Camera control tool
#[derive(Parser, Debug)]
#[command(name = "osc_cmd")]
#[command(about = "Query and control an OSC camera over its WiFi link")]
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

    /// Save raw response bodies under this directory
    #[arg(long)]
    capture_dir: Option<PathBuf>,

    /// Operations: info | state | checkForUpdates <fingerprint> |
    /// command <name> <json-parameters>
    operations: Vec<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    if args.operations.is_empty() {
        usage_error("no operation given");
    }

    let config = OscConfig {
        host: args.host,
        poll_interval: Duration::from_millis(args.poll_ms),
        capture_dir: args.capture_dir,
        ..OscConfig::default()
    };

    let mut client = OscClient::connect(&config)?;
    let result = dispatch(&mut client, &args.operations);
    client.close();
    result
}

/// Run each operation in order, printing its response as pretty JSON.
fn dispatch(client: &mut OscClient<HttpConnection>, operations: &[String]) -> Result<()> {
    let mut ops = operations.iter();
    while let Some(op) = ops.next() {
        let response = match op.as_str() {
            "info" => client.info()?,
            "state" => client.state()?,
            "checkForUpdates" => {
                let Some(fingerprint) = ops.next() else {
                    usage_error("checkForUpdates requires a fingerprint");
                };
                client.check_for_updates(fingerprint)?
            }
            "command" => {
                let Some(name) = ops.next() else {
                    usage_error("command requires a name and JSON parameters");
                };
                let Some(raw) = ops.next() else {
                    usage_error("command requires JSON parameters");
                };
                let parameters: Value = match serde_json::from_str(raw) {
                    Ok(value) => value,
                    Err(err) => usage_error(&format!("invalid JSON parameters: {err}")),
                };
                client.run_command(name, parameters)?
            }
            other => usage_error(&format!("unknown operation `{other}`")),
        };
        println!("{}", serde_json::to_string_pretty(&response)?);
    }
    Ok(())
}

fn usage_error(message: &str) -> ! {
    eprintln!("error: {message}\n");
    let _ = Args::command().write_help(&mut std::io::stderr());
    eprintln!();
    exit(2);
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
