//! Client configuration.

use std::path::PathBuf;
use std::time::Duration;

use crate::transport::DEFAULT_HOST;

/// Default delay between command status polls (matches the camera's
/// documented `pollingDelay` granularity of one second).
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Default timeout for a single request/response round trip.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for an OSC client.
///
/// Passed explicitly into constructors; there is no process-wide state.
///
/// # Example
///
/// ```
/// use osc_client::OscConfig;
/// use std::time::Duration;
///
/// let config = OscConfig {
///     poll_interval: Duration::from_millis(500),
///     ..Default::default()
/// };
/// assert_eq!(config.host, "192.168.42.1");
/// ```
#[derive(Debug, Clone)]
pub struct OscConfig {
    /// Camera address, either `host` or `host:port`.
    ///
    /// Defaults to the WiFi AP address the camera exposes.
    pub host: String,

    /// Delay between `/osc/commands/status` polls while a command is
    /// in progress.
    pub poll_interval: Duration,

    /// Timeout for a single request/response round trip.
    pub timeout: Duration,

    /// When set, raw response bodies are saved under this directory,
    /// one file per method+path. Diagnostic only; never affects results.
    pub capture_dir: Option<PathBuf>,
}

impl Default for OscConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            timeout: DEFAULT_TIMEOUT,
            capture_dir: None,
        }
    }
}
