//! HTTP transport for the OSC protocol.
//!
//! The camera speaks plain HTTP/1.1 with JSON bodies on a fixed set of
//! endpoints. This module owns the wire concerns: fixed request headers,
//! body serialization, response decoding, and the distinction between a
//! transport failure (the round trip never completed) and a decode failure
//! (the camera answered, but not with JSON).
//!
//! # Connections
//!
//! A [`HttpConnection`] wraps a dedicated [`ureq::Agent`] pointed at one
//! host. The agent keeps the underlying socket alive between requests, so
//! retiring the connection (drop or [`Transport::close`]) retires its
//! sockets too. That matters for the option prober: the camera firmware
//! drops the connection instead of answering when asked about certain
//! unsupported options, and the only recovery is a fresh connection.
//!
//! HTTP status codes are not treated as errors here. The camera reports
//! command failures as 4xx responses with a JSON body describing the error,
//! and callers want that body.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, trace, warn};
use ureq::Agent;

use crate::config::OscConfig;

/// IP address of the camera's WiFi access point.
pub const DEFAULT_HOST: &str = "192.168.42.1";

/// Static camera info endpoint (GET).
pub const INFO_PATH: &str = "/osc/info";
/// Mutable camera state endpoint (POST `{}`).
pub const STATE_PATH: &str = "/osc/state";
/// Fingerprint comparison endpoint (POST `{stateFingerprint}`).
pub const CHECK_FOR_UPDATES_PATH: &str = "/osc/checkForUpdates";
/// Command execution endpoint (POST `{name, parameters}`).
pub const COMMAND_EXECUTE_PATH: &str = "/osc/commands/execute";
/// Command status poll endpoint (POST `{id}`).
pub const COMMAND_STATUS_PATH: &str = "/osc/commands/status";

/// Errors that can occur talking to the camera.
#[derive(Error, Debug)]
pub enum OscError {
    /// The transport could not complete a request/response round trip.
    ///
    /// This covers failure to reach the camera as well as the firmware's
    /// habit of closing the connection without a response.
    #[error("connection error: {0}")]
    Connection(String),

    /// The response body was not valid JSON.
    #[error("invalid JSON in response: {0}")]
    Decode(#[from] serde_json::Error),

    /// A structurally valid response that violates the command protocol,
    /// e.g. an in-progress command with no execution id.
    #[error("protocol violation: {0}")]
    Protocol(String),
}

/// Result type for OSC operations.
pub type OscResult<T> = Result<T, OscError>;

/// HTTP method for an OSC request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One open transport to the camera.
///
/// Implementations perform exactly one round trip per [`send`](Self::send)
/// and read the full response body before returning. The trait is the seam
/// used by tests to script camera behavior without a network.
pub trait Transport {
    /// Send one request and return the parsed JSON response body.
    fn send(&mut self, method: Method, path: &str, body: Option<&Value>) -> OscResult<Value>;

    /// Retire the connection. Best-effort and idempotent; a closed
    /// connection rejects further sends.
    fn close(&mut self);

    /// Whether [`close`](Self::close) has been called.
    fn is_closed(&self) -> bool;
}

/// Creates connections; the seam the option prober uses to replace a
/// connection the camera has dropped.
pub trait Connector {
    type Conn: Transport;

    fn connect(&self) -> OscResult<Self::Conn>;
}

/// HTTP connection to a camera, backed by a dedicated [`ureq::Agent`].
///
/// # Example
///
/// ```no_run
/// use osc_client::{HttpConnection, Method, OscConfig, Transport};
///
/// let mut conn = HttpConnection::open(&OscConfig::default())?;
/// let info = conn.send(Method::Get, osc_client::INFO_PATH, None)?;
/// println!("model: {}", info["model"]);
/// # Ok::<(), osc_client::OscError>(())
/// ```
pub struct HttpConnection {
    agent: Agent,
    base_url: String,
    capture_dir: Option<PathBuf>,
    closed: bool,
}

impl HttpConnection {
    /// Open a connection to the camera described by `config`.
    ///
    /// The underlying socket is established lazily on the first request;
    /// an unreachable camera therefore surfaces as
    /// [`OscError::Connection`] from [`send`](Transport::send), not here.
    pub fn open(config: &OscConfig) -> OscResult<Self> {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(config.timeout))
            .http_status_as_error(false)
            .build()
            .new_agent();

        debug!("opening connection to {}", config.host);

        Ok(Self {
            agent,
            base_url: format!("http://{}", config.host),
            capture_dir: config.capture_dir.clone(),
            closed: false,
        })
    }
}

impl Transport for HttpConnection {
    fn send(&mut self, method: Method, path: &str, body: Option<&Value>) -> OscResult<Value> {
        if self.closed {
            return Err(OscError::Connection("connection is closed".to_string()));
        }

        let url = format!("{}{}", self.base_url, path);
        debug!("{method} {path}");

        let result = match method {
            Method::Get => self
                .agent
                .get(&url)
                .header("Accept", "application/json")
                .header("X-XSRF-Protected", "1")
                .call(),
            Method::Post => {
                let payload = match body {
                    Some(value) => serde_json::to_string(value)?,
                    None => String::new(),
                };
                trace!("request body: {payload}");
                self.agent
                    .post(&url)
                    .header("Accept", "application/json")
                    .header("X-XSRF-Protected", "1")
                    .header("Content-Type", "application/json")
                    .send(payload.as_str())
            }
        };

        let mut response = result.map_err(|e| OscError::Connection(e.to_string()))?;
        let text = response
            .body_mut()
            .read_to_string()
            .map_err(|e| OscError::Connection(e.to_string()))?;
        trace!("response body: {text}");

        if let Some(dir) = &self.capture_dir {
            capture_response(dir, method, path, &text);
        }

        Ok(serde_json::from_str(&text)?)
    }

    fn close(&mut self) {
        if !self.closed {
            debug!("closing connection to {}", self.base_url);
            self.closed = true;
        }
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

/// Connects [`HttpConnection`]s to the camera described by a config.
#[derive(Debug, Clone)]
pub struct HttpConnector {
    config: OscConfig,
}

impl HttpConnector {
    pub fn new(config: OscConfig) -> Self {
        Self { config }
    }
}

impl Connector for HttpConnector {
    type Conn = HttpConnection;

    fn connect(&self) -> OscResult<HttpConnection> {
        HttpConnection::open(&self.config)
    }
}

/// Save a raw response body under `dir`, keyed by method and path.
///
/// Diagnostic only: write failures are logged and never propagated.
fn capture_response(dir: &Path, method: Method, path: &str, text: &str) {
    let target = dir.join(capture_file_name(method, path));
    if let Err(err) = fs::create_dir_all(dir).and_then(|()| fs::write(&target, text)) {
        warn!("failed to capture response to {}: {err}", target.display());
    }
}

fn capture_file_name(method: Method, path: &str) -> String {
    format!(
        "{}_{}.json",
        method.as_str(),
        path.trim_start_matches('/').replace('/', "_")
    )
}
