//! Client library for the Open Spherical Camera (OSC) HTTP protocol.
//!
//! OSC is the HTTP/JSON control protocol spoken by consumer 360° cameras
//! (here, the Insta360 ONE R/X family) over their local WiFi link. The
//! camera runs an AP at `192.168.42.1` and exposes a small fixed set of
//! endpoints:
//!
//! | Endpoint | Method | Body | Purpose |
//! |---|---|---|---|
//! | `/osc/info` | GET | none | static camera info |
//! | `/osc/state` | POST | `{}` | current mutable state |
//! | `/osc/checkForUpdates` | POST | `{stateFingerprint}` | compare fingerprints |
//! | `/osc/commands/execute` | POST | `{name, parameters}` | start a command |
//! | `/osc/commands/status` | POST | `{id}` | poll a running command |
//!
//! # Command completion
//!
//! Slow commands answer `state: "inProgress"` with an execution id; the
//! client polls the status endpoint with that id at a fixed cadence until
//! the state is terminal (`done` or `error`). See [`run_command`].
//!
//! # Option probing
//!
//! [`probe_all`] scans the fixed [`OPTION_CATALOG`] one name at a time,
//! classifying each as supported or unsupported. The camera firmware drops
//! the connection instead of answering for some unsupported names; the
//! prober retires the dead connection and continues on a fresh one per its
//! [`ReconnectPolicy`].
//!
//! # References
//!
//! - <https://developers.google.com/streetview/open-spherical-camera>
//! - <https://github.com/Insta360Develop/Insta360_OSC>

pub mod client;
pub mod command;
pub mod config;
pub mod options;
pub mod probe;
pub mod transport;

pub use client::OscClient;
pub use command::{run_command, CommandState, Sleeper, ThreadSleeper};
pub use config::{OscConfig, DEFAULT_POLL_INTERVAL};
pub use options::OPTION_CATALOG;
pub use probe::{probe_all, ProbeReport, ReconnectPolicy};
pub use transport::{
    Connector, HttpConnection, HttpConnector, Method, OscError, OscResult, Transport,
    CHECK_FOR_UPDATES_PATH, COMMAND_EXECUTE_PATH, COMMAND_STATUS_PATH, DEFAULT_HOST, INFO_PATH,
    STATE_PATH,
};
