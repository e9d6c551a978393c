//! Command execution and asynchronous completion.
//!
//! OSC commands are started with one POST to `/osc/commands/execute`. Fast
//! commands come back terminal immediately; slow ones (e.g.
//! `camera.takePicture`) return `state: "inProgress"` plus an execution id,
//! and the client polls `/osc/commands/status` with that id until the state
//! is terminal.
//!
//! The id must be re-read from every response: it correlates exactly one
//! execution with its polls and must never be reused across command runs.
//!
//! The loop has no iteration cap. The link is local and trusted, and the
//! protocol has no server-side cancel; a caller wanting a deadline wraps
//! [`run_command`] in its own timeout and abandons the connection if it
//! fires.

use std::time::Duration;

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::transport::{Method, OscError, OscResult, Transport, COMMAND_EXECUTE_PATH, COMMAND_STATUS_PATH};

/// State of a command execution as reported by the camera.
///
/// [`Done`](Self::Done) and [`Error`](Self::Error) are terminal;
/// [`InProgress`](Self::InProgress) means the camera is still working and
/// expects status polls. Any other state string is a contract violation and
/// fails with [`OscError::Protocol`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CommandState {
    Done,
    InProgress,
    Error,
}

/// The fields of a command response the poll loop actually consumes.
/// Everything else stays in the raw JSON value handed back to the caller.
#[derive(Debug, Deserialize)]
struct StatusView {
    state: CommandState,
    id: Option<String>,
}

/// Injectable delay between status polls, so tests can run the poll loop
/// without real time passing.
pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

/// Blocking sleeper used outside of tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Execute an OSC command and wait for its terminal response.
///
/// Posts `{name, parameters}` to the execute endpoint, then polls the
/// status endpoint every `poll_interval` while the camera reports
/// `inProgress`, using the execution id from the most recent response.
/// Returns the terminal response unmodified, including `error` results:
/// a command that fails camera-side is still a successful round trip.
///
/// # Errors
///
/// Transport failures propagate unchanged; they are not retried here.
/// An in-progress response without an execution id, or a response whose
/// `state` is missing or unrecognised, fails with [`OscError::Protocol`].
pub fn run_command<T: Transport + ?Sized>(
    transport: &mut T,
    name: &str,
    parameters: Value,
    poll_interval: Duration,
    sleeper: &dyn Sleeper,
) -> OscResult<Value> {
    info!("executing {name}");
    let body = json!({ "name": name, "parameters": parameters });
    let mut response = transport.send(Method::Post, COMMAND_EXECUTE_PATH, Some(&body))?;

    loop {
        let status = StatusView::deserialize(&response)
            .map_err(|e| OscError::Protocol(format!("malformed command response: {e}")))?;

        if status.state != CommandState::InProgress {
            debug!("{name} finished with state {:?}", status.state);
            return Ok(response);
        }

        let id = status.id.ok_or_else(|| {
            OscError::Protocol("in-progress response carries no execution id".to_string())
        })?;

        debug!("{name} in progress (id {id}), polling in {poll_interval:?}");
        sleeper.sleep(poll_interval);
        response = transport.send(Method::Post, COMMAND_STATUS_PATH, Some(&json!({ "id": id })))?;
    }
}
