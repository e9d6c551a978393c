//! High-level client for the OSC endpoints.

use std::time::Duration;

use serde_json::{json, Value};

use crate::command::{run_command, Sleeper, ThreadSleeper};
use crate::config::{OscConfig, DEFAULT_POLL_INTERVAL};
use crate::transport::{
    HttpConnection, Method, OscResult, Transport, CHECK_FOR_UPDATES_PATH, INFO_PATH, STATE_PATH,
};

/// Client for one camera over one [`Transport`].
///
/// Wraps the transport with typed methods for the fixed OSC endpoints and
/// runs commands through the asynchronous-completion poll loop. One client
/// serves a whole CLI invocation; it is not shared across threads.
///
/// # Example
///
/// ```no_run
/// use osc_client::{OscClient, OscConfig};
/// use serde_json::json;
///
/// let mut client = OscClient::connect(&OscConfig::default())?;
/// println!("{}", client.info()?);
///
/// let shot = client.take_picture()?;
/// println!("saved to {}", shot["results"]["fileUrl"]);
/// # Ok::<(), osc_client::OscError>(())
/// ```
pub struct OscClient<T: Transport> {
    transport: T,
    poll_interval: Duration,
    sleeper: Box<dyn Sleeper>,
}

impl OscClient<HttpConnection> {
    /// Connect to the camera described by `config`.
    pub fn connect(config: &OscConfig) -> OscResult<Self> {
        let transport = HttpConnection::open(config)?;
        Ok(Self::with_poll_interval(transport, config.poll_interval))
    }
}

impl<T: Transport> OscClient<T> {
    /// Wrap an existing transport with the default poll interval.
    pub fn new(transport: T) -> Self {
        Self::with_poll_interval(transport, DEFAULT_POLL_INTERVAL)
    }

    /// Wrap an existing transport, polling at `poll_interval`.
    pub fn with_poll_interval(transport: T, poll_interval: Duration) -> Self {
        Self {
            transport,
            poll_interval,
            sleeper: Box::new(ThreadSleeper),
        }
    }

    /// Replace the inter-poll delay implementation (used by tests).
    pub fn with_sleeper(mut self, sleeper: Box<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Static camera information (`GET /osc/info`).
    pub fn info(&mut self) -> OscResult<Value> {
        self.transport.send(Method::Get, INFO_PATH, None)
    }

    /// Current mutable camera state (`POST /osc/state`).
    pub fn state(&mut self) -> OscResult<Value> {
        self.transport.send(Method::Post, STATE_PATH, Some(&json!({})))
    }

    /// Compare a previously seen state fingerprint against the camera's
    /// (`POST /osc/checkForUpdates`).
    pub fn check_for_updates(&mut self, fingerprint: &str) -> OscResult<Value> {
        self.transport.send(
            Method::Post,
            CHECK_FOR_UPDATES_PATH,
            Some(&json!({ "stateFingerprint": fingerprint })),
        )
    }

    /// Execute any OSC command and wait for its terminal response.
    pub fn run_command(&mut self, name: &str, parameters: Value) -> OscResult<Value> {
        run_command(
            &mut self.transport,
            name,
            parameters,
            self.poll_interval,
            self.sleeper.as_ref(),
        )
    }

    /// Read the given options via `camera.getOptions`.
    pub fn get_options(&mut self, names: &[&str]) -> OscResult<Value> {
        self.run_command("camera.getOptions", json!({ "optionNames": names }))
    }

    /// Take a picture via `camera.takePicture`, waiting for completion.
    pub fn take_picture(&mut self) -> OscResult<Value> {
        self.run_command("camera.takePicture", json!({}))
    }

    /// Retire the underlying connection.
    pub fn close(&mut self) {
        self.transport.close();
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::command::tests::ScriptedTransport;

    #[test]
    fn info_issues_a_get_with_no_body() {
        let mut client = OscClient::new(ScriptedTransport::new(vec![json!({ "model": "ONE R" })]));
        let info = client.info().unwrap();
        assert_eq!(info["model"], "ONE R");

        let (method, path, body) = &client.transport.requests[0];
        assert_eq!(*method, Method::Get);
        assert_eq!(path, INFO_PATH);
        assert!(body.is_none());
    }

    #[test]
    fn state_posts_an_empty_object() {
        let mut client =
            OscClient::new(ScriptedTransport::new(vec![json!({ "fingerprint": "FIG_0001" })]));
        client.state().unwrap();

        let (method, path, body) = &client.transport.requests[0];
        assert_eq!(*method, Method::Post);
        assert_eq!(path, STATE_PATH);
        assert_eq!(body.as_ref().unwrap(), &json!({}));
    }

    #[test]
    fn check_for_updates_sends_the_fingerprint() {
        let mut client =
            OscClient::new(ScriptedTransport::new(vec![json!({ "stateFingerprint": "FIG_0002" })]));
        client.check_for_updates("FIG_0001").unwrap();

        let (_, path, body) = &client.transport.requests[0];
        assert_eq!(path, CHECK_FOR_UPDATES_PATH);
        assert_eq!(body.as_ref().unwrap(), &json!({ "stateFingerprint": "FIG_0001" }));
    }

    #[test]
    fn get_options_wraps_the_generic_command() {
        let mut client = OscClient::new(ScriptedTransport::new(vec![json!({
            "state": "done",
            "results": { "options": { "iso": 400 } }
        })]));
        let response = client.get_options(&["iso"]).unwrap();
        assert_eq!(response["results"]["options"]["iso"], 400);

        let (_, _, body) = &client.transport.requests[0];
        assert_eq!(
            body.as_ref().unwrap(),
            &json!({
                "name": "camera.getOptions",
                "parameters": { "optionNames": ["iso"] }
            })
        );
    }
}
