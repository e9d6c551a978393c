//! Option support probing with reconnect self-healing.
//!
//! Options are probed one at a time through `camera.getOptions`. A clean
//! response that simply lacks the probed key means "not supported" and the
//! scan moves on. But for some genuinely unsupported names (vendor options
//! in particular) the firmware closes the connection without responding at
//! all. The scan must survive that: the name is recorded as unsupported,
//! the dead connection is retired, a fresh one is opened, and probing
//! continues. Without the reconnect, one bad name would abort the whole
//! catalog scan.

use std::collections::BTreeMap;
use std::time::Duration;

use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::command::{run_command, Sleeper};
use crate::transport::{Connector, OscError, OscResult, Transport};

/// When and how often the prober replaces a dropped connection.
///
/// Formalises the reconnect-after-unsupported-option workaround so it is
/// testable and tunable rather than a bare catch. Reconnects are triggered
/// by failures that yield no usable response (the round trip failed or the
/// body was not JSON); a structured protocol violation stays fatal.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReconnectPolicy {
    /// Maximum number of reconnects for one scan; `None` means unlimited,
    /// so no catalog name is ever skipped.
    pub max_reconnects: Option<u32>,
}

impl ReconnectPolicy {
    /// Policy allowing at most `max` reconnects per scan.
    pub fn limited(max: u32) -> Self {
        Self {
            max_reconnects: Some(max),
        }
    }

    /// Whether `error` should be healed by reconnecting.
    pub fn triggers_on(&self, error: &OscError) -> bool {
        matches!(error, OscError::Connection(_) | OscError::Decode(_))
    }
}

/// Outcome of a full catalog scan.
#[derive(Debug, Default)]
pub struct ProbeReport {
    /// Options the camera answered with a non-null value.
    pub supported: BTreeMap<String, Value>,
    /// Options with no stable value, in catalog order.
    pub unsupported: Vec<String>,
    /// How many times the connection had to be replaced.
    pub reconnects: u32,
}

impl ProbeReport {
    /// Total number of classified options.
    pub fn total(&self) -> usize {
        self.supported.len() + self.unsupported.len()
    }
}

/// Probe every name in `names`, classifying each as supported or not.
///
/// Exactly one connection is live at a time; ownership only changes hands
/// in the reconnect path, where the broken connection is fully retired
/// before its replacement is opened. Every name is classified into exactly
/// one bucket regardless of how many reconnects the scan needs.
///
/// # Errors
///
/// Fails if a replacement connection cannot be opened, if the policy's
/// reconnect budget is exhausted, or on a protocol violation.
pub fn probe_all<C: Connector>(
    connector: &C,
    names: &[&str],
    poll_interval: Duration,
    sleeper: &dyn Sleeper,
    policy: &ReconnectPolicy,
) -> OscResult<ProbeReport> {
    let mut report = ProbeReport::default();
    let mut conn = connector.connect()?;

    for &name in names {
        info!("probing option {name}");
        match probe_one(&mut conn, name, poll_interval, sleeper) {
            Ok(Some(value)) => {
                debug!("option {name} supported: {value}");
                report.supported.insert(name.to_string(), value);
            }
            Ok(None) => {
                debug!("option {name} not supported");
                report.unsupported.push(name.to_string());
            }
            Err(err) if policy.triggers_on(&err) => {
                if policy
                    .max_reconnects
                    .is_some_and(|max| report.reconnects >= max)
                {
                    conn.close();
                    return Err(err);
                }
                warn!("no response probing {name} ({err}), reconnecting");
                report.unsupported.push(name.to_string());
                conn.close();
                conn = connector.connect()?;
                report.reconnects += 1;
            }
            Err(err) => {
                conn.close();
                return Err(err);
            }
        }
    }

    conn.close();
    Ok(report)
}

/// Probe a single option. `Ok(Some(value))` means supported, `Ok(None)`
/// means the camera answered but the option has no value.
fn probe_one<T: Transport>(
    transport: &mut T,
    name: &str,
    poll_interval: Duration,
    sleeper: &dyn Sleeper,
) -> OscResult<Option<Value>> {
    let response = run_command(
        transport,
        "camera.getOptions",
        json!({ "optionNames": [name] }),
        poll_interval,
        sleeper,
    )?;

    Ok(response
        .get("results")
        .and_then(|results| results.get("options"))
        .and_then(|options| options.get(name))
        .filter(|value| !value.is_null())
        .cloned())
}
