//! Wire-level tests against a scripted HTTP stub.
//!
//! The stub accepts one TCP connection per scripted behavior, records the
//! raw request, and either replies or closes the socket without answering
//! (the firmware quirk the prober must survive). Every reply carries
//! `Connection: close` so each request arrives on a fresh accept.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use serde_json::json;

use osc_client::{
    probe_all, HttpConnection, HttpConnector, Method, OscClient, OscConfig, OscError,
    ReconnectPolicy, ThreadSleeper, Transport, COMMAND_EXECUTE_PATH, COMMAND_STATUS_PATH,
    INFO_PATH, STATE_PATH,
};

enum Behavior {
    Reply { status: u16, body: String },
    /// Close the connection without responding.
    Drop,
}

fn reply(body: serde_json::Value) -> Behavior {
    Behavior::Reply {
        status: 200,
        body: body.to_string(),
    }
}

#[derive(Debug)]
struct RecordedRequest {
    method: String,
    path: String,
    /// Header names lowercased.
    headers: Vec<(String, String)>,
    body: String,
}

impl RecordedRequest {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Start a stub server handling exactly `behaviors.len()` requests.
/// Returns the host:port to connect to and a handle yielding the recorded
/// requests.
fn spawn_stub(behaviors: Vec<Behavior>) -> (String, JoinHandle<Vec<RecordedRequest>>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub listener");
    let host = format!("127.0.0.1:{}", listener.local_addr().unwrap().port());

    let handle = thread::spawn(move || {
        let mut requests = Vec::new();
        for behavior in behaviors {
            let (stream, _) = listener.accept().expect("accept");
            let mut reader = BufReader::new(stream);

            let mut request_line = String::new();
            reader.read_line(&mut request_line).expect("request line");
            let mut parts = request_line.split_whitespace();
            let method = parts.next().unwrap_or_default().to_string();
            let path = parts.next().unwrap_or_default().to_string();

            let mut headers = Vec::new();
            let mut content_length = 0usize;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).expect("header line");
                let line = line.trim_end();
                if line.is_empty() {
                    break;
                }
                if let Some((name, value)) = line.split_once(':') {
                    let name = name.trim().to_ascii_lowercase();
                    let value = value.trim().to_string();
                    if name == "content-length" {
                        content_length = value.parse().unwrap_or(0);
                    }
                    headers.push((name, value));
                }
            }

            let mut body = vec![0u8; content_length];
            reader.read_exact(&mut body).expect("body");
            requests.push(RecordedRequest {
                method,
                path,
                headers,
                body: String::from_utf8_lossy(&body).into_owned(),
            });

            let mut stream = reader.into_inner();
            match behavior {
                Behavior::Reply { status, body } => {
                    let response = format!(
                        "HTTP/1.1 {status} OK\r\nContent-Type: application/json\r\n\
                         Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
                        body.len()
                    );
                    stream.write_all(response.as_bytes()).expect("write reply");
                    stream.flush().expect("flush reply");
                }
                Behavior::Drop => drop(stream),
            }
        }
        requests
    });

    (host, handle)
}

fn config_for(host: &str) -> OscConfig {
    OscConfig {
        host: host.to_string(),
        poll_interval: Duration::from_millis(5),
        timeout: Duration::from_secs(5),
        ..OscConfig::default()
    }
}

#[test]
fn every_request_carries_the_fixed_headers() {
    let (host, handle) = spawn_stub(vec![reply(json!({ "fingerprint": "FIG_0001" }))]);
    let mut client = OscClient::connect(&config_for(&host)).unwrap();

    let state = client.state().unwrap();
    assert_eq!(state["fingerprint"], "FIG_0001");
    client.close();

    let requests = handle.join().unwrap();
    assert_eq!(requests.len(), 1);
    let req = &requests[0];
    assert_eq!(req.method, "POST");
    assert_eq!(req.path, STATE_PATH);
    assert_eq!(req.header("accept"), Some("application/json"));
    assert_eq!(req.header("x-xsrf-protected"), Some("1"));
    assert_eq!(req.header("content-type"), Some("application/json"));
    assert_eq!(req.body, "{}");
}

#[test]
fn error_status_bodies_are_still_parsed() {
    // OSC reports command failures as 4xx with a JSON body; that body is
    // the result, not a transport error.
    let (host, handle) = spawn_stub(vec![Behavior::Reply {
        status: 400,
        body: json!({
            "state": "error",
            "error": { "code": "unknownCommand", "message": "unknown command" }
        })
        .to_string(),
    }]);
    let mut client = OscClient::connect(&config_for(&host)).unwrap();

    let response = client.run_command("camera.bogus", json!({})).unwrap();
    assert_eq!(response["state"], "error");
    assert_eq!(response["error"]["code"], "unknownCommand");

    handle.join().unwrap();
}

#[test]
fn non_json_body_is_a_decode_error() {
    let (host, handle) = spawn_stub(vec![Behavior::Reply {
        status: 200,
        body: "<html>not json</html>".to_string(),
    }]);
    let mut conn = HttpConnection::open(&config_for(&host)).unwrap();

    let err = conn.send(Method::Get, INFO_PATH, None).unwrap_err();
    assert!(matches!(err, OscError::Decode(_)));

    handle.join().unwrap();
}

#[test]
fn dropped_connection_is_a_connection_error() {
    let (host, handle) = spawn_stub(vec![Behavior::Drop]);
    let mut conn = HttpConnection::open(&config_for(&host)).unwrap();

    let err = conn.send(Method::Post, STATE_PATH, Some(&json!({}))).unwrap_err();
    assert!(matches!(err, OscError::Connection(_)));

    handle.join().unwrap();
}

#[test]
fn take_picture_polls_until_done_over_the_wire() {
    let (host, handle) = spawn_stub(vec![
        reply(json!({ "name": "camera.takePicture", "state": "inProgress", "id": "abc" })),
        reply(json!({
            "name": "camera.takePicture",
            "state": "done",
            "results": { "fileUrl": "http://192.168.42.1/DCIM/100/pic.jpg" }
        })),
    ]);
    let mut client = OscClient::connect(&config_for(&host)).unwrap();

    let result = client.take_picture().unwrap();
    assert_eq!(
        result["results"]["fileUrl"],
        "http://192.168.42.1/DCIM/100/pic.jpg"
    );

    let requests = handle.join().unwrap();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].path, COMMAND_EXECUTE_PATH);
    assert_eq!(requests[1].path, COMMAND_STATUS_PATH);
    assert_eq!(
        serde_json::from_str::<serde_json::Value>(&requests[1].body).unwrap(),
        json!({ "id": "abc" })
    );
}

#[test]
fn body_values_survive_the_round_trip() {
    // The stub echoes the request body back; serialize + parse must
    // reproduce an equivalent value regardless of key order.
    let sent = json!({
        "name": "camera.setOptions",
        "parameters": { "options": { "iso": 800, "hdr": true, "gpsInfo": null } }
    });
    let (host, handle) = spawn_stub(vec![reply(sent.clone())]);
    let mut conn = HttpConnection::open(&config_for(&host)).unwrap();

    let echoed = conn
        .send(Method::Post, COMMAND_EXECUTE_PATH, Some(&sent))
        .unwrap();
    assert_eq!(echoed, sent);

    let requests = handle.join().unwrap();
    assert_eq!(
        serde_json::from_str::<serde_json::Value>(&requests[0].body).unwrap(),
        sent
    );
}

#[test]
fn capture_mode_persists_raw_response_bodies() {
    let info = json!({ "model": "Insta360 One R", "apiLevel": [2] });
    let (host, handle) = spawn_stub(vec![reply(info.clone())]);

    let capture = tempfile::tempdir().unwrap();
    let config = OscConfig {
        capture_dir: Some(capture.path().to_path_buf()),
        ..config_for(&host)
    };
    let mut conn = HttpConnection::open(&config).unwrap();

    let response = conn.send(Method::Get, INFO_PATH, None).unwrap();
    assert_eq!(response, info);

    let saved = std::fs::read_to_string(capture.path().join("GET_osc_info.json")).unwrap();
    assert_eq!(
        serde_json::from_str::<serde_json::Value>(&saved).unwrap(),
        info
    );

    handle.join().unwrap();
}

#[test]
fn probe_scan_reconnects_over_the_wire() {
    let (host, handle) = spawn_stub(vec![
        Behavior::Drop,
        reply(json!({
            "name": "camera.getOptions",
            "state": "done",
            "results": { "options": { "iso": 100 } }
        })),
    ]);
    let connector = HttpConnector::new(config_for(&host));

    let report = probe_all(
        &connector,
        &["_vendorSpecific", "iso"],
        Duration::from_millis(5),
        &ThreadSleeper,
        &ReconnectPolicy::default(),
    )
    .unwrap();

    assert_eq!(report.unsupported, vec!["_vendorSpecific"]);
    assert_eq!(report.supported["iso"], json!(100));
    assert_eq!(report.reconnects, 1);
    assert_eq!(report.total(), 2);

    handle.join().unwrap();
}
