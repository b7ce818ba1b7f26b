use assert_cmd::Command;
use predicates::prelude::*;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

/// A one-shot HTTP server: answers each connection with the next canned response
/// and records the raw request text.
struct MockApi {
    url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockApi {
    fn start(responses: Vec<(&'static str, String)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&requests);

        thread::spawn(move || {
            for (status, body) in responses {
                let Ok((mut stream, _)) = listener.accept() else {
                    return;
                };
                let request = read_request(&mut stream);
                log.lock().unwrap().push(request);

                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes());
                let _ = stream.flush();
            }
        });

        Self {
            url: format!("http://{}/resource/test.json", addr),
            requests,
        }
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = stream.read(&mut chunk).unwrap_or(0);
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if buf.windows(4).any(|w| w == b"\r\n\r\n") {
            break;
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn records(numbers: &[&str]) -> String {
    let items: Vec<String> = numbers
        .iter()
        .map(|n| format!(r#"{{"license_number":"{}","license_type":"Plumber"}}"#, n))
        .collect();
    format!("[{}]", items.join(","))
}

fn search_cmd(endpoint: &str) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("license-search"));
    cmd.env("APP_TOKEN", "test-token")
        .env_remove("LICENSE_API_URL")
        .env_remove("RUST_LOG")
        .env_remove("HTTP_PROXY")
        .env_remove("http_proxy")
        .env_remove("ALL_PROXY")
        .env_remove("all_proxy")
        .env("NO_PROXY", "127.0.0.1")
        .arg("--endpoint")
        .arg(endpoint)
        .arg("--no-color")
        .arg("--format")
        .arg("json");
    cmd
}

// ============== configuration ==============

#[test]
fn missing_token_fails_before_any_output() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("license-search"));
    cmd.env_remove("APP_TOKEN")
        .env("LICENSE_API_URL", "http://127.0.0.1:9/never")
        .arg("-t")
        .arg("plumb");

    cmd.assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Didn't find required APP_TOKEN in env"));
}

#[test]
fn oversized_page_size_is_rejected() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("license-search"));
    cmd.env("APP_TOKEN", "test-token")
        .env("LICENSE_API_URL", "http://127.0.0.1:9/never")
        .arg("--page-size")
        .arg(usize::MAX.to_string());

    cmd.assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("page size must be at most"));
}

#[test]
fn help_mentions_filters() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("license-search"));
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--license-type"))
        .stdout(predicate::str::contains("--owner-name"))
        .stdout(predicate::str::contains("--limit"));
}

// ============== search sessions ==============

#[test]
fn filtered_search_pages_until_empty() {
    let api = MockApi::start(vec![
        ("200 OK", records(&["1", "2", "3"])),
        ("200 OK", "[]".to_string()),
    ]);

    let mut cmd = search_cmd(&api.url);
    cmd.args(["-t", "plumb", "-c", "harris", "--limit", "10"]);

    let assert = cmd
        .assert()
        .success()
        .stdout("Found 3 total licenses\n");

    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).into_owned();
    assert!(stderr.contains(r#"{"license_number":"1","license_type":"Plumber"}"#));
    assert!(stderr.contains(r#"{"license_number":"3","license_type":"Plumber"}"#));

    let requests = api.requests();
    assert_eq!(requests.len(), 2);

    let first = requests[0].to_lowercase();
    assert!(first.starts_with("get /resource/test.json?"));
    assert!(first.contains("%24where="));
    assert!(first.contains("%24limit=10"));
    assert!(first.contains("%24offset=0"));
    assert!(first.contains("x-app-token: test-token"));
    assert!(first.contains("accept: application/json"));
    assert!(requests[0].contains("PLUMB"));
    assert!(requests[0].contains("HARRIS"));

    assert!(requests[1].contains("%24limit=7"));
    assert!(requests[1].contains("%24offset=3"));
}

#[test]
fn unfiltered_search_omits_where() {
    let api = MockApi::start(vec![("200 OK", "[]".to_string())]);

    search_cmd(&api.url)
        .assert()
        .success()
        .stdout("Found 0 total licenses\n");

    let requests = api.requests();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].contains("%24where"));
    assert!(requests[0].contains("%24limit=5000"));
}

#[test]
fn limit_satisfied_by_first_page_stops_requests() {
    let api = MockApi::start(vec![("200 OK", records(&["1", "2"]))]);

    search_cmd(&api.url)
        .args(["--limit", "2"])
        .assert()
        .success()
        .stdout("Found 2 total licenses\n");

    assert_eq!(api.requests().len(), 1);
}

#[test]
fn non_200_status_is_reported_once() {
    let api = MockApi::start(vec![("403 Forbidden", r#"{"error":true}"#.to_string())]);

    let assert = search_cmd(&api.url)
        .args(["-n", "90210"])
        .assert()
        .success()
        .stdout("Found 0 total licenses\n")
        .stderr(predicate::str::contains(
            "There was an error while processing your request: api returned a non-200 status code: 403 Forbidden",
        ));

    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).into_owned();
    assert_eq!(stderr.matches("403 Forbidden").count(), 1, "stderr: {}", stderr);
    assert!(!stderr.contains("WARN"));
}

#[test]
fn error_after_first_page_keeps_earlier_records() {
    let api = MockApi::start(vec![
        ("200 OK", records(&["1", "2"])),
        ("500 Internal Server Error", "oops".to_string()),
    ]);

    search_cmd(&api.url)
        .args(["--page-size", "2"])
        .assert()
        .success()
        .stdout("Found 2 total licenses\n")
        .stderr(predicate::str::contains("500 Internal Server Error"));
}

#[test]
fn malformed_body_is_reported() {
    let api = MockApi::start(vec![("200 OK", r#"{"not":"an array"}"#.to_string())]);

    search_cmd(&api.url)
        .assert()
        .success()
        .stdout("Found 0 total licenses\n")
        .stderr(predicate::str::contains("error unmarshaling JSON"));
}

#[test]
fn unreachable_api_is_reported() {
    // bind then drop to get a port nothing listens on
    let port = TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let url = format!("http://127.0.0.1:{}/resource/test.json", port);

    search_cmd(&url)
        .args(["--timeout", "5"])
        .assert()
        .success()
        .stdout("Found 0 total licenses\n")
        .stderr(predicate::str::contains("error making HTTP request"));
}
