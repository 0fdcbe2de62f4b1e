//! HTTP fetcher behaviour against a local mock server: request headers,
//! status mapping, and the post-fetch rate-limit wait.
//!
//! The fetcher is blocking, so the Tokio runtime exists only to host the
//! Wiremock server; requests are issued from the test thread.

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use serde_json::json;
use tokio::runtime::Runtime;
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use gleaner::retry::RetryPolicy;
use gleaner::{Fetcher, HttpFetcher, PersonalAccessToken, ScrapeError};

fn start_server() -> (Runtime, MockServer) {
    let runtime = Runtime::new().expect("tokio runtime");
    let server = runtime.block_on(MockServer::start());
    (runtime, server)
}

fn fetcher(buffer: u32) -> HttpFetcher {
    let token = PersonalAccessToken::new("ghp_test").expect("token should validate");
    HttpFetcher::new(token, buffer).expect("client should build")
}

fn endpoint(server: &MockServer, route: &str) -> Url {
    Url::parse(&format!("{}{route}", server.uri())).expect("endpoint should parse")
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time should be available")
        .as_secs()
}

#[test]
fn sends_bearer_and_accept_headers_and_parses_the_body() {
    let (runtime, server) = start_server();
    runtime.block_on(
        Mock::given(method("GET"))
            .and(path("/repos/acme/widgets/issues"))
            .and(header("authorization", "Bearer ghp_test"))
            .and(header("accept", "application/vnd.github+json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&server),
    );

    let body = fetcher(0)
        .fetch_json(&endpoint(&server, "/repos/acme/widgets/issues"))
        .expect("fetch succeeds");
    assert_eq!(body, json!({"ok": true}));
}

#[test]
fn non_success_status_maps_to_a_status_error() {
    let (runtime, server) = start_server();
    runtime.block_on(
        Mock::given(method("GET"))
            .and(path("/broken"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server),
    );

    let error = fetcher(0)
        .fetch_json(&endpoint(&server, "/broken"))
        .expect_err("bad gateway is an error");
    assert!(matches!(error, ScrapeError::Status { status: 502, .. }));
}

#[test]
fn status_errors_are_not_retried() {
    let (runtime, server) = start_server();
    runtime.block_on(
        Mock::given(method("GET"))
            .and(path("/broken"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server),
    );

    let retrying = fetcher(0).with_retry(RetryPolicy::new(3, Duration::ZERO));
    let error = retrying
        .fetch_json(&endpoint(&server, "/broken"))
        .expect_err("server error is an error");
    assert!(matches!(error, ScrapeError::Status { status: 500, .. }));
}

#[test]
fn non_json_body_maps_to_a_malformed_response_error() {
    let (runtime, server) = start_server();
    runtime.block_on(
        Mock::given(method("GET"))
            .and(path("/html"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>nope</html>"))
            .mount(&server),
    );

    let error = fetcher(0)
        .fetch_json(&endpoint(&server, "/html"))
        .expect_err("html body is an error");
    assert!(matches!(error, ScrapeError::MalformedResponse { .. }));
}

#[test]
fn depleted_quota_blocks_until_the_reset_boundary() {
    let (runtime, server) = start_server();
    let reset = unix_now() + 3;
    runtime.block_on(
        Mock::given(method("GET"))
            .and(path("/data"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([]))
                    .insert_header("x-ratelimit-limit", "60")
                    .insert_header("x-ratelimit-remaining", "0")
                    .insert_header("x-ratelimit-reset", reset.to_string().as_str()),
            )
            .mount(&server),
    );

    let started = Instant::now();
    let body = fetcher(0)
        .fetch_json(&endpoint(&server, "/data"))
        .expect("body is returned despite the wait");
    let elapsed = started.elapsed();

    assert_eq!(body, json!([]));
    assert!(
        elapsed >= Duration::from_secs(1),
        "returned after {elapsed:?}, before the reset boundary"
    );
}

#[test]
fn quota_above_the_buffer_does_not_wait() {
    let (runtime, server) = start_server();
    let reset = unix_now() + 60;
    runtime.block_on(
        Mock::given(method("GET"))
            .and(path("/data"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([]))
                    .insert_header("x-ratelimit-limit", "60")
                    .insert_header("x-ratelimit-remaining", "30")
                    .insert_header("x-ratelimit-reset", reset.to_string().as_str()),
            )
            .mount(&server),
    );

    let started = Instant::now();
    let body = fetcher(20)
        .fetch_json(&endpoint(&server, "/data"))
        .expect("fetch succeeds");

    assert_eq!(body, json!([]));
    assert!(
        started.elapsed() < Duration::from_secs(30),
        "a wait here would mean the buffer check fired with quota to spare"
    );
}
