//! End-to-end tests against the live mock server.
//!
//! # Design
//! Starts the echo server on a random port, then drives `ApiClient` over
//! real HTTP through the default `UreqTransport`. The server reflects every
//! request back as JSON, so each test asserts on what actually reached the
//! wire.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

use api_client::{ApiClient, ApiError, Params};
use mock_server::Echo;

/// Bind the echo server to a random loopback port and serve it from a
/// background thread.
fn start_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    addr
}

fn default_headers() -> HashMap<String, String> {
    HashMap::from([
        ("Content-Type".to_string(), "application/json".to_string()),
        ("X-Api-Key".to_string(), "secret".to_string()),
    ])
}

fn wrapped_client(addr: SocketAddr) -> ApiClient {
    ApiClient::new(
        &format!("http://{addr}"),
        default_headers(),
        Duration::from_secs(5),
        false,
    )
    .wrap()
}

#[test]
fn verb_lifecycle_through_wrapped_client() {
    let addr = start_server();
    let client = wrapped_client(addr);

    // Step 1: GET with query options.
    let opts: Params = HashMap::from([
        ("q".to_string(), "x".to_string()),
        ("limit".to_string(), "10".to_string()),
    ]);
    let response = client.get("/search", &opts).unwrap();
    assert_eq!(response.status, 200);
    let echo: Echo = response.json().unwrap();
    assert_eq!(echo.method, "GET");
    assert_eq!(echo.path, "/search");
    assert_eq!(echo.query.as_deref(), Some("limit=10&q=x"));
    assert_eq!(echo.headers["x-api-key"], vec!["secret"]);
    assert!(echo.body.is_empty());

    // Step 2: POST a JSON body.
    let response = client.post("/items", &serde_json::json!({"a": 1})).unwrap();
    let echo: Echo = response.json().unwrap();
    assert_eq!(echo.method, "POST");
    assert_eq!(echo.path, "/items");
    assert_eq!(echo.body, r#"{"a":1}"#);
    assert_eq!(echo.headers["content-type"], vec!["application/json"]);

    // Step 3: PUT replaces with another body.
    let response = client.put("/items/1", &serde_json::json!({"a": 2})).unwrap();
    let echo: Echo = response.json().unwrap();
    assert_eq!(echo.method, "PUT");
    assert_eq!(echo.path, "/items/1");
    assert_eq!(echo.body, r#"{"a":2}"#);
    assert!(echo.query.is_none());

    // Step 4: DELETE with query options.
    let opts: Params = HashMap::from([("force".to_string(), "true".to_string())]);
    let response = client.delete("/items/1", &opts).unwrap();
    let echo: Echo = response.json().unwrap();
    assert_eq!(echo.method, "DELETE");
    assert_eq!(echo.query.as_deref(), Some("force=true"));
}

#[test]
fn unwrapped_client_needs_absolute_urls_and_sends_no_defaults() {
    let addr = start_server();
    let client = ApiClient::new(
        &format!("http://{addr}"),
        default_headers(),
        Duration::from_secs(5),
        false,
    );

    let response = client
        .get(&format!("http://{addr}/plain"), &Params::new())
        .unwrap();
    let echo: Echo = response.json().unwrap();
    assert_eq!(echo.path, "/plain");
    assert!(!echo.headers.contains_key("x-api-key"));

    let err = client.get("/plain", &Params::new()).unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}

#[test]
fn error_statuses_come_back_as_responses() {
    let addr = start_server();
    let client = wrapped_client(addr);

    let response = client.get("/status/404", &Params::new()).unwrap();
    assert_eq!(response.status, 404);

    let response = client.post("/status/500", &serde_json::json!({})).unwrap();
    assert_eq!(response.status, 500);
    let echo: Echo = response.json().unwrap();
    assert_eq!(echo.body, "{}");
}

#[test]
fn bodies_over_ten_mebibytes_are_read_in_full() {
    let addr = start_server();
    let client = wrapped_client(addr);
    let len = 11 * 1024 * 1024;

    let response = client.get(&format!("/bytes/{len}"), &Params::new()).unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.body.len(), len);
}

#[test]
fn slow_response_hits_the_timeout() {
    let addr = start_server();
    let client = ApiClient::new(
        &format!("http://{addr}"),
        HashMap::new(),
        Duration::from_millis(200),
        false,
    )
    .wrap();

    let err = client.get("/delay/3000", &Params::new()).unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));

    let response = client.get("/delay/10", &Params::new()).unwrap();
    assert_eq!(response.status, 200);
}

#[test]
fn insecure_flag_does_not_affect_plain_http() {
    let addr = start_server();
    let client = ApiClient::new(
        &format!("http://{addr}"),
        HashMap::new(),
        Duration::from_secs(5),
        true,
    )
    .wrap();

    let response = client.get("/ping", &Params::new()).unwrap();
    assert_eq!(response.status, 200);
}
