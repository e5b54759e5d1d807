//! JSON API client with GET/POST/PUT/DELETE helpers.
//!
//! # Design
//! `ApiClient` holds its configuration as public fields plus the transport
//! every verb sends through. A fresh client talks straight to
//! `UreqTransport`, so paths must be absolute URLs. `wrap` installs a
//! `DecoratedTransport` in front of the current transport, which adds the
//! default headers and resolves relative paths against `base_uri`.
//!
//! `wrap` snapshots `headers` and `base_uri` at the moment it is called.
//! It is not idempotent: a second call stacks a second decorator.
//!
//! Verbs never look at the status code. Whatever the server answers is
//! returned as an `HttpResponse`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, debug_span};
use url::Url;

use crate::config::ClientConfig;
use crate::decorator::DecoratedTransport;
use crate::error::{ApiError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::params::{encode_params, Params};
use crate::transport::{Transport, UreqTransport};

/// Stand-in base used only to check that a path is a valid URI reference.
const REFERENCE_CHECK_BASE: &str = "http://reference.invalid/";

#[derive(Clone)]
pub struct ApiClient {
    pub base_uri: String,
    pub headers: HashMap<String, String>,
    pub timeout: Duration,
    /// When true, TLS certificates are NOT verified.
    pub verify: bool,
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    pub fn new(
        base_uri: &str,
        headers: HashMap<String, String>,
        timeout: Duration,
        verify: bool,
    ) -> Self {
        Self {
            base_uri: base_uri.to_string(),
            headers,
            timeout,
            verify,
            transport: Arc::new(UreqTransport::new(timeout, verify)),
        }
    }

    pub fn from_config(config: ClientConfig) -> Self {
        let timeout = config.timeout();
        Self::new(&config.base_uri, config.headers, timeout, config.verify)
    }

    /// Replace the sending capability, e.g. with a test double or a
    /// transport from another HTTP stack.
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = transport;
        self
    }

    /// Route every request through a `DecoratedTransport` built from the
    /// current `headers` and `base_uri`. Call at most once.
    pub fn wrap(mut self) -> Self {
        let next = Arc::clone(&self.transport);
        self.transport = Arc::new(DecoratedTransport::new(&self.headers, &self.base_uri, next));
        self
    }

    /// # Errors
    /// `RequestConstruction` for a malformed path, `Transport` if sending fails.
    pub fn get(&self, path: &str, opts: &Params) -> Result<HttpResponse> {
        let request = build_request(HttpMethod::Get, encode_params(path, opts), None)?;
        self.dispatch(&request)
    }

    /// Send `data` as a JSON body. No `Content-Type` is added; set one in
    /// the default headers if the server needs it.
    ///
    /// # Errors
    /// `Encoding` if `data` cannot be serialized (nothing is sent),
    /// `RequestConstruction` for a malformed path, `Transport` if sending fails.
    pub fn post<T: Serialize + ?Sized>(&self, path: &str, data: &T) -> Result<HttpResponse> {
        let body = serde_json::to_string(data)?;
        let request = build_request(HttpMethod::Post, path.to_string(), Some(body))?;
        self.dispatch(&request)
    }

    /// # Errors
    /// Same as [`ApiClient::post`].
    pub fn put<T: Serialize + ?Sized>(&self, path: &str, data: &T) -> Result<HttpResponse> {
        let body = serde_json::to_string(data)?;
        let request = build_request(HttpMethod::Put, path.to_string(), Some(body))?;
        self.dispatch(&request)
    }

    /// # Errors
    /// Same as [`ApiClient::get`].
    pub fn delete(&self, path: &str, opts: &Params) -> Result<HttpResponse> {
        let request = build_request(HttpMethod::Delete, encode_params(path, opts), None)?;
        self.dispatch(&request)
    }

    fn dispatch(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let span = debug_span!("api_request", http.method = %request.method, http.url = %request.url);
        let _enter = span.enter();

        let response = self.transport.send(request)?;
        debug!(http.status_code = response.status, "request completed");
        Ok(response)
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_uri", &self.base_uri)
            .field("headers", &self.headers)
            .field("timeout", &self.timeout)
            .field("verify", &self.verify)
            .finish_non_exhaustive()
    }
}

/// Validate `url` and assemble the request value.
///
/// Any URI reference is accepted, relative or absolute; a reference that
/// is still relative when it reaches `UreqTransport` fails there. Control
/// characters and references the `url` parser cannot resolve (bad host,
/// bad port) are rejected here.
fn build_request(method: HttpMethod, url: String, body: Option<String>) -> Result<HttpRequest> {
    if url.chars().any(|c| c.is_ascii_control()) {
        return Err(ApiError::RequestConstruction(format!(
            "{method} {url:?}: control character in URL"
        )));
    }
    Url::parse(REFERENCE_CHECK_BASE)
        .and_then(|base| base.join(&url))
        .map_err(|e| ApiError::RequestConstruction(format!("{method} {url:?}: {e}")))?;
    Ok(HttpRequest {
        method,
        url,
        headers: Vec::new(),
        body,
    })
}
