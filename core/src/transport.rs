//! The sending capability behind `ApiClient`.
//!
//! # Design
//! `Transport` has a single `send` operation so transports compose as a
//! chain: a decorator holds the next link and forwards to it. The chain ends
//! in `UreqTransport`, which owns a `ureq::Agent` and performs the actual
//! blocking round-trip. `ureq::Agent` is internally reference-counted and
//! safe to share across threads, so one transport serves every clone of a
//! client.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::error::Result;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Dispatches an `HttpRequest` and returns whatever the peer answered.
///
/// Implementations must not treat HTTP status codes as errors, and must not
/// modify the request they are given.
pub trait Transport: Send + Sync {
    /// # Errors
    /// Returns `ApiError::Transport` when the request could not be delivered
    /// or no response arrived in time.
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        (**self).send(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        (**self).send(request)
    }
}

/// Network transport backed by `ureq`.
pub struct UreqTransport {
    agent: ureq::Agent,
    timeout: Duration,
}

impl UreqTransport {
    /// Build an agent with a global `timeout`.
    ///
    /// `verify == true` turns certificate verification OFF. The flag keeps
    /// the polarity callers of this client already depend on.
    pub fn new(timeout: Duration, verify: bool) -> Self {
        let tls = ureq::tls::TlsConfig::builder()
            .disable_verification(verify)
            .build();
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .tls_config(tls)
            .build()
            .new_agent();
        Self { agent, timeout }
    }

    /// True when the agent skips certificate verification.
    pub fn verify(&self) -> bool {
        self.agent.config().tls_config().disable_verification()
    }
}

impl std::fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UreqTransport")
            .field("timeout", &self.timeout)
            .field("verify", &self.verify())
            .finish_non_exhaustive()
    }
}

impl Transport for UreqTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        debug!(method = %request.method, url = %request.url, "dispatching request");

        let url = request.url.as_str();
        let body = request.body.as_deref();
        let headers = &request.headers;

        let mut response = match (request.method, body) {
            (HttpMethod::Get, _) => with_headers(self.agent.get(url), headers).call(),
            (HttpMethod::Delete, _) => with_headers(self.agent.delete(url), headers).call(),
            (HttpMethod::Post, Some(body)) => {
                with_headers(self.agent.post(url), headers).send(body.as_bytes())
            }
            (HttpMethod::Post, None) => with_headers(self.agent.post(url), headers).send_empty(),
            (HttpMethod::Put, Some(body)) => {
                with_headers(self.agent.put(url), headers).send(body.as_bytes())
            }
            (HttpMethod::Put, None) => with_headers(self.agent.put(url), headers).send_empty(),
        }?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        // ureq caps bodies at 10 MiB unless told otherwise.
        let body = response
            .body_mut()
            .with_config()
            .limit(u64::MAX)
            .read_to_vec()?;

        debug!(status, bytes = body.len(), "response received");
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}
