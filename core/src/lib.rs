//! Small blocking client for JSON HTTP APIs.
//!
//! # Overview
//! `ApiClient` builds GET/POST/PUT/DELETE requests and hands them to a
//! `Transport`. The default transport is a `ureq` agent configured with the
//! client's timeout and TLS flag. `ApiClient::wrap` puts a
//! `DecoratedTransport` in front of it that injects default headers and
//! resolves relative paths against a base URI.
//!
//! # Design
//! - Requests and responses are plain owned data (`HttpRequest`,
//!   `HttpResponse`); transports receive requests by reference and never
//!   modify them.
//! - Status codes are not interpreted. Errors mean the request could not be
//!   built or delivered.
//! - Logging goes through `tracing`; the crate never installs a subscriber.

pub mod client;
pub mod config;
pub mod decorator;
pub mod error;
pub mod http;
pub mod params;
pub mod transport;

pub use client::ApiClient;
pub use config::ClientConfig;
pub use decorator::DecoratedTransport;
pub use error::{ApiError, Result};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use params::{encode_params, Params};
pub use transport::{Transport, UreqTransport};
