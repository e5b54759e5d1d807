//! Header injection and base-URI resolution in front of another transport.
//!
//! # Design
//! `DecoratedTransport` never touches the request it receives. It clones the
//! request (headers included), overlays its default headers with
//! replace-not-append semantics, rewrites the URL against the base URI, and
//! forwards the clone. The next transport's result is returned unchanged.
//!
//! A base URI that cannot be combined with the request URL is not an error:
//! the request goes out with its original URL and a warning is logged. A
//! base URI without a scheme (`/api`) rewrites only the path.
//! Installing two decorators (e.g. calling `ApiClient::wrap` twice) applies
//! both in turn.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tracing::{trace, warn};
use url::{ParseError, Position, Url};

use crate::error::Result;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;

const RELATIVE_ORIGIN: &str = "http://relative.invalid/";

pub struct DecoratedTransport {
    headers: BTreeMap<String, String>,
    base_uri: String,
    next: Arc<dyn Transport>,
}

impl DecoratedTransport {
    pub fn new(headers: &HashMap<String, String>, base_uri: &str, next: Arc<dyn Transport>) -> Self {
        Self {
            headers: headers
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            base_uri: base_uri.to_string(),
            next,
        }
    }

    /// Produce the request that will actually be forwarded.
    pub fn decorate(&self, request: &HttpRequest) -> HttpRequest {
        let mut decorated = request.clone();
        for (name, value) in &self.headers {
            trace!(header = %name, "overlaying default header");
            decorated.set_header(name, value);
        }
        if let Some(url) = self.resolve(&request.url) {
            decorated.url = url;
        }
        decorated
    }

    fn resolve(&self, url: &str) -> Option<String> {
        if self.base_uri.is_empty() {
            return None;
        }
        let joined = format!("{}{}", self.base_uri, url);
        let resolved = match Url::parse(&joined) {
            Ok(resolved) => Ok(String::from(resolved)),
            // A base without scheme (e.g. `/api`) yields a relative reference:
            // resolve it against a throwaway origin and keep path onwards.
            Err(ParseError::RelativeUrlWithoutBase) => Url::parse(RELATIVE_ORIGIN)
                .and_then(|origin| origin.join(&joined))
                .map(|resolved| resolved[Position::BeforePath..].to_string()),
            Err(err) => Err(err),
        };
        match resolved {
            Ok(resolved) => Some(resolved),
            Err(err) => {
                warn!(base_uri = %self.base_uri, url, %err, "skipping base URI rewrite");
                None
            }
        }
    }
}

impl std::fmt::Debug for DecoratedTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecoratedTransport")
            .field("headers", &self.headers)
            .field("base_uri", &self.base_uri)
            .finish_non_exhaustive()
    }
}

impl Transport for DecoratedTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let decorated = self.decorate(request);
        self.next.send(&decorated)
    }
}
