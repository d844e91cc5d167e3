//! HTTP transport types and the default blocking transport.
//!
//! # Design
//! Requests and responses are plain data. `WikiClient` builds an
//! `HttpRequest`, hands it to a `Transport`, and parses the `HttpResponse`
//! it gets back, so the request/decode logic stays testable without a
//! network. `UreqTransport` is the default transport; any closure with the
//! right signature works too, which is how tests plug in canned responses.
//!
//! A transport reports status codes as data. Mapping a non-2xx status to a
//! failure is the client's decision, not the transport's.

use url::Url;

use crate::error::{Operation, TransportError};

/// A GET request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub operation: Operation,
    pub url: Url,
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub reason: String,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            reason: String::new(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Executes a single `HttpRequest`.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<F> Transport for F
where
    F: Fn(&HttpRequest) -> Result<HttpResponse, TransportError>,
{
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self(request)
    }
}

/// Blocking transport backed by a `ureq::Agent`.
///
/// Status codes are returned as data (`http_status_as_error(false)`); the
/// agent's defaults apply to redirects, timeouts and connection reuse.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl std::fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UreqTransport").finish_non_exhaustive()
    }
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }

    pub fn with_agent(agent: ureq::Agent) -> Self {
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut response = self
            .agent
            .get(request.url.as_str())
            .call()
            .map_err(TransportError::io)?;

        let status = response.status();
        let reason = status.canonical_reason().unwrap_or_default().to_string();
        // Failed responses are reported by status alone.
        let body = if status.is_success() {
            response
                .body_mut()
                .read_to_string()
                .map_err(TransportError::io)?
        } else {
            String::new()
        };

        Ok(HttpResponse {
            status: status.as_u16(),
            reason,
            body,
        })
    }
}
