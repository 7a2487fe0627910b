//! Executes `HttpRequest` values against the network.
//!
//! # Design
//! `Transport` is the single I/O seam of the crate. `UreqTransport` is the
//! blocking implementation used by `Store::connect`; tests substitute a fake
//! that records requests and replays canned responses.

use std::fmt;
use std::time::Duration;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Performs one HTTP round-trip.
///
/// Implementations return non-2xx responses as `Ok` so the client can
/// interpret the status; `Err` means no response was obtained.
pub trait Transport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request)
    }
}

/// Blocking transport backed by a ureq agent.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    /// `timeout` bounds each whole request; `None` waits indefinitely.
    pub fn new(timeout: Option<Duration>) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("UreqTransport")
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let agent = &self.agent;
        let path = request.path.as_str();
        let headers = &request.headers;

        let result = match (request.method, request.body) {
            (HttpMethod::Get, _) => with_headers(agent.get(path), headers).call(),
            (HttpMethod::Delete, _) => with_headers(agent.delete(path), headers).call(),
            (HttpMethod::Post, Some(body)) => {
                with_headers(agent.post(path), headers).send(body.as_bytes())
            }
            (HttpMethod::Post, None) => with_headers(agent.post(path), headers).send_empty(),
            (HttpMethod::Patch, Some(body)) => {
                with_headers(agent.patch(path), headers).send(body.as_bytes())
            }
            (HttpMethod::Patch, None) => with_headers(agent.patch(path), headers).send_empty(),
        };
        let mut response = result.map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                let value = value.to_str().ok()?;
                Some((name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// Copy the request's headers onto a ureq builder, in order.
fn with_headers<B>(
    builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    headers.iter().fold(builder, |builder, (name, value)| {
        builder.header(name.as_str(), value.as_str())
    })
}
