//! Outbound HTTP execution.
//!
//! The core never performs I/O; the service executes each built request
//! through a [`Transport`]. `UreqTransport` is the production implementation.
//! Tests swap in an in-memory one.

use std::time::Duration;

use reqline_core::{HttpMethod, HttpRequest, HttpResponse};
use thiserror::Error;
use tracing::debug;

/// Errors raised while executing a request.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Ureq(#[from] ureq::Error),
}

/// Executes a plain-data request and returns the plain-data response.
///
/// Implementations block; the service calls them from a blocking task.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Blocking transport backed by a shared ureq agent.
///
/// Non-2xx responses come back as data so status interpretation stays in
/// the core.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        debug!(method = %request.method, url = %request.url, "executing request");

        let mut response = match request.method {
            HttpMethod::Get => {
                let mut builder = self.agent.get(&request.url);
                for (name, value) in &request.headers {
                    builder = builder.header(name, value);
                }
                builder.call()?
            }
            HttpMethod::Post => {
                let mut builder = self.agent.post(&request.url);
                for (name, value) in &request.headers {
                    builder = builder.header(name, value);
                }
                match &request.body {
                    Some(body) => builder.send(body.as_bytes())?,
                    None => builder.send_empty()?,
                }
            }
        };

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
        let body = response.body_mut().read_to_string()?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
