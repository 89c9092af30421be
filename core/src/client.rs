//! Stateless request builder and response parser for parsed reqlines.
//!
//! # Design
//! Each round-trip is split into [`build_request`], which turns a
//! `ParsedRequest` into an `HttpRequest`, and [`parse_response`], which turns
//! the host's `HttpResponse` into an `ExecutionReport`. The host executes the
//! request and measures timing in between, keeping the core deterministic and
//! free of I/O dependencies.
//!
//! The grammar accepts any JSON literal in a section. Building a request is
//! where shape matters: `HEADERS` and `QUERY` must be objects here, and
//! anything else is a [`DispatchError::Shape`], an internal failure rather
//! than a validation one.

use serde_json::{Map, Value};
use tracing::debug;
use url::Url;

use crate::error::DispatchError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Timing};
use crate::types::{ExecutionReport, ParsedRequest, RequestSummary, ResponseSummary};

const CONTENT_TYPE: &str = "content-type";
const APPLICATION_JSON: &str = "application/json";

/// A parsed reqline together with the concrete request built from it.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
    pub parsed: ParsedRequest,
    pub http: HttpRequest,
}

impl PreparedRequest {
    /// The fully qualified URL, query string included.
    pub fn full_url(&self) -> &str {
        &self.http.url
    }
}

/// Build the outbound request for `parsed`.
///
/// Query entries are appended to the URL in the order they were written, each
/// value coerced to text. `POST` carries the body as JSON; `GET` carries none.
pub fn build_request(parsed: &ParsedRequest) -> Result<PreparedRequest, DispatchError> {
    let mut url = Url::parse(&parsed.url).map_err(|source| DispatchError::InvalidUrl {
        url: parsed.url.clone(),
        source,
    })?;

    let query = object_of("QUERY", &parsed.query)?;
    if !query.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in query {
            pairs.append_pair(key, &text_of(value));
        }
    }

    let mut headers: Vec<(String, String)> = object_of("HEADERS", &parsed.headers)?
        .iter()
        .map(|(name, value)| (name.clone(), text_of(value)))
        .collect();

    let body = match parsed.method {
        HttpMethod::Get => None,
        HttpMethod::Post => {
            if !headers.iter().any(|(name, _)| name.eq_ignore_ascii_case(CONTENT_TYPE)) {
                headers.push((CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string()));
            }
            Some(serde_json::to_string(&parsed.body)?)
        }
    };

    let http = HttpRequest {
        method: parsed.method,
        url: url.into(),
        headers,
        body,
    };
    debug!(method = %http.method, url = %http.url, headers = http.headers.len(), "built request");

    Ok(PreparedRequest {
        parsed: parsed.clone(),
        http,
    })
}

/// Interpret the host's response to a request built by [`build_request`].
pub fn parse_response(
    prepared: &PreparedRequest,
    response: HttpResponse,
    timing: Timing,
) -> Result<ExecutionReport, DispatchError> {
    if !(200..300).contains(&response.status) {
        return Err(DispatchError::UpstreamStatus {
            status: response.status,
            body: response.body,
        });
    }

    let response_data = if response.body.is_empty() {
        Value::Null
    } else {
        match serde_json::from_str(&response.body) {
            Ok(value) => value,
            Err(_) => Value::String(response.body),
        }
    };

    let parsed = &prepared.parsed;
    Ok(ExecutionReport {
        request: RequestSummary {
            query: parsed.query.clone(),
            body: parsed.body.clone(),
            headers: parsed.headers.clone(),
            full_url: prepared.http.url.clone(),
        },
        response: ResponseSummary {
            http_status: response.status,
            duration: timing.duration_ms(),
            request_start_timestamp: timing.start_ms,
            request_stop_timestamp: timing.stop_ms,
            response_data,
        },
    })
}

fn object_of<'v>(
    section: &'static str,
    value: &'v Value,
) -> Result<&'v Map<String, Value>, DispatchError> {
    value.as_object().ok_or(DispatchError::Shape {
        section,
        found: shape_name(value),
    })
}

fn shape_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Strings are used verbatim; everything else as its compact JSON text.
fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
