//! Domain DTOs for reqline.
//!
//! # Design
//! `ParsedRequest` is the parser's only output. The section values stay as
//! `serde_json::Value` because the grammar accepts any JSON literal; shape is
//! checked later, when a request is built from them. `ExecutionReport` is the
//! JSON document the service returns after a round-trip.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::http::HttpMethod;

/// The structured descriptor produced from one reqline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedRequest {
    pub method: HttpMethod,
    pub url: String,
    #[serde(default = "empty_object")]
    pub headers: Value,
    #[serde(default = "empty_object")]
    pub query: Value,
    #[serde(default = "empty_object")]
    pub body: Value,
}

impl ParsedRequest {
    /// A descriptor with every optional section defaulted to `{}`.
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: empty_object(),
            query: empty_object(),
            body: empty_object(),
        }
    }
}

pub(crate) fn empty_object() -> Value {
    Value::Object(Map::new())
}

/// What was sent upstream, echoed back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestSummary {
    pub query: Value,
    pub body: Value,
    pub headers: Value,
    pub full_url: String,
}

/// What came back, with host-measured timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseSummary {
    pub http_status: u16,
    pub duration: u64,
    pub request_start_timestamp: u64,
    pub request_stop_timestamp: u64,
    pub response_data: Value,
}

/// The full result of executing a reqline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionReport {
    pub request: RequestSummary,
    pub response: ResponseSummary,
}
