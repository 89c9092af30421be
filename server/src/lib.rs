//! HTTP service that executes reqlines.
//!
//! # Overview
//! `POST /` with `{"reqline": "HTTP GET | URL https://... | QUERY {...}"}`
//! parses the line, performs the described request and answers with what was
//! sent and what came back:
//!
//! ```json
//! {
//!   "request": { "query": {}, "body": {}, "headers": {}, "full_url": "..." },
//!   "response": {
//!     "http_status": 200, "duration": 42,
//!     "request_start_timestamp": 1700000000000,
//!     "request_stop_timestamp": 1700000000042,
//!     "response_data": {}
//!   }
//! }
//! ```
//!
//! # Design
//! - Parsing, request building and response interpretation live in
//!   `reqline-core`; this crate only owns I/O, timing and status mapping.
//! - The outbound call goes through a [`Transport`] held in the router state,
//!   run on the blocking pool.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod transport;

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use reqline_core::{
    build_request, parse_response, parse_value, DispatchError, ExecutionReport, Timing,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tracing::info;

pub use config::{Config, LogFormat};
pub use error::{ApiError, ErrorBody, ServeError};
pub use transport::{Transport, TransportError, UreqTransport};

/// Shared router state.
#[derive(Clone)]
pub struct AppState {
    transport: Arc<dyn Transport>,
}

impl AppState {
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(UreqTransport::new(config.timeout()))
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", post(execute_reqline))
        .route("/health", get(health))
        .with_state(state)
}

pub async fn run(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    axum::serve(listener, app(state)).await
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn execute_reqline(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<Json<ExecutionReport>, ApiError> {
    let parsed = parse_value(payload.get("reqline"))?;
    let prepared = build_request(&parsed)?;

    let transport = Arc::clone(&state.transport);
    let request = prepared.http.clone();
    let start_ms = now_ms();
    let response = tokio::task::spawn_blocking(move || transport.execute(&request))
        .await
        .map_err(|err| DispatchError::Transport(err.to_string()))?
        .map_err(|err| DispatchError::Transport(err.to_string()))?;
    let timing = Timing {
        start_ms,
        stop_ms: now_ms(),
    };

    let report = parse_response(&prepared, response, timing)?;
    info!(
        method = %prepared.http.method,
        url = %prepared.full_url(),
        status = report.response.http_status,
        duration_ms = report.response.duration,
        "reqline executed"
    );
    Ok(Json(report))
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or_default()
}
