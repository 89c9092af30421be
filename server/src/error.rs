//! Error types for the service and their HTTP mapping.
//!
//! # Design
//! Validation failures are echoed to the client verbatim. Anything that
//! fails after a reqline was accepted is logged with its cause and answered
//! with a fixed message, so upstream details never leak to the caller.

use std::io;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use reqline_core::{DispatchError, ErrorKind, ValidationError};
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::telemetry::TelemetryError;

pub(crate) const UNEXPECTED_MESSAGE: &str = "An unexpected error occurred.";

/// Failure of a single `POST /` call.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(err) => err.kind(),
            Self::Dispatch(err) => err.kind(),
        }
    }
}

/// JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: bool,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match self.kind() {
            ErrorKind::Validation => {
                warn!(error = %self, "reqline rejected");
                self.to_string()
            }
            ErrorKind::Internal => {
                warn!(error = %self, "reqline dispatch failed");
                UNEXPECTED_MESSAGE.to_string()
            }
        };
        // Both kinds are answered as client errors; the kind only decides
        // whether the message is passed through.
        let body = ErrorBody {
            error: true,
            message,
        };
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

/// Fatal errors of the binary.
#[derive(Debug, Error)]
pub enum ServeError {
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),

    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
