//! Reporting strategies for parse outcomes.
//!
//! The grammar is checked in one place; a [`Report`] decides what the caller
//! receives. `Collect` hands back a plain `Result`, `Logged` turns rejections
//! into `tracing` events for callers that only care about accepted lines.

use tracing::{debug, warn};

use crate::error::ValidationError;
use crate::types::ParsedRequest;

/// Receives the outcome of one parse.
pub trait Report {
    type Output;

    fn accept(&mut self, parsed: ParsedRequest) -> Self::Output;

    fn reject(&mut self, error: ValidationError) -> Self::Output;
}

/// Returns the outcome as a `Result`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Collect;

impl Report for Collect {
    type Output = Result<ParsedRequest, ValidationError>;

    fn accept(&mut self, parsed: ParsedRequest) -> Self::Output {
        Ok(parsed)
    }

    fn reject(&mut self, error: ValidationError) -> Self::Output {
        Err(error)
    }
}

/// Logs rejections at `warn` and keeps only accepted requests.
///
/// Counts what it has seen so batch callers can summarise a run.
#[derive(Debug, Default, Clone, Copy)]
pub struct Logged {
    pub accepted: usize,
    pub rejected: usize,
}

impl Report for Logged {
    type Output = Option<ParsedRequest>;

    fn accept(&mut self, parsed: ParsedRequest) -> Self::Output {
        self.accepted += 1;
        debug!(method = %parsed.method, url = %parsed.url, "reqline accepted");
        Some(parsed)
    }

    fn reject(&mut self, error: ValidationError) -> Self::Output {
        self.rejected += 1;
        warn!(code = %error.code, message = %error.message, "reqline rejected");
        None
    }
}
