//! Parser and request builder for reqline, a one-line HTTP request DSL.
//!
//! # Overview
//! `HTTP POST | URL https://api.test/items | HEADERS {...} | QUERY {...} | BODY {...}`
//! is parsed into a [`ParsedRequest`], or rejected with a [`ValidationError`]
//! naming the first rule it broke. A parsed request is then turned into a
//! plain-data [`HttpRequest`] without touching the network (host-does-IO
//! pattern); the host executes it and hands the [`HttpResponse`] back to
//! [`parse_response`] for an [`ExecutionReport`].
//!
//! # Design
//! - Parsing is a pure function. No state survives between calls.
//! - The grammar is implemented once; [`Report`] strategies decide whether a
//!   rejection comes back as a `Result` or as a log event.
//! - Validation failures and post-parse failures are separate types sharing
//!   one [`ErrorKind`] tag, so hosts can map them to different statuses.

pub mod client;
pub mod error;
pub mod http;
pub mod parser;
pub mod report;
pub mod types;

pub use client::{build_request, parse_response, PreparedRequest};
pub use error::{DispatchError, ErrorKind, ValidationCode, ValidationError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Timing};
pub use parser::{parse, parse_value, parse_with, Keyword, Reqline};
pub use report::{Collect, Logged, Report};
pub use types::{ExecutionReport, ParsedRequest, RequestSummary, ResponseSummary};
