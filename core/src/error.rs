//! Error types for reqline parsing and dispatch.
//!
//! # Design
//! Two families, one classification tag. `ValidationError` covers every way a
//! reqline can fail the grammar: a deterministic function of the input text,
//! never retried. `DispatchError` covers faults that happen after a reqline
//! parsed cleanly (shape mismatches, bad URLs, upstream failures) and is
//! always classified as internal. Callers branch on [`ErrorKind`] to choose a
//! transport-level status; nothing in this crate assigns status codes.

use std::fmt;

use thiserror::Error;

/// Classification tag shared by every error this crate returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The reqline text violated the grammar.
    Validation,
    /// Something failed after the reqline was accepted.
    Internal,
}

/// Which grammar check rejected a reqline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationCode {
    MissingReqline,
    NotAString,
    MissingDelimiter,
    BadPipeSpacing,
    MethodNotUppercase,
    MissingHttpKeyword,
    MissingUrlKeyword,
    UnsupportedMethod,
    DoubleSpace,
    MissingKeywordSpace,
    DuplicateKeyword,
    KeywordNotUppercase,
    UnknownKeyword,
    InvalidSectionLiteral,
}

impl ValidationCode {
    /// Stable upper-snake identifier, as used in test vectors and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingReqline => "MISSING_REQLINE",
            Self::NotAString => "NOT_A_STRING",
            Self::MissingDelimiter => "MISSING_DELIMITER",
            Self::BadPipeSpacing => "BAD_PIPE_SPACING",
            Self::MethodNotUppercase => "METHOD_NOT_UPPERCASE",
            Self::MissingHttpKeyword => "MISSING_HTTP_KEYWORD",
            Self::MissingUrlKeyword => "MISSING_URL_KEYWORD",
            Self::UnsupportedMethod => "UNSUPPORTED_METHOD",
            Self::DoubleSpace => "DOUBLE_SPACE",
            Self::MissingKeywordSpace => "MISSING_KEYWORD_SPACE",
            Self::DuplicateKeyword => "DUPLICATE_KEYWORD",
            Self::KeywordNotUppercase => "KEYWORD_NOT_UPPERCASE",
            Self::UnknownKeyword => "UNKNOWN_KEYWORD",
            Self::InvalidSectionLiteral => "INVALID_SECTION_LITERAL",
        }
    }
}

impl fmt::Display for ValidationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reqline that failed one of the grammar checks.
///
/// `message` is the human-readable text surfaced to clients verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub code: ValidationCode,
    pub message: String,
}

impl ValidationError {
    pub(crate) fn new(code: ValidationCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Validation
    }

    pub(crate) fn missing_reqline() -> Self {
        Self::new(ValidationCode::MissingReqline, "Missing 'reqline' in request body")
    }

    pub(crate) fn not_a_string() -> Self {
        Self::new(ValidationCode::NotAString, "Reqline must be a string")
    }

    pub(crate) fn missing_delimiter() -> Self {
        Self::new(ValidationCode::MissingDelimiter, "Missing Delimiter")
    }

    pub(crate) fn bad_pipe_spacing() -> Self {
        Self::new(
            ValidationCode::BadPipeSpacing,
            "Invalid spacing around pipe delimiter",
        )
    }

    pub(crate) fn method_not_uppercase() -> Self {
        Self::new(
            ValidationCode::MethodNotUppercase,
            "HTTP method must be uppercase",
        )
    }

    pub(crate) fn missing_http_keyword() -> Self {
        Self::new(
            ValidationCode::MissingHttpKeyword,
            "Missing required HTTP keyword",
        )
    }

    pub(crate) fn missing_url_keyword() -> Self {
        Self::new(
            ValidationCode::MissingUrlKeyword,
            "Missing required URL keyword",
        )
    }

    pub(crate) fn unsupported_method() -> Self {
        Self::new(
            ValidationCode::UnsupportedMethod,
            "Invalid HTTP method. Only GET and POST are supported",
        )
    }

    pub(crate) fn double_space() -> Self {
        Self::new(
            ValidationCode::DoubleSpace,
            "Multiple spaces found where single space expected",
        )
    }

    pub(crate) fn missing_keyword_space() -> Self {
        Self::new(
            ValidationCode::MissingKeywordSpace,
            "Missing space after keyword",
        )
    }

    pub(crate) fn duplicate_keyword(keyword: &str) -> Self {
        Self::new(
            ValidationCode::DuplicateKeyword,
            format!("Duplicate keyword found: {keyword}"),
        )
    }

    pub(crate) fn keyword_not_uppercase() -> Self {
        Self::new(
            ValidationCode::KeywordNotUppercase,
            "Keywords must be uppercase",
        )
    }

    pub(crate) fn unknown_keyword(keyword: &str) -> Self {
        Self::new(
            ValidationCode::UnknownKeyword,
            format!("Invalid keyword: {keyword}. Only HEADERS, QUERY, BODY are allowed"),
        )
    }

    pub(crate) fn invalid_section_literal(keyword: &str) -> Self {
        Self::new(
            ValidationCode::InvalidSectionLiteral,
            format!("Invalid JSON format in {keyword} section"),
        )
    }
}

/// Errors raised while turning an accepted reqline into an outbound request,
/// or while interpreting the upstream response.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// A section decoded to a value the request cannot be built from, e.g.
    /// `QUERY [1,2]` where key/value pairs are required.
    #[error("{section} must be a JSON object, found {found}")]
    Shape {
        section: &'static str,
        found: &'static str,
    },

    /// The URL section is not an absolute URL.
    #[error("invalid url {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The request body could not be serialized.
    #[error("failed to serialize request body: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The upstream answered with a non-2xx status.
    #[error("upstream returned HTTP {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    /// The host could not complete the round-trip.
    #[error("transport failed: {0}")]
    Transport(String),
}

impl DispatchError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Internal
    }
}
