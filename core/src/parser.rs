//! The reqline grammar.
//!
//! A reqline is one line of the form
//!
//! ```text
//! HTTP GET | URL https://example.com | HEADERS {"a":"b"} | QUERY {"q":1} | BODY {}
//! ```
//!
//! # Design
//! Validation is a fixed sequence of guards followed by a per-section decode
//! loop. The order of the guards is observable: the first failing check names
//! the error, so e.g. a lowercase method behind a broken `HTTP` prefix reports
//! the casing problem. All of it lives in [`validate`]; the public entry points
//! only choose how the outcome is reported.

use std::collections::HashSet;

use serde_json::Value;
use tracing::trace;

use crate::error::ValidationError;
use crate::http::HttpMethod;
use crate::report::{Collect, Report};
use crate::types::ParsedRequest;

/// Separator between sections. Exactly one space on each side of the pipe.
pub const DELIMITER: &str = " | ";

const HTTP_PREFIX: &str = "HTTP ";
const URL_PREFIX: &str = "URL ";

/// Optional section keywords, in the order they are documented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Headers,
    Query,
    Body,
}

impl Keyword {
    pub const ALL: [Keyword; 3] = [Keyword::Headers, Keyword::Query, Keyword::Body];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Headers => "HEADERS",
            Self::Query => "QUERY",
            Self::Body => "BODY",
        }
    }

    fn lookup(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == token)
    }
}

/// Anything a reqline can arrive as.
///
/// `Json` is the raw `reqline` member of a request body: it may be absent,
/// `null`, or not a string at all, and those cases are part of the grammar.
#[derive(Debug, Clone, Copy)]
pub enum Reqline<'a> {
    Text(&'a str),
    Json(Option<&'a Value>),
}

impl<'a> From<&'a str> for Reqline<'a> {
    fn from(line: &'a str) -> Self {
        Reqline::Text(line)
    }
}

impl<'a> From<Option<&'a Value>> for Reqline<'a> {
    fn from(value: Option<&'a Value>) -> Self {
        Reqline::Json(value)
    }
}

impl<'a> From<&'a Value> for Reqline<'a> {
    fn from(value: &'a Value) -> Self {
        Reqline::Json(Some(value))
    }
}

/// Parse a reqline into a [`ParsedRequest`].
pub fn parse(line: &str) -> Result<ParsedRequest, ValidationError> {
    parse_with(line, &mut Collect)
}

/// Parse the `reqline` member of a JSON request body.
///
/// Absent, `null`, `""`, `false` and `0` are reported as a missing reqline;
/// any other non-string value as `NOT_A_STRING`.
pub fn parse_value(input: Option<&Value>) -> Result<ParsedRequest, ValidationError> {
    parse_with(input, &mut Collect)
}

/// Validate `input` and hand the outcome to `reporter`.
pub fn parse_with<'a, R: Report>(input: impl Into<Reqline<'a>>, reporter: &mut R) -> R::Output {
    match validate(input.into()) {
        Ok(parsed) => reporter.accept(parsed),
        Err(err) => reporter.reject(err),
    }
}

fn validate(input: Reqline<'_>) -> Result<ParsedRequest, ValidationError> {
    let line = match input {
        Reqline::Text(line) => line,
        Reqline::Json(value) => text_of(value)?,
    };
    if line.is_empty() {
        return Err(ValidationError::missing_reqline());
    }

    let pipes = line.matches('|').count();
    let delimiters = line.matches(DELIMITER).count();
    if pipes == 0 || delimiters == 0 {
        return Err(ValidationError::missing_delimiter());
    }
    if pipes != delimiters {
        return Err(ValidationError::bad_pipe_spacing());
    }

    let sections: Vec<&str> = line.split(DELIMITER).collect();
    let [method_section, url_section, keyword_sections @ ..] = sections.as_slice() else {
        return Err(ValidationError::missing_delimiter());
    };
    trace!(sections = sections.len(), "split reqline");

    // Both are read at their fixed offsets before the prefixes are checked.
    let method = skip_chars(method_section, HTTP_PREFIX.len()).trim();
    let url = skip_chars(url_section, URL_PREFIX.len()).trim();

    if method != method.to_uppercase() {
        return Err(ValidationError::method_not_uppercase());
    }
    if !method_section.starts_with(HTTP_PREFIX) {
        return Err(ValidationError::missing_http_keyword());
    }
    if !url_section.starts_with(URL_PREFIX) {
        return Err(ValidationError::missing_url_keyword());
    }
    let method = HttpMethod::from_token(method).ok_or_else(ValidationError::unsupported_method)?;

    if line.contains("  ") {
        return Err(ValidationError::double_space());
    }

    let mut parsed = ParsedRequest::new(method, url);
    let mut seen = HashSet::new();
    for section in keyword_sections {
        let Some((keyword, value_text)) = section.split_once(' ') else {
            return Err(ValidationError::missing_keyword_space());
        };
        if !seen.insert(keyword) {
            return Err(ValidationError::duplicate_keyword(keyword));
        }
        if keyword != keyword.to_uppercase() {
            return Err(ValidationError::keyword_not_uppercase());
        }
        let keyword = Keyword::lookup(keyword).ok_or_else(|| ValidationError::unknown_keyword(keyword))?;
        let value: Value = serde_json::from_str(value_text.trim())
            .map_err(|_| ValidationError::invalid_section_literal(keyword.as_str()))?;
        match keyword {
            Keyword::Headers => parsed.headers = value,
            Keyword::Query => parsed.query = value,
            Keyword::Body => parsed.body = value,
        }
    }

    Ok(parsed)
}

fn text_of(value: Option<&Value>) -> Result<&str, ValidationError> {
    let value = match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => {
            return Err(ValidationError::missing_reqline())
        }
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => {
            return Err(ValidationError::missing_reqline())
        }
        Some(value) => value,
    };
    value.as_str().ok_or_else(ValidationError::not_a_string)
}

/// Substring from the `n`th character; empty when the text is shorter.
fn skip_chars(text: &str, n: usize) -> &str {
    text.char_indices().nth(n).map_or("", |(at, _)| &text[at..])
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::error::ValidationCode;

    fn code_of(line: &str) -> ValidationCode {
        parse(line).unwrap_err().code
    }

    #[test]
    fn minimal_get_defaults_every_section() {
        let parsed = parse("HTTP GET | URL http://x").unwrap();
        assert_eq!(parsed.method, HttpMethod::Get);
        assert_eq!(parsed.url, "http://x");
        assert_eq!(parsed.headers, json!({}));
        assert_eq!(parsed.query, json!({}));
        assert_eq!(parsed.body, json!({}));
    }

    #[test]
    fn all_sections_decode_in_place() {
        let parsed = parse(
            r#"HTTP POST | URL https://dummyjson.com/products | HEADERS {"x-id":"7"} | QUERY {"refid":1920933} | BODY {"name":"pen","tags":["a"]}"#,
        )
        .unwrap();
        assert_eq!(parsed.method, HttpMethod::Post);
        assert_eq!(parsed.url, "https://dummyjson.com/products");
        assert_eq!(parsed.headers, json!({"x-id": "7"}));
        assert_eq!(parsed.query, json!({"refid": 1920933}));
        assert_eq!(parsed.body, json!({"name": "pen", "tags": ["a"]}));
    }

    #[test]
    fn sections_may_appear_in_any_order() {
        let parsed = parse(r#"HTTP GET | URL http://x | BODY [1] | QUERY {"a":"b"}"#).unwrap();
        assert_eq!(parsed.body, json!([1]));
        assert_eq!(parsed.query, json!({"a": "b"}));
        assert_eq!(parsed.headers, json!({}));
    }

    #[test]
    fn non_object_literals_are_accepted() {
        let parsed = parse(r#"HTTP GET | URL http://x | HEADERS "text" | QUERY 3 | BODY null"#).unwrap();
        assert_eq!(parsed.headers, json!("text"));
        assert_eq!(parsed.query, json!(3));
        assert_eq!(parsed.body, Value::Null);
    }

    #[rstest]
    #[case("", ValidationCode::MissingReqline)]
    #[case("HTTP GET URL http://x", ValidationCode::MissingDelimiter)]
    #[case("HTTP GET |URL http://x", ValidationCode::MissingDelimiter)]
    #[case("HTTP GET|URL http://x", ValidationCode::MissingDelimiter)]
    #[case("HTTP GET | URL http://x |BODY {}", ValidationCode::BadPipeSpacing)]
    #[case("HTTP GET | URL http://x| BODY {}", ValidationCode::BadPipeSpacing)]
    #[case("HTTP get | URL http://x", ValidationCode::MethodNotUppercase)]
    #[case("GET | URL http://x", ValidationCode::MissingHttpKeyword)]
    #[case("HTTP GET | http://x", ValidationCode::MissingUrlKeyword)]
    #[case("HTTP PUT | URL http://x", ValidationCode::UnsupportedMethod)]
    #[case("HTTP  GET | URL http://x", ValidationCode::DoubleSpace)]
    #[case("HTTP GET | URL http://x  ", ValidationCode::DoubleSpace)]
    #[case("HTTP GET | URL http://x | HEADERS", ValidationCode::MissingKeywordSpace)]
    #[case(r#"HTTP GET | URL http://x | HEADERS {"a":1} | HEADERS {"b":2}"#, ValidationCode::DuplicateKeyword)]
    #[case("HTTP GET | URL http://x | headers {}", ValidationCode::KeywordNotUppercase)]
    #[case("HTTP GET | URL http://x | COOKIES {}", ValidationCode::UnknownKeyword)]
    #[case("HTTP GET | URL http://x | QUERY {invalid}", ValidationCode::InvalidSectionLiteral)]
    #[case("HTTP GET | URL http://x | BODY ", ValidationCode::InvalidSectionLiteral)]
    fn rejects_with_code(#[case] line: &str, #[case] expected: ValidationCode) {
        assert_eq!(code_of(line), expected);
    }

    #[test]
    fn single_pipe_needs_both_spaces() {
        // "HTTP GET|URL" has a pipe but no padded delimiter at all.
        assert_eq!(code_of("HTTP GET|URL http://x"), ValidationCode::MissingDelimiter);
        // With one good delimiter the stray pipe is a spacing error instead.
        assert_eq!(
            code_of("HTTP GET | URL http://x|y"),
            ValidationCode::BadPipeSpacing
        );
    }

    #[test]
    fn casing_is_checked_before_the_http_prefix() {
        assert_eq!(code_of("XTTP get | URL http://x"), ValidationCode::MethodNotUppercase);
        assert_eq!(code_of("XTTP GET | URL http://x"), ValidationCode::MissingHttpKeyword);
    }

    #[test]
    fn method_is_read_at_a_fixed_offset() {
        // Offset 5 of "HTTPGET" is "ET", which is uppercase; the prefix check fires.
        assert_eq!(code_of("HTTPGET | URL http://x"), ValidationCode::MissingHttpKeyword);
        // Too short to reach the offset at all: empty method, then prefix check.
        assert_eq!(code_of("GET | URL http://x"), ValidationCode::MissingHttpKeyword);
    }

    #[test]
    fn unsupported_method_beats_double_space() {
        assert_eq!(
            code_of("HTTP PUT | URL http://x  y"),
            ValidationCode::UnsupportedMethod
        );
    }

    #[test]
    fn duplicate_is_reported_before_decoding() {
        assert_eq!(
            code_of("HTTP GET | URL http://x | HEADERS {} | HEADERS {bad}"),
            ValidationCode::DuplicateKeyword
        );
        // The first occurrence is fully checked before a second can be seen.
        assert_eq!(
            code_of("HTTP GET | URL http://x | foo 1 | foo 2"),
            ValidationCode::KeywordNotUppercase
        );
    }

    #[test]
    fn first_bad_section_wins() {
        assert_eq!(
            code_of("HTTP GET | URL http://x | QUERY {bad} | NOPE {}"),
            ValidationCode::InvalidSectionLiteral
        );
    }

    #[test]
    fn invalid_literal_names_the_keyword() {
        let err = parse("HTTP GET | URL http://x | QUERY {invalid}").unwrap_err();
        assert_eq!(err.message, "Invalid JSON format in QUERY section");
    }

    #[test]
    fn value_text_is_trimmed_after_the_first_space() {
        let parsed = parse("HTTP GET | URL http://x | BODY {\"a\": [1, 2]}\t").unwrap();
        assert_eq!(parsed.body, json!({"a": [1, 2]}));
    }

    #[test]
    fn url_is_not_validated() {
        let parsed = parse("HTTP GET | URL not a url").unwrap();
        assert_eq!(parsed.url, "not a url");
    }

    #[test]
    fn non_ascii_text_does_not_split_characters() {
        let err = parse("HTTP ГЕТ | URL http://x").unwrap_err();
        assert_eq!(err.code, ValidationCode::UnsupportedMethod);
        let err = parse("Ω | URL http://x").unwrap_err();
        assert_eq!(err.code, ValidationCode::MissingHttpKeyword);
    }

    #[test]
    fn parsing_twice_gives_identical_results() {
        let line = r#"HTTP GET | URL http://x | HEADERS {"a":1}"#;
        assert_eq!(parse(line).unwrap(), parse(line).unwrap());
        // A rejected duplicate in one call does not leak into the next.
        let dup = r#"HTTP GET | URL http://x | HEADERS {} | HEADERS {}"#;
        assert!(parse(dup).is_err());
        assert!(parse(line).is_ok());
    }

    #[rstest]
    #[case(None)]
    #[case(Some(json!(null)))]
    #[case(Some(json!("")))]
    #[case(Some(json!(false)))]
    #[case(Some(json!(0)))]
    fn falsy_values_are_missing(#[case] input: Option<Value>) {
        let err = parse_value(input.as_ref()).unwrap_err();
        assert_eq!(err.code, ValidationCode::MissingReqline);
        assert_eq!(err.message, "Missing 'reqline' in request body");
    }

    #[rstest]
    #[case(json!(42))]
    #[case(json!(true))]
    #[case(json!(["HTTP GET | URL http://x"]))]
    #[case(json!({"line": "HTTP GET | URL http://x"}))]
    fn non_strings_are_rejected(#[case] input: Value) {
        let err = parse_value(Some(&input)).unwrap_err();
        assert_eq!(err.code, ValidationCode::NotAString);
    }

    #[test]
    fn json_string_parses_like_text() {
        let input = json!("HTTP POST | URL http://x | BODY {\"k\":true}");
        let parsed = parse_value(Some(&input)).unwrap();
        assert_eq!(parsed.method, HttpMethod::Post);
        assert_eq!(parsed.body, json!({"k": true}));
    }
}
