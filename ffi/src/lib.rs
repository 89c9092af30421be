//! C-ABI wrapper around `reqline-core`.
//!
//! # Overview
//! Exposes reqline parsing and request building through `extern "C"`
//! functions so any language with a C FFI can validate reqlines and obtain
//! executable requests without linking to serde or an async runtime.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - A single `FfiResult` envelope with `FfiDataTag` + `void* data`
//!   conveys success payloads and errors uniformly.
//! - The C caller owns all returned pointers and must release them with
//!   `reqline_free_result`.

pub mod types;

use std::ffi::CStr;
use std::os::raw::c_char;
use std::panic::catch_unwind;

use types::*;

/// Borrow a C string argument as `&str`, or produce the error result to
/// return instead.
fn read_arg<'a>(ptr: *const c_char, name: &str) -> Result<&'a str, *mut FfiResult> {
    if ptr.is_null() {
        return Err(FfiResult::null_arg(name));
    }
    unsafe { CStr::from_ptr(ptr) }
        .to_str()
        .map_err(|_| FfiResult::invalid_utf8(name))
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Parse a reqline.
///
/// Returns a result with `data_tag = ParsedRequest` on success, or
/// `error_code = Validation` with `validation_code` set.
#[unsafe(no_mangle)]
pub extern "C" fn reqline_parse(line: *const c_char) -> *mut FfiResult {
    catch_unwind(|| {
        let line = match read_arg(line, "line") {
            Ok(line) => line,
            Err(result) => return result,
        };
        match reqline_core::parse(line) {
            Ok(parsed) => FfiResult::ok_parsed(parsed),
            Err(e) => FfiResult::from_validation(e),
        }
    })
    .unwrap_or_else(|_| FfiResult::panic("panic in reqline_parse"))
}

/// Parse a reqline and build the request it describes.
///
/// Returns a result with `data_tag = HttpRequest` on success. A reqline that
/// parses but cannot be turned into a request (non-object `QUERY`, relative
/// URL) yields `error_code = Internal`.
#[unsafe(no_mangle)]
pub extern "C" fn reqline_build_request(line: *const c_char) -> *mut FfiResult {
    catch_unwind(|| {
        let line = match read_arg(line, "line") {
            Ok(line) => line,
            Err(result) => return result,
        };
        let parsed = match reqline_core::parse(line) {
            Ok(parsed) => parsed,
            Err(e) => return FfiResult::from_validation(e),
        };
        match reqline_core::build_request(&parsed) {
            Ok(prepared) => FfiResult::ok_request(prepared.http),
            Err(e) => FfiResult::from_dispatch(e),
        }
    })
    .unwrap_or_else(|_| FfiResult::panic("panic in reqline_build_request"))
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiResult` returned by any `reqline_*` function.
/// Safe to call with null. Uses `data_tag` to determine what `data` points to.
#[unsafe(no_mangle)]
pub extern "C" fn reqline_free_result(result: *mut FfiResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        free_c_string(result.validation_code);
        free_c_string(result.error_message);
        if !result.data.is_null() {
            match result.data_tag {
                FfiDataTag::ParsedRequest => {
                    let parsed = unsafe { Box::from_raw(result.data as *mut FfiParsedRequest) };
                    parsed.free_fields();
                }
                FfiDataTag::HttpRequest => {
                    let req = unsafe { Box::from_raw(result.data as *mut FfiHttpRequest) };
                    req.free_fields();
                }
                FfiDataTag::None => {}
            }
        }
    });
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;

    fn c_str<'a>(ptr: *const c_char) -> &'a str {
        unsafe { CStr::from_ptr(ptr) }.to_str().unwrap()
    }

    #[test]
    fn parse_minimal_get() {
        let line = CString::new("HTTP GET | URL http://x").unwrap();
        let result = reqline_parse(line.as_ptr());
        let result_ref = unsafe { &*result };
        assert_eq!(result_ref.error_code, FfiErrorCode::Ok);
        assert_eq!(result_ref.data_tag, FfiDataTag::ParsedRequest);
        assert!(result_ref.error_message.is_null());

        let parsed = unsafe { &*(result_ref.data as *const FfiParsedRequest) };
        assert_eq!(parsed.method, FfiHttpMethod::Get);
        assert_eq!(c_str(parsed.url), "http://x");
        assert_eq!(c_str(parsed.headers_json), "{}");
        assert_eq!(c_str(parsed.query_json), "{}");
        assert_eq!(c_str(parsed.body_json), "{}");

        reqline_free_result(result);
    }

    #[test]
    fn parse_keeps_section_json() {
        let line = CString::new(r#"HTTP POST | URL http://x | BODY {"b":[1,2]}"#).unwrap();
        let result = reqline_parse(line.as_ptr());
        let result_ref = unsafe { &*result };
        let parsed = unsafe { &*(result_ref.data as *const FfiParsedRequest) };
        assert_eq!(parsed.method, FfiHttpMethod::Post);
        let body: serde_json::Value = serde_json::from_str(c_str(parsed.body_json)).unwrap();
        assert_eq!(body, serde_json::json!({"b": [1, 2]}));
        reqline_free_result(result);
    }

    #[test]
    fn parse_reports_validation_code() {
        let line = CString::new("HTTP GET | URL http://x | HEADERS {} | HEADERS {}").unwrap();
        let result = reqline_parse(line.as_ptr());
        let result_ref = unsafe { &*result };
        assert_eq!(result_ref.error_code, FfiErrorCode::Validation);
        assert_eq!(result_ref.data_tag, FfiDataTag::None);
        assert!(result_ref.data.is_null());
        assert_eq!(c_str(result_ref.validation_code), "DUPLICATE_KEYWORD");
        assert_eq!(
            c_str(result_ref.error_message),
            "Duplicate keyword found: HEADERS"
        );
        reqline_free_result(result);
    }

    #[test]
    fn parse_null_returns_null_arg() {
        let result = reqline_parse(std::ptr::null());
        let result_ref = unsafe { &*result };
        assert_eq!(result_ref.error_code, FfiErrorCode::NullArg);
        assert!(result_ref.validation_code.is_null());
        reqline_free_result(result);
    }

    #[test]
    fn parse_invalid_utf8_is_reported() {
        let line = CString::new(vec![0x48, 0xff, 0x7c]).unwrap();
        let result = reqline_parse(line.as_ptr());
        let result_ref = unsafe { &*result };
        assert_eq!(result_ref.error_code, FfiErrorCode::InvalidUtf8);
        reqline_free_result(result);
    }

    #[test]
    fn build_request_with_query_and_headers() {
        let line = CString::new(
            r#"HTTP GET | URL http://x.test/q | HEADERS {"a":"1","b":"2"} | QUERY {"refid":7}"#,
        )
        .unwrap();
        let result = reqline_build_request(line.as_ptr());
        let result_ref = unsafe { &*result };
        assert_eq!(result_ref.error_code, FfiErrorCode::Ok);
        assert_eq!(result_ref.data_tag, FfiDataTag::HttpRequest);

        let req = unsafe { &*(result_ref.data as *const FfiHttpRequest) };
        assert_eq!(req.method, FfiHttpMethod::Get);
        assert_eq!(c_str(req.url), "http://x.test/q?refid=7");
        assert!(req.body.is_null());
        assert_eq!(req.headers_len, 2);
        let headers = unsafe { std::slice::from_raw_parts(req.headers, 2) };
        assert_eq!(c_str(headers[0].key), "a");
        assert_eq!(c_str(headers[1].value), "2");

        reqline_free_result(result);
    }

    #[test]
    fn build_request_post_has_body() {
        let line = CString::new(r#"HTTP POST | URL http://x.test/ | BODY {"k":1}"#).unwrap();
        let result = reqline_build_request(line.as_ptr());
        let result_ref = unsafe { &*result };
        let req = unsafe { &*(result_ref.data as *const FfiHttpRequest) };
        assert_eq!(req.method, FfiHttpMethod::Post);
        assert_eq!(c_str(req.body), r#"{"k":1}"#);
        assert_eq!(req.headers_len, 1);
        reqline_free_result(result);
    }

    #[test]
    fn build_request_shape_mismatch_is_internal() {
        let line = CString::new("HTTP GET | URL http://x.test/ | QUERY 5").unwrap();
        let result = reqline_build_request(line.as_ptr());
        let result_ref = unsafe { &*result };
        assert_eq!(result_ref.error_code, FfiErrorCode::Internal);
        assert!(result_ref.validation_code.is_null());
        assert_eq!(
            c_str(result_ref.error_message),
            "QUERY must be a JSON object, found number"
        );
        reqline_free_result(result);
    }

    #[test]
    fn build_request_surfaces_validation_errors() {
        let line = CString::new("HTTP PUT | URL http://x.test/").unwrap();
        let result = reqline_build_request(line.as_ptr());
        let result_ref = unsafe { &*result };
        assert_eq!(result_ref.error_code, FfiErrorCode::Validation);
        assert_eq!(c_str(result_ref.validation_code), "UNSUPPORTED_METHOD");
        reqline_free_result(result);
    }

    #[test]
    fn free_result_null_is_safe() {
        reqline_free_result(std::ptr::null_mut());
    }
}
