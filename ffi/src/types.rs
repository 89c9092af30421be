//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String`, raw pointers instead of `Vec`, and
//! tagged enums with explicit discriminants. Section values cross the
//! boundary as JSON text. Conversion functions live here to keep `lib.rs`
//! focused on the `extern "C"` surface.

use std::ffi::{c_void, CString};
use std::os::raw::c_char;

use reqline_core::{DispatchError, HttpMethod, HttpRequest, ParsedRequest, ValidationError};

/// Allocate a C string, dropping interior NULs rather than failing.
pub(crate) fn into_c_string(s: impl Into<String>) -> *mut c_char {
    let s: String = s.into();
    let bytes: Vec<u8> = s.into_bytes().into_iter().filter(|b| *b != 0).collect();
    CString::new(bytes).unwrap_or_default().into_raw()
}

/// Release a string allocated by [`into_c_string`]. Null is ignored.
pub(crate) fn free_c_string(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s) });
    }
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiHttpMethod {
    Get = 0,
    Post = 1,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Post => FfiHttpMethod::Post,
        }
    }
}

/// A parsed reqline. Section values are JSON text, e.g. `{}` when absent.
#[repr(C)]
pub struct FfiParsedRequest {
    pub method: FfiHttpMethod,
    pub url: *mut c_char,
    pub headers_json: *mut c_char,
    pub query_json: *mut c_char,
    pub body_json: *mut c_char,
}

impl FfiParsedRequest {
    fn from_core(parsed: ParsedRequest) -> Self {
        FfiParsedRequest {
            method: parsed.method.into(),
            url: into_c_string(parsed.url),
            headers_json: into_c_string(parsed.headers.to_string()),
            query_json: into_c_string(parsed.query.to_string()),
            body_json: into_c_string(parsed.body.to_string()),
        }
    }

    pub(crate) fn free_fields(&self) {
        free_c_string(self.url);
        free_c_string(self.headers_json);
        free_c_string(self.query_json);
        free_c_string(self.body_json);
    }
}

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// A request ready to execute. `url` includes the query string; `body` is
/// null for `GET`.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub url: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut c_char,
}

impl FfiHttpRequest {
    fn from_core(req: HttpRequest) -> Self {
        let body = match req.body {
            Some(b) => into_c_string(b),
            None => std::ptr::null_mut(),
        };

        let headers_len = u32::try_from(req.headers.len()).unwrap_or(u32::MAX);
        let headers = if req.headers.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_headers: Vec<FfiHeader> = req
                .headers
                .into_iter()
                .take(headers_len as usize)
                .map(|(k, v)| FfiHeader {
                    key: into_c_string(k),
                    value: into_c_string(v),
                })
                .collect();
            Box::into_raw(ffi_headers.into_boxed_slice()) as *mut FfiHeader
        };

        FfiHttpRequest {
            method: req.method.into(),
            url: into_c_string(req.url),
            headers,
            headers_len,
            body,
        }
    }

    pub(crate) fn free_fields(&self) {
        free_c_string(self.url);
        free_c_string(self.body);
        if !self.headers.is_null() && self.headers_len > 0 {
            let headers = unsafe {
                Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                    self.headers,
                    self.headers_len as usize,
                ))
            };
            for h in headers.iter() {
                free_c_string(h.key);
                free_c_string(h.value);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error categories returned in `FfiResult`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    /// The reqline broke the grammar; `validation_code` names the rule.
    Validation = 1,
    /// The reqline parsed but no request could be built from it.
    Internal = 2,
    NullArg = 3,
    InvalidUtf8 = 4,
    Panic = 5,
}

/// Tag that tells `reqline_free_result` what `FfiResult::data` points to.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiDataTag {
    None = 0,
    ParsedRequest = 1,
    HttpRequest = 2,
}

/// Result envelope for every entry point.
///
/// On success `error_code` is `Ok`, both message fields are null, and `data`
/// points to the payload tagged by `data_tag`. On failure `error_message` is
/// a human-readable C string, `validation_code` is set for validation
/// failures only (e.g. `"DUPLICATE_KEYWORD"`), and `data` is null.
#[repr(C)]
pub struct FfiResult {
    pub error_code: FfiErrorCode,
    pub validation_code: *mut c_char,
    pub error_message: *mut c_char,
    pub data_tag: FfiDataTag,
    pub data: *mut c_void,
}

impl FfiResult {
    fn boxed(self) -> *mut Self {
        Box::into_raw(Box::new(self))
    }

    fn error(error_code: FfiErrorCode, message: String) -> *mut Self {
        FfiResult {
            error_code,
            validation_code: std::ptr::null_mut(),
            error_message: into_c_string(message),
            data_tag: FfiDataTag::None,
            data: std::ptr::null_mut(),
        }
        .boxed()
    }

    /// Build a success result carrying an `FfiParsedRequest`.
    pub(crate) fn ok_parsed(parsed: ParsedRequest) -> *mut Self {
        let data = Box::into_raw(Box::new(FfiParsedRequest::from_core(parsed)));
        FfiResult {
            error_code: FfiErrorCode::Ok,
            validation_code: std::ptr::null_mut(),
            error_message: std::ptr::null_mut(),
            data_tag: FfiDataTag::ParsedRequest,
            data: data as *mut c_void,
        }
        .boxed()
    }

    /// Build a success result carrying an `FfiHttpRequest`.
    pub(crate) fn ok_request(req: HttpRequest) -> *mut Self {
        let data = Box::into_raw(Box::new(FfiHttpRequest::from_core(req)));
        FfiResult {
            error_code: FfiErrorCode::Ok,
            validation_code: std::ptr::null_mut(),
            error_message: std::ptr::null_mut(),
            data_tag: FfiDataTag::HttpRequest,
            data: data as *mut c_void,
        }
        .boxed()
    }

    pub(crate) fn from_validation(err: ValidationError) -> *mut Self {
        FfiResult {
            error_code: FfiErrorCode::Validation,
            validation_code: into_c_string(err.code.as_str()),
            error_message: into_c_string(err.message),
            data_tag: FfiDataTag::None,
            data: std::ptr::null_mut(),
        }
        .boxed()
    }

    pub(crate) fn from_dispatch(err: DispatchError) -> *mut Self {
        Self::error(FfiErrorCode::Internal, err.to_string())
    }

    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::error(FfiErrorCode::NullArg, format!("null argument: {name}"))
    }

    pub(crate) fn invalid_utf8(name: &str) -> *mut Self {
        Self::error(FfiErrorCode::InvalidUtf8, format!("{name} is not valid UTF-8"))
    }

    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::error(FfiErrorCode::Panic, msg.to_string())
    }
}
