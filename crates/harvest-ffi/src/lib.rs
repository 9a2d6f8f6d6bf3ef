//! C FFI bindings for harvest-core
//!
//! This crate provides a C-compatible API for host applications (the
//! capture UI shell or any other embedder) that own clipboard and file
//! delivery themselves and only need the capture/serialize pipeline.

use harvest_core::serialize::OutputFormat;
use harvest_core::{CaptureRecord, CaptureSession, RowRange};
use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int};
use std::ptr;

/// Opaque handle to a capture session
pub struct FfiSession {
    inner: CaptureSession,
}

/// CSV format selector for `harvest_session_serialize`
pub const HARVEST_FORMAT_CSV: c_int = 0;
/// JSON format selector for `harvest_session_serialize`
pub const HARVEST_FORMAT_JSON: c_int = 1;

/// Create a new capture session
///
/// The returned handle must be released with `harvest_session_free`.
#[no_mangle]
pub extern "C" fn harvest_session_new() -> *mut FfiSession {
    Box::into_raw(Box::new(FfiSession {
        inner: CaptureSession::new(),
    }))
}

/// Free a capture session
///
/// # Safety
/// - `session` must be a valid pointer returned by `harvest_session_new` or null
#[no_mangle]
pub unsafe extern "C" fn harvest_session_free(session: *mut FfiSession) {
    if !session.is_null() {
        drop(Box::from_raw(session));
    }
}

/// Record a captured payload into the session's buffer
///
/// Returns false when any pointer is null or `body_json` is not valid JSON.
///
/// # Safety
/// - `session` must be a valid pointer returned by `harvest_session_new`
/// - `url`, `method`, and `body_json` must be valid NUL-terminated C strings
#[no_mangle]
pub unsafe extern "C" fn harvest_session_record(
    session: *mut FfiSession,
    url: *const c_char,
    method: *const c_char,
    body_json: *const c_char,
    looks_tabular: bool,
) -> bool {
    if session.is_null() || url.is_null() || method.is_null() || body_json.is_null() {
        return false;
    }

    let (Ok(url), Ok(method), Ok(body_json)) = (
        CStr::from_ptr(url).to_str(),
        CStr::from_ptr(method).to_str(),
        CStr::from_ptr(body_json).to_str(),
    ) else {
        return false;
    };

    let Ok(body) = serde_json::from_str(body_json) else {
        return false;
    };

    (*session)
        .inner
        .record(CaptureRecord::new(url, method, body, looks_tabular));
    true
}

/// Assemble the best table from the buffered payloads
///
/// Returns true when a table was assembled and installed.
///
/// # Safety
/// - `session` must be a valid pointer returned by `harvest_session_new`
#[no_mangle]
pub unsafe extern "C" fn harvest_session_assemble(session: *mut FfiSession) -> bool {
    if session.is_null() {
        return false;
    }
    (*session).inner.assemble_from_captures().is_ok()
}

/// Row count of the session's current table, or -1 when none is held
///
/// # Safety
/// - `session` must be a valid pointer returned by `harvest_session_new`
#[no_mangle]
pub unsafe extern "C" fn harvest_session_row_count(session: *const FfiSession) -> i64 {
    if session.is_null() {
        return -1;
    }
    match (*session).inner.latest_table() {
        Some(table) => table.row_count() as i64,
        None => -1,
    }
}

/// Serialize the session's current table
///
/// `start`/`end` select rows 1-indexed inclusive; pass 0 for both to take
/// every row. Returns an owned C string to be released with
/// `harvest_string_free`, or null on error (no table, invalid range).
///
/// # Safety
/// - `session` must be a valid pointer returned by `harvest_session_new`
#[no_mangle]
pub unsafe extern "C" fn harvest_session_serialize(
    session: *const FfiSession,
    format: c_int,
    start: u64,
    end: u64,
) -> *mut c_char {
    if session.is_null() {
        return ptr::null_mut();
    }

    let format = match format {
        HARVEST_FORMAT_CSV => OutputFormat::Csv,
        HARVEST_FORMAT_JSON => OutputFormat::Json,
        _ => return ptr::null_mut(),
    };

    let Some(table) = (*session).inner.latest_table() else {
        return ptr::null_mut();
    };

    let range = if start == 0 && end == 0 {
        None
    } else {
        let range = RowRange {
            start: start as usize,
            end: end as usize,
        };
        if range.validate(table.row_count()).is_err() {
            return ptr::null_mut();
        }
        Some(range)
    };

    match harvest_core::serialize(table, format, range, None) {
        Ok(content) => CString::new(content)
            .map(CString::into_raw)
            .unwrap_or(ptr::null_mut()),
        Err(_) => ptr::null_mut(),
    }
}

/// Free a string returned by this library
///
/// # Safety
/// - `s` must be a pointer returned by `harvest_session_serialize` or null
#[no_mangle]
pub unsafe extern "C" fn harvest_string_free(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;

    fn cstr(s: &str) -> CString {
        CString::new(s).unwrap()
    }

    #[test]
    fn test_record_assemble_serialize_through_ffi() {
        let session = harvest_session_new();
        let url = cstr("https://api.test/items");
        let method = cstr("GET");
        let body = cstr(r#"{"items":[{"id":1,"name":"A"},{"id":2,"name":"B"}]}"#);

        unsafe {
            assert!(harvest_session_record(
                session,
                url.as_ptr(),
                method.as_ptr(),
                body.as_ptr(),
                true
            ));
            assert!(harvest_session_assemble(session));
            assert_eq!(harvest_session_row_count(session), 2);

            let out = harvest_session_serialize(session, HARVEST_FORMAT_CSV, 0, 0);
            assert!(!out.is_null());
            let text = CStr::from_ptr(out).to_str().unwrap().to_string();
            assert!(text.contains("\"id\",\"name\""));
            harvest_string_free(out);

            harvest_session_free(session);
        }
    }

    #[test]
    fn test_null_inputs_are_rejected() {
        unsafe {
            assert!(!harvest_session_record(
                ptr::null_mut(),
                ptr::null(),
                ptr::null(),
                ptr::null(),
                false
            ));
            assert_eq!(harvest_session_row_count(ptr::null()), -1);
            assert!(harvest_session_serialize(ptr::null(), HARVEST_FORMAT_CSV, 0, 0).is_null());
            harvest_session_free(ptr::null_mut());
            harvest_string_free(ptr::null_mut());
        }
    }

    #[test]
    fn test_invalid_range_returns_null() {
        let session = harvest_session_new();
        let url = cstr("u");
        let method = cstr("GET");
        let body = cstr(r#"[{"a":1,"b":2}]"#);

        unsafe {
            harvest_session_record(session, url.as_ptr(), method.as_ptr(), body.as_ptr(), true);
            harvest_session_assemble(session);
            let out = harvest_session_serialize(session, HARVEST_FORMAT_CSV, 1, 99);
            assert!(out.is_null());
            harvest_session_free(session);
        }
    }
}
