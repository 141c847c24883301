//! Owned C string transfer across the boundary.
//!
//! All strings this crate hands to the host are produced by
//! [`to_owned_cstring`] and released by [`vb_free_cstring`], so allocation and
//! release always use the same allocator. A live counter pairs every
//! production with its release for leak accounting in tests.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{BridgeError, Result};

/// Count of C strings currently owned by the host.
static LIVE_CSTRINGS: AtomicUsize = AtomicUsize::new(0);

/// Number of strings handed out and not yet released.
pub fn live_cstring_count() -> usize {
    LIVE_CSTRINGS.load(Ordering::SeqCst)
}

/// Allocate a NUL-terminated copy of `s` and move ownership to the caller.
///
/// Interior NULs are stripped rather than failing: a diagnostic must always
/// reach the host, truncated is worse than sanitized.
pub(crate) fn to_owned_cstring(s: &str) -> *const c_char {
    let cstring = match CString::new(s) {
        Ok(cs) => cs,
        Err(_) => {
            let sanitized: String = s.chars().filter(|&c| c != '\0').collect();
            CString::new(sanitized).unwrap_or_default()
        }
    };
    LIVE_CSTRINGS.fetch_add(1, Ordering::SeqCst);
    cstring.into_raw() as *const c_char
}

/// Borrow a `&str` from a caller-owned C string.
///
/// # Safety
///
/// `ptr`, when non-null, must point to a NUL-terminated string valid for the
/// duration of the call.
pub(crate) unsafe fn cstr_arg<'a>(ptr: *const c_char, what: &str) -> Result<&'a str> {
    if ptr.is_null() {
        return Err(BridgeError::invalid_argument(format!("{what} is null")));
    }
    CStr::from_ptr(ptr)
        .to_str()
        .map_err(|_| BridgeError::invalid_argument(format!("{what} is not valid UTF-8")))
}

/// Release a string previously returned by this library.
///
/// A null pointer is a no-op. Passing a pointer that did not come from this
/// library, or releasing the same pointer twice, is undefined behavior; that
/// is the standard C ownership-transfer precondition and is not defended
/// against here.
///
/// # Safety
///
/// `ptr` must be null or a pointer obtained from `vb_create_model`'s error
/// slot or `vb_run_inference`'s result/error outputs, not yet released.
#[no_mangle]
pub unsafe extern "C" fn vb_free_cstring(ptr: *const c_char) {
    if ptr.is_null() {
        return;
    }
    LIVE_CSTRINGS.fetch_sub(1, Ordering::SeqCst);
    drop(CString::from_raw(ptr as *mut c_char));
}

#[cfg(test)]
mod tests {
    use super::*;

    // Exact live-count pairing is asserted in tests/leak_accounting.rs, which
    // owns its process; unit tests here run in parallel with other producers.

    #[test]
    fn test_produce_round_trip() {
        let ptr = to_owned_cstring("inference failed: test");
        let text = unsafe { CStr::from_ptr(ptr) }.to_str().unwrap();
        assert_eq!(text, "inference failed: test");
        unsafe { vb_free_cstring(ptr) };
    }

    #[test]
    fn test_free_null_is_noop() {
        unsafe { vb_free_cstring(std::ptr::null()) };
    }

    #[test]
    fn test_interior_nul_is_sanitized() {
        let ptr = to_owned_cstring("bad\0message");
        let text = unsafe { CStr::from_ptr(ptr) }.to_str().unwrap();
        assert_eq!(text, "badmessage");
        unsafe { vb_free_cstring(ptr) };
    }

    #[test]
    fn test_cstr_arg_null() {
        let err = unsafe { cstr_arg(std::ptr::null(), "model_path") }.unwrap_err();
        assert_eq!(err.to_string(), "invalid string argument: model_path is null");
    }

    #[test]
    fn test_cstr_arg_round_trip() {
        let owned = CString::new("fast").unwrap();
        let s = unsafe { cstr_arg(owned.as_ptr(), "preset") }.unwrap();
        assert_eq!(s, "fast");
    }
}
