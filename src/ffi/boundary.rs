//! Exported lifecycle operations: create, run, destroy.
//!
//! Each function null-initializes the caller's error slot before any failure
//! path can assign it, catches panics so nothing unwinds across the C ABI,
//! and reports every failure through the owned-error-string protocol
//! documented in the parent module.

use std::ffi::c_void;
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;
use std::ptr;

use tracing::{debug, error};

use crate::error::{BridgeError, Result};
use crate::ffi::strings::{cstr_arg, to_owned_cstring};
use crate::session::{ModelSession, SESSION_POISON, SESSION_TAG};

/// Write an owned error string into the caller's slot, if one was provided.
///
/// Moves ownership of the allocation to the caller; release via
/// `vb_free_cstring` exactly once.
unsafe fn write_error(error_out: *mut *const c_char, msg: &str) {
    if !error_out.is_null() {
        *error_out = to_owned_cstring(msg);
    }
}

/// Render a caught panic payload as a diagnostic.
fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    let detail = if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    };
    BridgeError::internal(detail).to_string()
}

/// Borrow the session behind a caller-supplied handle.
///
/// A null handle is rejected with an error. A non-null handle is trusted to
/// be live (use-after-destroy is a caller error at the native level), but
/// the liveness tag trips a debug assertion in non-release builds.
unsafe fn session_ref<'a>(handle: *mut c_void) -> Result<&'a ModelSession> {
    if handle.is_null() {
        return Err(BridgeError::NullHandle);
    }
    let session = &*(handle as *const ModelSession);
    debug_assert_eq!(
        session.tag, SESSION_TAG,
        "stale or foreign model handle passed across the boundary"
    );
    Ok(session)
}

/// Borrow the caller's input buffer as a slice of exactly `input_size` floats.
unsafe fn frame_slice<'a>(input: *const f32, input_size: i64) -> Result<&'a [f32]> {
    if input.is_null() {
        return Err(BridgeError::invalid_argument("input buffer is null"));
    }
    if input_size < 0 {
        return Err(BridgeError::invalid_argument(format!(
            "input size is negative: {input_size}"
        )));
    }
    Ok(std::slice::from_raw_parts(input, input_size as usize))
}

/// Load a model and tokenizer under a named preset.
///
/// On success returns a non-null opaque handle and leaves `*error_out` null.
/// On failure returns null and writes an owned error string into
/// `*error_out`; the caller must release it via `vb_free_cstring`.
///
/// The returned handle is exclusively owned by the caller and must be
/// released exactly once via `vb_destroy_model`.
///
/// # Safety
///
/// `model_path`, `tokenizer_path`, and `preset` must be NUL-terminated
/// strings valid for the duration of the call. `error_out`, when non-null,
/// must point to writable memory for one pointer.
#[no_mangle]
pub unsafe extern "C" fn vb_create_model(
    model_path: *const c_char,
    tokenizer_path: *const c_char,
    preset: *const c_char,
    error_out: *mut *const c_char,
) -> *mut c_void {
    crate::ffi::init_boundary_tracing();
    if !error_out.is_null() {
        *error_out = ptr::null();
    }

    let outcome = catch_unwind(AssertUnwindSafe(|| -> Result<ModelSession> {
        let model_path = cstr_arg(model_path, "model_path")?;
        let tokenizer_path = cstr_arg(tokenizer_path, "tokenizer_path")?;
        let preset = cstr_arg(preset, "preset")?;
        ModelSession::create(Path::new(model_path), Path::new(tokenizer_path), preset)
    }));

    match outcome {
        Ok(Ok(session)) => Box::into_raw(Box::new(session)) as *mut c_void,
        Ok(Err(e)) => {
            debug!(error = %e, "create_model failed");
            write_error(error_out, &e.to_string());
            ptr::null_mut()
        }
        Err(payload) => {
            let msg = panic_message(payload);
            error!(error = msg, "panic caught in create_model");
            write_error(error_out, &msg);
            ptr::null_mut()
        }
    }
}

/// Run one synchronous inference pass over a borrowed frame buffer.
///
/// Exactly one of {returned result string, `*error_out`} is non-null after
/// this call. Both are owned by the caller once returned and must each be
/// released via `vb_free_cstring`. The input buffer is borrowed for the
/// duration of the call only and is never mutated or retained.
///
/// # Safety
///
/// `handle` must be null or a live handle from `vb_create_model`. `input`,
/// when non-null, must point to at least `input_size` readable floats.
/// `label_hint` must be null or a NUL-terminated string. `error_out`, when
/// non-null, must point to writable memory for one pointer.
#[no_mangle]
pub unsafe extern "C" fn vb_run_inference(
    handle: *mut c_void,
    input: *const f32,
    input_size: i64,
    width: i32,
    height: i32,
    label_hint: *const c_char,
    error_out: *mut *const c_char,
) -> *const c_char {
    if !error_out.is_null() {
        *error_out = ptr::null();
    }

    let outcome = catch_unwind(AssertUnwindSafe(|| -> Result<String> {
        let session = session_ref(handle)?;
        let data = frame_slice(input, input_size)?;
        let hint = if label_hint.is_null() {
            None
        } else {
            Some(cstr_arg(label_hint, "label_hint")?)
        };

        let recognition = session.infer(data, width, height, hint)?;
        recognition
            .to_json()
            .map_err(|e| BridgeError::internal(format!("result encoding failed: {e}")))
    }));

    match outcome {
        Ok(Ok(json)) => to_owned_cstring(&json),
        Ok(Err(e)) => {
            debug!(error = %e, "run_inference failed");
            write_error(error_out, &e.to_string());
            ptr::null()
        }
        Err(payload) => {
            let msg = panic_message(payload);
            error!(error = msg, "panic caught in run_inference");
            write_error(error_out, &msg);
            ptr::null()
        }
    }
}

/// Destroy a handle and release everything it owns.
///
/// A null handle is a no-op. The handle is invalid for any use the moment
/// this returns. Destroying the same non-null handle twice is a caller error
/// (double free) that this function does not defend against, beyond tag
/// poisoning visible to debug-build assertions.
///
/// # Safety
///
/// `handle` must be null or a live handle from `vb_create_model`, with no
/// inference call in flight on it.
#[no_mangle]
pub unsafe extern "C" fn vb_destroy_model(handle: *mut c_void) {
    if handle.is_null() {
        return;
    }

    let outcome = catch_unwind(AssertUnwindSafe(|| {
        let mut session = Box::from_raw(handle as *mut ModelSession);
        debug_assert_eq!(
            session.tag, SESSION_TAG,
            "stale or foreign model handle passed to destroy"
        );
        session.tag = SESSION_POISON;
        drop(session);
    }));

    if let Err(payload) = outcome {
        error!(error = panic_message(payload), "panic caught in destroy_model");
    }
}
