//! The exported C boundary.
//!
//! Four functions form the entire wire surface:
//! - [`boundary::vb_create_model`]
//! - [`boundary::vb_run_inference`]
//! - [`boundary::vb_destroy_model`]
//! - [`strings::vb_free_cstring`]
//!
//! # Ownership contract
//!
//! Strings and buffers passed *in* are caller-owned and borrowed for the
//! duration of the call only. Every string passed *out* (result or error) is
//! allocated here and ownership moves to the caller, who must release it
//! exactly once via `vb_free_cstring`. That release function is the single
//! point that frees with the allocator that produced the string.
//!
//! # Threading contract
//!
//! Every call is synchronous and blocking. A single handle serves one call at
//! a time; concurrent calls on the same handle are rejected with a busy error.
//! Distinct handles are independent and may be used from different threads.
//!
//! # Failure contract
//!
//! No panic unwinds past these functions; every internal failure is converted
//! to an owned error string written through the caller's error slot.

pub mod boundary;
pub mod strings;

use std::sync::Once;

pub use boundary::{vb_create_model, vb_destroy_model, vb_run_inference};
pub use strings::{live_cstring_count, vb_free_cstring};

/// Install a default tracing subscriber on first boundary entry.
///
/// Hosts that embed the library may have installed their own subscriber
/// already; `try_init` keeps theirs in that case.
pub(crate) fn init_boundary_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "vision_bridge=info".into());
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init();
    });
}
