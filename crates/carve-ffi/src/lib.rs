//! C FFI bindings for the Carve arena allocator.
//!
//! Every entry point returns an `i32` [`CarveStatus`] (0 on success,
//! negative on failure) and writes results through out-parameters.
//! Pointer out-parameters are set to null whenever the call fails, so C
//! callers can test either the status or the pointer.
//!
//! Arenas are addressed by `u64` handles. A destroyed handle is detected
//! and rejected with `CARVE_STATUS_INVALID_HANDLE` rather than causing
//! undefined behaviour. This crate is one of two that may contain
//! `unsafe` code (along with `carve-arena`).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

/// Run an FFI body, converting a panic into `CarveStatus::Panicked`.
macro_rules! ffi_guard {
    ($body:block) => {
        match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| -> i32 { $body })) {
            Ok(status) => status,
            Err(_) => {
                tracing::error!("panic caught at the carve FFI boundary");
                $crate::status::CarveStatus::Panicked as i32
            }
        }
    };
}

/// Lock a mutex, returning `InternalError` from the enclosing closure if
/// a previous panic poisoned it.
macro_rules! ffi_lock {
    ($mutex:expr) => {
        match $mutex.lock() {
            Ok(guard) => guard,
            Err(_) => return $crate::status::CarveStatus::InternalError as i32,
        }
    };
}

pub mod arena;
mod handle;
pub mod status;

pub use status::CarveStatus;
