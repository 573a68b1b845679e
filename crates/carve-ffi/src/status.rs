//! C-compatible status codes.
//!
//! [`CarveStatus`] is a `repr(i32)` enum covering every failure the C API
//! can report. The two arena signals are kept distinct: running out of
//! space (`OutOfMemory`) versus handing the arena memory it does not own
//! (`InvalidArgument`).

use carve_arena::ArenaError;

/// C-compatible status code returned by all FFI functions.
///
/// `Ok` = 0, all errors are negative. Values are ABI-stable.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CarveStatus {
    /// Success.
    Ok = 0,
    /// The request does not fit in the arena's remaining capacity.
    OutOfMemory = -1,
    /// An argument is null, not a power of two, or points at memory the
    /// arena did not hand out.
    InvalidArgument = -2,
    /// Handle is invalid or was already destroyed.
    InvalidHandle = -3,
    /// The arena is not bound to any memory.
    Unbound = -4,
    /// Internal error (e.g. poisoned mutex after a prior panic).
    InternalError = -5,
    /// A Rust panic was caught at the FFI boundary.
    Panicked = -128,
}

impl From<&ArenaError> for CarveStatus {
    fn from(e: &ArenaError) -> Self {
        match e {
            ArenaError::OutOfMemory { .. } => CarveStatus::OutOfMemory,
            ArenaError::ForeignAllocation { .. } => CarveStatus::InvalidArgument,
            ArenaError::Unbound => CarveStatus::Unbound,
            ArenaError::Format => CarveStatus::InvalidArgument,
        }
    }
}
