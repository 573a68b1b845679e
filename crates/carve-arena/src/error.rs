//! Arena-specific error types.

use std::error::Error;
use std::fmt;

/// Errors that can occur during arena operations.
///
/// Every variant is reported without mutating the arena: offsets are the
/// same after a failed call as they were before it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// The requested span does not fit in the remaining capacity.
    OutOfMemory {
        /// Number of bytes requested.
        requested: usize,
        /// Bytes left between the current cursor and the end of the block,
        /// before alignment padding.
        remaining: usize,
    },
    /// A reallocation targeted memory this arena did not hand out.
    ForeignAllocation {
        /// Offset of the pointer inside the block, when it pointed into
        /// the block at all.
        offset: Option<usize>,
    },
    /// The arena is not bound to any memory (never initialized, or
    /// deinitialized).
    Unbound,
    /// A formatting pass failed or produced inconsistent output.
    Format,
}

impl ArenaError {
    /// Whether this is an exhaustion failure.
    ///
    /// [`Unbound`](Self::Unbound) counts as exhaustion: an arena with no
    /// memory has nothing to hand out. Match on the variant to tell the
    /// two apart; the C status codes keep them separate
    /// (`CARVE_STATUS_OUT_OF_MEMORY` and `CARVE_STATUS_UNBOUND`).
    pub fn is_out_of_memory(&self) -> bool {
        matches!(self, Self::OutOfMemory { .. } | Self::Unbound)
    }

    /// Whether this failure was caused by a bad argument rather than by
    /// running out of space.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::ForeignAllocation { .. })
    }
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfMemory {
                requested,
                remaining,
            } => {
                write!(
                    f,
                    "arena out of memory: requested {requested} bytes, {remaining} bytes remaining"
                )
            }
            Self::ForeignAllocation { offset: Some(offset) } => {
                write!(f, "span at offset {offset} was not granted by this arena")
            }
            Self::ForeignAllocation { offset: None } => {
                write!(f, "pointer does not belong to this arena")
            }
            Self::Unbound => write!(f, "arena is not bound to any memory"),
            Self::Format => write!(f, "formatting into the arena failed"),
        }
    }
}

impl Error for ArenaError {}

impl From<fmt::Error> for ArenaError {
    fn from(_: fmt::Error) -> Self {
        Self::Format
    }
}
