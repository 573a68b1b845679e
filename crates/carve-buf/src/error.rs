//! Append-buffer error types.

use std::error::Error;
use std::fmt;

/// Errors that can occur while growing or writing to an
/// [`AppendBuffer`](crate::AppendBuffer).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BufferError {
    /// The heap refused to provide the requested capacity.
    AllocationFailed {
        /// Capacity (in bytes) that was being reserved.
        requested: usize,
    },
    /// An explicit [`grow`](crate::AppendBuffer::grow) asked for less than
    /// the current capacity.
    GrowthTooSmall {
        /// Additional bytes requested.
        requested: usize,
        /// Capacity at the time of the call.
        capacity: usize,
    },
    /// A `Display` impl failed while rendering.
    Format,
}

impl fmt::Display for BufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllocationFailed { requested } => {
                write!(f, "failed to reserve {requested} bytes for append buffer")
            }
            Self::GrowthTooSmall {
                requested,
                capacity,
            } => {
                write!(
                    f,
                    "growth of {requested} bytes is smaller than current capacity {capacity}"
                )
            }
            Self::Format => write!(f, "formatting into the append buffer failed"),
        }
    }
}

impl Error for BufferError {}

impl From<fmt::Error> for BufferError {
    fn from(_: fmt::Error) -> Self {
        Self::Format
    }
}
