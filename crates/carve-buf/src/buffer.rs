//! The append buffer.

use std::ffi::CString;
use std::fmt::{self, Write};

use crate::error::BufferError;

/// A growable text buffer with an explicit logical capacity.
///
/// Capacity always leaves one spare byte past the text (room for a C
/// terminator). When a write would not fit, capacity doubles, or jumps
/// straight to the required size if doubling is not enough.
#[derive(Clone, Debug)]
pub struct AppendBuffer {
    text: String,
    capacity: usize,
}

impl AppendBuffer {
    /// Capacity used by [`new`](Self::new) and [`reinit`](Self::reinit).
    pub const DEFAULT_CAPACITY: usize = 32;

    /// An empty buffer with [`DEFAULT_CAPACITY`](Self::DEFAULT_CAPACITY).
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// An empty buffer with room for `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            text: String::with_capacity(capacity),
            capacity,
        }
    }

    /// A buffer holding `s`, with capacity `2 * s.len()` (at least 1).
    pub fn from_text(s: &str) -> Self {
        let capacity = s.len().saturating_mul(2).max(1);
        let mut text = String::with_capacity(capacity);
        text.push_str(s);
        Self { text, capacity }
    }

    /// Append `s`, returning the number of bytes written.
    pub fn write(&mut self, s: &str) -> Result<usize, BufferError> {
        self.ensure(s.len())?;
        self.text.push_str(s);
        Ok(s.len())
    }

    /// Append formatted text, returning the number of bytes written.
    ///
    /// The text is measured first so the buffer grows at most once.
    pub fn write_formatted(&mut self, args: fmt::Arguments<'_>) -> Result<usize, BufferError> {
        let mut measure = Measure(0);
        measure.write_fmt(args)?;
        self.ensure(measure.0)?;
        let before = self.text.len();
        if let Err(e) = self.text.write_fmt(args) {
            self.text.truncate(before);
            return Err(e.into());
        }
        // A `Display` impl may render more the second time.
        self.capacity = self.capacity.max(self.text.len() + 1);
        Ok(self.text.len() - before)
    }

    /// Drop the contents, keeping the capacity.
    pub fn clear(&mut self) {
        self.text.clear();
    }

    /// Grow capacity by `additional` bytes.
    ///
    /// Growth must at least double the buffer: `additional` smaller than
    /// the current capacity is rejected.
    pub fn grow(&mut self, additional: usize) -> Result<(), BufferError> {
        if additional < self.capacity {
            return Err(BufferError::GrowthTooSmall {
                requested: additional,
                capacity: self.capacity,
            });
        }
        let target = self
            .capacity
            .checked_add(additional)
            .ok_or(BufferError::AllocationFailed {
                requested: usize::MAX,
            })?;
        self.reserve_to(target)
    }

    /// Free the heap block. Length and capacity become zero; later writes
    /// grow from scratch.
    pub fn release(&mut self) {
        self.text = String::new();
        self.capacity = 0;
    }

    /// Re-establish [`DEFAULT_CAPACITY`](Self::DEFAULT_CAPACITY) after
    /// [`release`](Self::release). Existing contents are discarded.
    pub fn reinit(&mut self) {
        self.reinit_with_capacity(Self::DEFAULT_CAPACITY);
    }

    /// Discard contents and start over with room for `capacity` bytes.
    pub fn reinit_with_capacity(&mut self, capacity: usize) {
        *self = Self::with_capacity(capacity);
    }

    /// The accumulated text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Consume the buffer and return its text.
    pub fn into_string(self) -> String {
        self.text
    }

    /// An owned, NUL-terminated copy of the contents, cut at the first
    /// interior NUL if there is one.
    pub fn to_c_string(&self) -> CString {
        let bytes = self.text.as_bytes();
        let len = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        CString::new(&bytes[..len]).unwrap_or_default()
    }

    /// Length of the text in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Whether no text has been written since the last clear.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Logical capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Make room for `n` more bytes plus a terminator.
    fn ensure(&mut self, n: usize) -> Result<(), BufferError> {
        let needed = self
            .text
            .len()
            .checked_add(n)
            .and_then(|len| len.checked_add(1))
            .ok_or(BufferError::AllocationFailed {
                requested: usize::MAX,
            })?;
        if needed <= self.capacity {
            return Ok(());
        }
        let target = self.capacity.saturating_mul(2).max(needed);
        self.reserve_to(target)
    }

    fn reserve_to(&mut self, target: usize) -> Result<(), BufferError> {
        let additional = target.saturating_sub(self.text.len());
        self.text
            .try_reserve_exact(additional)
            .map_err(|_| BufferError::AllocationFailed { requested: target })?;
        tracing::trace!(from = self.capacity, to = target, "append buffer grew");
        self.capacity = target;
        Ok(())
    }
}

impl Default for AppendBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for AppendBuffer {
    fn from(s: &str) -> Self {
        Self::from_text(s)
    }
}

impl fmt::Display for AppendBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl Write for AppendBuffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write(s).map(|_| ()).map_err(|_| fmt::Error)
    }
}

/// Counts bytes without storing them.
struct Measure(usize);

impl Write for Measure {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0 = self.0.checked_add(s.len()).ok_or(fmt::Error)?;
        Ok(())
    }
}
