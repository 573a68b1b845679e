//! Two-pass formatted allocation: measure, allocate exactly, render.

#![allow(unsafe_code)]

use std::fmt::{self, Write};
use std::str;

use crate::arena::Arena;
use crate::error::ArenaError;

/// Allocate formatted text in an arena, like `format!`.
///
/// Expands to [`Arena::allocate_formatted`] and evaluates to
/// `Result<&str, ArenaError>`.
///
/// ```
/// use carve_arena::{arena_format, Arena};
///
/// let mut block = [0u8; 64];
/// let arena = Arena::new(&mut block);
/// let text = arena_format!(arena, "{}-{}", "id", 42).unwrap();
/// assert_eq!(text, "id-42");
/// ```
#[macro_export]
macro_rules! arena_format {
    ($arena:expr, $($arg:tt)*) => {
        $arena.allocate_formatted(::std::format_args!($($arg)*))
    };
}

/// Counts bytes without storing them.
struct Measure(usize);

impl Write for Measure {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0 = self.0.checked_add(s.len()).ok_or(fmt::Error)?;
        Ok(())
    }
}

/// Writes into a fixed span, failing instead of overrunning it.
struct Render<'b> {
    buf: &'b mut [u8],
    pos: usize,
}

impl Write for Render<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let end = self.pos.checked_add(s.len()).ok_or(fmt::Error)?;
        let dst = self.buf.get_mut(self.pos..end).ok_or(fmt::Error)?;
        dst.copy_from_slice(s.as_bytes());
        self.pos = end;
        Ok(())
    }
}

impl<'a> Arena<'a> {
    /// Render `args` into a freshly allocated, NUL-terminated span.
    ///
    /// The text is measured first, then exactly `len + 1` bytes are
    /// allocated and the text rendered into them. The returned `&str`
    /// excludes the terminator, which sits in the byte right after it.
    ///
    /// If a `Display` impl fails, or renders a different length the second
    /// time, [`ArenaError::Format`] is returned and the allocation is
    /// rolled back. The rollback is skipped when something else was
    /// allocated during rendering; the span then stays consumed.
    pub fn allocate_formatted(&self, args: fmt::Arguments<'_>) -> Result<&str, ArenaError> {
        let mut measure = Measure(0);
        measure.write_fmt(args)?;
        let len = measure.0;
        let total = len.checked_add(1).ok_or(ArenaError::OutOfMemory {
            requested: usize::MAX,
            remaining: self.remaining(),
        })?;

        let checkpoint = self.checkpoint();
        let span = self.allocate(total)?;
        let granted = self.checkpoint();
        let mut render = Render {
            buf: &mut span[..len],
            pos: 0,
        };
        if render.write_fmt(args).is_err() || render.pos != len {
            // A `Display` impl may itself allocate from this arena; its
            // spans sit past ours and must stay granted.
            if self.checkpoint() == granted {
                self.rewind(checkpoint);
            }
            tracing::debug!(len, "formatted output changed between passes");
            return Err(ArenaError::Format);
        }
        span[len] = 0;
        // SAFETY: `span[..len]` is a concatenation of whole `&str` pieces.
        Ok(unsafe { str::from_utf8_unchecked(&span[..len]) })
    }
}
