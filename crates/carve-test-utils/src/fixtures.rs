//! Reusable fixtures.
//!
//! - [`AlignedBlock`]: a byte block whose start is aligned to
//!   [`BLOCK_ALIGN`], so "offset 0 is aligned" holds for every alignment a
//!   test is likely to ask for.
//! - [`FailingDisplay`]: always returns `fmt::Error`.
//! - [`GrowingDisplay`]: renders one more character every time it is
//!   formatted, so a measure-then-render sequence sees two lengths.

use std::cell::Cell;
use std::fmt;

/// Alignment of every [`AlignedBlock`].
pub const BLOCK_ALIGN: usize = 64;

/// `N` bytes aligned to [`BLOCK_ALIGN`].
#[repr(C, align(64))]
pub struct AlignedBlock<const N: usize> {
    bytes: [u8; N],
}

impl<const N: usize> AlignedBlock<N> {
    /// A zeroed block.
    pub fn new() -> Self {
        Self::filled(0)
    }

    /// A block with every byte set to `byte`. Handy for checking that
    /// allocation zeroes what it hands out.
    pub fn filled(byte: u8) -> Self {
        Self { bytes: [byte; N] }
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.bytes
    }
}

impl<const N: usize> Default for AlignedBlock<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// A `Display` impl that always fails.
#[derive(Clone, Copy, Debug, Default)]
pub struct FailingDisplay;

impl fmt::Display for FailingDisplay {
    fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Err(fmt::Error)
    }
}

/// A `Display` impl whose output grows by one `#` per call.
#[derive(Debug, Default)]
pub struct GrowingDisplay {
    calls: Cell<usize>,
}

impl GrowingDisplay {
    /// Number of times the value has been formatted.
    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl fmt::Display for GrowingDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.calls.get() + 1;
        self.calls.set(n);
        for _ in 0..n {
            f.write_str("#")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_is_aligned() {
        let block = AlignedBlock::<16>::new();
        assert_eq!(block.as_slice().as_ptr() as usize % BLOCK_ALIGN, 0);
        assert_eq!(std::mem::align_of::<AlignedBlock<1>>(), BLOCK_ALIGN);
    }

    #[test]
    fn filled_block() {
        let block = AlignedBlock::<4>::filled(9);
        assert_eq!(block.as_slice(), &[9, 9, 9, 9]);
    }

    #[test]
    fn growing_display_changes_length() {
        let g = GrowingDisplay::default();
        assert_eq!(g.to_string(), "#");
        assert_eq!(g.to_string(), "##");
        assert_eq!(g.calls(), 2);
    }

    #[test]
    fn failing_display_fails() {
        use std::fmt::Write;
        let mut s = String::new();
        assert!(write!(s, "{}", FailingDisplay).is_err());
    }
}
