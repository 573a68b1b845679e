//! Low-level primitives for arena memory operations.
//!
//! Every function here works on `(base, offset, len)` triples inside a
//! single bound block. Callers in `arena.rs` are responsible for checking
//! that the range lies within the block and that no live reference
//! overlaps a span being written.

#![allow(unsafe_code)]

use std::ptr::{self, NonNull};
use std::slice;

/// Reborrow `len` bytes at `offset` as a mutable slice.
///
/// # Safety
///
/// `offset + len` must not exceed the bound block, and no other live
/// reference may overlap the span for `'s`.
#[inline]
pub(crate) unsafe fn span_mut<'s>(base: NonNull<u8>, offset: usize, len: usize) -> &'s mut [u8] {
    // SAFETY: range checked by caller; exclusivity guaranteed by caller.
    unsafe { slice::from_raw_parts_mut(base.as_ptr().add(offset), len) }
}

/// Fill `len` bytes at `offset` with zero.
///
/// # Safety
///
/// `offset + len` must not exceed the bound block, and no live shared
/// reference may overlap the span.
#[inline]
pub(crate) unsafe fn zero(base: NonNull<u8>, offset: usize, len: usize) {
    // SAFETY: same contract as `span_mut`.
    unsafe { ptr::write_bytes(base.as_ptr().add(offset), 0, len) }
}

/// Move `len` bytes from `from` to `to`; the ranges may overlap.
///
/// # Safety
///
/// Both ranges must lie within the bound block and neither may be
/// covered by a live reference other than the one being consumed.
#[inline]
pub(crate) unsafe fn move_bytes(base: NonNull<u8>, from: usize, to: usize, len: usize) {
    // SAFETY: same contract as `span_mut`; `ptr::copy` tolerates overlap.
    unsafe {
        ptr::copy(
            base.as_ptr().add(from).cast_const(),
            base.as_ptr().add(to),
            len,
        )
    }
}
