//! The region allocator.
//!
//! [`Arena`] is a bump allocator over one caller-supplied block. It keeps
//! two offsets and nothing else: `current` (the next free byte) and
//! `previous` (where the last allocation begins). The `previous` offset is
//! the only per-arena state that lets a reallocation of the most recent
//! allocation happen in place; everything else falls back to
//! allocate-and-copy.

#![allow(unsafe_code)]
#![allow(clippy::mut_from_ref)]

use std::cell::Cell;
use std::marker::PhantomData;
use std::ptr::NonNull;

use crate::align::{checked_align_forward, is_aligned, is_power_of_two, DEFAULT_ALIGNMENT};
use crate::config::{ArenaConfig, ConfigError};
use crate::error::ArenaError;
use crate::raw;

/// A fixed-capacity region allocator over borrowed memory.
///
/// The arena has two states. **Active** arenas are bound to a block and
/// serve allocations from it. **Empty** arenas (from [`Arena::empty`] or
/// after [`Arena::deinitialize`]) fail every allocation with
/// [`ArenaError::Unbound`] until [`Arena::initialize`] binds a new block.
///
/// Spans returned by the allocation methods borrow the arena, so they
/// cannot outlive the next `reset`, `zero_reset`, `deinitialize` or
/// `initialize` call.
///
/// The arena is single-owner: it is `Send` but not `Sync`.
pub struct Arena<'a> {
    /// Start of the bound block; dangling when unbound.
    memory: NonNull<u8>,
    /// Length of the bound block in bytes; zero when unbound.
    capacity: usize,
    /// Next free byte.
    current: Cell<usize>,
    /// Start of the most recently granted span.
    previous: Cell<usize>,
    default_alignment: usize,
    zero_on_deinit: bool,
    bound: bool,
    _memory: PhantomData<&'a mut [u8]>,
}

// SAFETY: the arena holds the only reference to its block (an exclusive
// `&'a mut [u8]` borrow). Moving it across threads requires ownership,
// which means no span borrowed from it is alive. `Cell` keeps it `!Sync`.
unsafe impl Send for Arena<'_> {}

impl<'a> Arena<'a> {
    /// Bind a new arena to `memory` with the default configuration.
    pub fn new(memory: &'a mut [u8]) -> Self {
        let mut arena = Self::empty();
        arena.initialize(memory);
        arena
    }

    /// Bind a new arena to `memory` with a validated configuration.
    pub fn with_config(memory: &'a mut [u8], config: &ArenaConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut arena = Self::new(memory);
        arena.default_alignment = config.default_alignment;
        arena.zero_on_deinit = config.zero_on_deinit;
        Ok(arena)
    }

    /// An arena in the Empty state. Every allocation fails until
    /// [`initialize`](Self::initialize) is called.
    pub const fn empty() -> Self {
        Self {
            memory: NonNull::dangling(),
            capacity: 0,
            current: Cell::new(0),
            previous: Cell::new(0),
            default_alignment: DEFAULT_ALIGNMENT,
            zero_on_deinit: true,
            bound: false,
            _memory: PhantomData,
        }
    }

    /// Bind the arena to `memory`, resetting both offsets to zero.
    ///
    /// A previously bound block is released without being wiped; call
    /// [`deinitialize`](Self::deinitialize) first if that matters.
    pub fn initialize(&mut self, memory: &'a mut [u8]) {
        self.capacity = memory.len();
        self.memory = NonNull::from(memory).cast();
        self.current.set(0);
        self.previous.set(0);
        self.bound = true;
        tracing::trace!(capacity = self.capacity, "arena initialized");
    }

    /// Allocate `size` zeroed bytes at [`default_alignment`](Self::default_alignment).
    pub fn allocate(&self, size: usize) -> Result<&mut [u8], ArenaError> {
        self.allocate_aligned(self.default_alignment, size)
    }

    /// Allocate `size` zeroed bytes whose start is a multiple of `alignment`.
    ///
    /// A zero `size` succeeds and returns an empty span; only alignment
    /// padding is consumed.
    ///
    /// # Panics
    ///
    /// Panics if `alignment` is not a power of two.
    pub fn allocate_aligned(&self, alignment: usize, size: usize) -> Result<&mut [u8], ArenaError> {
        let offset = self.grant(alignment, size)?;
        // SAFETY: `grant` returned a fresh span past every live one.
        Ok(unsafe { raw::span_mut(self.memory, offset, size) })
    }

    /// Resize `old` to `new_size` bytes at the default alignment.
    ///
    /// See [`reallocate_aligned`](Self::reallocate_aligned).
    pub fn reallocate<'s>(
        &'s self,
        old: &'s mut [u8],
        new_size: usize,
    ) -> Result<&'s mut [u8], ArenaError> {
        self.reallocate_aligned(self.default_alignment, old, new_size)
    }

    /// Resize `old`, a span previously granted by this arena, to
    /// `new_size` bytes.
    ///
    /// - An empty `old` is treated as "no allocation": this is a plain
    ///   [`allocate_aligned`](Self::allocate_aligned).
    /// - If `old` is exactly the most recent allocation (nothing was
    ///   allocated since, and it still satisfies `alignment`), it is grown
    ///   or shrunk in place and the returned span starts at the same
    ///   address. Bytes past the old length are zeroed. A shrink returns
    ///   the prefix but leaves the cursor where it was, so the released
    ///   tail is only reclaimed by a reset; use
    ///   [`reallocate_raw`](Self::reallocate_raw) to hand it back.
    /// - Otherwise a new span is allocated and the first
    ///   `min(old.len(), new_size)` bytes are copied into it. The old span
    ///   stays consumed until the arena is reset.
    ///
    /// Fails with [`ArenaError::ForeignAllocation`] if `old` was not
    /// granted by this arena, and with [`ArenaError::OutOfMemory`] if the
    /// new size does not fit. Offsets are unchanged on failure.
    ///
    /// # Panics
    ///
    /// Panics if `alignment` is not a power of two.
    pub fn reallocate_aligned<'s>(
        &'s self,
        alignment: usize,
        old: &'s mut [u8],
        new_size: usize,
    ) -> Result<&'s mut [u8], ArenaError> {
        assert_power_of_two(alignment);
        if old.is_empty() {
            return self.allocate_aligned(alignment, new_size);
        }
        let old_size = old.len();
        let old_offset = self.locate(old.as_ptr(), old_size)?;
        let at_tail = old_offset + old_size == self.current.get();
        if at_tail
            && new_size <= old_size
            && old_offset == self.previous.get()
            && is_aligned(self.base_address() + old_offset, alignment)
        {
            // `old` may be a reborrow of a longer live span, so the cursor
            // cannot move back over bytes the caller still reaches.
            tracing::trace!(old_size, new_size, "shrank last allocation, cursor kept");
            return Ok(&mut old[..new_size]);
        }
        // `old` reborrows the whole tail only when it ends at the cursor;
        // a prefix of the last span may have a live sibling after it.
        let offset = if at_tail {
            self.resize(alignment, old_offset, old_size, new_size)?
        } else {
            self.relocate(alignment, old_offset, old_size, new_size)?
        };
        // SAFETY: the span is either `old` extended over bytes no live
        // reference covers, or a freshly granted span.
        Ok(unsafe { raw::span_mut(self.memory, offset, new_size) })
    }

    /// Pointer-based reallocation for callers that track sizes separately
    /// (the C boundary).
    ///
    /// A null `old` or a zero `old_size` delegates to
    /// [`allocate_aligned`](Self::allocate_aligned). Shrinking the most
    /// recent allocation moves the cursor back to its new end. A pointer
    /// outside the
    /// block, or a span reaching past the cursor, fails with
    /// [`ArenaError::ForeignAllocation`].
    ///
    /// # Safety
    ///
    /// If `old` points into this arena, the caller must hold no live
    /// reference into `[old, old + max(old_size, new_size))` and must not
    /// use `old` again unless the returned pointer equals it.
    ///
    /// # Panics
    ///
    /// Panics if `alignment` is not a power of two.
    pub unsafe fn reallocate_raw(
        &self,
        alignment: usize,
        old: *mut u8,
        old_size: usize,
        new_size: usize,
    ) -> Result<NonNull<u8>, ArenaError> {
        assert_power_of_two(alignment);
        if old.is_null() || old_size == 0 {
            let span = self.allocate_aligned(alignment, new_size)?;
            return Ok(NonNull::from(span).cast());
        }
        let old_offset = self.locate(old.cast_const(), old_size)?;
        let offset = self.resize(alignment, old_offset, old_size, new_size)?;
        // SAFETY: `offset` lies within the bound block (checked by
        // `resize`/`grant`), so this stays inside the allocation.
        Ok(unsafe { self.memory.add(offset) })
    }

    /// Reclaim everything. Bytes are left as they are; the next
    /// allocation zeroes what it hands out.
    pub fn reset(&mut self) {
        self.current.set(0);
        self.previous.set(0);
        tracing::trace!("arena reset");
    }

    /// Zero every byte handed out so far, then [`reset`](Self::reset).
    pub fn zero_reset(&mut self) {
        self.wipe_live();
        self.reset();
    }

    /// Unbind the arena from its block, wiping live bytes first unless the
    /// arena was configured otherwise. The block itself is not freed.
    pub fn deinitialize(&mut self) {
        if self.zero_on_deinit {
            self.wipe_live();
        }
        self.memory = NonNull::dangling();
        self.capacity = 0;
        self.current.set(0);
        self.previous.set(0);
        self.bound = false;
        tracing::trace!("arena deinitialized");
    }

    /// Give the backing block back to the caller. An Empty arena returns
    /// an empty slice.
    pub fn into_inner(self) -> &'a mut [u8] {
        if !self.bound {
            return Default::default();
        }
        // SAFETY: consuming `self` ends every borrow of the block, and the
        // block was exclusively borrowed for `'a` at `initialize`.
        unsafe { raw::span_mut(self.memory, 0, self.capacity) }
    }

    /// Total usable bytes. Zero when unbound.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes consumed so far, including alignment padding (the current
    /// offset).
    pub fn used(&self) -> usize {
        self.current.get()
    }

    /// Offset where the most recent allocation begins.
    pub fn previous_offset(&self) -> usize {
        self.previous.get()
    }

    /// Bytes between the cursor and the end of the block.
    pub fn remaining(&self) -> usize {
        self.capacity - self.current.get()
    }

    /// Whether the arena is in the Empty state.
    pub fn is_unbound(&self) -> bool {
        !self.bound
    }

    /// Alignment used by [`allocate`](Self::allocate) and
    /// [`reallocate`](Self::reallocate).
    pub fn default_alignment(&self) -> usize {
        self.default_alignment
    }

    /// Whether `ptr` points into the bound block.
    pub fn contains(&self, ptr: *const u8) -> bool {
        self.offset_of(ptr).is_some()
    }

    /// Offset of `ptr` from the start of the block, if it points into it.
    pub fn offset_of(&self, ptr: *const u8) -> Option<usize> {
        if !self.bound {
            return None;
        }
        let base = self.base_address();
        let addr = ptr as usize;
        (addr >= base && addr - base < self.capacity).then(|| addr - base)
    }

    /// Save the cursor so a caller in this crate can undo an allocation.
    pub(crate) fn checkpoint(&self) -> (usize, usize) {
        (self.current.get(), self.previous.get())
    }

    /// Restore a checkpoint taken with [`checkpoint`](Self::checkpoint).
    ///
    /// Callers must have dropped every span granted after the checkpoint.
    pub(crate) fn rewind(&self, (current, previous): (usize, usize)) {
        self.current.set(current);
        self.previous.set(previous);
    }

    fn base_address(&self) -> usize {
        self.memory.as_ptr() as usize
    }

    /// Carve `size` bytes at `alignment` past the cursor and zero them.
    /// Returns the offset of the new span.
    fn grant(&self, alignment: usize, size: usize) -> Result<usize, ArenaError> {
        assert_power_of_two(alignment);
        if !self.bound {
            tracing::debug!(size, "allocation from unbound arena");
            return Err(ArenaError::Unbound);
        }
        let base = self.base_address();
        let offset = checked_align_forward(base + self.current.get(), alignment)
            .map(|aligned| aligned - base);
        let end = offset.and_then(|offset| offset.checked_add(size));
        match (offset, end) {
            (Some(offset), Some(end)) if end <= self.capacity => {
                self.previous.set(offset);
                self.current.set(end);
                // SAFETY: `[offset, end)` is past the old cursor, so no
                // live span covers it.
                unsafe { raw::zero(self.memory, offset, size) };
                Ok(offset)
            }
            _ => {
                let remaining = self.remaining();
                tracing::debug!(size, alignment, remaining, "arena out of memory");
                Err(ArenaError::OutOfMemory {
                    requested: size,
                    remaining,
                })
            }
        }
    }

    /// Map a pointer and claimed length back to an offset, rejecting
    /// anything this arena could not have granted.
    fn locate(&self, ptr: *const u8, len: usize) -> Result<usize, ArenaError> {
        let Some(offset) = self.offset_of(ptr) else {
            tracing::debug!("reallocation of a pointer outside the arena");
            return Err(ArenaError::ForeignAllocation { offset: None });
        };
        match offset.checked_add(len) {
            Some(end) if end <= self.current.get() => Ok(offset),
            _ => {
                tracing::debug!(offset, len, "reallocation of an ungranted span");
                Err(ArenaError::ForeignAllocation {
                    offset: Some(offset),
                })
            }
        }
    }

    /// Resize in place if `old_offset` is the last allocation, otherwise
    /// relocate.
    fn resize(
        &self,
        alignment: usize,
        old_offset: usize,
        old_size: usize,
        new_size: usize,
    ) -> Result<usize, ArenaError> {
        let last = old_offset == self.previous.get()
            && is_aligned(self.base_address() + old_offset, alignment);
        if !last {
            return self.relocate(alignment, old_offset, old_size, new_size);
        }
        let end = match old_offset.checked_add(new_size) {
            Some(end) if end <= self.capacity => end,
            _ => {
                let remaining = self.capacity - old_offset;
                tracing::debug!(new_size, remaining, "in-place growth exceeds capacity");
                return Err(ArenaError::OutOfMemory {
                    requested: new_size,
                    remaining,
                });
            }
        };
        self.current.set(end);
        if new_size > old_size {
            // SAFETY: the tail lies inside `[old_offset, end)`, which the
            // caller's consumed span covers up to `old_size` and nothing
            // covers beyond it.
            unsafe { raw::zero(self.memory, old_offset + old_size, new_size - old_size) };
        }
        Ok(old_offset)
    }

    /// Allocate a fresh span and move the surviving prefix into it.
    fn relocate(
        &self,
        alignment: usize,
        old_offset: usize,
        old_size: usize,
        new_size: usize,
    ) -> Result<usize, ArenaError> {
        let new_offset = self.grant(alignment, new_size)?;
        // SAFETY: both ranges are inside the block; the old one is
        // consumed by the caller and the new one is fresh.
        unsafe { raw::move_bytes(self.memory, old_offset, new_offset, old_size.min(new_size)) };
        tracing::trace!(old_offset, new_offset, new_size, "relocated allocation");
        Ok(new_offset)
    }

    fn wipe_live(&mut self) {
        if self.bound {
            // SAFETY: `&mut self` proves no span is borrowed, and
            // `[0, current)` is inside the block.
            unsafe { raw::zero(self.memory, 0, self.current.get()) };
        }
    }
}

impl Default for Arena<'_> {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for Arena<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Arena")
            .field("capacity", &self.capacity)
            .field("current_offset", &self.current.get())
            .field("previous_offset", &self.previous.get())
            .field("default_alignment", &self.default_alignment)
            .field("bound", &self.bound)
            .finish()
    }
}

#[inline]
fn assert_power_of_two(alignment: usize) {
    assert!(
        is_power_of_two(alignment),
        "alignment must be a power of two, got {alignment}"
    );
}
