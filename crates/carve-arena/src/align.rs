//! Alignment primitives.
//!
//! Pure functions over addresses. All of them assume the alignment is a
//! power of two, which lets forward alignment use a bitmask instead of
//! division.

/// Default alignment used by [`Arena::allocate`](crate::Arena::allocate)
/// and friends: two pointer widths (16 bytes on 64-bit targets).
pub const DEFAULT_ALIGNMENT: usize = 2 * std::mem::size_of::<usize>();

/// Whether `v` has exactly one bit set.
///
/// Zero is not a power of two.
#[inline]
pub const fn is_power_of_two(v: usize) -> bool {
    v != 0 && v & (v - 1) == 0
}

/// Smallest multiple of `alignment` that is `>= address`.
///
/// # Panics
///
/// Panics if `alignment` is not a power of two, or if the aligned address
/// does not fit in a `usize`.
#[inline]
pub fn align_forward(address: usize, alignment: usize) -> usize {
    match checked_align_forward(address, alignment) {
        Some(aligned) => aligned,
        None => panic!("aligning {address:#x} to {alignment} overflows usize"),
    }
}

/// Like [`align_forward`] but returns `None` when the result would
/// overflow.
///
/// # Panics
///
/// Panics if `alignment` is not a power of two.
#[inline]
pub fn checked_align_forward(address: usize, alignment: usize) -> Option<usize> {
    assert!(
        is_power_of_two(alignment),
        "alignment must be a power of two, got {alignment}"
    );
    let misalignment = address & (alignment - 1);
    if misalignment == 0 {
        Some(address)
    } else {
        address.checked_add(alignment - misalignment)
    }
}

/// Whether `address` is already a multiple of `alignment`.
#[inline]
pub(crate) fn is_aligned(address: usize, alignment: usize) -> bool {
    address & (alignment - 1) == 0
}
