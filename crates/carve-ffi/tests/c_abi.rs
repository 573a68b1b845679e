//! Drives the exported C functions the way a C caller would: raw
//! pointers, out-parameters and status codes.

use std::ffi::{c_char, CStr};
use std::ptr;

use carve_arena::ArenaError;
use carve_ffi::arena::*;
use carve_ffi::CarveStatus;
use carve_test_utils::AlignedBlock;

const OK: i32 = CarveStatus::Ok as i32;

fn create(block: &mut [u8]) -> u64 {
    let mut handle = 0;
    assert_eq!(
        carve_arena_create(block.as_mut_ptr(), block.len(), &mut handle),
        OK
    );
    handle
}

fn used(handle: u64) -> usize {
    let mut n = usize::MAX;
    assert_eq!(carve_arena_used(handle, &mut n), OK);
    n
}

#[test]
fn allocation_sequence_matches_offsets() {
    let mut block = AlignedBlock::<64>::new();
    let base = block.as_mut_slice().as_mut_ptr();
    let h = create(block.as_mut_slice());

    let mut cap = 0;
    assert_eq!(carve_arena_capacity(h, &mut cap), OK);
    assert_eq!(cap, 64);

    let mut a = ptr::null_mut();
    assert_eq!(carve_arena_alloc(h, 10, &mut a), OK);
    assert_eq!(a, base);
    assert_eq!(used(h), 10);

    let mut b = ptr::null_mut();
    assert_eq!(carve_arena_aligned_alloc(h, 16, 4, &mut b), OK);
    assert_eq!(b, base.wrapping_add(16));
    assert_eq!(used(h), 20);

    let mut c = ptr::null_mut();
    assert_eq!(
        carve_arena_alloc(h, 64, &mut c),
        CarveStatus::OutOfMemory as i32
    );
    assert!(c.is_null());
    assert_eq!(used(h), 20);

    assert_eq!(carve_arena_destroy(h), OK);
}

#[test]
fn realloc_last_allocation_grows_in_place() {
    let mut block = AlignedBlock::<64>::new();
    let h = create(block.as_mut_slice());

    let mut p = ptr::null_mut();
    assert_eq!(carve_arena_alloc(h, 8, &mut p), OK);
    // SAFETY: `p` points at 8 bytes handed out by the arena.
    unsafe { ptr::write_bytes(p, 0x5A, 8) };

    let mut q = ptr::null_mut();
    assert_eq!(carve_arena_realloc(h, p, 8, 20, &mut q), OK);
    assert_eq!(q, p);
    assert_eq!(used(h), 20);
    // SAFETY: `q` now covers 20 bytes.
    let bytes = unsafe { std::slice::from_raw_parts(q, 20) };
    assert!(bytes[..8].iter().all(|&b| b == 0x5A));
    assert!(bytes[8..].iter().all(|&b| b == 0));

    assert_eq!(carve_arena_destroy(h), OK);
}

#[test]
fn realloc_older_allocation_relocates() {
    let mut block = AlignedBlock::<64>::new();
    let h = create(block.as_mut_slice());

    let mut first = ptr::null_mut();
    let mut second = ptr::null_mut();
    assert_eq!(carve_arena_alloc(h, 4, &mut first), OK);
    assert_eq!(carve_arena_alloc(h, 4, &mut second), OK);
    // SAFETY: `first` covers 4 arena bytes.
    unsafe { ptr::copy_nonoverlapping(b"abcd".as_ptr(), first, 4) };

    let mut moved = ptr::null_mut();
    assert_eq!(carve_arena_realloc(h, first, 4, 12, &mut moved), OK);
    assert_ne!(moved, first);
    // SAFETY: `moved` covers 12 bytes.
    let bytes = unsafe { std::slice::from_raw_parts(moved, 12) };
    assert_eq!(&bytes[..4], b"abcd");
    assert!(bytes[4..].iter().all(|&b| b == 0));

    assert_eq!(carve_arena_destroy(h), OK);
}

#[test]
fn realloc_of_null_allocates() {
    let mut block = AlignedBlock::<32>::new();
    let h = create(block.as_mut_slice());
    let mut p = ptr::null_mut();
    assert_eq!(carve_arena_realloc(h, ptr::null_mut(), 0, 5, &mut p), OK);
    assert!(!p.is_null());
    assert_eq!(used(h), 5);
    assert_eq!(carve_arena_destroy(h), OK);
}

#[test]
fn realloc_of_foreign_pointer_is_invalid() {
    let mut block = AlignedBlock::<32>::new();
    let mut elsewhere = [0u8; 8];
    let h = create(block.as_mut_slice());
    let mut p = ptr::null_mut();
    assert_eq!(
        carve_arena_realloc(h, elsewhere.as_mut_ptr(), 8, 16, &mut p),
        CarveStatus::from(&ArenaError::ForeignAllocation { offset: None }) as i32
    );
    assert!(p.is_null());
    assert_eq!(carve_arena_destroy(h), OK);
}

#[test]
fn bad_alignment_is_invalid_argument() {
    let mut block = AlignedBlock::<32>::new();
    let h = create(block.as_mut_slice());
    let mut p = ptr::null_mut();
    assert_eq!(
        carve_arena_aligned_alloc(h, 3, 4, &mut p),
        CarveStatus::InvalidArgument as i32
    );
    assert_eq!(
        carve_arena_aligned_alloc(h, 0, 4, &mut p),
        CarveStatus::InvalidArgument as i32
    );
    assert_eq!(used(h), 0);
    assert_eq!(carve_arena_destroy(h), OK);
}

#[test]
fn string_duplication() {
    let mut block = AlignedBlock::<64>::filled(0xFF);
    let h = create(block.as_mut_slice());

    let mut copy: *mut c_char = ptr::null_mut();
    assert_eq!(carve_arena_strdup(h, c"hello".as_ptr(), &mut copy), OK);
    // SAFETY: the arena wrote a terminated copy.
    assert_eq!(unsafe { CStr::from_ptr(copy) }, c"hello");
    assert_eq!(used(h), 6);

    let mut short: *mut c_char = ptr::null_mut();
    assert_eq!(
        carve_arena_strndup(h, c"truncate me".as_ptr(), 8, &mut short),
        OK
    );
    // SAFETY: as above.
    assert_eq!(unsafe { CStr::from_ptr(short) }.to_bytes(), b"truncate");
    assert_eq!(used(h), 15);

    let mut raw = ptr::null_mut();
    assert_eq!(carve_arena_memdup(h, b"xyz".as_ptr(), 3, &mut raw), OK);
    // SAFETY: `raw` covers 3 bytes.
    assert_eq!(unsafe { std::slice::from_raw_parts(raw, 3) }, b"xyz");

    assert_eq!(carve_arena_destroy(h), OK);
}

#[test]
fn strndup_reads_no_further_than_bound() {
    let mut block = AlignedBlock::<16>::new();
    let h = create(block.as_mut_slice());
    // Unterminated source; only the first 3 bytes may be read.
    let source = *b"abc";
    let mut out: *mut c_char = ptr::null_mut();
    assert_eq!(
        carve_arena_strndup(h, source.as_ptr().cast(), 3, &mut out),
        OK
    );
    // SAFETY: the copy is terminated.
    assert_eq!(unsafe { CStr::from_ptr(out) }.to_bytes(), b"abc");
    assert_eq!(carve_arena_destroy(h), OK);
}

#[test]
fn reset_and_zero_reclaim() {
    let mut block = AlignedBlock::<32>::new();
    let h = create(block.as_mut_slice());

    let mut p = ptr::null_mut();
    assert_eq!(carve_arena_alloc(h, 16, &mut p), OK);
    // SAFETY: `p` covers 16 bytes.
    unsafe { ptr::write_bytes(p, 0xEE, 16) };
    assert_eq!(carve_arena_reset(h), OK);
    assert_eq!(used(h), 0);

    assert_eq!(carve_arena_alloc(h, 16, &mut p), OK);
    // SAFETY: as above.
    unsafe { ptr::write_bytes(p, 0xEE, 16) };
    assert_eq!(carve_arena_zero(h), OK);
    assert_eq!(used(h), 0);

    assert_eq!(carve_arena_destroy(h), OK);
    assert!(block.as_slice()[..16].iter().all(|&b| b == 0));
}

#[test]
fn destroyed_handle_is_stale() {
    let mut block = AlignedBlock::<32>::new();
    let h = create(block.as_mut_slice());
    assert_eq!(carve_arena_destroy(h), OK);

    let invalid = CarveStatus::InvalidHandle as i32;
    let mut p = ptr::null_mut();
    assert_eq!(carve_arena_alloc(h, 1, &mut p), invalid);
    assert!(p.is_null());
    assert_eq!(carve_arena_reset(h), invalid);
    assert_eq!(carve_arena_destroy(h), invalid);

    let mut n = 0;
    assert_eq!(carve_arena_used(h, &mut n), invalid);
}

#[test]
fn destroy_zeroes_live_bytes() {
    let mut block = AlignedBlock::<32>::new();
    let h = create(block.as_mut_slice());
    let mut p = ptr::null_mut();
    assert_eq!(carve_arena_alloc(h, 8, &mut p), OK);
    // SAFETY: `p` covers 8 bytes.
    unsafe { ptr::write_bytes(p, 0x11, 8) };
    assert_eq!(carve_arena_destroy(h), OK);
    assert!(block.as_slice().iter().all(|&b| b == 0));
}

mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn aligned_allocations_stay_in_bounds(
            requests in prop::collection::vec((0u32..6, 0usize..40), 1..24),
        ) {
            let mut block = AlignedBlock::<256>::new();
            let base = block.as_mut_slice().as_mut_ptr() as usize;
            let h = create(block.as_mut_slice());
            for (shift, size) in requests {
                let alignment = 1usize << shift;
                let before = used(h);
                let mut p = ptr::null_mut();
                let status = carve_arena_aligned_alloc(h, alignment, size, &mut p);
                if status == OK {
                    let addr = p as usize;
                    prop_assert_eq!(addr % alignment, 0);
                    prop_assert!(addr + size <= base + 256);
                    prop_assert_eq!(used(h), addr - base + size);
                } else {
                    prop_assert_eq!(status, CarveStatus::OutOfMemory as i32);
                    prop_assert!(p.is_null());
                    prop_assert_eq!(used(h), before);
                }
            }
            prop_assert_eq!(carve_arena_destroy(h), OK);
        }
    }
}
