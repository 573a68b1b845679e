//! The facade exposes a coherent API across both sub-crates.

use carve::prelude::*;
use carve_test_utils::AlignedBlock;

#[test]
fn arena_output_feeds_buffer() {
    let mut block = AlignedBlock::<128>::new();
    let arena = Arena::new(block.as_mut_slice());
    let mut out = AppendBuffer::with_capacity(4);

    for i in 0..3 {
        let line = carve::arena_format!(arena, "line {i};").unwrap();
        out.write(line).unwrap();
    }
    assert_eq!(out.as_str(), "line 0;line 1;line 2;");
    // Seven bytes of text plus a terminator, each at the default alignment.
    assert_eq!(arena.used(), 2 * DEFAULT_ALIGNMENT + 8);
    assert!(out.capacity() > out.len());
}

#[test]
fn prelude_alignment_helpers() {
    assert!(is_power_of_two(DEFAULT_ALIGNMENT));
    assert_eq!(align_forward(17, 16), 32);
    assert!(carve::arena::checked_align_forward(usize::MAX, 8).is_none());
}

#[test]
fn config_errors_surface_through_facade() {
    let mut block = AlignedBlock::<16>::new();
    let config = ArenaConfig::new().with_default_alignment(12);
    let err = Arena::with_config(block.as_mut_slice(), &config).unwrap_err();
    assert_eq!(err, carve::arena::ConfigError::InvalidAlignment { value: 12 });
}

#[test]
fn exhaustion_is_reported_not_panicked() {
    let mut block = AlignedBlock::<8>::new();
    let arena = Arena::new(block.as_mut_slice());
    let err = arena.allocate(9).unwrap_err();
    assert!(err.is_out_of_memory());
    assert!(matches!(err, ArenaError::OutOfMemory { requested: 9, .. }));
}
