//! Workload profiles for benchmarking Carve.
//!
//! - [`request_sizes`]: deterministic pseudo-random allocation sizes
//! - [`request_alignments`]: a matching stream of power-of-two alignments
//! - [`fill_arena`]: allocate a workload until the arena runs out

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use carve_arena::Arena;

/// Mix `seed` and `i` into a well-spread 64-bit value.
fn mix(seed: u64, i: u64) -> u64 {
    seed.wrapping_mul(6364136223846793005)
        .wrapping_add(i.wrapping_mul(1442695040888963407))
        .rotate_right(29)
}

/// Generate `n` allocation sizes in `1..=max_size`, deterministic in `seed`.
pub fn request_sizes(n: usize, max_size: usize, seed: u64) -> Vec<usize> {
    assert!(max_size > 0, "max_size must be non-zero");
    (0..n as u64)
        .map(|i| (mix(seed, i) % max_size as u64) as usize + 1)
        .collect()
}

/// Generate `n` alignments between 1 and `1 << max_shift`, deterministic in
/// `seed`.
pub fn request_alignments(n: usize, max_shift: u32, seed: u64) -> Vec<usize> {
    (0..n as u64)
        .map(|i| 1usize << (mix(seed ^ 0x9e37_79b9, i) % (max_shift as u64 + 1)))
        .collect()
}

/// Allocate `sizes` (paired with `alignments`) in order, stopping at the
/// first failure. Returns how many allocations succeeded.
pub fn fill_arena(arena: &Arena<'_>, sizes: &[usize], alignments: &[usize]) -> usize {
    sizes
        .iter()
        .zip(alignments)
        .take_while(|&(&size, &alignment)| arena.allocate_aligned(alignment, size).is_ok())
        .count()
}
