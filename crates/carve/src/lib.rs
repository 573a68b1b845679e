//! Carve: region allocation over caller-supplied memory.
//!
//! This is the top-level facade crate that re-exports the public API of the
//! Carve sub-crates. For most users, adding `carve` as a single dependency
//! is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use carve::prelude::*;
//!
//! let mut block = [0u8; 256];
//! let mut arena = Arena::new(&mut block);
//!
//! let header = arena.allocate_aligned(16, 8).unwrap();
//! header.copy_from_slice(b"CARVE\0\0\0");
//! let name = arena.duplicate_str("region").unwrap();
//! let label = carve::arena_format!(arena, "{name}-{}", 7).unwrap();
//! assert_eq!(label, "region-7");
//!
//! arena.reset();
//! assert_eq!(arena.used(), 0);
//!
//! let mut log = AppendBuffer::new();
//! log.write("allocated ").unwrap();
//! log.write_formatted(format_args!("{} bytes", 256)).unwrap();
//! assert_eq!(log.as_str(), "allocated 256 bytes");
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`arena`] | `carve-arena` | `Arena`, alignment helpers, configuration, errors |
//! | [`buf`] | `carve-buf` | `AppendBuffer` and its error type |
//!
//! The C interface lives in the separate `carve-ffi` crate.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Region allocator, alignment arithmetic and configuration (`carve-arena`).
pub use carve_arena as arena;

/// Heap-backed append buffer (`carve-buf`).
pub use carve_buf as buf;

pub use carve_arena::arena_format;

/// Common imports for typical Carve usage.
///
/// ```rust
/// use carve::prelude::*;
/// ```
pub mod prelude {
    // Arena
    pub use carve_arena::{Arena, ArenaConfig, ArenaError, DEFAULT_ALIGNMENT};

    // Alignment
    pub use carve_arena::{align_forward, is_power_of_two};

    // Buffer
    pub use carve_buf::{AppendBuffer, BufferError};
}
