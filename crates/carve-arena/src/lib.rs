//! Fixed-capacity region ("arena") allocation over caller-supplied memory.
//!
//! An [`Arena`] borrows a single byte block and serves every allocation by
//! advancing a cursor inside it. Nothing is ever freed individually: the
//! whole region is reclaimed at once with [`Arena::reset`] or
//! [`Arena::zero_reset`]. The only resize that avoids a copy is growing or
//! shrinking the most recently issued allocation.
//!
//! # Architecture
//!
//! ```text
//! Arena<'a>
//! ├── memory: &'a mut [u8]     (caller-owned, never freed by the arena)
//! ├── current_offset           (next free byte)
//! └── previous_offset          (start of the last allocation)
//! ```
//!
//! Allocation methods take `&self` and hand out disjoint `&mut [u8]`
//! spans, so many allocations can be alive at once. Lifecycle methods
//! (`reset`, `zero_reset`, `deinitialize`, `initialize`) take `&mut self`,
//! which makes the borrow checker reject any span kept across them.
//!
//! # Guarantees
//!
//! - Every granted span is zero-filled.
//! - A failed call leaves both offsets untouched.
//! - Capacity checks are overflow-safe, including the in-place resize path.
//!
//! This crate is one of two that may contain `unsafe` code (along with
//! `carve-ffi`); all of it lives in `raw.rs` and the arena's span plumbing.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod align;
pub mod arena;
pub mod config;
mod dup;
pub mod error;
mod format;
mod raw;

// Public re-exports for the primary API surface.
pub use align::{align_forward, checked_align_forward, is_power_of_two, DEFAULT_ALIGNMENT};
pub use arena::Arena;
pub use config::{ArenaConfig, ConfigError};
pub use error::ArenaError;
