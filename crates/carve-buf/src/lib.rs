//! Heap-backed append buffer for incremental text assembly.
//!
//! [`AppendBuffer`] is the general-heap companion to `carve-arena`: an
//! amortized grow-by-doubling text accumulator with formatted writes and
//! owned exports. The two crates do not depend on each other.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod buffer;
pub mod error;

pub use buffer::AppendBuffer;
pub use error::BufferError;
