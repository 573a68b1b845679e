//! Test utilities for Carve development.
//!
//! Provides over-aligned backing blocks so arena offset arithmetic is
//! deterministic in tests, plus `Display` fixtures that misbehave in
//! controlled ways for exercising formatting failure paths.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{AlignedBlock, FailingDisplay, GrowingDisplay, BLOCK_ALIGN};
