//! Fixed-width little-endian integer primitives.
//!
//! Every serialized structure in this crate (name dictionary, friend graph,
//! snapshot framing) is built from exactly two integer widths: `u32` for
//! counts and member indices, `u64` for in-file byte offsets and section
//! lengths. All of them are little-endian and decoded byte-wise; a loader on
//! a big-endian host byte-swaps, and nothing here ever relies on alignment.

mod primitives;

pub use primitives::*;
