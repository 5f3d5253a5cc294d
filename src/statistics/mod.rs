//! Network shape reporting.
//!
//! Collects the numbers the CLI prints for `--stats`: member and edge
//! counts, name length extremes, and the best- and least-connected members.
//! Statistics are a side channel; nothing in the search path depends on
//! them.

mod stats;

pub use stats::*;
