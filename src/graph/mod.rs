//! Compact friendship adjacency.
//!
//! The graph is stored CSR-style: one flat neighbor array plus one offset
//! array, which is as cache-friendly as an adjacency structure gets and
//! serializes without chasing a single pointer. Neighbor lists come out of
//! ingest ordered hubs-first; that ordering is part of what "compacted"
//! means here and the search engine leans on it.

mod friend_graph;

pub use friend_graph::*;
