//! # Sixdeg: Degree-of-Separation Queries over a Static Social Graph
//!
//! This library answers "how many ties apart are these two members?" queries
//! over a large, immutable, undirected social network using a concurrent
//! bidirectional breadth-first search.
//!
//! ## Core Concepts
//!
//! - **NameDict**: A dense bijection between member names and `u32` indices,
//!   with a fixed-width binary form that loads in a single pass
//! - **FriendGraph**: CSR-style adjacency where each neighbor list is ordered
//!   hubs-first (descending degree), so both search frontiers reach the
//!   well-connected middle of the network quickly
//! - **Snapshot**: A self-describing little-endian file that concatenates the
//!   two compact forms; it is rebuilt from text input once and then
//!   memory-mapped on every later run
//! - **Bidirectional BFS**: Two searcher threads start from the two endpoints
//!   and race toward each other; the first vertex visited by both sides
//!   bounds the shortest path, and the reported separation is the number of
//!   *intermediaries*, not edges (direct friends are zero ties apart)
//!
//! ## Modules
//!
//! - [`codec`]: Fixed-width little-endian integer primitives
//! - [`dict`]: Member name dictionary and its compact codec
//! - [`graph`]: Compact friendship adjacency and its compact codec
//! - [`ingest`]: Text-input processing into the frozen network structures
//! - [`snapshot`]: File-level framing for storing/loading a whole network
//! - [`search`]: The two-frontier search engine and the query facade
//! - [`statistics`]: Network shape reporting for the CLI
//!

pub mod codec;
pub mod dict;
pub mod graph;
pub mod ingest;
pub mod search;
pub mod snapshot;
pub mod statistics;

/// Dense member identifier. Half the width of `usize` on the target hosts,
/// which keeps the serialized graph and the per-query level maps compact.
pub type MemberIndex = u32;

/// Pseudo-null index: "invalid", "unknown member" or "no path between them".
pub const INDEX_MAX: MemberIndex = MemberIndex::MAX;

/// Serialized width of one member name, terminating NUL included. The
/// longest name observed in the reference network is 24 bytes, so 32 leaves
/// headroom while keeping name slots cache-line friendly.
pub const NAME_BYTES: usize = 32;
