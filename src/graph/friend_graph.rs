use hashbrown::HashSet;

use crate::MemberIndex;
use crate::codec::{ByteReader, U32_BYTES, U64_BYTES, push_u32, push_u64};

/// Immutable adjacency over densely indexed members.
///
/// # Invariants
/// - Edges are undirected: `b ∈ neighbors(a)` iff `a ∈ neighbors(b)`.
/// - No self-loops, no duplicates within one list.
/// - Each list is ordered by descending neighbor degree, ascending index on
///   ties. Hubs first: on a power-law network both BFS frontiers hit the
///   same well-connected intermediaries early, which is what lets two
///   searchers meet after touching a small fraction of the edge set.
///
/// # Compact form
///
/// ```text
/// u32 N
/// N × u64   absolute byte offsets of the per-member blocks, relative to
///           the start of this blob
/// N × { u32 m, m × u32 neighbor }   blocks in index order
/// ```
///
/// The offset table is redundant given the blocks, but it lets a reader
/// index into an untouched (e.g. memory-mapped) blob in O(1) instead of
/// walking it, and it gives `load` a strong consistency check for free.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FriendGraph {
    /// `len() + 1` cumulative neighbor counts; list `i` lives at
    /// `edges[offsets[i]..offsets[i + 1]]`.
    offsets: Vec<usize>,
    edges: Vec<MemberIndex>,
}

impl FriendGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        FriendGraph::default()
    }

    /// Builds a graph from per-member neighbor lists, preserving list order.
    ///
    /// The caller is responsible for the structural invariants (symmetry, no
    /// self-loops or duplicates, hub-first order); ingest establishes them
    /// before calling this.
    pub fn from_lists(lists: Vec<Vec<MemberIndex>>) -> Self {
        let mut offsets = Vec::with_capacity(lists.len() + 1);
        offsets.push(0);
        let mut edges = Vec::with_capacity(lists.iter().map(Vec::len).sum());
        for list in &lists {
            edges.extend_from_slice(list);
            offsets.push(edges.len());
        }
        FriendGraph { offsets, edges }
    }

    /// Number of members covered by the graph.
    pub fn len(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    /// True when the graph holds no members at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of undirected friendships.
    pub fn edge_count(&self) -> usize {
        self.edges.len() / 2
    }

    /// Read-only view of one member's friends, hub-first. Out-of-range
    /// members have no friends.
    pub fn neighbors(&self, member: MemberIndex) -> &[MemberIndex] {
        let member = member as usize;
        if member >= self.len() {
            return &[];
        }
        &self.edges[self.offsets[member]..self.offsets[member + 1]]
    }

    /// Number of friends of one member.
    pub fn degree(&self, member: MemberIndex) -> usize {
        self.neighbors(member).len()
    }

    /// Are these two members direct friends? False whenever either index is
    /// out of range.
    ///
    /// Linear in `degree(a)`: the lists are degree-ordered, not
    /// index-ordered, so there is nothing to bisect.
    pub fn are_friends(&self, a: MemberIndex, b: MemberIndex) -> bool {
        (b as usize) < self.len() && self.neighbors(a).contains(&b)
    }

    /// Serializes the graph into its canonical byte form.
    pub fn compact(&self) -> Vec<u8> {
        let count = self.len();
        let table = U32_BYTES + count * U64_BYTES;
        let blocks = count * U32_BYTES + self.edges.len() * U32_BYTES;
        let mut raw = Vec::with_capacity(table + blocks);

        push_u32(&mut raw, count as u32);
        let mut block_at = table as u64;
        for member in 0..count {
            push_u64(&mut raw, block_at);
            block_at += (U32_BYTES + self.degree(member as MemberIndex) * U32_BYTES) as u64;
        }
        for member in 0..count {
            let friends = self.neighbors(member as MemberIndex);
            push_u32(&mut raw, friends.len() as u32);
            for &friend in friends {
                push_u32(&mut raw, friend);
            }
        }
        raw
    }

    /// Replaces the contents with the adjacency parsed from `raw`.
    ///
    /// Returns the number of members, or 0 on any validation failure: short
    /// blob, an offset table inconsistent with the actual block sizes,
    /// trailing bytes after the last block, a neighbor index out of range, a
    /// self-loop, or a duplicate within one list. A failed load leaves the
    /// graph empty.
    pub fn load(&mut self, raw: &[u8]) -> MemberIndex {
        match Self::parse(raw) {
            Some(graph) => {
                *self = graph;
                self.len() as MemberIndex
            }
            None => {
                *self = FriendGraph::default();
                0
            }
        }
    }

    fn parse(raw: &[u8]) -> Option<FriendGraph> {
        let mut reader = ByteReader::new(raw);
        let count = reader.u32()? as usize;
        // bound the count before reserving anything for it
        let table_bytes = count.checked_mul(U64_BYTES)?;
        if raw.len().saturating_sub(U32_BYTES) < table_bytes {
            return None;
        }

        let mut table = Vec::with_capacity(count);
        for _ in 0..count {
            table.push(reader.u64()?);
        }

        let mut offsets = Vec::with_capacity(count + 1);
        offsets.push(0);
        let mut edges = Vec::new();
        let mut seen = HashSet::new();
        for member in 0..count {
            // each block must start exactly where the table says it does
            if table[member] != reader.position() as u64 {
                return None;
            }
            let friends = reader.u32()? as usize;
            seen.clear();
            for _ in 0..friends {
                let friend = reader.u32()?;
                if friend as usize >= count || friend as usize == member {
                    return None;
                }
                if !seen.insert(friend) {
                    return None;
                }
                edges.push(friend);
            }
            offsets.push(edges.len());
        }

        if reader.remaining() != 0 {
            return None;
        }
        Some(FriendGraph { offsets, edges })
    }
}
