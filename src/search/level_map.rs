use std::sync::atomic::{AtomicU32, Ordering};

use crate::MemberIndex;

/// Per-searcher visit map: for every member, the BFS depth at which the
/// owning searcher first enqueued it, or 0 for "not yet".
///
/// Depths are 1-based (the searcher's own start vertex sits at depth 1), so
/// the zero-initialized cell doubles as the sentinel. Cells are atomics
/// because the *other* searcher reads them while the owner writes: one
/// writer per cell, relaxed orderings on both sides. A cell is monotone
/// (once set it never changes), so any nonzero value a peer observes is a
/// real visit at a real depth.
///
/// # Examples
/// ```
/// use sixdeg::search::LevelMap;
///
/// let map = LevelMap::new(8);
/// assert_eq!(map.depth(3), 0);
/// map.mark(3, 1);
/// assert_eq!(map.depth(3), 1);
/// ```
pub struct LevelMap {
    cells: Box<[AtomicU32]>,
}

impl LevelMap {
    /// Creates a map for `len` members, all unvisited.
    pub fn new(len: usize) -> Self {
        let mut cells = Vec::with_capacity(len);
        cells.resize_with(len, || AtomicU32::new(0));
        LevelMap {
            cells: cells.into_boxed_slice(),
        }
    }

    /// Number of members covered.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True for the degenerate zero-member map.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// First-visit depth of `member`, 0 when unvisited.
    pub fn depth(&self, member: MemberIndex) -> u32 {
        self.cells[member as usize].load(Ordering::Relaxed)
    }

    /// Records the first-visit depth of `member`. Only the owning searcher
    /// calls this, and only for members it has not marked yet.
    pub fn mark(&self, member: MemberIndex, depth: u32) {
        debug_assert!(depth > 0, "depth 0 is the unvisited sentinel");
        self.cells[member as usize].store(depth, Ordering::Relaxed);
    }
}
