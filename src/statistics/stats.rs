use serde::Serialize;

use crate::MemberIndex;
use crate::dict::NameDict;
use crate::graph::FriendGraph;

/// Shape statistics for one social network.
///
/// Produced either incrementally by the ingest pass (name lengths while
/// lines stream by, degree extremes once the graph is compacted) or in one
/// sweep over already-loaded structures via [`NetworkStats::measure`].
/// Ties on the degree extremes go to the lowest member index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkStats {
    /// Number of members in the network
    pub members: usize,

    /// Number of undirected friendships
    pub edges: usize,

    /// Length in bytes of the shortest member name
    pub name_len_min: usize,

    /// Length in bytes of the longest member name
    pub name_len_max: usize,

    /// Smallest number of friends any member has
    pub degree_min: usize,

    /// Largest number of friends any member has
    pub degree_max: usize,

    /// Name of the member with the fewest friends
    pub least_connected: String,

    /// Name of the member with the most friends
    pub most_connected: String,
}

impl NetworkStats {
    /// Creates a tracker with all counters at their fold identities, so the
    /// first observation wins every min/max.
    pub fn new() -> Self {
        NetworkStats {
            members: 0,
            edges: 0,
            name_len_min: usize::MAX,
            name_len_max: 0,
            degree_min: usize::MAX,
            degree_max: 0,
            least_connected: String::new(),
            most_connected: String::new(),
        }
    }

    /// Folds one member name length into the extremes.
    pub fn note_name_len(&mut self, len: usize) {
        self.name_len_min = self.name_len_min.min(len);
        self.name_len_max = self.name_len_max.max(len);
    }

    /// Folds one member's degree into the extremes. Strict comparisons, so
    /// on ties the member observed first keeps the title.
    pub fn note_member_degree(&mut self, name: &str, degree: usize) {
        if degree < self.degree_min {
            self.degree_min = degree;
            self.least_connected = name.to_owned();
        }
        if degree > self.degree_max {
            self.degree_max = degree;
            self.most_connected = name.to_owned();
        }
    }

    /// Measures a frozen network in one sweep, in ascending index order.
    ///
    /// This is what serves `--stats` for snapshot inputs, where no ingest
    /// pass ever ran. An empty network yields the all-zero report.
    pub fn measure(dict: &NameDict, graph: &FriendGraph) -> Self {
        let mut stats = NetworkStats::new();
        stats.members = dict.len();
        stats.edges = graph.edge_count();
        for index in 0..dict.len() as MemberIndex {
            if let Some(name) = dict.name_of(index) {
                stats.note_name_len(name.len());
                stats.note_member_degree(name, graph.degree(index));
            }
        }
        stats.normalized()
    }

    /// Collapses the fold identities of an empty report back to zero.
    pub fn normalized(mut self) -> Self {
        if self.members == 0 {
            self.name_len_min = 0;
            self.degree_min = 0;
        }
        self
    }

    /// One-line human-readable report.
    pub fn summary(&self) -> String {
        format!(
            "members={} edges={} name_min={} name_max={} least_connected={} degree_min={} most_connected={} degree_max={}",
            self.members,
            self.edges,
            self.name_len_min,
            self.name_len_max,
            self.least_connected,
            self.degree_min,
            self.most_connected,
            self.degree_max,
        )
    }
}

impl Default for NetworkStats {
    fn default() -> Self {
        NetworkStats::new()
    }
}

/// Work counters for one search, or for several merged together.
///
/// Each searcher thread keeps its own instance and the two get merged after
/// the join, so no counter is ever shared between threads. The interesting
/// number on a well-shaped network is how small `nodes_expanded` stays
/// relative to the member count: two frontiers meeting in the middle
/// should touch a small fraction of it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    /// Members dequeued and expanded
    nodes_expanded: usize,

    /// Members marked with a first-visit depth
    members_marked: usize,
}

impl SearchStats {
    /// Creates a counter set at zero.
    pub fn new() -> Self {
        SearchStats::default()
    }

    /// Counts one expanded member.
    pub fn bump_nodes_expanded(&mut self) {
        self.nodes_expanded += 1;
    }

    /// Returns the number of members expanded.
    pub fn get_nodes_expanded(&self) -> usize {
        self.nodes_expanded
    }

    /// Counts one first-visit mark.
    pub fn bump_members_marked(&mut self) {
        self.members_marked += 1;
    }

    /// Returns the number of members marked.
    pub fn get_members_marked(&self) -> usize {
        self.members_marked
    }

    /// Sums two counter sets, e.g. the two searchers of one query.
    pub fn merge(&self, other: &Self) -> Self {
        SearchStats {
            nodes_expanded: self.nodes_expanded + other.nodes_expanded,
            members_marked: self.members_marked + other.members_marked,
        }
    }
}
