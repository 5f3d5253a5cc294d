use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use crate::graph::FriendGraph;
use crate::search::LevelMap;
use crate::statistics::SearchStats;
use crate::{INDEX_MAX, MemberIndex};

/// What one searcher brings home: the vertex where it stopped and the tie
/// count it can vouch for. `INDEX_MAX` ties means this searcher found no
/// connection before stopping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearcherReport {
    /// Meeting vertex, or the searcher's own target when it walked all the
    /// way, or `INDEX_MAX`
    pub common: MemberIndex,

    /// Number of intermediaries on the path this searcher certifies
    pub ties: MemberIndex,

    /// How much work this searcher did before stopping
    pub stats: SearchStats,
}

impl SearcherReport {
    fn empty_handed() -> Self {
        SearcherReport {
            common: INDEX_MAX,
            ties: INDEX_MAX,
            stats: SearchStats::new(),
        }
    }

    /// Did this searcher certify any connection at all?
    pub fn reached(&self) -> bool {
        self.ties != INDEX_MAX
    }

    fn tighten(&mut self, common: MemberIndex, ties: MemberIndex) {
        if ties < self.ties {
            self.common = common;
            self.ties = ties;
        }
    }
}

/// Everything one searcher owns that the other is allowed to look at.
struct Side {
    levels: LevelMap,
    done: AtomicBool,
}

impl Side {
    fn new(len: usize) -> Self {
        Side {
            levels: LevelMap::new(len),
            done: AtomicBool::new(false),
        }
    }
}

/// Runs the two-frontier search between two distinct, non-adjacent members
/// and returns both searchers' reports; the answer is the smaller of the
/// two tie counts, `INDEX_MAX` twice meaning no path.
///
/// # Design
///
/// Two searchers run on two OS threads, one from each endpoint. Each owns a
/// FIFO frontier of `(member, depth)` pairs and a [`LevelMap`] the peer
/// polls. A search ends for one of three reasons:
///
/// - **Target reached**: the searcher dequeues its own target; its level
///   map alone certifies the path length.
/// - **Common visit**: some vertex outside the endpoints turns out marked
///   in both maps; the two depths add up to a path length through it.
///   Checked when a member is dequeued and when a fresh mark lands on a
///   member the peer already holds. The first hit is only an upper bound,
///   so the searcher keeps scanning the rest of its frontier (no more
///   expansion) before committing the minimum it saw.
/// - **Exhaustion**: the frontier dries up; no path exists on this side.
///
/// The ending searcher sets both `done` flags under the per-query commit
/// mutex; the peer notices and bails out. A searcher that merely observes
/// the *peer's* flag while its own is clear stops enqueueing and flushes
/// its queue, which keeps the exhausted-peer case cheap.
///
/// Depths are 1-based edge counts from the searcher's start, and the
/// reported distance counts intermediaries: dequeuing the target at depth
/// `d` certifies `d - 2` ties, a common visit at depths `d` and `p`
/// certifies `d + p - 3`.
///
/// # Panics
/// Panics if a searcher thread panics. Both endpoints must be in range,
/// distinct and not direct friends; the facade guarantees that.
pub fn ties_between(
    graph: &FriendGraph,
    source: MemberIndex,
    target: MemberIndex,
) -> (SearcherReport, SearcherReport) {
    debug_assert!((source as usize) < graph.len());
    debug_assert!((target as usize) < graph.len());
    debug_assert!(source != target, "self queries never reach the engine");
    debug_assert!(
        !graph.are_friends(source, target),
        "direct friends never reach the engine"
    );

    let outbound = Side::new(graph.len());
    let inbound = Side::new(graph.len());
    let commit = Mutex::new(());

    thread::scope(|scope| {
        let forward = scope.spawn(|| {
            Searcher::new(graph, source, target, &outbound, &inbound, &commit).run()
        });
        let backward = scope.spawn(|| {
            Searcher::new(graph, target, source, &inbound, &outbound, &commit).run()
        });
        (
            forward.join().expect("forward searcher panicked"),
            backward.join().expect("backward searcher panicked"),
        )
    })
}

struct Searcher<'q> {
    graph: &'q FriendGraph,
    start: MemberIndex,
    goal: MemberIndex,
    mine: &'q Side,
    peer: &'q Side,
    commit: &'q Mutex<()>,
    frontier: VecDeque<(MemberIndex, u32)>,
    report: SearcherReport,
    stats: SearchStats,
}

impl<'q> Searcher<'q> {
    fn new(
        graph: &'q FriendGraph,
        start: MemberIndex,
        goal: MemberIndex,
        mine: &'q Side,
        peer: &'q Side,
        commit: &'q Mutex<()>,
    ) -> Self {
        Searcher {
            graph,
            start,
            goal,
            mine,
            peer,
            commit,
            frontier: VecDeque::new(),
            report: SearcherReport::empty_handed(),
            stats: SearchStats::new(),
        }
    }

    fn run(mut self) -> SearcherReport {
        self.mine.levels.mark(self.start, 1);
        self.stats.bump_members_marked();
        self.frontier.push_back((self.start, 1));

        while let Some((member, depth)) = self.frontier.pop_front() {
            if self.mine.done.load(Ordering::Relaxed) {
                // the peer already committed an answer for both of us
                break;
            }
            if member == self.goal {
                self.report.tighten(self.goal, depth - 2);
                self.finish();
                break;
            }
            if let Some(ties) = self.meeting_at(member, depth) {
                self.report.tighten(member, ties);
                self.settle();
                break;
            }
            if self.peer.done.load(Ordering::Relaxed) {
                // peer is finished; nothing new will pay off, flush the rest
                continue;
            }
            self.stats.bump_nodes_expanded();
            self.expand(member, depth);
            if self.report.reached() {
                self.settle();
                break;
            }
        }

        self.mine.done.store(true, Ordering::Relaxed);
        self.report.stats = self.stats;
        self.report
    }

    /// Marks and enqueues every unvisited friend of `member`, watching for
    /// fresh marks that land on peer-visited territory. The whole list is
    /// expanded even after a hit: a sibling neighbor may meet closer.
    fn expand(&mut self, member: MemberIndex, depth: u32) {
        for &friend in self.graph.neighbors(member) {
            if self.mine.levels.depth(friend) != 0 {
                continue;
            }
            self.mine.levels.mark(friend, depth + 1);
            self.stats.bump_members_marked();
            self.frontier.push_back((friend, depth + 1));
            if let Some(ties) = self.meeting_at(friend, depth + 1) {
                self.report.tighten(friend, ties);
            }
        }
    }

    /// Tie count through `member` if the peer has been there too. Endpoints
    /// are nobody's intermediary, so they never count as a meeting.
    fn meeting_at(&self, member: MemberIndex, depth: u32) -> Option<MemberIndex> {
        if member == self.start || member == self.goal {
            return None;
        }
        let peer_depth = self.peer.levels.depth(member);
        if peer_depth == 0 {
            return None;
        }
        Some(depth + peer_depth - 3)
    }

    /// A meeting is an upper bound until the rest of the current wave has
    /// had its say: sweep the remaining frontier (meeting checks only, no
    /// expansion), keep the minimum, then commit.
    fn settle(&mut self) {
        while let Some((member, depth)) = self.frontier.pop_front() {
            if member == self.goal {
                self.report.tighten(self.goal, depth - 2);
                continue;
            }
            if let Some(ties) = self.meeting_at(member, depth) {
                self.report.tighten(member, ties);
            }
        }
        self.finish();
    }

    /// Commits the terminal state: both done flags flip under the shared
    /// mutex, so exactly one coherent shutdown reaches the peer.
    fn finish(&self) {
        let _guard = self.commit.lock().unwrap();
        self.mine.done.store(true, Ordering::Relaxed);
        self.peer.done.store(true, Ordering::Relaxed);
    }
}
