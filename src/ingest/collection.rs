use std::cmp::Reverse;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result, bail, ensure};
use hashbrown::{HashMap, HashSet};
use tracing::info;

use crate::dict::NameDict;
use crate::graph::FriendGraph;
use crate::statistics::NetworkStats;
use crate::{MemberIndex, NAME_BYTES};

/// One member of the social network while it is still being built.
#[derive(Debug, Default)]
struct Member {
    /// Dense index assigned at first appearance
    index: MemberIndex,

    /// Indices of this member's friends, unordered
    friends: HashSet<MemberIndex>,
}

/// Mutable working set for the ingest pass.
///
/// Feeds on `name,friend` lines and accumulates members, friendships and
/// side-channel statistics. Index assignment is "first appearance wins":
/// the first never-seen name in the stream gets index 0, the next one 1,
/// and so on, with the key in a line registered before its friend. That
/// ordering is what makes snapshots reproducible from the same input.
#[derive(Debug, Default)]
pub struct Collection {
    members: HashMap<Box<str>, Member>,
    edges: usize,
    stats: NetworkStats,
}

impl Collection {
    /// Creates an empty working set.
    pub fn new() -> Self {
        Collection::default()
    }

    /// Number of members registered so far.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// True when nothing has been ingested yet.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Drops everything ingested so far, including statistics.
    pub fn reset(&mut self) {
        *self = Collection::default();
    }

    /// Ingests a whole relationship file.
    pub fn from_path(path: &Path) -> Result<Collection> {
        let file =
            File::open(path).with_context(|| format!("open input file {}", path.display()))?;
        let mut collection = Collection::new();
        collection
            .process(BufReader::new(file))
            .with_context(|| format!("process {}", path.display()))?;
        Ok(collection)
    }

    /// Ingests every line of `reader`. Fails closed: the first malformed
    /// line aborts the pass with its line number in the error chain.
    pub fn process<R: BufRead>(&mut self, reader: R) -> Result<()> {
        for (at, line) in reader.lines().enumerate() {
            let line = line.with_context(|| format!("read line {}", at + 1))?;
            self.feed_line(&line, at + 1)?;
        }
        ensure!(!self.is_empty(), "no members found in input");
        info!(members = self.len(), edges = self.edges, "ingest pass complete");
        Ok(())
    }

    /// Parses and applies a single `name,friend` line.
    ///
    /// Everything that is not alphanumeric, `_` or `,` is stripped before
    /// parsing, which also disposes of stray CR bytes on CRLF input.
    fn feed_line(&mut self, raw: &str, number: usize) -> Result<()> {
        if raw.is_empty() {
            bail!("line {number}: empty line");
        }
        let line: String = raw
            .chars()
            .filter(|&c| c.is_ascii_alphanumeric() || c == '_' || c == ',')
            .collect();
        if line.len() < 3 {
            bail!("line {number}: too short to relate two members");
        }
        let Some((key, friend)) = line.split_once(',') else {
            bail!("line {number}: missing comma");
        };
        if key.is_empty() {
            bail!("line {number}: empty member name");
        }
        if friend.is_empty() {
            bail!("line {number}: empty friend name");
        }
        self.add(key, friend)
            .with_context(|| format!("line {number}"))
    }

    /// Records one bidirectional friendship. Idempotent; a member befriending
    /// themselves carries no information and is dropped whole.
    fn add(&mut self, key: &str, new_friend: &str) -> Result<()> {
        if key == new_friend {
            return Ok(());
        }
        let a = self.register(key)?;
        let b = self.register(new_friend)?;
        if let Some(member) = self.members.get_mut(key)
            && member.friends.insert(b)
        {
            self.edges += 1;
        }
        if let Some(member) = self.members.get_mut(new_friend) {
            member.friends.insert(a);
        }
        Ok(())
    }

    /// Returns the member's index, assigning the next free one on first
    /// appearance.
    fn register(&mut self, name: &str) -> Result<MemberIndex> {
        ensure!(
            name.len() < NAME_BYTES,
            "member name '{name}' does not fit {} bytes",
            NAME_BYTES - 1
        );
        let before = self.members.len();
        let member = self.members.entry_ref(name).or_insert_with(|| Member {
            index: before as MemberIndex,
            friends: HashSet::new(),
        });
        let index = member.index;
        if self.members.len() > before {
            self.stats.note_name_len(name.len());
        }
        Ok(index)
    }

    /// Freezes the working set into the compact pair, plus the statistics
    /// report as a side channel.
    ///
    /// Each adjacency list is materialized as distinct indices ordered by
    /// descending neighbor degree, ascending index on ties. This is the canonical
    /// order a freshly loaded snapshot is expected to exhibit too.
    pub fn compact(&self) -> Result<(NameDict, FriendGraph, NetworkStats)> {
        ensure!(!self.is_empty(), "nothing to compact");
        let count = self.members.len();

        let mut names: Vec<&str> = vec![""; count];
        let mut lists: Vec<Vec<MemberIndex>> = vec![Vec::new(); count];
        for (name, member) in &self.members {
            names[member.index as usize] = name;
            lists[member.index as usize] = member.friends.iter().copied().collect();
        }

        let degrees: Vec<usize> = lists.iter().map(Vec::len).collect();
        for list in &mut lists {
            list.sort_unstable_by_key(|&friend| (Reverse(degrees[friend as usize]), friend));
        }

        let mut dict = NameDict::new();
        let mut stats = self.stats.clone();
        stats.members = count;
        stats.edges = self.edges;
        for (index, name) in names.iter().enumerate() {
            // register() bounded every name, so the dictionary takes it
            ensure!(
                dict.push(name) == Some(index as MemberIndex),
                "member table lost its dense index order"
            );
            stats.note_member_degree(name, degrees[index]);
        }

        Ok((dict, FriendGraph::from_lists(lists), stats.normalized()))
    }
}
