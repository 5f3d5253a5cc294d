use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result, ensure};
use memmap2::Mmap;
use tracing::info;

use crate::MemberIndex;
use crate::codec::{ByteReader, U32_BYTES, U64_BYTES, push_u32, push_u64};
use crate::dict::NameDict;
use crate::graph::FriendGraph;

/// Serialized width of the snapshot header: member count plus the two
/// section lengths.
pub const HEADER_BYTES: usize = U32_BYTES + 2 * U64_BYTES;

/// The frozen network: dictionary and graph, loaded once, immutable for the
/// rest of the process. Queries borrow it read-only; any number of them may
/// run concurrently.
#[derive(Debug, Default)]
pub struct Network {
    pub dict: NameDict,
    pub graph: FriendGraph,
}

/// Byte accounting returned by [`Network::store`], mainly for logs and
/// double checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotSizes {
    pub members: MemberIndex,
    pub dict_bytes: u64,
    pub graph_bytes: u64,
}

impl Network {
    /// Bundles an already-compacted pair.
    pub fn new(dict: NameDict, graph: FriendGraph) -> Self {
        Network { dict, graph }
    }

    /// Number of members, as the dictionary sees it.
    pub fn len(&self) -> usize {
        self.dict.len()
    }

    /// True when the network holds nobody.
    pub fn is_empty(&self) -> bool {
        self.dict.is_empty()
    }

    /// Writes the snapshot file:
    ///
    /// ```text
    /// u32 N | u64 L_dict | u64 L_graph | dict blob | graph blob
    /// ```
    ///
    /// Refuses to serialize an empty network or one whose dictionary and
    /// graph disagree on the member count.
    pub fn store(&self, path: &Path) -> Result<SnapshotSizes> {
        ensure!(!self.is_empty(), "nothing to store");
        ensure!(
            self.dict.len() == self.graph.len(),
            "mismatched dictionary ({}) and graph ({}) sizes",
            self.dict.len(),
            self.graph.len()
        );

        let dict_blob = self.dict.compact();
        let graph_blob = self.graph.compact();
        let mut header = Vec::with_capacity(HEADER_BYTES);
        push_u32(&mut header, self.len() as u32);
        push_u64(&mut header, dict_blob.len() as u64);
        push_u64(&mut header, graph_blob.len() as u64);

        let file =
            File::create(path).with_context(|| format!("create snapshot {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        writer.write_all(&header)?;
        writer.write_all(&dict_blob)?;
        writer.write_all(&graph_blob)?;
        writer
            .flush()
            .with_context(|| format!("write snapshot {}", path.display()))?;

        let sizes = SnapshotSizes {
            members: self.len() as MemberIndex,
            dict_bytes: dict_blob.len() as u64,
            graph_bytes: graph_blob.len() as u64,
        };
        info!(
            path = %path.display(),
            members = sizes.members,
            dict_bytes = sizes.dict_bytes,
            graph_bytes = sizes.graph_bytes,
            "snapshot stored"
        );
        Ok(sizes)
    }

    /// Maps a snapshot file read-only and rebuilds the network from it.
    ///
    /// The header arithmetic must account for every byte of the file, both
    /// section parses must succeed, and both must agree with the header's
    /// member count.
    pub fn load(path: &Path) -> Result<Network> {
        let file =
            File::open(path).with_context(|| format!("open snapshot {}", path.display()))?;
        // Safety: snapshots are immutable once written (frozen-network contract);
        // nobody truncates or rewrites a mapped file.
        let raw = unsafe { Mmap::map(&file) }
            .with_context(|| format!("mmap snapshot {}", path.display()))?;

        let mut reader = ByteReader::new(&raw);
        let (members, dict_bytes, graph_bytes) =
            match (reader.u32(), reader.u64(), reader.u64()) {
                (Some(members), Some(dict_bytes), Some(graph_bytes)) => {
                    (members, dict_bytes, graph_bytes)
                }
                _ => anyhow::bail!("snapshot shorter than its header: {}", path.display()),
            };
        ensure!(members > 0, "snapshot declares an empty network");

        let total = (HEADER_BYTES as u64)
            .checked_add(dict_bytes)
            .and_then(|sum| sum.checked_add(graph_bytes));
        ensure!(
            total == Some(raw.len() as u64),
            "snapshot size does not match its header: {}",
            path.display()
        );

        let dict_blob = &raw[HEADER_BYTES..HEADER_BYTES + dict_bytes as usize];
        let graph_blob = &raw[HEADER_BYTES + dict_bytes as usize..];

        let mut network = Network::default();
        ensure!(
            network.dict.load(dict_blob) == members,
            "name dictionary section does not hold {} members: {}",
            members,
            path.display()
        );
        ensure!(
            network.graph.load(graph_blob) == members,
            "friend graph section does not hold {} members: {}",
            members,
            path.display()
        );

        info!(path = %path.display(), members, "snapshot loaded");
        Ok(network)
    }
}
