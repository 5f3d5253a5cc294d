use hashbrown::HashMap;

use crate::codec::{ByteReader, U32_BYTES, push_u32};
use crate::{MemberIndex, NAME_BYTES};

/// Bidirectional mapping between member names and dense indices.
///
/// # Invariants
/// - Assigned indices are exactly `0..len()`, in insertion order: the first
///   never-seen name gets index 0, the next one 1, and so on. Reproducible
///   snapshots depend on this.
/// - Every stored name is ASCII and at most [`NAME_BYTES`]` - 1` bytes, so it
///   fits a fixed serialized slot with its terminating NUL.
///
/// # Compact form
///
/// ```text
/// u32 N
/// N × { [NAME_BYTES bytes, zero-padded name] [u32 index, equal to the
///       entry's position] }
/// ```
///
/// The index field is redundant on a well-formed blob; it doubles as a
/// corruption check on load.
#[derive(Debug, Default, Clone)]
pub struct NameDict {
    index_of: HashMap<Box<str>, MemberIndex>,
    names: Vec<Box<str>>,
}

/// Serialized footprint of one dictionary entry.
const ENTRY_BYTES: usize = NAME_BYTES + U32_BYTES;

impl NameDict {
    /// Creates an empty dictionary.
    pub fn new() -> Self {
        NameDict::default()
    }

    /// Number of members known to the dictionary.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True when no member has been registered.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Looks a member up by name.
    ///
    /// # Examples
    /// ```
    /// use sixdeg::dict::NameDict;
    ///
    /// let mut dict = NameDict::new();
    /// dict.push("John");
    /// assert_eq!(dict.index_of("John"), Some(0));
    /// assert_eq!(dict.index_of("Ian"), None);
    /// ```
    pub fn index_of(&self, name: &str) -> Option<MemberIndex> {
        self.index_of.get(name).copied()
    }

    /// Looks a member up by index. O(1).
    pub fn name_of(&self, index: MemberIndex) -> Option<&str> {
        self.names.get(index as usize).map(|name| name.as_ref())
    }

    /// Registers `name` under the next free index and returns it, or the
    /// existing index if the name is already known.
    ///
    /// Returns `None` for names that cannot live in a serialized slot:
    /// longer than `NAME_BYTES - 1` bytes, empty, or non-ASCII.
    pub fn push(&mut self, name: &str) -> Option<MemberIndex> {
        if let Some(index) = self.index_of(name) {
            return Some(index);
        }
        if name.is_empty() || name.len() >= NAME_BYTES || !name.is_ascii() {
            return None;
        }
        let index = self.names.len() as MemberIndex;
        self.names.push(name.into());
        self.index_of.insert(name.into(), index);
        Some(index)
    }

    /// Serializes the dictionary into its canonical byte form.
    pub fn compact(&self) -> Vec<u8> {
        let mut raw = Vec::with_capacity(U32_BYTES + self.len() * ENTRY_BYTES);
        push_u32(&mut raw, self.len() as u32);
        for (index, name) in self.names.iter().enumerate() {
            let mut slot = [0u8; NAME_BYTES];
            slot[..name.len()].copy_from_slice(name.as_bytes());
            raw.extend_from_slice(&slot);
            push_u32(&mut raw, index as u32);
        }
        raw
    }

    /// Replaces the contents with the entries parsed from `raw`.
    ///
    /// Returns the number of entries, or 0 on any validation failure (wrong
    /// total size, an entry whose stored index disagrees with its position,
    /// a name slot that is not NUL-terminated zero-padded ASCII, or a
    /// duplicated name). A failed load leaves the dictionary empty.
    pub fn load(&mut self, raw: &[u8]) -> MemberIndex {
        self.index_of.clear();
        self.names.clear();
        match Self::parse(raw) {
            Some(names) => {
                for (index, name) in names.iter().enumerate() {
                    self.index_of.insert(name.clone(), index as MemberIndex);
                }
                self.names = names;
                self.names.len() as MemberIndex
            }
            None => 0,
        }
    }

    fn parse(raw: &[u8]) -> Option<Vec<Box<str>>> {
        let mut reader = ByteReader::new(raw);
        let count = reader.u32()? as usize;
        let body_bytes = count.checked_mul(ENTRY_BYTES)?;
        if raw.len() != U32_BYTES.checked_add(body_bytes)? {
            return None;
        }

        let mut names = Vec::with_capacity(count);
        let mut seen: hashbrown::HashSet<&[u8]> = hashbrown::HashSet::with_capacity(count);
        for expected in 0..count {
            let slot = reader.take(NAME_BYTES)?;
            let stored = reader.u32()? as usize;
            if stored != expected {
                return None;
            }

            let end = slot.iter().position(|&byte| byte == 0)?;
            let name = &slot[..end];
            if name.is_empty() || !name.iter().all(u8::is_ascii) {
                return None;
            }
            if slot[end..].iter().any(|&byte| byte != 0) {
                return None;
            }
            if !seen.insert(name) {
                return None;
            }

            // checked ASCII above, so this cannot fail
            names.push(std::str::from_utf8(name).ok()?.into());
        }
        Some(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_member_dict() -> NameDict {
        let mut dict = NameDict::new();
        assert_eq!(dict.push("John"), Some(0));
        assert_eq!(dict.push("Ian"), Some(1));
        dict
    }

    #[test]
    fn empty_dict_compacts_to_four_zero_bytes() {
        let raw = NameDict::new().compact();
        assert_eq!(raw, vec![0u8; 4]);
    }

    #[test]
    fn push_assigns_dense_indices_in_first_seen_order() {
        let mut dict = NameDict::new();
        assert_eq!(dict.push("MYLES_JEFFCOAT"), Some(0));
        assert_eq!(dict.push("LANNY_TIBURCIO"), Some(1));
        // re-pushing is a lookup, not a new assignment
        assert_eq!(dict.push("MYLES_JEFFCOAT"), Some(0));
        assert_eq!(dict.len(), 2);
        assert_eq!(dict.name_of(1), Some("LANNY_TIBURCIO"));
        assert_eq!(dict.name_of(2), None);
    }

    #[test]
    fn push_rejects_unstorable_names() {
        let mut dict = NameDict::new();
        assert_eq!(dict.push(""), None);
        assert_eq!(dict.push(&"X".repeat(NAME_BYTES)), None);
        assert_eq!(dict.push("CAFÉ"), None);
        // 31 bytes still fits alongside its NUL
        assert_eq!(dict.push(&"X".repeat(NAME_BYTES - 1)), Some(0));
    }

    #[test]
    fn compact_layout_is_exactly_as_documented() {
        let raw = two_member_dict().compact();
        assert_eq!(raw.len(), 4 + 2 * (NAME_BYTES + 4));

        assert_eq!(raw[0..4], [2, 0, 0, 0]);
        assert_eq!(&raw[4..8], b"John");
        assert!(raw[8..4 + NAME_BYTES].iter().all(|&byte| byte == 0));
        assert_eq!(raw[4 + NAME_BYTES..8 + NAME_BYTES], [0, 0, 0, 0]);

        let second = 4 + NAME_BYTES + 4;
        assert_eq!(&raw[second..second + 3], b"Ian");
        assert_eq!(raw[second + NAME_BYTES..second + NAME_BYTES + 4], [1, 0, 0, 0]);
    }

    #[test]
    fn load_round_trips_and_rebuilds_both_directions() {
        let raw = two_member_dict().compact();

        let mut loaded = NameDict::new();
        assert_eq!(loaded.load(&raw), 2);
        assert_eq!(loaded.index_of("John"), Some(0));
        assert_eq!(loaded.index_of("Ian"), Some(1));
        assert_eq!(loaded.name_of(0), Some("John"));
        assert_eq!(loaded.name_of(1), Some("Ian"));
        assert_eq!(loaded.compact(), raw);
    }

    #[test]
    fn load_rejects_wrong_total_size() {
        let mut raw = two_member_dict().compact();
        raw.pop();

        let mut dict = two_member_dict();
        assert_eq!(dict.load(&raw), 0);
        assert!(dict.is_empty(), "failed load must clear stale entries");
        assert_eq!(dict.load(&[]), 0);
    }

    #[test]
    fn load_rejects_mismatched_entry_index() {
        let mut raw = two_member_dict().compact();
        // entry 1 claims to be index 7
        let at = 4 + NAME_BYTES + 4 + NAME_BYTES;
        raw[at] = 7;

        let mut dict = NameDict::new();
        assert_eq!(dict.load(&raw), 0);
        assert!(dict.is_empty());
    }

    #[test]
    fn load_rejects_bad_name_slots() {
        // name slot full of 'X' with no terminating NUL
        let mut raw = two_member_dict().compact();
        for byte in raw[4..4 + NAME_BYTES].iter_mut() {
            *byte = b'X';
        }
        let mut dict = NameDict::new();
        assert_eq!(dict.load(&raw), 0);

        // non-zero padding after the NUL
        let mut raw = two_member_dict().compact();
        raw[4 + NAME_BYTES - 1] = b'!';
        assert_eq!(dict.load(&raw), 0);

        // non-ASCII name byte
        let mut raw = two_member_dict().compact();
        raw[4] = 0xC3;
        assert_eq!(dict.load(&raw), 0);
    }

    #[test]
    fn load_rejects_duplicate_names() {
        let mut dict = NameDict::new();
        dict.push("John");
        dict.push("Iann");
        let mut raw = dict.compact();
        // overwrite the second name slot with a copy of the first
        let (first, second) = raw[4..].split_at_mut(NAME_BYTES + 4);
        second[..NAME_BYTES].copy_from_slice(&first[..NAME_BYTES]);

        let mut loaded = NameDict::new();
        assert_eq!(loaded.load(&raw), 0);
        assert!(loaded.is_empty());
    }

    #[test]
    fn name_round_trip_is_stable_for_every_index() {
        let mut dict = NameDict::new();
        for name in ["AARON_BOUSMAN", "CLIFTON_TIMMIS", "NICKY_MURR"] {
            dict.push(name);
        }
        for index in 0..dict.len() as MemberIndex {
            let name = dict.name_of(index).unwrap();
            assert_eq!(dict.index_of(name), Some(index));
        }
    }
}
