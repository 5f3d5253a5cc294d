/// Serialized width of a `u32` field.
pub const U32_BYTES: usize = 4;

/// Serialized width of a `u64` field.
pub const U64_BYTES: usize = 8;

/// Appends a `u32` to a byte buffer in little-endian order.
///
/// # Examples
/// ```
/// use sixdeg::codec::push_u32;
///
/// let mut raw = Vec::new();
/// push_u32(&mut raw, 0x0403_0201);
/// assert_eq!(raw, [1, 2, 3, 4]);
/// ```
pub fn push_u32(raw: &mut Vec<u8>, value: u32) {
    raw.extend_from_slice(&value.to_le_bytes());
}

/// Appends a `u64` to a byte buffer in little-endian order.
pub fn push_u64(raw: &mut Vec<u8>, value: u64) {
    raw.extend_from_slice(&value.to_le_bytes());
}

/// Bounds-checked forward cursor over a byte blob.
///
/// Every `load` implementation in this crate walks its input through one of
/// these instead of dereferencing pointers into the buffer: a short or
/// truncated blob surfaces as `None` at the exact field that ran out, and
/// the caller turns that into its "reject and stay empty" contract.
///
/// # Examples
/// ```
/// use sixdeg::codec::ByteReader;
///
/// let raw = [7, 0, 0, 0, 0xff];
/// let mut reader = ByteReader::new(&raw);
/// assert_eq!(reader.u32(), Some(7));
/// assert_eq!(reader.remaining(), 1);
/// assert_eq!(reader.u32(), None); // only one byte left
/// ```
pub struct ByteReader<'a> {
    raw: &'a [u8],
    at: usize,
}

impl<'a> ByteReader<'a> {
    /// Starts a cursor at the beginning of `raw`.
    pub fn new(raw: &'a [u8]) -> Self {
        ByteReader { raw, at: 0 }
    }

    /// Byte offset of the cursor from the start of the blob.
    pub fn position(&self) -> usize {
        self.at
    }

    /// Bytes left between the cursor and the end of the blob.
    pub fn remaining(&self) -> usize {
        self.raw.len() - self.at
    }

    /// Decodes the next four bytes as a little-endian `u32`.
    pub fn u32(&mut self) -> Option<u32> {
        let bytes: [u8; U32_BYTES] = self.take(U32_BYTES)?.try_into().ok()?;
        Some(u32::from_le_bytes(bytes))
    }

    /// Decodes the next eight bytes as a little-endian `u64`.
    pub fn u64(&mut self) -> Option<u64> {
        let bytes: [u8; U64_BYTES] = self.take(U64_BYTES)?.try_into().ok()?;
        Some(u64::from_le_bytes(bytes))
    }

    /// Returns the next `count` raw bytes and advances past them.
    pub fn take(&mut self, count: usize) -> Option<&'a [u8]> {
        let end = self.at.checked_add(count)?;
        if end > self.raw.len() {
            return None;
        }
        let slice = &self.raw[self.at..end];
        self.at = end;
        Some(slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_u32_and_u64() {
        let mut raw = Vec::new();
        push_u32(&mut raw, 0);
        push_u32(&mut raw, u32::MAX);
        push_u64(&mut raw, 0x1122_3344_5566_7788);
        assert_eq!(raw.len(), 2 * U32_BYTES + U64_BYTES);

        let mut reader = ByteReader::new(&raw);
        assert_eq!(reader.u32(), Some(0));
        assert_eq!(reader.u32(), Some(u32::MAX));
        assert_eq!(reader.u64(), Some(0x1122_3344_5566_7788));
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn integers_are_little_endian_on_the_wire() {
        let mut raw = Vec::new();
        push_u32(&mut raw, 1);
        push_u64(&mut raw, 2);
        assert_eq!(raw[0..4], [1, 0, 0, 0]);
        assert_eq!(raw[4..12], [2, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn short_reads_fail_without_advancing_past_the_end() {
        let raw = [1u8, 2, 3];
        let mut reader = ByteReader::new(&raw);
        assert_eq!(reader.u32(), None);
        assert_eq!(reader.u64(), None);
        // the failed reads must not have consumed anything
        assert_eq!(reader.position(), 0);
        assert_eq!(reader.take(3), Some(&raw[..]));
        assert_eq!(reader.take(1), None);
    }

    #[test]
    fn take_zero_is_fine_anywhere() {
        let raw = [9u8];
        let mut reader = ByteReader::new(&raw);
        assert_eq!(reader.take(0), Some(&[][..]));
        assert_eq!(reader.take(1), Some(&[9u8][..]));
        assert_eq!(reader.take(0), Some(&[][..]));
        assert_eq!(reader.remaining(), 0);
    }
}
