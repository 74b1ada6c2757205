//! Index tables map each archive of a category to its byte size in the
//! shared data file.
//!
//! Two layouts exist in the wild:
//!
//! - **Declared count**: a u32 LE archive count followed by exactly that many
//!   u16 LE sizes
//! - **Legacy**: the whole file is a flat run of u16 LE sizes with no count
//!
//! The declared-count layout is only trusted when the count matches the
//! number of size slots that follow it. Anything else is read as legacy.

use binrw::BinWrite;
use std::fmt;
use std::io::Cursor;

/// Length of the count prefix in the declared-count layout
pub const COUNT_FIELD_SIZE: usize = 4;

/// Width of one size entry
pub const SIZE_ENTRY_SIZE: usize = 2;

/// Which layout an index table was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexLayout {
    /// u32 count followed by that many u16 sizes
    DeclaredCount,
    /// Whole buffer read as u16 sizes
    Legacy,
}

impl fmt::Display for IndexLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeclaredCount => f.write_str("declared-count"),
            Self::Legacy => f.write_str("legacy"),
        }
    }
}

/// Decoded size table for one category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexTable {
    declared_count: u32,
    sizes: Vec<u16>,
    layout: IndexLayout,
}

/// Decode an index table, falling back to the legacy layout when the count
/// prefix does not describe the buffer.
///
/// This never fails: malformed input yields a best-effort table.
pub fn decode(data: &[u8]) -> IndexTable {
    IndexTable::decode(data)
}

impl IndexTable {
    /// Decode an index table from raw index file bytes
    pub fn decode(data: &[u8]) -> Self {
        if data.len() < COUNT_FIELD_SIZE {
            return Self {
                declared_count: 0,
                sizes: Vec::new(),
                layout: IndexLayout::DeclaredCount,
            };
        }

        let count = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
        let expected = (data.len() - COUNT_FIELD_SIZE) / SIZE_ENTRY_SIZE;

        if usize::try_from(count).is_ok_and(|count| count == expected) {
            return Self {
                declared_count: count,
                sizes: read_sizes(&data[COUNT_FIELD_SIZE..]),
                layout: IndexLayout::DeclaredCount,
            };
        }

        let sizes = read_sizes(data);
        Self {
            declared_count: sizes.len() as u32,
            sizes,
            layout: IndexLayout::Legacy,
        }
    }

    /// Serialize sizes in the declared-count layout
    pub fn build(sizes: &[u16]) -> binrw::BinResult<Vec<u8>> {
        let mut cursor = Cursor::new(Vec::with_capacity(
            COUNT_FIELD_SIZE + sizes.len() * SIZE_ENTRY_SIZE,
        ));
        (sizes.len() as u32).write_le(&mut cursor)?;
        for size in sizes {
            size.write_le(&mut cursor)?;
        }
        Ok(cursor.into_inner())
    }

    /// Archive count as read from (or implied by) the file
    pub const fn declared_count(&self) -> u32 {
        self.declared_count
    }

    /// Archive sizes in archive order
    pub fn sizes(&self) -> &[u16] {
        &self.sizes
    }

    /// Layout the table was decoded from
    pub const fn layout(&self) -> IndexLayout {
        self.layout
    }

    /// Number of archives in the table
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    /// Whether the table holds no archives
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// Iterate `(archive_index, byte_size)` pairs
    pub fn entries(&self) -> impl Iterator<Item = (usize, u16)> + '_ {
        self.sizes.iter().copied().enumerate()
    }
}

/// Read consecutive u16 LE values, ignoring a trailing odd byte
fn read_sizes(data: &[u8]) -> Vec<u16> {
    data.chunks_exact(SIZE_ENTRY_SIZE)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_short_input_is_empty() {
        for data in [&[][..], &[1][..], &[1, 2, 3][..]] {
            let table = decode(data);
            assert_eq!(table.declared_count(), 0);
            assert!(table.is_empty());
        }
    }

    #[test]
    fn test_declared_count_layout() {
        let table = decode(&[0x02, 0, 0, 0, 0x0A, 0, 0x14, 0]);
        assert_eq!(table.layout(), IndexLayout::DeclaredCount);
        assert_eq!(table.declared_count(), 2);
        assert_eq!(table.sizes(), &[10, 20]);
    }

    #[test]
    fn test_count_mismatch_falls_back_to_legacy() {
        // Count says 5 but only two slots follow
        let data = [0x05, 0, 0, 0, 0x0A, 0, 0x14, 0];
        let table = decode(&data);
        assert_eq!(table.layout(), IndexLayout::Legacy);
        assert_eq!(table.declared_count(), 4);
        assert_eq!(table.sizes(), &[5, 0, 10, 20]);
    }

    #[test]
    fn test_legacy_ignores_trailing_odd_byte() {
        let data = [0x09, 0, 0, 0, 0x01, 0x02, 0x03];
        let table = decode(&data);
        assert_eq!(table.layout(), IndexLayout::Legacy);
        assert_eq!(table.sizes(), &[9, 0, 0x0201]);
    }

    #[test]
    fn test_odd_length_declared_count() {
        // (7 - 4) / 2 == 1, so a count of 1 still matches
        let data = [0x01, 0, 0, 0, 0x30, 0x00, 0xFF];
        let table = decode(&data);
        assert_eq!(table.layout(), IndexLayout::DeclaredCount);
        assert_eq!(table.sizes(), &[0x30]);
    }

    #[test]
    fn test_zero_count_header_only() {
        let table = decode(&[0, 0, 0, 0]);
        assert_eq!(table.layout(), IndexLayout::DeclaredCount);
        assert!(table.is_empty());
    }

    #[test]
    fn test_layout_display() {
        assert_eq!(IndexLayout::DeclaredCount.to_string(), "declared-count");
        assert_eq!(IndexLayout::Legacy.to_string(), "legacy");
    }

    #[test]
    fn test_build_matches_decode() {
        let bytes = IndexTable::build(&[10, 0, 65535]).expect("build");
        assert_eq!(bytes, vec![3, 0, 0, 0, 10, 0, 0, 0, 0xFF, 0xFF]);
        let table = decode(&bytes);
        assert_eq!(table.sizes(), &[10, 0, 65535]);
        assert_eq!(
            table.entries().collect::<Vec<_>>(),
            vec![(0, 10), (1, 0), (2, 65535)]
        );
    }

    proptest! {
        #[test]
        fn declared_count_layout_reads_every_size(
            sizes in prop::collection::vec(any::<u16>(), 0..512)
        ) {
            let bytes = IndexTable::build(&sizes).unwrap();
            let table = decode(&bytes);
            prop_assert_eq!(table.layout(), IndexLayout::DeclaredCount);
            prop_assert_eq!(table.declared_count() as usize, sizes.len());
            prop_assert_eq!(table.sizes(), sizes.as_slice());
        }

        #[test]
        fn mismatched_count_uses_whole_buffer(
            data in prop::collection::vec(any::<u8>(), 4..512)
        ) {
            let count = u32::from_le_bytes([data[0], data[1], data[2], data[3]]) as usize;
            prop_assume!(count != (data.len() - 4) / 2);
            let table = decode(&data);
            prop_assert_eq!(table.layout(), IndexLayout::Legacy);
            prop_assert_eq!(table.len(), data.len() / 2);
            prop_assert_eq!(table.declared_count() as usize, data.len() / 2);
        }
    }
}
