//! Byte-level layout of the association buffer.
//!
//! ```text
//! [index count: u64][index record: u32; count][payload record: T; N]
//! ```
//!
//! All integers are native-endian. Nothing in the buffer stores `N` or the
//! per-object label counts: both are derived from the buffer length and the
//! neighbouring index records.

/// Size in bytes of the leading index count.
pub const HEADER_SIZE: usize = core::mem::size_of::<u64>();

/// Size in bytes of one index record.
pub const INDEX_RECORD_SIZE: usize = core::mem::size_of::<u32>();

/// Position of one indexed object's first label in the payload array,
/// counted in payload records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IndexRecord {
    start: u32,
}

impl IndexRecord {
    /// Marks a record that was never assigned.
    pub const INVALID_START: u32 = u32::MAX;

    /// A record that was never assigned.
    pub const INVALID: Self = Self {
        start: Self::INVALID_START,
    };

    /// Creates a record whose labels begin at payload record `start`.
    #[must_use]
    pub const fn new(start: u32) -> Self {
        Self { start }
    }

    /// Offset of the first label, in payload records.
    #[must_use]
    pub const fn start(self) -> usize {
        self.start as usize
    }

    /// The start as stored in the buffer.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.start
    }

    /// Returns `false` for the unassigned sentinel.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.start != Self::INVALID_START
    }
}

impl Default for IndexRecord {
    fn default() -> Self {
        Self::INVALID
    }
}

/// Reads the index count. A buffer too short to hold the header reads as empty.
pub(crate) fn read_index_count(bytes: &[u8]) -> u64 {
    bytes
        .get(..HEADER_SIZE)
        .and_then(|header| <[u8; HEADER_SIZE]>::try_from(header).ok())
        .map_or(0, u64::from_ne_bytes)
}

#[allow(clippy::indexing_slicing)] // Header presence is a store invariant
pub(crate) fn write_index_count(bytes: &mut [u8], count: u64) {
    bytes[..HEADER_SIZE].copy_from_slice(&count.to_ne_bytes());
}

/// Byte offset where the payload array starts for `index_count` records.
pub(crate) fn payload_offset(index_count: usize) -> Option<usize> {
    index_count
        .checked_mul(INDEX_RECORD_SIZE)?
        .checked_add(HEADER_SIZE)
}

/// Read access to the index array (the bytes between header and payload).
#[derive(Debug, Clone, Copy)]
pub(crate) struct IndexTable<'a> {
    bytes: &'a [u8],
}

impl<'a> IndexTable<'a> {
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    pub(crate) fn len(&self) -> usize {
        self.bytes.len() / INDEX_RECORD_SIZE
    }

    /// Returns `None` if `index` is past the end of the table.
    pub(crate) fn get(&self, index: usize) -> Option<IndexRecord> {
        let offset = index.checked_mul(INDEX_RECORD_SIZE)?;
        let end = offset.checked_add(INDEX_RECORD_SIZE)?;
        let raw: [u8; INDEX_RECORD_SIZE] = self
            .bytes
            .get(offset..end)?
            .try_into()
            .ok()?;
        Some(IndexRecord::new(u32::from_ne_bytes(raw)))
    }

    pub(crate) fn iter(&self) -> impl DoubleEndedIterator<Item = IndexRecord> + 'a {
        self.bytes
            .chunks_exact(INDEX_RECORD_SIZE)
            .map(|chunk| {
                let mut raw = [0u8; INDEX_RECORD_SIZE];
                raw.copy_from_slice(chunk);
                IndexRecord::new(u32::from_ne_bytes(raw))
            })
    }

    /// Half-open payload range `[start, end)` of the object at `index`,
    /// where `element_count` closes the range of the last object.
    pub(crate) fn range(&self, index: usize, element_count: usize) -> Option<(usize, usize)> {
        let start = self.get(index)?.start();
        let end = match self.get(index + 1) {
            Some(next) => next.start(),
            None => element_count,
        };
        Some((start, end))
    }

    /// Checks ordering and bounds of every record against `element_count`.
    pub(crate) fn validate(&self, element_count: usize) -> Result<(), &'static str> {
        let mut previous = 0usize;
        for record in self.iter() {
            if !record.is_valid() {
                return Err("unset index record");
            }
            if record.start() < previous {
                return Err("index records are not monotonic");
            }
            if record.start() > element_count {
                return Err("index record points past the payload");
            }
            previous = record.start();
        }
        Ok(())
    }
}

/// Write access to the index array.
#[derive(Debug)]
pub(crate) struct IndexTableMut<'a> {
    bytes: &'a mut [u8],
}

impl<'a> IndexTableMut<'a> {
    pub(crate) fn new(bytes: &'a mut [u8]) -> Self {
        Self { bytes }
    }

    /// Sets every record in the table to `record`.
    pub(crate) fn fill(&mut self, record: IndexRecord) {
        let raw = record.raw().to_ne_bytes();
        for chunk in self.bytes.chunks_exact_mut(INDEX_RECORD_SIZE) {
            chunk.copy_from_slice(&raw);
        }
    }

    /// Copies `source` into this table, adding `shift` to every start.
    /// The caller guarantees that shifted starts stay below the sentinel.
    pub(crate) fn copy_shifted(&mut self, source: IndexTable<'_>, shift: u32) {
        for (chunk, record) in self
            .bytes
            .chunks_exact_mut(INDEX_RECORD_SIZE)
            .zip(source.iter())
        {
            chunk.copy_from_slice(&(record.raw() + shift).to_ne_bytes());
        }
    }
}
