use alloc::vec::Vec;
use core::fmt;
use core::marker::PhantomData;
use core::mem::{align_of, size_of};

use bytemuck::Pod;
use tracing::{debug, trace, warn};

use crate::error::AssocStoreError;
use crate::iter::Labels;
use crate::layout::{self, IndexRecord, IndexTable, IndexTableMut, HEADER_SIZE, INDEX_RECORD_SIZE};
use crate::view::{LabelView, LabelViewMut};

const WORD_SIZE: usize = size_of::<u32>();
const MAX_BUFFER_LEN: usize = isize::MAX as usize;
const MAX_START: usize = (IndexRecord::INVALID_START - 1) as usize;

/// Append-only association container: a variable number of labels of type
/// `T` for each object of an externally indexed sequence, packed into one
/// buffer.
///
/// `T` must be [`Pod`], non-zero-sized and at most 4-byte aligned. These
/// requirements are checked at compile time when the store is constructed.
#[derive(Clone)]
pub struct AssocStore<T> {
    // Word-backed so every payload offset (header and index records are
    // multiples of four bytes) is aligned for `T`.
    words: Vec<u32>,
    len: usize,
    _marker: PhantomData<T>,
}

impl<T: Pod> AssocStore<T> {
    /// Size in bytes of one payload record.
    pub const ELEMENT_SIZE: usize = size_of::<T>();

    const LAYOUT_CHECK: () = assert!(
        size_of::<T>() > 0 && align_of::<T>() <= INDEX_RECORD_SIZE,
        "payload records must be non-empty and aligned to at most 4 bytes"
    );

    /// Creates an empty store holding only the header.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(0, 0)
    }

    /// Creates an empty store with room for `indexed` index records and
    /// `elements` payload records before reallocating.
    #[must_use]
    pub fn with_capacity(indexed: usize, elements: usize) -> Self {
        let () = Self::LAYOUT_CHECK;
        let mut store = Self {
            words: Vec::new(),
            len: 0,
            _marker: PhantomData,
        };
        store.resize_bytes(HEADER_SIZE);
        store.reserve(indexed, elements);
        store
    }

    /// Reserves room for `indexed` more index records and `elements` more
    /// payload records. The reservation is skipped if the request overflows.
    pub fn reserve(&mut self, indexed: usize, elements: usize) {
        let Some(total) = indexed
            .checked_mul(INDEX_RECORD_SIZE)
            .zip(elements.checked_mul(Self::ELEMENT_SIZE))
            .and_then(|(index_bytes, payload_bytes)| index_bytes.checked_add(payload_bytes))
            .and_then(|extra| self.len.checked_add(extra))
            .filter(|total| *total <= MAX_BUFFER_LEN)
        else {
            return;
        };
        let words = total.div_ceil(WORD_SIZE);
        self.words.reserve(words.saturating_sub(self.words.len()));
    }

    /// Releases unused capacity.
    pub fn shrink_to_fit(&mut self) {
        self.words.shrink_to_fit();
    }

    /// Number of bytes the store can hold without reallocating.
    #[must_use]
    pub fn capacity_bytes(&self) -> usize {
        self.words.capacity() * WORD_SIZE
    }

    /// Raw layout bytes: header, index records, payload records.
    #[must_use]
    #[allow(clippy::indexing_slicing)] // len never exceeds the word storage
    pub fn as_bytes(&self) -> &[u8] {
        &bytemuck::cast_slice::<u32, u8>(&self.words)[..self.len]
    }

    /// Owned copy of [`as_bytes`](Self::as_bytes).
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }

    #[allow(clippy::indexing_slicing)]
    fn bytes_mut(&mut self) -> &mut [u8] {
        &mut bytemuck::cast_slice_mut::<u32, u8>(&mut self.words)[..self.len]
    }

    fn resize_bytes(&mut self, len: usize) {
        self.words.resize(len.div_ceil(WORD_SIZE), 0);
        self.len = len;
    }

    fn corrupt(&self, reason: &'static str) -> AssocStoreError {
        AssocStoreError::CorruptLayout {
            reason,
            len: self.len,
        }
    }

    /// Number of indexed objects, i.e. one past the highest data index seen.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // Written from a usize
    pub fn indexed_size(&self) -> usize {
        layout::read_index_count(self.as_bytes()) as usize
    }

    /// True while no data index has been seen.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indexed_size() == 0
    }

    fn payload_offset(&self) -> Result<usize, AssocStoreError> {
        layout::payload_offset(self.indexed_size())
            .filter(|offset| *offset <= self.len)
            .ok_or_else(|| self.corrupt("index array exceeds buffer"))
    }

    /// Total number of payload records, derived from the buffer length.
    ///
    /// # Errors
    ///
    /// Returns `AssocStoreError::CorruptLayout` if the payload region is not a
    /// whole number of records.
    pub fn element_count(&self) -> Result<usize, AssocStoreError> {
        let payload_bytes = self.len - self.payload_offset()?;
        if payload_bytes % Self::ELEMENT_SIZE != 0 {
            return Err(self.corrupt("payload is not a whole number of records"));
        }
        Ok(payload_bytes / Self::ELEMENT_SIZE)
    }

    fn split(&self) -> Result<(IndexTable<'_>, &[T]), AssocStoreError> {
        let offset = self.payload_offset()?;
        let (head, payload) = self.as_bytes().split_at(offset);
        let payload = bytemuck::try_cast_slice::<u8, T>(payload)
            .map_err(|_| self.corrupt("payload is not a whole number of records"))?;
        Ok((IndexTable::new(&head[HEADER_SIZE..]), payload))
    }

    fn split_mut(&mut self) -> Result<(IndexTable<'_>, &mut [T]), AssocStoreError> {
        let offset = self.payload_offset()?;
        let len = self.len;
        let (head, payload) = self.bytes_mut().split_at_mut(offset);
        let head: &[u8] = head;
        let payload = bytemuck::try_cast_slice_mut::<u8, T>(payload).map_err(|_| {
            AssocStoreError::CorruptLayout {
                reason: "payload is not a whole number of records",
                len,
            }
        })?;
        Ok((IndexTable::new(&head[HEADER_SIZE..]), payload))
    }

    /// Returns the index record of `data_index`.
    ///
    /// # Errors
    ///
    /// Returns `AssocStoreError::OutOfRange` if `data_index` was never indexed.
    pub fn index_record(&self, data_index: usize) -> Result<IndexRecord, AssocStoreError> {
        let (table, _) = self.split()?;
        table
            .get(data_index)
            .ok_or(AssocStoreError::OutOfRange {
                index: data_index,
                indexed_size: table.len(),
            })
    }

    /// Direct access to a payload record by its position in the payload array.
    #[must_use]
    pub fn element(&self, element_index: usize) -> Option<&T> {
        self.split().ok()?.1.get(element_index)
    }

    /// Returns the labels of `data_index`. Unseen indices yield an empty view.
    ///
    /// # Panics
    ///
    /// May panic if buffer integrity is compromised (internal validation failure).
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn get_labels(&self, data_index: usize) -> LabelView<'_, T> {
        let (table, payload) = self.split().expect("Layout checked by every mutation");
        match table.range(data_index, payload.len()) {
            Some((start, end)) => LabelView::new(
                payload
                    .get(start..end)
                    .expect("Index records bounded by the payload"),
            ),
            None => LabelView::empty(),
        }
    }

    /// Returns a mutable view of the labels of `data_index`, allowing them to
    /// be reordered in place. Unseen indices yield an empty view.
    ///
    /// # Panics
    ///
    /// May panic if buffer integrity is compromised (internal validation failure).
    #[allow(clippy::expect_used)]
    pub fn get_labels_mut(&mut self, data_index: usize) -> LabelViewMut<'_, T> {
        let (table, payload) = self.split_mut().expect("Layout checked by every mutation");
        match table.range(data_index, payload.len()) {
            Some((start, end)) => LabelViewMut::new(
                payload
                    .get_mut(start..end)
                    .expect("Index records bounded by the payload"),
            ),
            None => LabelViewMut::empty(),
        }
    }

    /// Returns an iterator over the label views of all indexed objects.
    ///
    /// # Panics
    ///
    /// May panic if buffer integrity is compromised (internal validation failure).
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn iter(&self) -> Labels<'_, T> {
        let (table, payload) = self.split().expect("Layout checked by every mutation");
        Labels::new(table, payload)
    }

    fn grown_len(&self, index_records: usize, elements: usize) -> Result<usize, AssocStoreError> {
        let requested = self
            .len
            .saturating_add(index_records.saturating_mul(INDEX_RECORD_SIZE))
            .saturating_add(elements.saturating_mul(Self::ELEMENT_SIZE));
        if requested > MAX_BUFFER_LEN {
            return Err(AssocStoreError::CapacityExceeded {
                value: requested,
                max: MAX_BUFFER_LEN,
            });
        }
        Ok(requested)
    }

    /// Appends `value` to the labels of `data_index`.
    ///
    /// `data_index` must be the last indexed object or a new one. Skipped
    /// indices between the last indexed object and `data_index` get empty
    /// label runs.
    ///
    /// # Errors
    ///
    /// - `AssocStoreError::InvalidSequence` if `data_index` is below the last
    ///   indexed object
    /// - `AssocStoreError::CapacityExceeded` if the new index records or the
    ///   buffer size would overflow
    ///
    /// The store is unchanged on error.
    #[allow(clippy::indexing_slicing)] // Ranges derived from the grown length
    pub fn append(&mut self, data_index: usize, value: T) -> Result<(), AssocStoreError> {
        let indexed = self.indexed_size();
        let element_count = self.element_count()?;

        if data_index < indexed {
            let last = indexed - 1;
            if data_index != last {
                return Err(AssocStoreError::InvalidSequence { data_index, last });
            }
            let len = self.grown_len(0, 1)?;
            self.resize_bytes(len);
        } else {
            let grow = (data_index - indexed).saturating_add(1);
            if element_count > MAX_START {
                return Err(AssocStoreError::CapacityExceeded {
                    value: element_count,
                    max: MAX_START,
                });
            }
            #[allow(clippy::cast_possible_truncation)] // Bounded by MAX_START
            let start = IndexRecord::new(element_count as u32);
            let len = self.grown_len(grow, 1)?;

            let payload_start = self.payload_offset()?;
            let payload_end = self.len;
            let shift = grow * INDEX_RECORD_SIZE;
            self.resize_bytes(len);

            let bytes = self.bytes_mut();
            bytes.copy_within(payload_start..payload_end, payload_start + shift);
            IndexTableMut::new(&mut bytes[payload_start..payload_start + shift]).fill(start);
            layout::write_index_count(bytes, (indexed + grow) as u64);

            if grow > 1 {
                trace!(data_index, holes = grow - 1, "filled gap of unseen data indices");
            }
        }

        let tail = self.len - Self::ELEMENT_SIZE;
        self.bytes_mut()[tail..].copy_from_slice(bytemuck::bytes_of(&value));
        Ok(())
    }

    /// Appends every element of `elements` to the labels of `data_index`, in
    /// order. Elements are converted with [`Into`].
    ///
    /// # Errors
    ///
    /// Stops at the first failing [`append`](Self::append) and returns its
    /// error. Only the first element can fail with `InvalidSequence`.
    pub fn add_elements<L, I>(
        &mut self,
        data_index: usize,
        elements: I,
    ) -> Result<(), AssocStoreError>
    where
        I: IntoIterator<Item = L>,
        L: Into<T>,
    {
        for element in elements {
            self.append(data_index, element.into())?;
        }
        Ok(())
    }

    /// Resets the store to the empty state, keeping the allocation.
    pub fn clear(&mut self) {
        self.resize_bytes(HEADER_SIZE);
        layout::write_index_count(self.bytes_mut(), 0);
    }

    /// Appends all of `other` after the content of this store. Object `j` of
    /// `other` becomes object `self.indexed_size() + j`.
    ///
    /// # Errors
    ///
    /// - `AssocStoreError::CapacityExceeded` if the shifted index records or
    ///   the buffer size would overflow
    /// - `AssocStoreError::CorruptLayout` if either store fails its layout check
    ///
    /// The store is unchanged on error.
    #[allow(clippy::indexing_slicing)] // Ranges derived from the grown length
    pub fn merge_at_back(&mut self, other: &Self) -> Result<(), AssocStoreError> {
        let other_indexed = other.indexed_size();
        if other_indexed == 0 {
            return Ok(());
        }

        let indexed = self.indexed_size();
        let element_count = self.element_count()?;
        let (other_table, other_payload) = other.split()?;
        let last_start = other_table
            .get(other_indexed - 1)
            .map_or(0, IndexRecord::start);
        let shifted_last = element_count.saturating_add(last_start);
        if shifted_last > MAX_START {
            return Err(AssocStoreError::CapacityExceeded {
                value: shifted_last,
                max: MAX_START,
            });
        }
        #[allow(clippy::cast_possible_truncation)] // Bounded by MAX_START
        let shift = element_count as u32;
        let len = self.grown_len(other_indexed, other_payload.len())?;

        let payload_start = self.payload_offset()?;
        let payload_end = self.len;
        let index_bytes = other_indexed * INDEX_RECORD_SIZE;
        self.resize_bytes(len);

        let bytes = self.bytes_mut();
        bytes.copy_within(payload_start..payload_end, payload_start + index_bytes);
        IndexTableMut::new(&mut bytes[payload_start..payload_start + index_bytes])
            .copy_shifted(other_table, shift);
        bytes[payload_end + index_bytes..]
            .copy_from_slice(bytemuck::cast_slice::<T, u8>(other_payload));
        layout::write_index_count(bytes, (indexed + other_indexed) as u64);

        debug!(
            merged_indexed = other_indexed,
            merged_elements = other_payload.len(),
            indexed = indexed + other_indexed,
            "merged association store at back"
        );
        Ok(())
    }

    /// Merges per-shard stores, in iteration order, into a single store.
    ///
    /// # Errors
    ///
    /// Returns the first error of [`merge_at_back`](Self::merge_at_back).
    pub fn concat<I>(parts: I) -> Result<Self, AssocStoreError>
    where
        I: IntoIterator<Item = Self>,
    {
        let mut parts = parts.into_iter();
        let Some(mut merged) = parts.next() else {
            return Ok(Self::new());
        };
        let mut shards = 1usize;
        for part in parts {
            merged.merge_at_back(&part)?;
            shards += 1;
        }
        debug!(
            shards,
            indexed = merged.indexed_size(),
            "concatenated association stores"
        );
        Ok(merged)
    }

    /// Loads a store from its raw layout bytes, as produced by
    /// [`as_bytes`](Self::as_bytes). An empty slice yields an empty store.
    ///
    /// # Errors
    ///
    /// Returns `AssocStoreError::CorruptLayout` if the header, index records
    /// or payload size are inconsistent.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AssocStoreError> {
        let () = Self::LAYOUT_CHECK;
        if bytes.is_empty() {
            return Ok(Self::new());
        }

        let corrupt = |reason: &'static str| {
            warn!(reason, len = bytes.len(), "rejected association buffer");
            AssocStoreError::CorruptLayout {
                reason,
                len: bytes.len(),
            }
        };

        if bytes.len() < HEADER_SIZE {
            return Err(corrupt("buffer shorter than header"));
        }
        let indexed = usize::try_from(layout::read_index_count(bytes))
            .map_err(|_| corrupt("index count does not fit in memory"))?;
        let offset = layout::payload_offset(indexed)
            .filter(|offset| *offset <= bytes.len())
            .ok_or_else(|| corrupt("index array exceeds buffer"))?;
        let payload_bytes = bytes.len() - offset;
        if payload_bytes % Self::ELEMENT_SIZE != 0 {
            return Err(corrupt("payload is not a whole number of records"));
        }
        let element_count = payload_bytes / Self::ELEMENT_SIZE;
        if indexed == 0 && element_count > 0 {
            return Err(corrupt("payload without index records"));
        }
        IndexTable::new(&bytes[HEADER_SIZE..offset])
            .validate(element_count)
            .map_err(corrupt)?;

        let mut store = Self {
            words: Vec::new(),
            len: 0,
            _marker: PhantomData,
        };
        store.resize_bytes(bytes.len());
        store.bytes_mut().copy_from_slice(bytes);
        Ok(store)
    }
}

impl<T: Pod> Default for AssocStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Pod> PartialEq for AssocStore<T> {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl<T: Pod> Eq for AssocStore<T> {}

impl<'a, T: Pod> IntoIterator for &'a AssocStore<T> {
    type Item = LabelView<'a, T>;
    type IntoIter = Labels<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

struct DebugLabels<'a, T>(&'a AssocStore<T>);

impl<T: Pod + fmt::Debug> fmt::Debug for DebugLabels<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.0.iter().enumerate().map(|(i, view)| (i, view.as_slice())))
            .finish()
    }
}

impl<T: Pod + fmt::Debug> fmt::Debug for AssocStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("AssocStore");
        s.field("indexed_size", &self.indexed_size());
        match self.element_count() {
            Ok(count) => s.field("element_count", &count).field("labels", &DebugLabels(self)),
            Err(err) => s.field("error", &err),
        };
        s.finish()
    }
}
