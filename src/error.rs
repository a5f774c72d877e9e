use thiserror::Error;

/// Error types for `AssocStore` operations
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum AssocStoreError {
    /// An index record was requested for an object the store has never seen
    #[error("Index out of range: index {index} is beyond indexed size {indexed_size}")]
    OutOfRange {
        /// Data index that was requested
        index: usize,
        /// Number of index records currently stored
        indexed_size: usize,
    },
    /// Append targeted neither the last indexed object nor a new one
    #[error("Invalid sequence: data index {data_index} precedes the last indexed object {last}")]
    InvalidSequence {
        /// Data index passed to the append
        data_index: usize,
        /// Data index of the current last object
        last: usize,
    },
    /// Buffer length is inconsistent with the declared counts
    #[error("Corrupt layout: {reason} (buffer length {len})")]
    CorruptLayout {
        /// Which consistency check failed
        reason: &'static str,
        /// Byte length of the inspected buffer
        len: usize,
    },
    /// A size or offset does not fit its storage field
    #[error("Capacity exceeded: {value} exceeds maximum of {max}")]
    CapacityExceeded {
        /// Value that did not fit
        value: usize,
        /// Maximum representable value
        max: usize,
    },
}
