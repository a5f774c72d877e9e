#![no_std]

//! `AssocStore`: a compact append-only container attaching a variable number
//! of labels to each object of an externally indexed sequence.
//!
//! The typical use is Monte-Carlo truth: every digit, cluster or track gets
//! zero or more [`McLabel`]s, and millions of objects with tens of millions
//! of labels must be carried between processing stages with little overhead.
//! `AssocStore` keeps everything in one buffer and never allocates per object.
//!
//! Buffer layout: [index count][index records][payload records]
//!
//! - the index count is a native-endian `u64`
//! - one `u32` index record per object holds the position of its first label
//! - the payload records are the labels themselves, packed back to back
//!
//! Neither the number of labels nor the per-object label counts are stored:
//! the count of object `i` is the distance to the start of object `i + 1`,
//! or to the end of the buffer for the last object.
//!
//! # Performance Characteristics
//!
//! - `append()` to the last object: O(1) amortized
//! - `append()` to a new object: O(payload size) for the relocation of the
//!   payload behind the grown index array, a single block move
//! - `get_labels()`: O(1)
//! - `merge_at_back()`: O(size of both stores)
//! - `clear()`: O(1), keeps the allocation
//!
//! Memory overhead is 8 bytes per store plus 4 bytes per indexed object.
//!
//! ## `no_std` Compatibility
//!
//! The crate only needs `core` and `alloc`. The optional `std` feature turns
//! on the `std` support of `thiserror` and `tracing`:
//! ```toml
//! [dependencies]
//! assocstore = { version = "0.1", features = ["std"] }
//! ```
//!
//! # Appending and Reading
//!
//! Labels must be appended in non-decreasing data index order. Skipped data
//! indices simply have no labels:
//!
//! ```
//! # use assocstore::{AssocStore, McLabel};
//! let mut store = AssocStore::<McLabel>::new();
//!
//! store.append(0, McLabel::new(1, 0, 0)).unwrap();
//! store.append(0, McLabel::new(2, 0, 0)).unwrap();
//! store.append(2, McLabel::new(3, 0, 0)).unwrap();
//!
//! assert_eq!(store.indexed_size(), 3);
//! assert_eq!(store.element_count(), Ok(3));
//! assert_eq!(store.get_labels(0), [McLabel::new(1, 0, 0), McLabel::new(2, 0, 0)]);
//! assert!(store.get_labels(1).is_empty());
//! assert_eq!(store.get_labels(2), [McLabel::new(3, 0, 0)]);
//!
//! // Never-seen indices are empty too, not an error
//! assert!(store.get_labels(1000).is_empty());
//!
//! // Only the last object can receive more labels
//! assert!(store.append(1, McLabel::new(4, 0, 0)).is_err());
//! ```
//!
//! Several labels can be added at once from anything convertible into the
//! payload type:
//!
//! ```
//! # use assocstore::{AssocStore, McLabel};
//! let mut store = AssocStore::<McLabel>::new();
//! store.add_elements(0, [(1, 0, 0), (2, 0, 0)]).unwrap();
//! assert_eq!(store.get_labels(0).len(), 2);
//! ```
//!
//! # Reordering in Place
//!
//! Mutable views can reorder labels without touching the layout:
//!
//! ```
//! # use assocstore::AssocStore;
//! let mut store = AssocStore::<u32>::new();
//! store.add_elements(0, [3u32, 1, 2]).unwrap();
//! store.get_labels_mut(0).sort_unstable();
//! assert_eq!(store.get_labels(0), [1, 2, 3]);
//! ```
//!
//! # Merging Shards
//!
//! Stores built independently (for example one per detector sector) are
//! combined in a fixed order. Object `j` of the appended store becomes object
//! `indexed_size() + j`:
//!
//! ```
//! # use assocstore::AssocStore;
//! let mut first = AssocStore::<u32>::new();
//! first.append(0, 10).unwrap();
//! let mut second = AssocStore::<u32>::new();
//! second.append(1, 20).unwrap();
//!
//! let merged = AssocStore::concat([first, second]).unwrap();
//! assert_eq!(merged.indexed_size(), 3);
//! assert_eq!(merged.get_labels(0), [10]);
//! assert!(merged.get_labels(1).is_empty());
//! assert_eq!(merged.get_labels(2), [20]);
//! ```
//!
//! # Raw Bytes
//!
//! The layout bytes can be handed to a persistence layer as an opaque blob
//! and loaded back with validation:
//!
//! ```
//! # use assocstore::AssocStore;
//! let mut store = AssocStore::<u32>::new();
//! store.append(1, 7).unwrap();
//!
//! let loaded = AssocStore::<u32>::from_bytes(store.as_bytes()).unwrap();
//! assert_eq!(loaded, store);
//! assert!(AssocStore::<u32>::from_bytes(&store.as_bytes()[..10]).is_err());
//! ```

extern crate alloc;

mod error;
mod iter;
mod label;
mod layout;
mod store;
mod view;

// Re-export public types and traits
pub use error::AssocStoreError;
pub use iter::Labels;
pub use label::McLabel;
pub use layout::{IndexRecord, HEADER_SIZE, INDEX_RECORD_SIZE};
pub use store::AssocStore;
pub use view::{LabelView, LabelViewMut};
