use assocstore::{AssocStore, McLabel, HEADER_SIZE, INDEX_RECORD_SIZE};

#[test]
fn test_fresh_store_is_header_only() {
    let store = AssocStore::<McLabel>::new();
    assert_eq!(store.as_bytes(), &0u64.to_ne_bytes()[..]);
    assert_eq!(store.as_bytes().len(), HEADER_SIZE);
}

#[test]
fn test_layout_fields_in_order() {
    let mut store = AssocStore::<McLabel>::new();
    store.append(0, McLabel::new(1, 2, 3)).unwrap();
    store.append(2, McLabel::new(4, 5, 6)).unwrap();

    let bytes = store.as_bytes();
    assert_eq!(
        bytes.len(),
        HEADER_SIZE + 3 * INDEX_RECORD_SIZE + 2 * AssocStore::<McLabel>::ELEMENT_SIZE
    );
    assert_eq!(&bytes[..8], &3u64.to_ne_bytes());
    assert_eq!(&bytes[8..12], &0u32.to_ne_bytes());
    assert_eq!(&bytes[12..16], &1u32.to_ne_bytes());
    assert_eq!(&bytes[16..20], &1u32.to_ne_bytes());

    let payload: Vec<i32> = bytes[20..]
        .chunks_exact(4)
        .map(|chunk| i32::from_ne_bytes(chunk.try_into().unwrap()))
        .collect();
    assert_eq!(payload, vec![1, 2, 3, 4, 5, 6]);
}

#[test]
fn test_length_tracks_every_append() {
    let mut store = AssocStore::<[u8; 3]>::new();

    let mut expected_records = 0usize;
    let mut expected_elements = 0;
    for (index, repeat) in [(0usize, 2), (1, 1), (4, 3), (9, 1)] {
        for _ in 0..repeat {
            store.append(index, [index as u8; 3]).unwrap();
            expected_elements += 1;
        }
        expected_records = expected_records.max(index + 1);
        assert_eq!(
            store.as_bytes().len(),
            HEADER_SIZE + expected_records * INDEX_RECORD_SIZE + expected_elements * 3
        );
    }
    assert_eq!(store.indexed_size(), expected_records);
    assert_eq!(store.element_count(), Ok(expected_elements));
}

#[test]
fn test_roundtrip_through_bytes() {
    let mut store = AssocStore::<McLabel>::new();
    store.append(1, McLabel::new(1, 0, 0)).unwrap();
    store.append(1, McLabel::noise(0, 0)).unwrap();
    store.append(4, McLabel::new(2, 0, 1)).unwrap();

    let loaded = AssocStore::<McLabel>::from_bytes(&store.to_bytes()).unwrap();

    assert_eq!(loaded, store);
    for index in 0..6 {
        assert_eq!(loaded.get_labels(index), store.get_labels(index));
    }
}

#[test]
fn test_loaded_store_accepts_appends() {
    let mut source = AssocStore::<u32>::new();
    source.append(0, 1).unwrap();

    let mut loaded = AssocStore::<u32>::from_bytes(source.as_bytes()).unwrap();
    loaded.append(0, 2).unwrap();
    loaded.append(2, 3).unwrap();

    assert_eq!(loaded.get_labels(0), [1, 2]);
    assert_eq!(loaded.get_labels(2), [3]);
}

#[test]
fn test_empty_blob_loads_as_fresh_store() {
    let store = AssocStore::<u32>::from_bytes(&[]).unwrap();
    assert_eq!(store, AssocStore::new());
    assert_eq!(store.indexed_size(), 0);
}

#[test]
fn test_index_only_buffer_is_valid() {
    // Three objects without any labels
    let mut bytes = 3u64.to_ne_bytes().to_vec();
    for _ in 0..3 {
        bytes.extend_from_slice(&0u32.to_ne_bytes());
    }

    let store = AssocStore::<u32>::from_bytes(&bytes).unwrap();
    assert_eq!(store.indexed_size(), 3);
    assert_eq!(store.element_count(), Ok(0));
    assert!(store.iter().all(|view| view.is_empty()));
}
