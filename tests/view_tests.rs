use assocstore::{AssocStore, LabelView, McLabel};

#[test]
fn test_sort_labels_in_place() {
    let mut store = AssocStore::<McLabel>::new();
    store.append(0, McLabel::new(1, 0, 0)).unwrap();
    store.append(1, McLabel::new(5, 2, 0)).unwrap();
    store.append(1, McLabel::new(3, 1, 0)).unwrap();
    store.append(1, McLabel::new(4, 1, 0)).unwrap();
    store.append(2, McLabel::new(9, 0, 0)).unwrap();
    let before = store.as_bytes().len();

    store.get_labels_mut(1).sort();

    assert_eq!(
        store.get_labels(1),
        [
            McLabel::new(3, 1, 0),
            McLabel::new(4, 1, 0),
            McLabel::new(5, 2, 0)
        ]
    );
    // Neighbours and layout untouched
    assert_eq!(store.get_labels(0), [McLabel::new(1, 0, 0)]);
    assert_eq!(store.get_labels(2), [McLabel::new(9, 0, 0)]);
    assert_eq!(store.as_bytes().len(), before);
}

#[test]
fn test_overwrite_through_mut_view() {
    let mut store = AssocStore::<u32>::new();
    store.add_elements(0, [1u32, 2]).unwrap();
    store.add_elements(1, [3u32, 4]).unwrap();

    for value in store.get_labels_mut(1) {
        *value *= 10;
    }
    let mut view = store.get_labels_mut(0);
    view.swap(0, 1);
    view[1] = 7;

    assert_eq!(store.get_labels(0), [2, 7]);
    assert_eq!(store.get_labels(1), [30, 40]);
}

#[test]
fn test_mut_view_of_empty_object() {
    let mut store = AssocStore::<u32>::new();
    store.append(2, 1).unwrap();

    let view = store.get_labels_mut(1);
    assert!(view.is_empty());
    assert_eq!(view.into_mut_slice().len(), 0);
}

#[test]
fn test_view_accessors() {
    let mut store = AssocStore::<u32>::new();
    store.add_elements(0, [4u32, 5, 6]).unwrap();

    let view = store.get_labels(0);
    assert_eq!(view.len(), 3);
    assert_eq!(view.get(1), Some(&5));
    assert_eq!(view.get(3), None);
    assert_eq!(view.first(), Some(&4));
    assert_eq!(view.last(), Some(&6));
    assert_eq!(view.to_vec(), vec![4, 5, 6]);
    assert_eq!(view.iter().copied().max(), Some(6));
    assert!(view.contains(&5));

    let total: u32 = view.into_iter().sum();
    assert_eq!(total, 15);
}

#[test]
fn test_views_outlive_each_other_on_shared_store() {
    let mut store = AssocStore::<u32>::new();
    store.append(0, 1).unwrap();
    store.append(1, 2).unwrap();

    // Many read views can coexist
    let first = store.get_labels(0);
    let second = store.get_labels(1);
    let slice: &[u32] = first.as_slice();
    assert_eq!(slice, &[1]);
    assert_eq!(second, [2]);
}

#[test]
fn test_default_view_is_empty() {
    let view: LabelView<'_, McLabel> = LabelView::default();
    assert!(view.is_empty());
    assert_eq!(view.iter().count(), 0);
}
