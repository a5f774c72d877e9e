use std::thread;

use assocstore::{AssocStore, McLabel};

const SECTORS: i32 = 6;
const CLUSTERS_PER_SECTOR: usize = 200;

fn produce_sector(sector: i32) -> AssocStore<McLabel> {
    let mut store = AssocStore::with_capacity(CLUSTERS_PER_SECTOR, CLUSTERS_PER_SECTOR * 2);
    for cluster in 0..CLUSTERS_PER_SECTOR {
        // Every fifth cluster has no truth information
        if cluster % 5 == 4 {
            continue;
        }
        store
            .append(cluster, McLabel::new(cluster as i32, 0, sector))
            .unwrap();
        if cluster % 2 == 0 {
            store.append(cluster, McLabel::noise(0, sector)).unwrap();
        }
    }
    store
}

#[test]
fn test_parallel_producers_then_ordered_merge() {
    let handles: Vec<_> = (0..SECTORS)
        .map(|sector| thread::spawn(move || produce_sector(sector)))
        .collect();
    let parts: Vec<_> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();

    let merged = AssocStore::concat(parts).unwrap();
    let sequential = AssocStore::concat((0..SECTORS).map(produce_sector)).unwrap();

    assert_eq!(merged, sequential);
    // The last cluster of each sector is unlabelled and trails its shard
    assert_eq!(merged.indexed_size(), SECTORS as usize * (CLUSTERS_PER_SECTOR - 1));
}

#[test]
fn test_concurrent_readers_on_finished_store() {
    let store = AssocStore::concat((0..SECTORS).map(produce_sector)).unwrap();
    let per_sector = CLUSTERS_PER_SECTOR - 1;

    thread::scope(|scope| {
        for sector in 0..SECTORS {
            let store = &store;
            scope.spawn(move || {
                let base = sector as usize * per_sector;
                for cluster in 0..per_sector {
                    let labels = store.get_labels(base + cluster);
                    if cluster % 5 == 4 {
                        assert!(labels.is_empty());
                        continue;
                    }
                    assert_eq!(labels[0], McLabel::new(cluster as i32, 0, sector));
                    assert_eq!(labels.len(), if cluster % 2 == 0 { 2 } else { 1 });
                }
            });
        }
    });
}

#[test]
fn test_store_moves_between_stages() {
    let (sender, receiver) = std::sync::mpsc::channel();

    let producer = thread::spawn(move || {
        sender.send(produce_sector(1)).unwrap();
    });
    let received = receiver.recv().unwrap();
    producer.join().unwrap();

    assert_eq!(received.get_labels(0).len(), 2);
    assert_eq!(received.get_labels(1), [McLabel::new(1, 0, 1)]);
}
