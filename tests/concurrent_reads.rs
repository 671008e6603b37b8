//! Many threads reading one open storage must each see only their own range.

use std::sync::Arc;

use tempfile::TempDir;

use mzbin::{BinaryStorage, DataLocation, DataStorage};

const RANGES: usize = 16;
const RANGE_LEN: usize = 4096;
const ROUNDS: usize = 200;

#[test]
fn test_concurrent_reads_see_their_own_ranges() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("patterns.bin");

    // Range i is filled with the byte value i + 1.
    let contents: Vec<u8> = (0..RANGES)
        .flat_map(|i| std::iter::repeat((i + 1) as u8).take(RANGE_LEN))
        .collect();
    std::fs::write(&path, &contents).unwrap();

    let storage: Arc<dyn DataStorage> = Arc::new(BinaryStorage::open(&path).unwrap());

    std::thread::scope(|scope| {
        for i in 0..RANGES {
            let location =
                DataLocation::new(Arc::clone(&storage), (i * RANGE_LEN) as i64, RANGE_LEN as i64);
            scope.spawn(move || {
                let expected = (i + 1) as u8;
                for _ in 0..ROUNDS {
                    let bytes = location.bytes().unwrap();
                    assert_eq!(bytes.len(), RANGE_LEN);
                    assert!(bytes.iter().all(|&b| b == expected), "range {} mixed", i);
                }
            });
        }
    });
}

#[test]
fn test_close_during_reads_degrades_to_empty() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("patterns.bin");
    std::fs::write(&path, vec![7u8; RANGE_LEN * 4]).unwrap();

    let storage = Arc::new(BinaryStorage::open(&path).unwrap());

    std::thread::scope(|scope| {
        for t in 0..4 {
            let storage = Arc::clone(&storage);
            scope.spawn(move || {
                for _ in 0..ROUNDS {
                    let bytes = storage.read((t * RANGE_LEN) as u64, RANGE_LEN).unwrap();
                    assert!(bytes.is_empty() || bytes == vec![7u8; RANGE_LEN]);
                }
            });
        }
        scope.spawn(|| storage.close());
    });

    assert!(!storage.is_open());
}
