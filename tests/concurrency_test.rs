//! Multi-threaded tests for the extendible hash table

mod common;

use std::sync::{Arc, Barrier};
use std::thread;

use pagehash::common::HashTableConfig;
use pagehash::ExtendibleHashTable;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use common::identity_table;

fn small_table() -> Arc<ExtendibleHashTable<u64, u64>> {
    let config = HashTableConfig::default().with_bucket_capacity(4);
    Arc::new(ExtendibleHashTable::with_config(config).unwrap())
}

#[test]
fn test_concurrent_disjoint_inserts() {
    let table = small_table();
    let threads = 8u64;
    let per_thread = 500u64;

    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let table = Arc::clone(&table);
            thread::spawn(move || {
                for i in 0..per_thread {
                    let key = t * per_thread + i;
                    table.insert(key, key * 2).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(table.len(), (threads * per_thread) as usize);
    for key in 0..threads * per_thread {
        assert_eq!(table.find(&key), Some(key * 2));
    }
    assert!(table.verify_integrity().is_ok());
}

#[test]
fn test_concurrent_readers_see_stable_keys_during_splits() {
    let table = small_table();

    // Keys 0..100 are inserted up front and never touched again.
    for key in 0..100u64 {
        table.insert(key, key).unwrap();
    }

    let barrier = Arc::new(Barrier::new(5));
    let mut handles = Vec::new();

    for t in 0..4u64 {
        let table = Arc::clone(&table);
        let barrier = Arc::clone(&barrier);
        handles.push(thread::spawn(move || {
            barrier.wait();
            for i in 0..1000u64 {
                let key = 1000 + t * 1000 + i;
                table.insert(key, key).unwrap();
            }
        }));
    }

    let reader = {
        let table = Arc::clone(&table);
        let barrier = Arc::clone(&barrier);
        thread::spawn(move || {
            barrier.wait();
            for _ in 0..20 {
                for key in 0..100u64 {
                    assert_eq!(table.find(&key), Some(key));
                }
            }
        })
    };

    for handle in handles {
        handle.join().unwrap();
    }
    reader.join().unwrap();

    assert_eq!(table.len(), 4100);
    assert!(table.verify_integrity().is_ok());
}

#[test]
fn test_concurrent_insert_and_remove() {
    let table = small_table();
    let threads = 4u64;

    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let table = Arc::clone(&table);
            thread::spawn(move || {
                let base = t * 10_000;
                for i in 0..400u64 {
                    table.insert(base + i, i).unwrap();
                }
                // Drop the odd keys again.
                for i in (1..400u64).step_by(2) {
                    assert!(table.remove(&(base + i)));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    for t in 0..threads {
        let base = t * 10_000;
        for i in 0..400u64 {
            let expected = if i % 2 == 0 { Some(i) } else { None };
            assert_eq!(table.find(&(base + i)), expected);
        }
    }
    assert_eq!(table.len(), (threads * 200) as usize);
    assert!(table.verify_integrity().is_ok());
}

#[test]
fn test_concurrent_overwrites_same_keys() {
    let table = small_table();
    let threads = 6u64;

    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let table = Arc::clone(&table);
            thread::spawn(move || {
                for round in 0..50u64 {
                    for key in 0..64u64 {
                        table.insert(key, t * 1000 + round).unwrap();
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    // Every key holds the final round of some thread.
    assert_eq!(table.len(), 64);
    for key in 0..64u64 {
        let value = table.find(&key).unwrap();
        assert_eq!(value % 1000, 49);
        assert!(value / 1000 < threads);
    }
    assert!(table.verify_integrity().is_ok());
}

#[test]
fn test_concurrent_splits_on_shared_prefix() {
    // Identity hashes with capacity 2 make every thread fight over the same
    // few buckets while the directory grows.
    let table = Arc::new(identity_table(2));
    let threads = 4u64;

    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let table = Arc::clone(&table);
            thread::spawn(move || {
                for i in 0..256u64 {
                    let key = i * threads + t;
                    table.insert(key, key).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(table.len(), 1024);
    for key in 0..1024u64 {
        assert_eq!(table.find(&key), Some(key));
    }
    assert!(table.global_depth() >= 9);
    assert!(table.verify_integrity().is_ok());
}

#[test]
fn test_concurrent_random_workload() {
    let table = small_table();

    let handles: Vec<_> = (0..4u64)
        .map(|t| {
            let table = Arc::clone(&table);
            thread::spawn(move || {
                let mut rng = StdRng::seed_from_u64(t);
                // Each thread owns keys congruent to t mod 4, so a local
                // model stays exact.
                let mut present = vec![false; 300];
                for _ in 0..3000 {
                    let slot = rng.gen_range(0..300usize);
                    let key = slot as u64 * 4 + t;
                    if rng.gen_bool(0.4) {
                        assert_eq!(table.remove(&key), present[slot]);
                        present[slot] = false;
                    } else {
                        table.insert(key, key + 1).unwrap();
                        present[slot] = true;
                    }
                }
                for (slot, &is_present) in present.iter().enumerate() {
                    let key = slot as u64 * 4 + t;
                    let expected = if is_present { Some(key + 1) } else { None };
                    assert_eq!(table.find(&key), expected);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert!(table.verify_integrity().is_ok());
}
