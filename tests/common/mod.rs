//! Hash functions with predictable output for driving splits by hand.

#![allow(dead_code)]

use std::hash::{BuildHasherDefault, Hasher};

use pagehash::{ExtendibleHashTable, HashTableConfig};

/// Hashes a `u64` key to itself.
#[derive(Default)]
pub struct IdentityHasher(u64);

impl Hasher for IdentityHasher {
    fn finish(&self) -> u64 {
        self.0
    }

    fn write(&mut self, bytes: &[u8]) {
        for b in bytes {
            self.0 = (self.0 << 8) | u64::from(*b);
        }
    }

    fn write_u64(&mut self, n: u64) {
        self.0 = n;
    }
}

/// Hashes every key to zero.
#[derive(Default)]
pub struct ConstantHasher;

impl Hasher for ConstantHasher {
    fn finish(&self) -> u64 {
        0
    }

    fn write(&mut self, _bytes: &[u8]) {}
}

pub type BuildIdentity = BuildHasherDefault<IdentityHasher>;
pub type BuildConstant = BuildHasherDefault<ConstantHasher>;

pub fn identity_table(
    bucket_capacity: usize,
) -> ExtendibleHashTable<u64, u64, BuildIdentity> {
    let config = HashTableConfig::default().with_bucket_capacity(bucket_capacity);
    ExtendibleHashTable::with_hasher(config, BuildIdentity::default()).unwrap()
}

pub fn constant_table(
    bucket_capacity: usize,
) -> ExtendibleHashTable<u64, u64, BuildConstant> {
    let config = HashTableConfig::default().with_bucket_capacity(bucket_capacity);
    ExtendibleHashTable::with_hasher(config, BuildConstant::default()).unwrap()
}
