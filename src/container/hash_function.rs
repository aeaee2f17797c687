use std::hash::{BuildHasher, Hash};

use twox_hash::XxHash64;

use crate::common::HashValue;

/// Builds seeded xxHash64 hashers. This is the table's default hash function:
/// it is deterministic across runs, unlike `RandomState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct XxHashBuilder {
    seed: u64,
}

impl XxHashBuilder {
    pub fn with_seed(seed: u64) -> Self {
        Self { seed }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl BuildHasher for XxHashBuilder {
    type Hasher = XxHash64;

    fn build_hasher(&self) -> XxHash64 {
        XxHash64::with_seed(self.seed)
    }
}

/// Hashes `key` with a fresh hasher from `builder`.
#[inline]
pub fn hash_key<K, S>(builder: &S, key: &K) -> HashValue
where
    K: Hash + ?Sized,
    S: BuildHasher,
{
    builder.hash_one(key)
}
