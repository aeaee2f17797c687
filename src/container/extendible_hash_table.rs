use std::fmt;
use std::hash::{BuildHasher, Hash};

use log::{debug, error, info, trace};
use parking_lot::{RwLock, RwLockUpgradableReadGuard};

use crate::common::{HashTableConfig, HashTableError, HashValue, Result};

use super::directory::BucketRef;
use super::hash_function::{hash_key, XxHashBuilder};
use super::{Bucket, Directory, HashTable};

/// Concurrent in-memory hash table based on extendible hashing.
///
/// The low `global_depth` bits of a key's hash select a directory slot, and
/// the slot names the bucket holding the key. When a bucket overflows it is
/// split in two along the next hash bit; the directory doubles only when that
/// bucket was already as deep as the directory. Buckets never merge.
///
/// # Locking
///
/// The directory sits behind a reader/writer lock and every bucket has its own
/// mutex. Lookups and in-place updates resolve the bucket under the shared
/// lock, release it, then lock only that bucket, so operations on different
/// buckets run in parallel. A split holds the upgradable lock (one split at a
/// time, lookups continue), keeps the overflowing bucket locked while its
/// entries are redistributed, and upgrades to exclusive only to double the
/// directory and re-point slots. Buckets replaced by a split are flagged as
/// retired, and anyone who resolved them beforehand resolves again.
pub struct ExtendibleHashTable<K, V, S = XxHashBuilder> {
    directory: RwLock<Directory<K, V>>,
    hash_builder: S,
    config: HashTableConfig,
}

impl<K, V> ExtendibleHashTable<K, V, XxHashBuilder>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// Creates an empty table with the default configuration.
    pub fn new() -> Self {
        Self::build(HashTableConfig::default(), XxHashBuilder::default())
    }

    /// Creates an empty table with the given configuration.
    pub fn with_config(config: HashTableConfig) -> Result<Self> {
        Self::with_hasher(config, XxHashBuilder::default())
    }
}

impl<K, V> Default for ExtendibleHashTable<K, V, XxHashBuilder>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> ExtendibleHashTable<K, V, S>
where
    K: Hash + Eq + Clone,
    V: Clone,
    S: BuildHasher,
{
    /// Creates an empty table that hashes keys with `hash_builder`.
    pub fn with_hasher(config: HashTableConfig, hash_builder: S) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config, hash_builder))
    }

    fn build(config: HashTableConfig, hash_builder: S) -> Self {
        info!(
            "Created extendible hash table (bucket capacity {}, max global depth {})",
            config.bucket_capacity, config.max_global_depth
        );
        Self {
            directory: RwLock::new(Directory::new(config.bucket_capacity)),
            hash_builder,
            config,
        }
    }

    /// Hashes `key` with the table's hash function.
    pub fn hash_key(&self, key: &K) -> HashValue {
        hash_key(&self.hash_builder, key)
    }

    /// Looks up the value mapped to `key`.
    pub fn find(&self, key: &K) -> Option<V> {
        let hash = self.hash_key(key);
        self.with_bucket(hash, |bucket| bucket.find(key))
    }

    /// Maps `key` to `value`, overwriting any existing value.
    ///
    /// A full bucket is split (doubling the directory when needed) and the
    /// insert retried until it fits. Fails with [`HashTableError::Overflow`]
    /// when no hash bit below the depth limit can separate the bucket's keys
    /// from `key`; the table is left unchanged in that case.
    pub fn insert(&self, key: K, value: V) -> Result<()> {
        let hash = self.hash_key(&key);
        loop {
            if self.with_bucket(hash, |bucket| bucket.insert(&key, &value)) {
                return Ok(());
            }
            self.split_bucket_for(hash, &key)?;
        }
    }

    /// Removes `key`. Returns false if it was not present. Never shrinks.
    pub fn remove(&self, key: &K) -> bool {
        let hash = self.hash_key(key);
        self.with_bucket(hash, |bucket| bucket.remove(key))
    }

    pub fn global_depth(&self) -> u32 {
        self.directory.read().global_depth()
    }

    /// Local depth of the bucket referenced by directory slot `slot`.
    pub fn local_depth(&self, slot: usize) -> Option<u32> {
        let directory = self.directory.upgradable_read();
        let id = directory.bucket_id_at(slot)?;
        let cell = directory.bucket(id)?;
        let depth = cell.lock().bucket.local_depth();
        Some(depth)
    }

    /// Number of distinct buckets.
    pub fn num_buckets(&self) -> usize {
        self.directory.read().num_buckets()
    }

    /// Number of directory slots.
    pub fn directory_size(&self) -> usize {
        self.directory.read().len()
    }

    pub fn bucket_capacity(&self) -> usize {
        self.config.bucket_capacity
    }

    pub fn config(&self) -> &HashTableConfig {
        &self.config
    }

    /// Number of entries stored in the table.
    pub fn len(&self) -> usize {
        let directory = self.directory.upgradable_read();
        directory
            .buckets()
            .map(|(_, cell)| cell.lock().bucket.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Checks every structural invariant of the directory and its buckets.
    pub fn verify_integrity(&self) -> Result<()> {
        let directory = self.directory.upgradable_read();
        directory.verify_integrity(|key| self.hash_key(key))
    }

    /// Runs `f` on the bucket currently responsible for `hash`.
    fn with_bucket<R, F>(&self, hash: HashValue, f: F) -> R
    where
        F: Fn(&mut Bucket<K, V>) -> R,
    {
        loop {
            let cell = self.resolve(hash);
            let mut cell = cell.lock();
            if cell.retired {
                trace!("Bucket for hash {:#x} was split, resolving again", hash);
                continue;
            }
            return f(&mut cell.bucket);
        }
    }

    fn resolve(&self, hash: HashValue) -> BucketRef<K, V> {
        let (_, cell) = self.directory.read().bucket_for(hash);
        cell
    }

    /// Performs one split round for the bucket responsible for `hash`.
    ///
    /// Returns without splitting if the bucket has room again or already
    /// holds `key`, since another thread got there first.
    fn split_bucket_for(&self, hash: HashValue, key: &K) -> Result<()> {
        let directory = self.directory.upgradable_read();
        let (old_id, cell) = directory.bucket_for(hash);
        let mut guard = cell.lock();

        if !guard.bucket.is_full() || guard.bucket.contains(key) {
            return Ok(());
        }

        let local_depth = guard.bucket.local_depth();
        if !self.can_separate(&guard.bucket, hash) {
            error!(
                "Bucket overflow cannot be resolved: {} keys share every hash bit from {} to {}",
                guard.bucket.len() + 1,
                local_depth,
                self.config.max_global_depth
            );
            return Err(HashTableError::Overflow {
                local_depth,
                capacity: self.config.bucket_capacity,
            });
        }

        let (zero, one) = guard.bucket.split(|k| self.hash_key(k));
        guard.retired = true;

        let mut directory = RwLockUpgradableReadGuard::upgrade(directory);
        if local_depth == directory.global_depth() {
            directory.double();
            debug!(
                "Doubled directory to {} slots (global depth {})",
                directory.len(),
                directory.global_depth()
            );
        }
        let (zero_id, one_id) = directory.replace(old_id, zero, one);
        debug!(
            "Split {} at local depth {} into {} and {}",
            old_id, local_depth, zero_id, one_id
        );

        Ok(())
    }

    /// Whether some hash bit in `[local_depth, max_global_depth)` differs
    /// between the new key's hash and one of the bucket's entries.
    fn can_separate(&self, bucket: &Bucket<K, V>, hash: HashValue) -> bool {
        let local_depth = bucket.local_depth();
        let max_depth = self.config.max_global_depth;
        if local_depth >= max_depth {
            return false;
        }

        let window = if max_depth >= u64::BITS {
            u64::MAX
        } else {
            (1u64 << max_depth) - 1
        };
        let differing = bucket
            .iter()
            .fold(0u64, |acc, (k, _)| acc | (self.hash_key(k) ^ hash));

        (differing & window) >> local_depth != 0
    }
}

impl<K, V, S> HashTable<K, V> for ExtendibleHashTable<K, V, S>
where
    K: Hash + Eq + Clone,
    V: Clone,
    S: BuildHasher,
{
    fn find(&self, key: &K) -> Option<V> {
        ExtendibleHashTable::find(self, key)
    }

    fn insert(&self, key: K, value: V) -> Result<()> {
        ExtendibleHashTable::insert(self, key, value)
    }

    fn remove(&self, key: &K) -> bool {
        ExtendibleHashTable::remove(self, key)
    }
}

impl<K, V, S> fmt::Debug for ExtendibleHashTable<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let directory = self.directory.read();
        f.debug_struct("ExtendibleHashTable")
            .field("global_depth", &directory.global_depth())
            .field("directory_size", &directory.len())
            .field("num_buckets", &directory.num_buckets())
            .field("config", &self.config)
            .finish()
    }
}
