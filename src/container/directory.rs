use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::common::{BucketId, HashTableError, HashValue, Result};

use super::Bucket;

/// A bucket plus the flag that marks it as replaced by a split.
///
/// A thread that resolved a slot before the split may still hold the `Arc`;
/// seeing `retired` tells it to resolve again.
#[derive(Debug)]
pub(crate) struct BucketCell<K, V> {
    pub bucket: Bucket<K, V>,
    pub retired: bool,
}

pub(crate) type BucketRef<K, V> = Arc<Mutex<BucketCell<K, V>>>;

/// Directory of an extendible hash table.
///
/// Holds `2^global_depth` slots. Slot `i` stores the handle of the bucket that
/// owns every hash whose low `global_depth` bits equal `i`. Buckets live in an
/// arena indexed by `BucketId`; freed handles are recycled through a free list.
#[derive(Debug)]
pub struct Directory<K, V> {
    global_depth: u32,
    slots: Vec<BucketId>,
    arena: Vec<Option<BucketRef<K, V>>>,
    free_list: Vec<BucketId>,
    num_buckets: usize,
}

impl<K, V> Directory<K, V> {
    /// Creates a directory with one slot pointing at one empty bucket.
    pub fn new(bucket_capacity: usize) -> Self {
        let mut directory = Self {
            global_depth: 0,
            slots: Vec::with_capacity(1),
            arena: Vec::new(),
            free_list: Vec::new(),
            num_buckets: 0,
        };
        let id = directory.allocate(Bucket::new(bucket_capacity, 0));
        directory.slots.push(id);
        directory
    }

    pub fn global_depth(&self) -> u32 {
        self.global_depth
    }

    /// Number of slots (always `2^global_depth`).
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of distinct buckets referenced by the slots.
    pub fn num_buckets(&self) -> usize {
        self.num_buckets
    }

    /// Slot responsible for `hash`: its low `global_depth` bits.
    #[inline]
    pub fn slot_of(&self, hash: HashValue) -> usize {
        let mask = (1u64 << self.global_depth) - 1;
        (hash & mask) as usize
    }

    pub fn bucket_id_at(&self, slot: usize) -> Option<BucketId> {
        self.slots.get(slot).copied()
    }

    pub(crate) fn bucket(&self, id: BucketId) -> Option<&BucketRef<K, V>> {
        self.arena.get(id.as_usize()).and_then(Option::as_ref)
    }

    /// Resolves `hash` to the handle and bucket of its slot.
    pub(crate) fn bucket_for(&self, hash: HashValue) -> (BucketId, BucketRef<K, V>) {
        let id = self.slots[self.slot_of(hash)];
        let bucket = self.arena[id.as_usize()]
            .as_ref()
            .map(Arc::clone)
            .unwrap_or_else(|| unreachable!("slot references freed bucket {}", id));
        (id, bucket)
    }

    /// Iterates over every live bucket once.
    pub(crate) fn buckets(&self) -> impl Iterator<Item = (BucketId, &BucketRef<K, V>)> {
        self.arena
            .iter()
            .enumerate()
            .filter_map(|(i, cell)| cell.as_ref().map(|b| (BucketId::new(i as u32), b)))
    }

    /// Doubles the directory. Slot `i + 2^global_depth` gets the handle of
    /// slot `i`, so every bucket keeps serving the same hashes.
    pub fn double(&mut self) {
        self.slots.extend_from_within(..);
        self.global_depth += 1;
    }

    /// Replaces bucket `old` with the two halves of its split.
    ///
    /// Each slot that referenced `old` is re-pointed by the bit at position
    /// `old_local_depth` of the slot index: clear goes to `zero`, set goes
    /// to `one`. The old handle is released afterwards.
    pub(crate) fn replace(
        &mut self,
        old: BucketId,
        zero: Bucket<K, V>,
        one: Bucket<K, V>,
    ) -> (BucketId, BucketId) {
        debug_assert_eq!(zero.local_depth(), one.local_depth());
        debug_assert!(zero.local_depth() <= self.global_depth);
        let bit = zero.local_depth() - 1;

        let zero_id = self.allocate(zero);
        let one_id = self.allocate(one);

        for (slot, id) in self.slots.iter_mut().enumerate() {
            if *id == old {
                *id = if (slot >> bit) & 1 == 0 { zero_id } else { one_id };
            }
        }

        self.release(old);
        (zero_id, one_id)
    }

    fn allocate(&mut self, bucket: Bucket<K, V>) -> BucketId {
        let cell = Arc::new(Mutex::new(BucketCell {
            bucket,
            retired: false,
        }));
        self.num_buckets += 1;
        match self.free_list.pop() {
            Some(id) => {
                self.arena[id.as_usize()] = Some(cell);
                id
            }
            None => {
                self.arena.push(Some(cell));
                BucketId::new((self.arena.len() - 1) as u32)
            }
        }
    }

    fn release(&mut self, id: BucketId) {
        if let Some(cell) = self.arena.get_mut(id.as_usize()) {
            if cell.take().is_some() {
                self.num_buckets -= 1;
                self.free_list.push(id);
            }
        }
    }

    /// Checks the structural invariants of the directory and its buckets.
    ///
    /// Locks every bucket in turn, so the caller must keep splits out while
    /// this runs.
    pub fn verify_integrity<F>(&self, hash_of: F) -> Result<()>
    where
        F: Fn(&K) -> HashValue,
    {
        let gd = self.global_depth;
        if self.slots.len() != 1usize << gd {
            return Err(HashTableError::Corrupted(format!(
                "directory has {} slots at global depth {}",
                self.slots.len(),
                gd
            )));
        }

        let mut references: HashMap<BucketId, usize> = HashMap::new();
        for (slot, &id) in self.slots.iter().enumerate() {
            let cell = self.bucket(id).ok_or_else(|| {
                HashTableError::Corrupted(format!("slot {} references freed {}", slot, id))
            })?;
            let cell = cell.lock();
            let ld = cell.bucket.local_depth();

            if cell.retired {
                return Err(HashTableError::Corrupted(format!(
                    "slot {} references retired {}",
                    slot, id
                )));
            }
            if ld > gd {
                return Err(HashTableError::Corrupted(format!(
                    "{} has local depth {} above global depth {}",
                    id, ld, gd
                )));
            }

            let prefix = slot & ((1usize << ld) - 1);
            if self.slots[prefix] != id {
                return Err(HashTableError::Corrupted(format!(
                    "slot {} references {} but its prefix slot {} does not",
                    slot, id, prefix
                )));
            }

            *references.entry(id).or_insert(0) += 1;
        }

        if references.len() != self.num_buckets {
            return Err(HashTableError::Corrupted(format!(
                "{} buckets referenced but {} live in the arena",
                references.len(),
                self.num_buckets
            )));
        }

        for (&id, &count) in &references {
            let cell = self.bucket(id).ok_or_else(|| {
                HashTableError::Corrupted(format!("{} missing from the arena", id))
            })?;
            let cell = cell.lock();
            let bucket = &cell.bucket;
            let ld = bucket.local_depth();

            let expected = 1usize << (gd - ld);
            if count != expected {
                return Err(HashTableError::Corrupted(format!(
                    "{} at local depth {} referenced by {} slots, expected {}",
                    id, ld, count, expected
                )));
            }
            if bucket.len() > bucket.capacity() {
                return Err(HashTableError::Corrupted(format!(
                    "{} holds {} entries over capacity {}",
                    id,
                    bucket.len(),
                    bucket.capacity()
                )));
            }

            let mask = (1u64 << ld) - 1;
            let mut prefix = None;
            for (key, _) in bucket.iter() {
                let low = hash_of(key) & mask;
                match prefix {
                    None => prefix = Some(low),
                    Some(p) if p != low => {
                        return Err(HashTableError::Corrupted(format!(
                            "{} mixes hash prefixes {:#b} and {:#b}",
                            id, p, low
                        )));
                    }
                    Some(_) => {}
                }
            }
            if let Some(p) = prefix {
                let owner = self.slots[p as usize];
                if owner != id {
                    return Err(HashTableError::Corrupted(format!(
                        "{} stores prefix {:#b} owned by {}",
                        id, p, owner
                    )));
                }
            }
        }

        Ok(())
    }
}
