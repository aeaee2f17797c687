use crate::common::HashValue;

/// A fixed-capacity bucket of unique key/value pairs.
///
/// Every key stored here shares the same low `local_depth` hash bits. Entries
/// are kept in insertion order, but nothing relies on that order.
#[derive(Debug, Clone)]
pub struct Bucket<K, V> {
    entries: Vec<(K, V)>,
    capacity: usize,
    local_depth: u32,
}

impl<K, V> Bucket<K, V> {
    pub fn new(capacity: usize, local_depth: u32) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
            local_depth,
        }
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn local_depth(&self) -> u32 {
        self.local_depth
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    /// Drains this bucket into two successors one level deeper.
    ///
    /// Entries whose hash has bit `local_depth` clear go to the first
    /// successor, the rest to the second. Both successors keep this bucket's
    /// capacity, so neither can overflow.
    pub fn split<F>(&mut self, hash_of: F) -> (Bucket<K, V>, Bucket<K, V>)
    where
        F: Fn(&K) -> HashValue,
    {
        let depth = self.local_depth;
        let mut zero = Bucket::new(self.capacity, depth + 1);
        let mut one = Bucket::new(self.capacity, depth + 1);

        for (key, value) in self.entries.drain(..) {
            if (hash_of(&key) >> depth) & 1 == 0 {
                zero.entries.push((key, value));
            } else {
                one.entries.push((key, value));
            }
        }

        (zero, one)
    }
}

impl<K, V> Bucket<K, V>
where
    K: Eq + Clone,
    V: Clone,
{
    pub fn find(&self, key: &K) -> Option<V> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Inserts or overwrites `key`.
    ///
    /// Returns false without touching the bucket if the key is new and the
    /// bucket is already full.
    pub fn insert(&mut self, key: &K, value: &V) -> bool {
        if let Some((_, v)) = self.entries.iter_mut().find(|(k, _)| k == key) {
            *v = value.clone();
            return true;
        }
        if self.is_full() {
            return false;
        }
        self.entries.push((key.clone(), value.clone()));
        true
    }

    pub fn remove(&mut self, key: &K) -> bool {
        match self.entries.iter().position(|(k, _)| k == key) {
            Some(pos) => {
                self.entries.swap_remove(pos);
                true
            }
            None => false,
        }
    }
}
