use crate::common::Result;

/// Common interface of the in-memory key/value tables used by the buffer pool.
///
/// Methods take `&self`; implementations synchronize internally so a table
/// can be shared between threads behind an `Arc`.
pub trait HashTable<K, V> {
    /// Returns the value mapped to `key`, or `None` if it is absent.
    fn find(&self, key: &K) -> Option<V>;

    /// Maps `key` to `value`, overwriting any previous value.
    fn insert(&self, key: K, value: V) -> Result<()>;

    /// Removes `key`. Returns false if it was not present.
    fn remove(&self, key: &K) -> bool;
}
