use super::error::{HashTableError, Result};
use super::types::{FrameId, PageId};

/// Invalid page ID constant
pub const INVALID_PAGE_ID: PageId = PageId(u32::MAX);

/// Invalid frame ID constant
pub const INVALID_FRAME_ID: FrameId = FrameId(u32::MAX);

/// Default number of entries a bucket holds before it must split
pub const DEFAULT_BUCKET_CAPACITY: usize = 10;

/// Width of the hash value in bits
pub const HASH_BITS: u32 = 64;

/// Default upper bound on the global depth (directory of 16M slots)
pub const DEFAULT_MAX_GLOBAL_DEPTH: u32 = 24;

/// Tuning knobs for an extendible hash table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashTableConfig {
    /// Maximum entries per bucket
    pub bucket_capacity: usize,
    /// Number of low hash bits the directory may grow to use
    pub max_global_depth: u32,
}

impl Default for HashTableConfig {
    fn default() -> Self {
        Self {
            bucket_capacity: DEFAULT_BUCKET_CAPACITY,
            max_global_depth: DEFAULT_MAX_GLOBAL_DEPTH,
        }
    }
}

impl HashTableConfig {
    pub fn with_bucket_capacity(mut self, bucket_capacity: usize) -> Self {
        self.bucket_capacity = bucket_capacity;
        self
    }

    pub fn with_max_global_depth(mut self, max_global_depth: u32) -> Self {
        self.max_global_depth = max_global_depth;
        self
    }

    /// Checks that the configuration describes a usable table.
    pub fn validate(&self) -> Result<()> {
        if self.bucket_capacity == 0 {
            return Err(HashTableError::InvalidConfig(
                "bucket capacity must be at least 1".to_string(),
            ));
        }
        if self.max_global_depth > HASH_BITS {
            return Err(HashTableError::InvalidConfig(format!(
                "max global depth {} exceeds hash width of {} bits",
                self.max_global_depth, HASH_BITS
            )));
        }
        // The directory is a Vec indexed by usize.
        if self.max_global_depth >= usize::BITS {
            return Err(HashTableError::InvalidConfig(format!(
                "max global depth {} cannot be addressed on this platform",
                self.max_global_depth
            )));
        }
        Ok(())
    }
}
