use log::trace;

use crate::common::{
    FrameId, HashTableConfig, HashTableError, PageId, Result, INVALID_FRAME_ID, INVALID_PAGE_ID,
};
use crate::container::ExtendibleHashTable;

/// Page table of the buffer pool: maps resident pages to the frames that hold
/// them.
///
/// The buffer pool consults it on every page access, maps a page when it is
/// read into a free frame and unmaps it on eviction. Callers must not cache
/// anything across calls; a split may move a page's entry at any time.
#[derive(Debug)]
pub struct PageTable {
    table: ExtendibleHashTable<PageId, FrameId>,
}

impl PageTable {
    /// Creates a page table with the default configuration.
    pub fn new() -> Self {
        Self {
            table: ExtendibleHashTable::new(),
        }
    }

    pub fn with_config(config: HashTableConfig) -> Result<Self> {
        Ok(Self {
            table: ExtendibleHashTable::with_config(config)?,
        })
    }

    /// Returns the frame holding `page_id`, or `None` if it is not resident.
    pub fn lookup(&self, page_id: PageId) -> Option<FrameId> {
        self.table.find(&page_id)
    }

    /// Records that `page_id` now lives in `frame_id`, replacing any previous
    /// mapping for the page.
    pub fn map(&self, page_id: PageId, frame_id: FrameId) -> Result<()> {
        if page_id == INVALID_PAGE_ID {
            return Err(HashTableError::InvalidKey(format!(
                "cannot map {}",
                page_id
            )));
        }
        if frame_id == INVALID_FRAME_ID {
            return Err(HashTableError::InvalidKey(format!(
                "cannot map {} to {}",
                page_id, frame_id
            )));
        }
        trace!("Mapping {} to {}", page_id, frame_id);
        self.table.insert(page_id, frame_id)
    }

    /// Drops the mapping for an evicted page. Returns false if the page was
    /// not mapped.
    pub fn unmap(&self, page_id: PageId) -> bool {
        trace!("Unmapping {}", page_id);
        self.table.remove(&page_id)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn global_depth(&self) -> u32 {
        self.table.global_depth()
    }

    pub fn num_buckets(&self) -> usize {
        self.table.num_buckets()
    }

    /// Checks the structural invariants of the underlying hash table.
    pub fn verify_integrity(&self) -> Result<()> {
        self.table.verify_integrity()
    }
}

impl Default for PageTable {
    fn default() -> Self {
        Self::new()
    }
}
