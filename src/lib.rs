//! Pagehash - the page table of a disk-oriented buffer pool
//!
//! This crate provides the in-memory index a buffer pool manager uses to
//! translate a page identifier into the frame currently holding it, or to
//! report that the page is not buffered.
//!
//! # Architecture
//!
//! - **Container** (`container`): Generic hash tables
//!   - `ExtendibleHashTable`: Concurrent extendible hashing with per-bucket locks
//!   - `Directory`: Slot array and bucket arena with global depth bookkeeping
//!   - `Bucket`: Fixed-capacity key/value storage with a local depth
//!   - `HashTable`: Trait shared by the table implementations
//!
//! - **Buffer** (`buffer`): The buffer pool's view of the container
//!   - `PageTable`: `PageId` to `FrameId` mapping
//!
//! - **Common** (`common`): Identifier types, configuration, errors and logging
//!
//! # Example
//!
//! ```rust
//! use pagehash::buffer::PageTable;
//! use pagehash::common::{FrameId, PageId};
//!
//! let page_table = PageTable::new();
//!
//! // A page is read into frame 3
//! page_table.map(PageId::new(42), FrameId::new(3)).unwrap();
//! assert_eq!(page_table.lookup(PageId::new(42)), Some(FrameId::new(3)));
//!
//! // The page is evicted
//! assert!(page_table.unmap(PageId::new(42)));
//! assert_eq!(page_table.lookup(PageId::new(42)), None);
//! ```

pub mod buffer;
pub mod common;
pub mod container;

// Re-export commonly used types at the crate root
pub use common::{FrameId, HashTableConfig, HashTableError, PageId, Result};
pub use container::{ExtendibleHashTable, HashTable};
