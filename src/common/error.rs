use thiserror::Error;

/// Hash table error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HashTableError {
    /// No hash bit left below the depth limit separates the overflowing
    /// bucket's keys. Indicates a degenerate hash function or key set.
    #[error("Unresolvable bucket overflow at local depth {local_depth} (bucket capacity {capacity})")]
    Overflow { local_depth: u32, capacity: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Hash table corrupted: {0}")]
    Corrupted(String),
}

pub type Result<T> = std::result::Result<T, HashTableError>;
