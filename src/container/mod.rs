mod bucket;
mod directory;
mod extendible_hash_table;
mod hash_function;
mod hash_table;

pub use bucket::*;
pub use directory::Directory;
pub use extendible_hash_table::*;
pub use hash_function::*;
pub use hash_table::*;
