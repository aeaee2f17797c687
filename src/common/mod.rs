pub mod config;
pub mod error;
pub mod logger;
pub mod types;

pub use config::*;
pub use error::*;
pub use logger::initialize_logger;
pub use types::*;
