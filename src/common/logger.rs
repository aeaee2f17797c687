use std::sync::Once;

use env_logger::Builder;
use log::LevelFilter;

static INIT: Once = Once::new();

/// Installs the process-wide logger. Safe to call more than once; later calls
/// are no-ops. `RUST_LOG` overrides the built-in filters.
pub fn initialize_logger() {
    INIT.call_once_force(|_| {
        let mut builder = Builder::new();

        builder
            .filter_level(LevelFilter::Warn)
            .filter_module("pagehash", LevelFilter::Info)
            .filter_module("pagehash::container", LevelFilter::Info)
            .filter_module("pagehash::buffer", LevelFilter::Info)
            .format_timestamp_millis()
            .parse_default_env();

        // Another logger may already be installed by the embedding program.
        let _ = builder.try_init();
    });
}
