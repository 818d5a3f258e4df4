//! Logging utilities
//!
//! The library only emits through the `log` facade; binaries and tests
//! call [`init`] (or [`init_with_filter`]) to route it to `env_logger`.

use std::sync::Once;

pub use log::{debug, error, info, trace, warn};

static INIT: Once = Once::new();

/// Initialize the logging system from `RUST_LOG`, defaulting to `info`.
///
/// Idempotent; later calls are ignored.
pub fn init() {
    init_with_filter(None);
}

/// Initialize the logging system with an explicit `env_logger` filter string
/// such as `"ui_particles=debug"`. `None` falls back to `RUST_LOG`.
pub fn init_with_filter(filter: Option<&str>) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        match filter.map(str::to_owned).or_else(|| std::env::var("RUST_LOG").ok()) {
            Some(filter) => {
                builder.parse_filters(&filter);
            }
            None => {
                builder.filter_level(log::LevelFilter::Info);
            }
        }

        // A second logger may already be installed by a test harness.
        if builder.try_init().is_ok() {
            log::debug!("logging initialized");
        }
    });
}
