//! Logging utilities and structured logging support

pub use log::{debug, info, warn, error, trace};

/// Initialize the logging system from `RUST_LOG`
pub fn init() {
    env_logger::init();
}

/// Initialize the logging system with an explicit filter such as `"info"` or
/// `"scene_engine=debug"`. `RUST_LOG` still wins when it is set.
///
/// Returns `false` if a logger was already installed.
pub fn init_with_filter(filter: &str) -> bool {
    env_logger::Builder::new()
        .parse_filters(filter)
        .parse_env("RUST_LOG")
        .try_init()
        .is_ok()
}
