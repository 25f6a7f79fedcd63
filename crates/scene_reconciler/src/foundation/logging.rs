//! Logging utilities and structured logging support

pub use log::{debug, info, warn, error, trace};

/// Initialize the logging system
pub fn init() {
    env_logger::init();
}

/// Initialize the logging system, ignoring a logger that is already installed
///
/// Returns `true` when this call installed the logger.
pub fn try_init() -> bool {
    env_logger::try_init().is_ok()
}
