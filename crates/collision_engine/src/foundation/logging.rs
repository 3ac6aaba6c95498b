//! Logging utilities and structured logging support

pub use log::{debug, info, warn, error, trace};

/// Initialize the logging system
///
/// Only binaries should call this; the library itself logs through the `log` facade.
pub fn init() {
    env_logger::init();
}

/// Initialize logging with a fallback filter when `RUST_LOG` is unset
pub fn init_with_default(filter: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();
}
