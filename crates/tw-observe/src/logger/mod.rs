mod config;
mod error;
mod format;
mod log;

pub use config::{LOG_ENV, LOG_FORMAT_ENV, LoggerConfig};
pub use error::LoggerError;
pub use format::LoggerFormat;

/// Install the process-wide `tracing` subscriber.
///
/// Fails with [`LoggerError::AlreadyInitialized`] when called twice.
pub fn logger_init(cfg: &LoggerConfig) -> Result<(), LoggerError> {
    log::install(cfg)
}
