use time::{UtcOffset, format_description::well_known::Rfc3339};
use tracing_subscriber::{
    EnvFilter, Registry, fmt, fmt::time::OffsetTime, layer::Layered, layer::SubscriberExt,
    util::SubscriberInitExt, util::TryInitError,
};

use crate::logger::{config::LoggerConfig, error::LoggerError, format::LoggerFormat};

type Filtered = Layered<EnvFilter, Registry>;

/// Installs the global subscriber described by `cfg`.
pub(crate) fn install(cfg: &LoggerConfig) -> Result<(), LoggerError> {
    let base = tracing_subscriber::registry().with(parse_filter(&cfg.level)?);

    match cfg.format {
        LoggerFormat::Text => base
            .with(
                fmt::layer()
                    .with_ansi(cfg.use_color)
                    .with_target(cfg.with_targets)
                    .with_timer(local_rfc3339()),
            )
            .try_init()
            .map_err(init_error),
        LoggerFormat::Json => base
            .with(
                fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_ansi(false)
                    .with_target(cfg.with_targets)
                    .with_timer(local_rfc3339()),
            )
            .try_init()
            .map_err(init_error),
        LoggerFormat::Journald => journald(base),
    }
}

pub(crate) fn parse_filter(filter: &str) -> Result<EnvFilter, LoggerError> {
    EnvFilter::try_new(filter).map_err(|e| LoggerError::InvalidFilter {
        filter: filter.to_string(),
        reason: e.to_string(),
    })
}

// Local offset lookup fails once threads exist on some platforms; fall back to UTC.
fn local_rfc3339() -> OffsetTime<Rfc3339> {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    OffsetTime::new(offset, Rfc3339)
}

fn init_error(e: TryInitError) -> LoggerError {
    let message = e.to_string();
    if message.contains("already") {
        LoggerError::AlreadyInitialized
    } else {
        LoggerError::Init(message)
    }
}

#[cfg(all(target_os = "linux", feature = "journald"))]
fn journald(base: Filtered) -> Result<(), LoggerError> {
    let layer = tracing_journald::layer()
        .map_err(|e| LoggerError::Init(format!("journald: {e}")))?
        .with_syslog_identifier("taskwatch".to_string());
    base.with(layer).try_init().map_err(init_error)
}

#[cfg(not(all(target_os = "linux", feature = "journald")))]
fn journald(_base: Filtered) -> Result<(), LoggerError> {
    Err(LoggerError::JournaldUnavailable)
}
