use std::{env, io::IsTerminal};

use crate::logger::{error::LoggerError, format::LoggerFormat};

const DEFAULT_LEVEL: &str = "info";

/// Filter directive, e.g. `info` or `tw_core=debug,info`.
pub const LOG_ENV: &str = "TASKWATCH_LOG";
/// One of `text`, `json`, `journald`.
pub const LOG_FORMAT_ENV: &str = "TASKWATCH_LOG_FORMAT";

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub format: LoggerFormat,
    pub level: String,
    pub with_targets: bool,
    pub use_color: bool,
}

impl LoggerConfig {
    /// Defaults overridden by [`LOG_ENV`] and [`LOG_FORMAT_ENV`] when set.
    pub fn from_env() -> Result<Self, LoggerError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, LoggerError> {
        let mut cfg = Self::default();
        if let Some(level) = lookup(LOG_ENV).filter(|v| !v.trim().is_empty()) {
            cfg.level = level;
        }
        if let Some(format) = lookup(LOG_FORMAT_ENV).filter(|v| !v.trim().is_empty()) {
            cfg.format = format.parse()?;
        }
        Ok(cfg)
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        let use_color = cfg!(test) || std::io::stdout().is_terminal();
        Self {
            format: LoggerFormat::default(),
            level: DEFAULT_LEVEL.to_string(),
            with_targets: true,
            use_color,
        }
    }
}
