// src/logging.rs

//! Logging setup using `tracing` + `tracing-subscriber`.
//!
//! This crate only emits `tracing` events; installing a subscriber is left to
//! the application. `init_logging` is a convenience for callers that have no
//! subscriber of their own.
//!
//! Priority for determining the log level:
//! 1. the level passed in (if any)
//! 2. `SHELLRUN_LOG` environment variable (e.g. "info", "debug")
//! 3. default to `info`
//!
//! Logs go to STDERR so mirrored child stdout stays clean.

use std::str::FromStr;

use anyhow::{Result, anyhow};
use tracing_subscriber::fmt;

pub const LOG_ENV_VAR: &str = "SHELLRUN_LOG";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(format!(
                "invalid log level: {other} (expected error, warn, info, debug or trace)"
            )),
        }
    }
}

impl From<LogLevel> for tracing::Level {
    fn from(lvl: LogLevel) -> Self {
        match lvl {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

/// Resolve the effective level from an explicit choice or the environment.
pub fn resolve_level(explicit: Option<LogLevel>) -> tracing::Level {
    explicit
        .or_else(|| {
            std::env::var(LOG_ENV_VAR)
                .ok()
                .and_then(|s| s.parse::<LogLevel>().ok())
        })
        .map(tracing::Level::from)
        .unwrap_or(tracing::Level::INFO)
}

/// Install a global fmt subscriber writing to stderr.
///
/// Fails if a global subscriber is already set.
pub fn init_logging(level: Option<LogLevel>) -> Result<()> {
    fmt()
        .with_max_level(resolve_level(level))
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("installing tracing subscriber: {e}"))
}
