//! Tracing subscriber installation.

use std::io;

use anyhow::{Result, anyhow};
use clap::ValueEnum;
use tracing_subscriber::{EnvFilter, fmt};

/// Default filter when neither `RUST_LOG` nor `--log-level` is given.
pub(crate) const DEFAULT_LOG_LEVEL: &str = "warn";

/// Available output formats for the logger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum LogFormat {
    Pretty,
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub(crate) struct LoggingConfig<'a> {
    pub(crate) level: &'a str,
    pub(crate) format: LogFormat,
}

/// Configure and install the global tracing subscriber.
///
/// Logs go to stderr so they never interleave with job output on stdout.
/// `RUST_LOG` takes precedence over the configured level.
pub(crate) fn init_logging(config: &LoggingConfig<'_>) -> Result<()> {
    let env_filter = build_env_filter(config.level);
    let builder = fmt::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(false);

    let installed = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };
    installed.map_err(|err| anyhow!("failed to install tracing subscriber: {err}"))
}

fn build_env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}
