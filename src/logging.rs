//! Logging setup.
//!
//! The terminal belongs to the UI, so log lines only go to a file. Without a
//! log file no subscriber is installed and `tracing` macros are no-ops.

use std::{
    fs::OpenOptions,
    io,
    path::Path,
    sync::Mutex,
};
use tracing_subscriber::{EnvFilter, fmt};

/// Build the filter: `RUST_LOG` wins over the configured level
pub fn build_filter(level: &str) -> io::Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(level)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, format!("invalid log level {level:?}: {e}"))),
    }
}

/// Install a global subscriber appending to `file`, if one is given
pub fn init_logging(file: Option<&Path>, level: &str) -> io::Result<()> {
    let Some(file) = file else {
        return Ok(());
    };

    let filter = build_filter(level)?;
    let writer = OpenOptions::new().create(true).append(true).open(file)?;

    fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(writer))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(io::Error::other)
}
