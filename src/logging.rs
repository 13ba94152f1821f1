//! File logging. The terminal belongs to the TUI, so everything goes to
//! `grove.log` in the config directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::settings;

/// Installs the global subscriber. Keep the guard alive until exit or
/// buffered lines are lost. `RUST_LOG` overrides the default level.
pub fn init(config_dir: &Path, verbose: bool) -> Result<(WorkerGuard, PathBuf)> {
    std::fs::create_dir_all(config_dir)
        .with_context(|| format!("Failed to create {}", config_dir.display()))?;
    let path = settings::log_path(config_dir);
    let file_name = path
        .file_name()
        .context("log path has no file name")?
        .to_owned();

    let appender = tracing_appender::rolling::never(config_dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("grove={default_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install logger: {e}"))?;

    Ok((guard, path))
}
