use std::fs::{self, OpenOptions};
use std::path::Path;

use anyhow::{Context, Result};
use log::LevelFilter;

pub fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    }
}

/// Route `log` records to a file; the terminal belongs to the UI. `RUST_LOG`
/// directives still apply on top of the verbosity level.
pub fn init_logging(path: &Path, verbosity: u8) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("creating log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    env_logger::Builder::new()
        .filter_level(level_for(verbosity))
        .parse_default_env()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()
        .context("logger already initialised")?;

    log::info!("tabdesk {} starting, logging to {}", env!("CARGO_PKG_VERSION"), path.display());
    Ok(())
}
