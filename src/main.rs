mod analyzer;
mod app;
mod calculator;
mod calibration;
mod config;
mod countdown;
mod errors;
mod file_browser;
mod history;
mod interface;
mod logging;
mod markdown;
mod predictor;
mod reading_session;
mod sampler;
mod stopwatch;
mod ticker;
mod timer_panel;
mod utilities;

use anyhow::Result;

use crate::config::{command, Settings};
use crate::interface::{install_panic_hook, run_ui};
use crate::logging::init_logging;

fn main() -> Result<()> {
    // Parse command-line arguments
    let matches = command().get_matches();
    let settings = Settings::from_matches(&matches)?;

    init_logging(&settings.log_file, settings.verbosity)?;
    log::info!(
        "start dir {}, sample limits {}..{}",
        settings.start_dir.display(),
        settings.sample_limits.min_words,
        settings.sample_limits.max_words
    );

    install_panic_hook();
    let result = run_ui(&settings);
    if let Err(err) = &result {
        log::error!("terminated with error: {:#}", err);
    }
    result
}
