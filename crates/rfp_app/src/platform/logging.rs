//! Diagnostic logging setup for the `rfp` binary.
//!
//! Defaults to `./rfp.log` so log lines do not interleave with the panel.

use log::LevelFilter;
use rfp_logging::LogDestination;

use super::config::{AppConfig, LogTarget};

pub fn initialize(config: &AppConfig, verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    if !rfp_logging::initialize(destination(config), level) {
        eprintln!("Warning: diagnostic logging is disabled");
    }
}

fn destination(config: &AppConfig) -> LogDestination {
    match config.log {
        LogTarget::File => LogDestination::File(config.log_file.clone()),
        LogTarget::Terminal => LogDestination::Terminal,
        LogTarget::Both => LogDestination::Both(config.log_file.clone()),
    }
}
