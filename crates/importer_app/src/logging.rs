//! Logging setup for the importer binary.
//!
//! Run output goes to the terminal and, when possible, to `./importer.log`
//! in the current working directory so an unattended sync leaves a trail.

use std::fs::File;
use std::path::Path;

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

const LOG_FILE: &str = "./importer.log";

/// Initialize terminal plus file logging. A missing or unwritable log file
/// is reported on stderr and logging continues terminal-only.
pub fn initialize() {
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build();

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        config.clone(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    match File::create(Path::new(LOG_FILE)) {
        Ok(file) => loggers.push(WriteLogger::new(level, config, file)),
        Err(err) => eprintln!("Warning: could not create {LOG_FILE}: {err}"),
    }

    let _ = CombinedLogger::init(loggers);
}
