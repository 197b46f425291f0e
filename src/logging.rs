// File: ./src/logging.rs
use crate::context::AppContext;
use anyhow::Result;
use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, LevelFilter, SharedLogger, TermLogger,
    TerminalMode, WriteLogger,
};
use std::fs::OpenOptions;

/// Terminal output on stderr (warnings, or everything with `verbose`) plus an
/// `Info` log file in the data directory when one can be opened.
pub fn init(ctx: &dyn AppContext, verbose: bool) -> Result<()> {
    let term_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    let config = ConfigBuilder::new()
        .add_filter_ignore_str("reqwest")
        .add_filter_ignore_str("hyper")
        .build();

    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    loggers.push(TermLogger::new(
        term_level,
        config.clone(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ));

    if let Some(path) = ctx.get_log_file_path() {
        match OpenOptions::new().create(true).append(true).open(&path) {
            Ok(file) => loggers.push(WriteLogger::new(LevelFilter::Info, config, file)),
            Err(e) => eprintln!("Could not open log file {:?}: {}", path, e),
        }
    }

    CombinedLogger::init(loggers).map_err(|e| anyhow::anyhow!("Failed to init logger: {}", e))
}
