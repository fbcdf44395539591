// File: src/logging.rs
//! Logging bootstrap for front-ends embedding this crate. Library code only
//! uses the `log` facade; an application calls `init` once at startup.
use crate::context::AppContext;
use anyhow::Result;
use log::LevelFilter;
use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode, WriteLogger};
use std::fs::File;

/// Initializes terminal plus file logging. The log file lives in the
/// context's data directory so test contexts stay isolated.
pub fn init(ctx: &dyn AppContext, level: LevelFilter) -> Result<()> {
    let log_path = ctx.get_data_dir()?.join("calview.log");
    CombinedLogger::init(vec![
        TermLogger::new(
            level,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ),
        WriteLogger::new(level, Config::default(), File::create(&log_path)?),
    ])?;
    Ok(())
}
