//! Stderr logger for the command-line tool.
//!
//! The level comes from `TEXTIO_LOG` (`error`, `warn`, `info`, `debug`,
//! `trace`); logging is limited to warnings when it is unset or unrecognized.

use log::{LevelFilter, Log, Metadata, Record};

pub const LEVEL_VAR: &str = "TEXTIO_LOG";

/// Writes `LEVEL: message` lines to standard error.
#[derive(Debug)]
pub struct StderrLogger {
    level: LevelFilter,
}

impl StderrLogger {
    pub fn new(level: LevelFilter) -> Self {
        Self { level }
    }

    fn tag(level: log::Level) -> &'static str {
        match level {
            log::Level::Error => "ERROR",
            log::Level::Warn => "WARNING",
            log::Level::Info => "INFO",
            log::Level::Debug => "DEBUG",
            log::Level::Trace => "TRACE",
        }
    }
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("{}: {}", Self::tag(record.level()), record.args());
        }
    }

    fn flush(&self) {}
}

/// Parse a level name; `None` for anything unrecognized.
pub fn parse_level(value: &str) -> Option<LevelFilter> {
    value.trim().parse().ok()
}

/// Install the stderr logger with the level from the environment.
pub fn init() {
    let level = std::env::var(LEVEL_VAR)
        .ok()
        .and_then(|value| parse_level(&value))
        .unwrap_or(LevelFilter::Warn);
    if log::set_boxed_logger(Box::new(StderrLogger::new(level))).is_ok() {
        log::set_max_level(level);
    }
}
