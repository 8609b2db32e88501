//! Console logger implementation

use super::traits::{Level, Logger};

/// Writes `INFO` lines to stdout and everything else to stderr
///
/// Lines below the threshold are dropped; the default threshold is `Info`.
#[derive(Debug, Clone)]
pub struct ConsoleLogger {
    prefix: String,
    min_level: Level,
}

impl Default for ConsoleLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleLogger {
    /// Create a console logger with the `[LLMRelay]` prefix
    pub fn new() -> Self {
        Self::with_prefix("[LLMRelay]")
    }

    /// Create a console logger with a custom prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            min_level: Level::Info,
        }
    }

    /// Lower the threshold to `Debug` when `verbose` is set
    pub fn verbose(self, verbose: bool) -> Self {
        self.with_min_level(if verbose { Level::Debug } else { Level::Info })
    }

    pub fn with_min_level(mut self, min_level: Level) -> Self {
        self.min_level = min_level;
        self
    }

    fn enabled(&self, level: Level) -> bool {
        level >= self.min_level
    }
}

impl Logger for ConsoleLogger {
    fn log(&self, level: Level, message: &str) {
        if !self.enabled(level) {
            return;
        }
        match level {
            Level::Info => println!("{} {}: {}", self.prefix, level, message),
            _ => eprintln!("{} {}: {}", self.prefix, level, message),
        }
    }
}
