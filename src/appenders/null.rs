//! Appender that discards everything but keeps count

use crate::core::{Appender, AppenderSettings, Formatter, LogEvent, LogFormat, LogLevel, Result};
use std::sync::atomic::{AtomicU64, Ordering};

/// Writes nothing; counts the events that pass its level.
///
/// Never invokes its formatter.
pub struct NullAppender {
    settings: AppenderSettings,
    count: AtomicU64,
}

impl NullAppender {
    pub fn new() -> Self {
        Self {
            settings: AppenderSettings::new(LogFormat::Minimal),
            count: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub fn with_level(self, level: LogLevel) -> Self {
        self.settings.set_level(level);
        self
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }
}

impl Default for NullAppender {
    fn default() -> Self {
        Self::new()
    }
}

impl Appender for NullAppender {
    fn set_level(&self, level: LogLevel) {
        self.settings.set_level(level);
    }

    fn level(&self) -> LogLevel {
        self.settings.level()
    }

    fn set_formatter(&self, formatter: Formatter) {
        self.settings.set_formatter(formatter);
    }

    fn append(&self, event: &LogEvent) -> Result<()> {
        if self.settings.check_level(event.level) {
            self.count.fetch_add(1, Ordering::Relaxed);
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "null"
    }
}
