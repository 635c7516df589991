//! Appender trait for log output destinations

use super::{
    error::Result,
    formatter::{get_formatter, render, Formatter, LogFormat},
    log_event::LogEvent,
    log_level::LogLevel,
};
use parking_lot::RwLock;
use std::sync::Arc;

/// A sink for log events.
///
/// Appenders are shared between the caller (who adjusts level and formatter)
/// and the dispatcher worker (which calls `append`), so every method takes
/// `&self` and implementations guard their own state.
pub trait Appender: Send + Sync {
    fn set_level(&self, level: LogLevel);

    fn level(&self) -> LogLevel;

    fn check_level(&self, level: LogLevel) -> bool {
        self.level().admits(level)
    }

    fn set_formatter(&self, formatter: Formatter);

    /// Render and write `event` if it passes this appender's own level.
    fn append(&self, event: &LogEvent) -> Result<()>;

    fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str;
}

pub type SharedAppender = Arc<dyn Appender>;

/// Level and formatter state common to every built-in appender.
pub struct AppenderSettings {
    level: RwLock<LogLevel>,
    formatter: RwLock<Formatter>,
}

impl AppenderSettings {
    /// Admit everything, render with the registered formatter for `format`.
    pub fn new(format: LogFormat) -> Self {
        Self {
            level: RwLock::new(LogLevel::Debug),
            formatter: RwLock::new(get_formatter(format)),
        }
    }

    pub fn level(&self) -> LogLevel {
        *self.level.read()
    }

    pub fn set_level(&self, level: LogLevel) {
        *self.level.write() = level;
    }

    pub fn set_formatter(&self, formatter: Formatter) {
        *self.formatter.write() = formatter;
    }

    pub fn check_level(&self, level: LogLevel) -> bool {
        self.level().admits(level)
    }

    /// Rendered line for `event`, or `None` when the level check fails.
    pub fn render(&self, event: &LogEvent) -> Option<String> {
        if !self.check_level(event.level) {
            return None;
        }
        let formatter = Arc::clone(&self.formatter.read());
        Some(render(&formatter, event))
    }
}
