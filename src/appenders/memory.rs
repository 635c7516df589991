//! In-memory appender, mostly for tests

use crate::core::{
    get_formatter, Appender, AppenderSettings, Formatter, LogEvent, LogFormat, LogLevel, Result,
};
use parking_lot::Mutex;

/// Keeps every admitted event's rendered line, in delivery order.
///
/// Renders with the `Minimal` format unless told otherwise.
pub struct MemoryAppender {
    settings: AppenderSettings,
    messages: Mutex<Vec<String>>,
}

impl MemoryAppender {
    pub fn new() -> Self {
        Self {
            settings: AppenderSettings::new(LogFormat::Minimal),
            messages: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn with_level(self, level: LogLevel) -> Self {
        self.settings.set_level(level);
        self
    }

    #[must_use]
    pub fn with_format(self, format: LogFormat) -> Self {
        self.settings.set_formatter(get_formatter(format));
        self
    }

    #[must_use]
    pub fn with_formatter(self, formatter: Formatter) -> Self {
        self.settings.set_formatter(formatter);
        self
    }

    pub fn logged_messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.messages.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.lock().is_empty()
    }

    pub fn clear(&self) {
        self.messages.lock().clear();
    }
}

impl Default for MemoryAppender {
    fn default() -> Self {
        Self::new()
    }
}

impl Appender for MemoryAppender {
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
        if let Some(line) = self.settings.render(event) {
            self.messages.lock().push(line);
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retains_in_order() {
        let memory = MemoryAppender::new();
        for message in ["a", "b", "c"] {
            memory
                .append(&LogEvent::new(LogLevel::Info, Vec::new(), message.into()))
                .unwrap();
        }
        assert_eq!(memory.logged_messages(), vec!["a", "b", "c"]);
        assert_eq!(memory.len(), 3);

        memory.clear();
        assert!(memory.is_empty());
    }

    #[test]
    fn test_level_and_format() {
        let memory = MemoryAppender::new()
            .with_level(LogLevel::Warn)
            .with_format(LogFormat::MinimalTagged);
        memory
            .append(&LogEvent::new(LogLevel::Info, Vec::new(), "skip".into()))
            .unwrap();
        memory
            .append(&LogEvent::new(LogLevel::Error, vec!["db".into()], "keep".into()))
            .unwrap();
        assert_eq!(memory.logged_messages(), vec!["[ERROR] [db] keep"]);
    }
}
