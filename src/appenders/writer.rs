//! Appender that writes rendered lines to any `io::Write`

use crate::core::{
    get_formatter, Appender, AppenderSettings, Formatter, LogEvent, LogFormat, LogLevel,
    LoggerError, Result,
};
use parking_lot::Mutex;
use std::io::Write;

/// Writes `formatter(event) + "\n"` for every admitted event.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use taglog::{Dispatcher, LogEvent, LogFormat, LogLevel, WriterAppender};
///
/// let dispatcher = Dispatcher::new();
/// let appender = Arc::new(WriterAppender::new(Vec::new()).with_format(LogFormat::Minimal));
/// dispatcher.add_appender(appender.clone());
///
/// dispatcher.submit(LogEvent::new(LogLevel::Info, Vec::new(), "one".into()));
/// dispatcher.wait_for_incoming();
///
/// assert_eq!(appender.with_writer(|buf| buf.clone()), b"one\n");
/// ```
pub struct WriterAppender<W: Write + Send> {
    settings: AppenderSettings,
    writer: Mutex<W>,
}

impl<W: Write + Send> WriterAppender<W> {
    /// Admits every level and renders with the `Simple` format.
    pub fn new(writer: W) -> Self {
        Self {
            settings: AppenderSettings::new(LogFormat::Simple),
            writer: Mutex::new(writer),
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

    /// Run `f` with exclusive access to the underlying stream.
    pub fn with_writer<R>(&self, f: impl FnOnce(&mut W) -> R) -> R {
        let mut writer = self.writer.lock();
        f(&mut *writer)
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl<W: Write + Send> Appender for WriterAppender<W> {
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
        let Some(mut line) = self.settings.render(event) else {
            return Ok(());
        };
        line.push('\n');

        self.writer
            .lock()
            .write_all(line.as_bytes())
            .map_err(|e| LoggerError::io_operation("writing log line", "writer appender", e))
    }

    fn flush(&self) -> Result<()> {
        self.writer.lock().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "writer"
    }
}
