//! Console appender implementation

use crate::core::{
    get_formatter, Appender, AppenderSettings, Formatter, LogEvent, LogFormat, LogLevel,
    LoggerError, Result,
};
#[cfg(feature = "console")]
use colored::Colorize;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleStream {
    Stdout,
    Stderr,
}

/// A writer appender bound to standard output or standard error.
pub struct ConsoleAppender {
    stream: ConsoleStream,
    use_colors: AtomicBool,
    settings: AppenderSettings,
}

impl ConsoleAppender {
    pub fn new(stream: ConsoleStream) -> Self {
        Self {
            stream,
            use_colors: AtomicBool::new(false),
            settings: AppenderSettings::new(LogFormat::Simple),
        }
    }

    pub fn stdout() -> Self {
        Self::new(ConsoleStream::Stdout)
    }

    pub fn stderr() -> Self {
        Self::new(ConsoleStream::Stderr)
    }

    pub fn stream(&self) -> ConsoleStream {
        self.stream
    }

    /// Paint each line in its level's color
    ///
    /// Off by default, so output bytes match the formatter exactly.
    ///
    /// # Example
    ///
    /// ```
    /// use taglog::ConsoleAppender;
    ///
    /// let appender = ConsoleAppender::stderr().with_colors(true);
    /// ```
    #[cfg(feature = "console")]
    #[must_use]
    pub fn with_colors(self, use_colors: bool) -> Self {
        self.use_colors.store(use_colors, Ordering::Relaxed);
        self
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

    fn paint(&self, line: String, _level: LogLevel) -> String {
        if !self.use_colors.load(Ordering::Relaxed) {
            return line;
        }
        #[cfg(feature = "console")]
        {
            line.color(_level.color_code()).to_string()
        }
        #[cfg(not(feature = "console"))]
        {
            line
        }
    }

    fn write_line(&self, line: &str) -> io::Result<()> {
        match self.stream {
            ConsoleStream::Stdout => {
                let mut out = io::stdout().lock();
                out.write_all(line.as_bytes())?;
                out.write_all(b"\n")
            }
            ConsoleStream::Stderr => {
                let mut err = io::stderr().lock();
                err.write_all(line.as_bytes())?;
                err.write_all(b"\n")
            }
        }
    }
}

impl Default for ConsoleAppender {
    fn default() -> Self {
        Self::stdout()
    }
}

impl Appender for ConsoleAppender {
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
        let Some(line) = self.settings.render(event) else {
            return Ok(());
        };
        let line = self.paint(line, event.level);
        self.write_line(&line)
            .map_err(|e| LoggerError::io_operation("writing log line", self.name(), e))
    }

    fn flush(&self) -> Result<()> {
        match self.stream {
            ConsoleStream::Stdout => io::stdout().flush()?,
            ConsoleStream::Stderr => io::stderr().flush()?,
        }
        Ok(())
    }

    fn name(&self) -> &str {
        match self.stream {
            ConsoleStream::Stdout => "stdout",
            ConsoleStream::Stderr => "stderr",
        }
    }
}
