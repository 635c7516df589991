//! # taglog
//!
//! A process-wide logging engine: loggers filter events by level and by
//! per-tag overrides, and a single background dispatcher delivers admitted
//! events to every registered appender without blocking the caller.
//!
//! ## Features
//!
//! - **Non-blocking**: callers enqueue onto an unbounded FIFO; one worker does all I/O
//! - **Tag overrides**: lower the threshold for chosen subsystems only
//! - **Pluggable output**: writer, console, memory and null appenders, swappable formatters
//! - **Drain and pause**: `wait_for_incoming`, `pause_logging`, `restart_logging`
//!
//! The functions at the crate root act on the default logger and the
//! process-wide dispatcher.
//!
//! ```
//! use std::sync::Arc;
//! use taglog::{LogLevel, MemoryAppender};
//!
//! let memory = Arc::new(MemoryAppender::new());
//! taglog::add_appender(memory.clone());
//! taglog::set_default_log_level(LogLevel::Debug);
//!
//! taglog::debug("starting up");
//! taglog::wait_for_incoming();
//!
//! assert_eq!(memory.logged_messages(), vec!["starting up".to_string()]);
//! ```

pub mod appenders;
pub mod core;
pub mod macros;

pub mod prelude {
    pub use crate::appenders::{
        ConsoleAppender, ConsoleStream, MemoryAppender, NullAppender, WriterAppender,
    };
    pub use crate::core::{
        format_from_string, get_formatter, Appender, Dispatcher, DispatcherMetrics,
        DispatcherState, Formatter, LogEvent, LogFormat, LogLevel, Logger, LoggerBuilder,
        LoggerConfig, LoggerError, Result, SharedAppender, TagList,
    };
}

pub use appenders::{ConsoleAppender, ConsoleStream, MemoryAppender, NullAppender, WriterAppender};
pub use crate::core::{
    format_from_string, formatter, get_formatter, replace_formatter, Appender, AppenderSettings,
    Dispatcher, DispatcherMetrics, DispatcherState, Formatter, FormatterRegistry, LogEvent,
    LogFormat, LogLevel, Logger, LoggerBuilder, LoggerConfig, LoggerError, Result,
    SharedAppender, TagLevel, TagList, DEFAULT_SHUTDOWN_TIMEOUT,
};

use std::fmt::Display;

/// Register an appender with the process-wide dispatcher.
pub fn add_appender(appender: SharedAppender) {
    Dispatcher::global().add_appender(appender);
}

pub fn clear_appenders() {
    Dispatcher::global().clear_appenders();
}

/// Block until everything logged so far has been delivered.
pub fn wait_for_incoming() {
    Dispatcher::global().wait_for_incoming();
}

pub fn pause_logging() {
    Dispatcher::global().pause_logging();
}

pub fn restart_logging() -> Result<()> {
    Dispatcher::global().restart_logging()
}

pub fn set_default_log_level(level: LogLevel) {
    Logger::global().set_log_level(level);
}

pub fn set_default_tag_level(tag: impl Into<String>, level: LogLevel) {
    Logger::global().set_tag_level(tag, level);
}

pub fn debug(message: impl Display) {
    Logger::global().debug(message);
}

pub fn info(message: impl Display) {
    Logger::global().info(message);
}

pub fn warn(message: impl Display) {
    Logger::global().warn(message);
}

pub fn error(message: impl Display) {
    Logger::global().error(message);
}

pub fn debug_tagged<S: AsRef<str>>(tags: &[S], message: impl Display) {
    Logger::global().debug_tagged(tags, message);
}

pub fn info_tagged<S: AsRef<str>>(tags: &[S], message: impl Display) {
    Logger::global().info_tagged(tags, message);
}

pub fn warn_tagged<S: AsRef<str>>(tags: &[S], message: impl Display) {
    Logger::global().warn_tagged(tags, message);
}

pub fn error_tagged<S: AsRef<str>>(tags: &[S], message: impl Display) {
    Logger::global().error_tagged(tags, message);
}
