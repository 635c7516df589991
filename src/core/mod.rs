//! Core logger types and traits

pub mod appender;
pub mod dispatcher;
pub mod error;
pub mod formatter;
pub mod log_event;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod tag_list;

pub use appender::{Appender, AppenderSettings, SharedAppender};
pub use dispatcher::{Dispatcher, DispatcherState, DEFAULT_SHUTDOWN_TIMEOUT};
pub use error::{LoggerError, Result};
pub use formatter::{
    format_from_string, formatter, full_format, get_formatter, minimal_format,
    minimal_tagged_format, render, replace_formatter, simple_format, Formatter,
    FormatterRegistry, LogFormat,
};
pub use log_event::LogEvent;
pub use log_level::LogLevel;
pub use logger::{Logger, LoggerBuilder, LoggerConfig};
pub use metrics::DispatcherMetrics;
pub use tag_list::{TagLevel, TagList};
