//! Caller-facing logger: level and tag filtering in front of a dispatcher

use super::{
    dispatcher::Dispatcher, log_event::LogEvent, log_level::LogLevel, tag_list::TagList,
};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{self, Write as _};
use std::sync::{Arc, LazyLock};

const NO_TAGS: &[&str] = &[];

/// Filters log calls and hands admitted events to its [`Dispatcher`].
///
/// An event is admitted when the default level admits it, or when any of its
/// tags has an override that does. Rejected calls return before the message
/// is formatted, so pass `format_args!` (or use the crate macros) rather than
/// a pre-built `String`.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use taglog::{Dispatcher, Logger, LogLevel, MemoryAppender};
///
/// let dispatcher = Arc::new(Dispatcher::new());
/// let memory = Arc::new(MemoryAppender::new());
/// dispatcher.add_appender(memory.clone());
///
/// let logger = Logger::with_dispatcher(Arc::clone(&dispatcher));
/// logger.set_log_level(LogLevel::Warn);
/// logger.set_tag_level("db", LogLevel::Debug);
///
/// logger.info("dropped");
/// logger.debug_tagged(&["db"], format_args!("query took {}ms", 3));
/// dispatcher.wait_for_incoming();
///
/// assert_eq!(memory.logged_messages(), vec!["query took 3ms".to_string()]);
/// ```
pub struct Logger {
    default_level: RwLock<LogLevel>,
    overrides: RwLock<TagList>,
    dispatcher: Arc<Dispatcher>,
}

static DEFAULT_LOGGER: LazyLock<Logger> = LazyLock::new(Logger::new);

impl Logger {
    /// A logger at `Info` bound to the process-wide dispatcher.
    #[must_use]
    pub fn new() -> Self {
        Self::with_dispatcher(Dispatcher::global())
    }

    #[must_use]
    pub fn with_dispatcher(dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            default_level: RwLock::new(LogLevel::default()),
            overrides: RwLock::new(TagList::new()),
            dispatcher,
        }
    }

    /// The process-wide default logger used by the crate-level helpers.
    pub fn global() -> &'static Logger {
        &DEFAULT_LOGGER
    }

    /// Build a logger on the process-wide dispatcher from `config`.
    #[must_use]
    pub fn from_config(config: &LoggerConfig) -> Self {
        Logger::builder().config(config).build()
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    pub fn set_log_level(&self, level: LogLevel) {
        *self.default_level.write() = level;
    }

    pub fn log_level(&self) -> LogLevel {
        *self.default_level.read()
    }

    pub fn set_tag_level(&self, tag: impl Into<String>, level: LogLevel) {
        self.overrides.write().set_tag_level(tag, level);
    }

    pub fn remove_tag_level(&self, tag: &str) -> Option<LogLevel> {
        self.overrides.write().remove_tag_level(tag)
    }

    /// Snapshot of the current tag overrides.
    pub fn tag_levels(&self) -> TagList {
        self.overrides.read().clone()
    }

    /// Whether an event at `level` carrying `tags` would be dispatched.
    pub fn is_enabled<S: AsRef<str>>(&self, level: LogLevel, tags: &[S]) -> bool {
        self.log_level().admits(level) || self.overrides.read().allows(level, tags)
    }

    /// Filter, then render `message` and dispatch it.
    pub fn log<S: AsRef<str>>(&self, level: LogLevel, tags: &[S], message: impl fmt::Display) {
        let now = Utc::now();
        if !self.is_enabled(level, tags) {
            return;
        }
        let event = LogEvent::at(level, owned_tags(tags), render_message(&message), now);
        self.dispatcher.submit(event);
    }

    /// Re-emit an event that originally happened at `original`.
    pub fn replay<S: AsRef<str>>(
        &self,
        level: LogLevel,
        tags: &[S],
        original: DateTime<Utc>,
        message: impl fmt::Display,
    ) {
        if !self.is_enabled(level, tags) {
            return;
        }
        let event =
            LogEvent::replayed(level, owned_tags(tags), render_message(&message), original);
        self.dispatcher.submit(event);
    }

    #[inline]
    pub fn debug(&self, message: impl fmt::Display) {
        self.log(LogLevel::Debug, NO_TAGS, message);
    }

    #[inline]
    pub fn info(&self, message: impl fmt::Display) {
        self.log(LogLevel::Info, NO_TAGS, message);
    }

    #[inline]
    pub fn warn(&self, message: impl fmt::Display) {
        self.log(LogLevel::Warn, NO_TAGS, message);
    }

    #[inline]
    pub fn error(&self, message: impl fmt::Display) {
        self.log(LogLevel::Error, NO_TAGS, message);
    }

    #[inline]
    pub fn debug_tagged<S: AsRef<str>>(&self, tags: &[S], message: impl fmt::Display) {
        self.log(LogLevel::Debug, tags, message);
    }

    #[inline]
    pub fn info_tagged<S: AsRef<str>>(&self, tags: &[S], message: impl fmt::Display) {
        self.log(LogLevel::Info, tags, message);
    }

    #[inline]
    pub fn warn_tagged<S: AsRef<str>>(&self, tags: &[S], message: impl fmt::Display) {
        self.log(LogLevel::Warn, tags, message);
    }

    #[inline]
    pub fn error_tagged<S: AsRef<str>>(&self, tags: &[S], message: impl fmt::Display) {
        self.log(LogLevel::Error, tags, message);
    }

    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use taglog::{Logger, LogLevel};
    ///
    /// let logger = Logger::builder()
    ///     .default_level(LogLevel::Warn)
    ///     .tag_level("net", LogLevel::Debug)
    ///     .build();
    ///
    /// assert!(logger.is_enabled(LogLevel::Debug, &["net"]));
    /// assert!(!logger.is_enabled(LogLevel::Info, &["db"]));
    /// ```
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

/// Render a caller's message, keeping whatever was written before a failing
/// `Display` impl gave up.
fn render_message(message: &impl fmt::Display) -> String {
    let mut rendered = String::new();
    if write!(rendered, "{}", message).is_err() {
        eprintln!(
            "[LOGGER ERROR] Message Display impl returned an error; \
             dispatching partial text: {:?}",
            rendered
        );
    }
    rendered
}

fn owned_tags<S: AsRef<str>>(tags: &[S]) -> Vec<String> {
    tags.iter().map(|t| t.as_ref().to_string()).collect()
}

/// Declarative logger settings, deserializable with serde
///
/// # Example
///
/// ```
/// use std::collections::BTreeMap;
/// use taglog::{Logger, LoggerConfig, LogLevel};
///
/// let config = LoggerConfig {
///     default_level: LogLevel::Error,
///     tag_levels: BTreeMap::from([("auth".to_string(), LogLevel::Info)]),
/// };
/// let logger = Logger::from_config(&config);
/// assert!(logger.is_enabled(LogLevel::Info, &["auth"]));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub default_level: LogLevel,
    pub tag_levels: BTreeMap<String, LogLevel>,
}

/// Builder for constructing Logger with a fluent API
pub struct LoggerBuilder {
    default_level: LogLevel,
    overrides: TagList,
    dispatcher: Option<Arc<Dispatcher>>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            default_level: LogLevel::default(),
            overrides: TagList::new(),
            dispatcher: None,
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn default_level(mut self, level: LogLevel) -> Self {
        self.default_level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn tag_level(mut self, tag: impl Into<String>, level: LogLevel) -> Self {
        self.overrides.set_tag_level(tag, level);
        self
    }

    /// Apply every setting in `config` on top of what is already set.
    #[must_use = "builder methods return a new value"]
    pub fn config(mut self, config: &LoggerConfig) -> Self {
        self.default_level = config.default_level;
        for (tag, level) in &config.tag_levels {
            self.overrides.set_tag_level(tag.clone(), *level);
        }
        self
    }

    /// Dispatch through `dispatcher` instead of the process-wide one.
    #[must_use = "builder methods return a new value"]
    pub fn dispatcher(mut self, dispatcher: Arc<Dispatcher>) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    pub fn build(self) -> Logger {
        let dispatcher = self.dispatcher.unwrap_or_else(Dispatcher::global);
        Logger {
            default_level: RwLock::new(self.default_level),
            overrides: RwLock::new(self.overrides),
            dispatcher,
        }
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
