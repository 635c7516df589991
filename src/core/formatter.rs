//! Named output formats and the formatters that render them
//!
//! A formatter is a pure function of an event's parts. The built-in ones are:
//! - `Full`: `[Dec 31 16:16:40.000] [INFO] [one two] [replayed from Jan  1 16:16:40.000] hello`
//! - `Simple`: `[Dec 31 16:16:40] [INFO] hello`
//! - `MinimalTagged`: `[INFO] [one two] hello`
//! - `Minimal`: `hello`
//!
//! Times are rendered in the local time zone.

use super::log_event::LogEvent;
use super::log_level::LogLevel;
use chrono::{DateTime, Local, TimeZone, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, LazyLock};

/// Renders `(level, tags, message, timestamp, original_timestamp)` to a line.
pub type Formatter =
    Arc<dyn Fn(LogLevel, &[String], &str, DateTime<Utc>, DateTime<Utc>) -> String + Send + Sync>;

/// Wrap a function or closure as a [`Formatter`].
pub fn formatter<F>(f: F) -> Formatter
where
    F: Fn(LogLevel, &[String], &str, DateTime<Utc>, DateTime<Utc>) -> String + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Apply a formatter to an event.
pub fn render(formatter: &Formatter, event: &LogEvent) -> String {
    formatter(
        event.level,
        &event.tags,
        &event.message,
        event.timestamp,
        event.original_timestamp,
    )
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogFormat {
    Full,
    #[default]
    Simple,
    Minimal,
    MinimalTagged,
}

impl LogFormat {
    /// Case-insensitive lookup; anything unrecognized is `Simple`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_uppercase().as_str() {
            "FULL" => LogFormat::Full,
            "MINIMAL" => LogFormat::Minimal,
            "MINIMALTAGGED" => LogFormat::MinimalTagged,
            _ => LogFormat::Simple,
        }
    }

    pub fn to_str(&self) -> &'static str {
        match self {
            LogFormat::Full => "FULL",
            LogFormat::Simple => "SIMPLE",
            LogFormat::Minimal => "MINIMAL",
            LogFormat::MinimalTagged => "MINIMALTAGGED",
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

impl FromStr for LogFormat {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(LogFormat::from_name(s))
    }
}

/// Shorthand for [`LogFormat::from_name`].
pub fn format_from_string(name: &str) -> LogFormat {
    LogFormat::from_name(name)
}

const FULL_TIME: &str = "%b %e %H:%M:%S%.3f";
const SIMPLE_TIME: &str = "%b %e %H:%M:%S";

fn stamp<Tz>(tz: &Tz, at: DateTime<Utc>, layout: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    at.with_timezone(tz).format(layout).to_string()
}

fn push_tags(out: &mut String, tags: &[String]) {
    if !tags.is_empty() {
        out.push_str(" [");
        out.push_str(&tags.join(" "));
        out.push(']');
    }
}

pub(crate) fn render_full<Tz>(
    tz: &Tz,
    level: LogLevel,
    tags: &[String],
    message: &str,
    at: DateTime<Utc>,
    original: DateTime<Utc>,
) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let mut out = format!("[{}] [{}]", stamp(tz, at, FULL_TIME), level);
    push_tags(&mut out, tags);
    if at != original {
        out.push_str(" [replayed from ");
        out.push_str(&stamp(tz, original, FULL_TIME));
        out.push(']');
    }
    out.push(' ');
    out.push_str(message);
    out
}

pub(crate) fn render_simple<Tz>(tz: &Tz, level: LogLevel, message: &str, at: DateTime<Utc>) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    format!("[{}] [{}] {}", stamp(tz, at, SIMPLE_TIME), level, message)
}

pub fn full_format(
    level: LogLevel,
    tags: &[String],
    message: &str,
    at: DateTime<Utc>,
    original: DateTime<Utc>,
) -> String {
    render_full(&Local, level, tags, message, at, original)
}

pub fn simple_format(
    level: LogLevel,
    _tags: &[String],
    message: &str,
    at: DateTime<Utc>,
    _original: DateTime<Utc>,
) -> String {
    render_simple(&Local, level, message, at)
}

pub fn minimal_tagged_format(
    level: LogLevel,
    tags: &[String],
    message: &str,
    _at: DateTime<Utc>,
    _original: DateTime<Utc>,
) -> String {
    let mut out = format!("[{}]", level);
    push_tags(&mut out, tags);
    out.push(' ');
    out.push_str(message);
    out
}

pub fn minimal_format(
    _level: LogLevel,
    _tags: &[String],
    message: &str,
    _at: DateTime<Utc>,
    _original: DateTime<Utc>,
) -> String {
    message.to_string()
}

/// One formatter per [`LogFormat`].
#[derive(Clone)]
pub struct FormatterRegistry {
    full: Formatter,
    simple: Formatter,
    minimal: Formatter,
    minimal_tagged: Formatter,
}

impl FormatterRegistry {
    pub fn new() -> Self {
        Self {
            full: formatter(full_format),
            simple: formatter(simple_format),
            minimal: formatter(minimal_format),
            minimal_tagged: formatter(minimal_tagged_format),
        }
    }

    pub fn get(&self, format: LogFormat) -> Formatter {
        Arc::clone(self.slot(format))
    }

    /// Install `formatter` for `format`, returning the one it replaces.
    pub fn set(&mut self, format: LogFormat, formatter: Formatter) -> Formatter {
        std::mem::replace(self.slot_mut(format), formatter)
    }

    fn slot(&self, format: LogFormat) -> &Formatter {
        match format {
            LogFormat::Full => &self.full,
            LogFormat::Simple => &self.simple,
            LogFormat::Minimal => &self.minimal,
            LogFormat::MinimalTagged => &self.minimal_tagged,
        }
    }

    fn slot_mut(&mut self, format: LogFormat) -> &mut Formatter {
        match format {
            LogFormat::Full => &mut self.full,
            LogFormat::Simple => &mut self.simple,
            LogFormat::Minimal => &mut self.minimal,
            LogFormat::MinimalTagged => &mut self.minimal_tagged,
        }
    }
}

impl Default for FormatterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FormatterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatterRegistry").finish_non_exhaustive()
    }
}

static REGISTRY: LazyLock<RwLock<FormatterRegistry>> =
    LazyLock::new(|| RwLock::new(FormatterRegistry::new()));

/// Look up the process-wide formatter for `format`.
pub fn get_formatter(format: LogFormat) -> Formatter {
    REGISTRY.read().get(format)
}

/// Swap the process-wide formatter for `format`, returning the previous one.
///
/// Appenders capture their formatter at construction, so this only affects
/// appenders built (or reassigned via `get_formatter`) afterwards.
pub fn replace_formatter(format: LogFormat, formatter: Formatter) -> Formatter {
    REGISTRY.write().set(format, formatter)
}
