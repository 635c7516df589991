//! Log event structure

use super::log_level::LogLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single log call, immutable once built.
///
/// `original_timestamp` equals `timestamp` unless the event is a replay of
/// something captured earlier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEvent {
    pub level: LogLevel,
    pub tags: Vec<String>,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub original_timestamp: DateTime<Utc>,
}

impl LogEvent {
    pub fn new(level: LogLevel, tags: Vec<String>, message: String) -> Self {
        Self::at(level, tags, message, Utc::now())
    }

    /// Build an event stamped with `timestamp` for both instants.
    pub fn at(level: LogLevel, tags: Vec<String>, message: String, timestamp: DateTime<Utc>) -> Self {
        Self {
            level,
            tags,
            message,
            timestamp,
            original_timestamp: timestamp,
        }
    }

    /// Build an event being re-emitted now that originally happened at `original`.
    pub fn replayed(
        level: LogLevel,
        tags: Vec<String>,
        message: String,
        original: DateTime<Utc>,
    ) -> Self {
        Self {
            original_timestamp: original,
            ..Self::new(level, tags, message)
        }
    }

    pub fn is_replay(&self) -> bool {
        self.timestamp != self.original_timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_new_event_is_not_replay() {
        let event = LogEvent::new(LogLevel::Info, vec!["db".into()], "ready".into());
        assert_eq!(event.timestamp, event.original_timestamp);
        assert!(!event.is_replay());
        assert_eq!(event.tags, vec!["db".to_string()]);
    }

    #[test]
    fn test_replayed_event() {
        let original = Utc::now() - Duration::hours(1);
        let event = LogEvent::replayed(LogLevel::Warn, Vec::new(), "late".into(), original);
        assert!(event.is_replay());
        assert_eq!(event.original_timestamp, original);
        assert!(event.timestamp > original);
    }

    #[test]
    fn test_event_serialization() {
        let event = LogEvent::new(LogLevel::Error, vec!["net".into()], "timeout".into());
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"level\":\"ERROR\""));

        let back: LogEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
