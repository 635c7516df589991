//! Logging macros for ergonomic log message formatting.
//!
//! The message is passed as `format_args!`, so nothing is formatted unless
//! the logger admits the event. Tags go in brackets before a `;`.
//!
//! # Examples
//!
//! ```
//! use taglog::{info, warn, Logger};
//!
//! let logger = Logger::new();
//!
//! info!(logger, "Server started");
//!
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//!
//! warn!(logger, ["net", "tls"]; "Handshake with {} took {}ms", "10.0.0.7", 450);
//! ```

/// Log a message at an explicit level.
///
/// # Examples
///
/// ```
/// # use taglog::{Logger, LogLevel};
/// # let logger = Logger::new();
/// use taglog::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, ["http"]; "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, [$($tag:expr),* $(,)?]; $($arg:tt)+) => {
        $logger.log(
            $level,
            &[$(::core::convert::AsRef::<str>::as_ref(&$tag)),*] as &[&str],
            format_args!($($arg)+),
        )
    };
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, &[] as &[&str], format_args!($($arg)+))
    };
}

/// Log a debug-level message.
///
/// # Examples
///
/// ```
/// # use taglog::Logger;
/// # let logger = Logger::new();
/// use taglog::debug;
/// debug!(logger, "Debug information");
/// debug!(logger, ["cache"]; "Counter value: {}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
///
/// # Examples
///
/// ```
/// # use taglog::Logger;
/// # let logger = Logger::new();
/// use taglog::info;
/// info!(logger, "Application started");
/// info!(logger, "Processing {} items", 100);
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// # Examples
///
/// ```
/// # use taglog::Logger;
/// # let logger = Logger::new();
/// use taglog::warn;
/// warn!(logger, "Low disk space");
/// warn!(logger, ["retry"]; "Retry attempt {} of {}", 3, 5);
/// ```
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # use taglog::Logger;
/// # let logger = Logger::new();
/// use taglog::error;
/// error!(logger, "Failed to connect to database");
/// error!(logger, "Error code: {}, message: {}", 500, "Internal error");
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use crate::appenders::MemoryAppender;
    use crate::core::{Dispatcher, LogFormat, LogLevel, Logger};
    use std::sync::Arc;

    fn isolated() -> (Arc<Dispatcher>, Logger, Arc<MemoryAppender>) {
        let dispatcher = Arc::new(Dispatcher::new());
        let memory = Arc::new(MemoryAppender::new().with_format(LogFormat::MinimalTagged));
        dispatcher.add_appender(memory.clone());
        let logger = Logger::with_dispatcher(Arc::clone(&dispatcher));
        logger.set_log_level(LogLevel::Debug);
        (dispatcher, logger, memory)
    }

    #[test]
    fn test_level_macros() {
        let (dispatcher, logger, memory) = isolated();
        debug!(logger, "Debug message");
        info!(logger, "Items: {}", 100);
        warn!(logger, "Retry {} of {}", 1, 3);
        error!(logger, "Code: {}", 500);
        dispatcher.wait_for_incoming();

        assert_eq!(
            memory.logged_messages(),
            vec![
                "[DEBUG] Debug message",
                "[INFO] Items: 100",
                "[WARN] Retry 1 of 3",
                "[ERROR] Code: 500",
            ]
        );
    }

    #[test]
    fn test_tagged_macros() {
        let (dispatcher, logger, memory) = isolated();
        info!(logger, ["db"]; "Connected");
        log!(logger, LogLevel::Warn, ["db", "pool"]; "Pool at {}%", 90);
        dispatcher.wait_for_incoming();

        assert_eq!(
            memory.logged_messages(),
            vec!["[INFO] [db] Connected", "[WARN] [db pool] Pool at 90%"]
        );
    }

    #[test]
    fn test_owned_string_tags() {
        let (dispatcher, logger, memory) = isolated();
        let subsystem = String::from("cache");
        let shard = format!("shard{}", 2);
        warn!(logger, [subsystem, shard, "hot"]; "Evicted {} keys", 12);
        debug!(logger, [&subsystem]; "Hit");
        dispatcher.wait_for_incoming();

        assert_eq!(
            memory.logged_messages(),
            vec!["[WARN] [cache shard2 hot] Evicted 12 keys", "[DEBUG] [cache] Hit"]
        );
    }
}
