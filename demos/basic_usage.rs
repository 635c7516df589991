//! Basic taglog usage example
//!
//! Demonstrates the default logger, tag overrides, per-appender levels and
//! formats, and the drain/pause controls.
//!
//! Run with: cargo run --example basic_usage

use std::sync::Arc;
use taglog::prelude::*;

fn main() -> Result<()> {
    println!("=== taglog - Basic Usage Example ===\n");

    // Console output on stderr, one appender for everything
    let console = Arc::new(ConsoleAppender::stderr().with_format(LogFormat::Full));
    taglog::add_appender(console);

    println!("1. Default threshold is INFO:");
    taglog::debug("This debug message is filtered out");
    taglog::info("This is an info message");
    taglog::warn("This is a warning message");
    taglog::error("This is an error message");
    taglog::wait_for_incoming();

    println!("\n2. Tag overrides lower the threshold for one subsystem:");
    taglog::set_default_log_level(LogLevel::Warn);
    taglog::set_default_tag_level("db", LogLevel::Debug);
    taglog::debug_tagged(&["db"], "db debug passes the override");
    taglog::debug_tagged(&["http"], "http debug is filtered out");
    taglog::info_tagged(&["http", "db"], "any matching tag is enough");
    taglog::wait_for_incoming();

    println!("\n3. Macros format lazily:");
    let logger = Logger::global();
    let user = "alice";
    taglog::info!(logger, ["db"]; "user {} connected", user);
    taglog::warn!(logger, "{} retries left", 3);
    taglog::wait_for_incoming();

    println!("\n4. A second appender with its own level and format:");
    let memory = Arc::new(MemoryAppender::new().with_format(LogFormat::MinimalTagged));
    memory.set_level(LogLevel::Error);
    taglog::add_appender(memory.clone());
    taglog::warn("console only");
    taglog::error_tagged(&["db"], "both appenders");
    taglog::wait_for_incoming();
    println!("   memory appender captured: {:?}", memory.logged_messages());

    println!("\n5. Pause and restart:");
    taglog::pause_logging();
    taglog::error("dropped while paused");
    taglog::restart_logging()?;
    taglog::error("delivered after restart");
    taglog::wait_for_incoming();

    let metrics = Dispatcher::global().metrics().clone();
    println!(
        "\n=== Done: {} submitted, {} delivered, {} dropped ===",
        metrics.submitted(),
        metrics.delivered(),
        metrics.dropped()
    );
    Ok(())
}
