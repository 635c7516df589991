//! Stress tests for the dispatcher under concurrent load
//!
//! These tests verify:
//! - Per-producer FIFO order reaches each appender intact
//! - Drain barriers hold with many concurrent producers
//! - Pause and restart cycles never lose queued events
//! - Appenders registered mid-stream only see later events

use std::collections::HashMap;
use std::sync::Arc;
use std::thread;
use taglog::prelude::*;

const THREADS: usize = 8;
const PER_THREAD: usize = 500;

fn parse(line: &str) -> (usize, usize) {
    let mut parts = line.split(':');
    let thread = parts.next().and_then(|p| p.parse().ok()).expect("thread id");
    let seq = parts.next().and_then(|p| p.parse().ok()).expect("sequence");
    (thread, seq)
}

#[test]
fn test_fifo_per_producer() {
    let dispatcher = Arc::new(Dispatcher::new());
    let memory = Arc::new(MemoryAppender::new());
    dispatcher.add_appender(memory.clone());

    let logger = Arc::new(
        Logger::builder()
            .default_level(LogLevel::Debug)
            .dispatcher(Arc::clone(&dispatcher))
            .build(),
    );

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                for i in 0..PER_THREAD {
                    logger.debug(format_args!("{}:{}", t, i));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("producer thread panicked");
    }

    dispatcher.wait_for_incoming();

    let lines = memory.logged_messages();
    assert_eq!(lines.len(), THREADS * PER_THREAD);

    let mut next: HashMap<usize, usize> = HashMap::new();
    for line in &lines {
        let (thread, seq) = parse(line);
        let expected = next.entry(thread).or_insert(0);
        assert_eq!(seq, *expected, "thread {} out of order", thread);
        *expected += 1;
    }
    assert_eq!(dispatcher.metrics().delivered(), (THREADS * PER_THREAD) as u64);
}

#[test]
fn test_barrier_under_concurrent_load() {
    let dispatcher = Arc::new(Dispatcher::new());
    let null = Arc::new(NullAppender::new());
    dispatcher.add_appender(null.clone());

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let dispatcher = Arc::clone(&dispatcher);
            thread::spawn(move || {
                let logger = Logger::with_dispatcher(Arc::clone(&dispatcher));
                for i in 0..PER_THREAD {
                    logger.info(format_args!("event {}", i));
                    if i % 100 == 0 {
                        // everything accepted before the barrier has been delivered
                        let before = dispatcher.metrics().submitted();
                        dispatcher.wait_for_incoming();
                        assert!(dispatcher.metrics().delivered() >= before);
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("producer thread panicked");
    }

    dispatcher.wait_for_incoming();
    assert_eq!(null.count(), (THREADS * PER_THREAD) as u64);
}

#[test]
fn test_pause_restart_cycles() {
    let dispatcher = Arc::new(Dispatcher::new());
    let memory = Arc::new(MemoryAppender::new());
    dispatcher.add_appender(memory.clone());
    let logger = Logger::builder()
        .default_level(LogLevel::Debug)
        .dispatcher(Arc::clone(&dispatcher))
        .build();

    let mut expected = 0;
    for cycle in 0..20 {
        for i in 0..50 {
            logger.info(format_args!("{}:{}", cycle, i));
            expected += 1;
        }
        dispatcher.pause_logging();
        assert_eq!(memory.len(), expected, "pause lost events in cycle {}", cycle);

        logger.info("dropped while paused");
        dispatcher.restart_logging().expect("restart worker");
    }

    dispatcher.wait_for_incoming();
    assert_eq!(memory.len(), expected);
    assert_eq!(dispatcher.metrics().dropped(), 20);
    assert!(memory.logged_messages().iter().all(|m| m != "dropped while paused"));
}

#[test]
fn test_registration_applies_to_later_events() {
    let dispatcher = Arc::new(Dispatcher::new());
    let logger = Logger::builder()
        .default_level(LogLevel::Debug)
        .dispatcher(Arc::clone(&dispatcher))
        .build();

    let first = Arc::new(NullAppender::new());
    dispatcher.add_appender(first.clone());
    for _ in 0..1000 {
        logger.debug("early");
    }

    let second = Arc::new(NullAppender::new());
    dispatcher.add_appender(second.clone());
    for _ in 0..1000 {
        logger.debug("late");
    }

    dispatcher.wait_for_incoming();
    assert_eq!(first.count(), 2000);
    assert_eq!(second.count(), 1000);
}
