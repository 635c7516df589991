//! Criterion benchmarks for taglog

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use std::sync::Arc;
use taglog::prelude::*;

fn isolated_logger(level: LogLevel) -> (Arc<Dispatcher>, Logger) {
    let dispatcher = Arc::new(Dispatcher::new());
    let logger = Logger::builder()
        .default_level(level)
        .dispatcher(Arc::clone(&dispatcher))
        .build();
    (dispatcher, logger)
}

// ============================================================================
// Admission Benchmarks
// ============================================================================

fn bench_admission(c: &mut Criterion) {
    let mut group = c.benchmark_group("admission");
    group.throughput(Throughput::Elements(1));

    let (_dispatcher, logger) = isolated_logger(LogLevel::Error);
    for tag in ["db", "http", "net", "cache", "auth"] {
        logger.set_tag_level(tag, LogLevel::Warn);
    }

    group.bench_function("filtered_out", |b| {
        b.iter(|| logger.debug(black_box("never formatted")));
    });

    group.bench_function("filtered_out_format_args", |b| {
        b.iter(|| logger.debug(format_args!("request {} took {}ms", black_box(42), black_box(7))));
    });

    group.bench_function("tagged_miss", |b| {
        b.iter(|| logger.info_tagged(black_box(&["net", "http"]), "not admitted"));
    });

    group.bench_function("is_enabled", |b| {
        b.iter(|| black_box(logger.is_enabled(LogLevel::Warn, black_box(&["cache"]))));
    });

    group.finish();
}

// ============================================================================
// Dispatch Benchmarks
// ============================================================================

fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");
    group.throughput(Throughput::Elements(1));

    let (dispatcher, logger) = isolated_logger(LogLevel::Debug);
    dispatcher.add_appender(Arc::new(NullAppender::new()));

    group.bench_function("null_appender", |b| {
        b.iter(|| logger.info(black_box("admitted")));
    });
    dispatcher.wait_for_incoming();

    let (dispatcher, logger) = isolated_logger(LogLevel::Debug);
    dispatcher.add_appender(Arc::new(WriterAppender::new(std::io::sink())));

    group.bench_function("writer_sink_simple", |b| {
        b.iter(|| logger.info_tagged(&["db"], black_box("admitted and formatted")));
    });
    dispatcher.wait_for_incoming();

    group.finish();
}

// ============================================================================
// Formatter Benchmarks
// ============================================================================

fn bench_formatters(c: &mut Criterion) {
    let mut group = c.benchmark_group("formatters");
    let event = LogEvent::new(
        LogLevel::Warn,
        vec!["db".to_string(), "slow".to_string()],
        "query took 1200ms".to_string(),
    );

    for format in [
        LogFormat::Full,
        LogFormat::Simple,
        LogFormat::MinimalTagged,
        LogFormat::Minimal,
    ] {
        let f = get_formatter(format);
        group.bench_function(format.to_str(), |b| {
            b.iter(|| {
                black_box(f(
                    event.level,
                    &event.tags,
                    &event.message,
                    event.timestamp,
                    event.original_timestamp,
                ))
            });
        });
    }

    group.finish();
}

// ============================================================================
// Drain Benchmarks
// ============================================================================

fn bench_wait_for_incoming(c: &mut Criterion) {
    let mut group = c.benchmark_group("drain");

    let (dispatcher, logger) = isolated_logger(LogLevel::Debug);
    dispatcher.add_appender(Arc::new(NullAppender::new()));

    group.throughput(Throughput::Elements(100));
    group.bench_function("100_events_then_wait", |b| {
        b.iter(|| {
            for i in 0..100 {
                logger.debug(format_args!("event {}", i));
            }
            dispatcher.wait_for_incoming();
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_admission,
    bench_dispatch,
    bench_formatters,
    bench_wait_for_incoming,
);

criterion_main!(benches);
