//! Criterion benchmarks for context_logger

use context_logger::prelude::*;
use context_logger::{Encoder, EncoderConfig, Record};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use std::io;
use std::sync::Arc;

/// Discards everything, so benchmarks measure encoding rather than IO
struct NullWriter;

impl io::Write for NullWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl context_logger::WriteSync for NullWriter {}

fn null_logger(encoder: Encoder) -> Logger {
    let sink = context_logger::EncoderSink::builder(encoder, NullWriter)
        .min_level(Level::Info)
        .build();
    Logger::builder(sink).tracing_id("bench").build()
}

// ============================================================================
// Logger Creation Benchmarks
// ============================================================================

fn bench_logger_creation(c: &mut Criterion) {
    let mut group = c.benchmark_group("logger_creation");
    group.throughput(Throughput::Elements(1));

    group.bench_function("memory_sink", |b| {
        b.iter(|| {
            let (sink, _output) = new_memory_sink(Mode::Production);
            black_box(Logger::builder(sink).tracing_id("bench").build())
        });
    });

    let ctx = Context::background();
    let config = LoggerConfig::new(Mode::Production, SinkType::Default);
    group.bench_function("log_context_unbound", |b| {
        b.iter(|| black_box(log_context(&ctx, &config)));
    });

    let bound = bind_logger(&ctx, &config).unwrap();
    group.bench_function("log_context_bound", |b| {
        b.iter(|| black_box(log_context(&bound, &config)));
    });

    group.finish();
}

// ============================================================================
// Logging Performance Benchmarks
// ============================================================================

fn bench_leveled_calls(c: &mut Criterion) {
    let mut group = c.benchmark_group("leveled_calls");
    group.throughput(Throughput::Elements(1));

    let logger = null_logger(Encoder::json(EncoderConfig::production()));

    let args: [FieldValue; 2] = ["shop_id: ".into(), 1_i64.into()];
    group.bench_function("plain", |b| {
        b.iter(|| logger.info(black_box(&args)));
    });

    let kvs: [FieldValue; 4] = ["shop_id".into(), 1_i64.into(), "user_id".into(), 2_i64.into()];
    group.bench_function("key_value", |b| {
        b.iter(|| logger.infow(black_box(&kvs)));
    });

    group.bench_function("formatted", |b| {
        b.iter(|| logger.infof(format_args!("Hello {}", black_box("Nam"))));
    });

    let hidden: [FieldValue; 1] = ["hidden".into()];
    group.bench_function("filtered_debug", |b| {
        b.iter(|| logger.debug(black_box(&hidden)));
    });

    group.finish();
}

// ============================================================================
// Encoding Benchmarks
// ============================================================================

fn bench_encoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("encoding");

    let record = Record::new(Level::Info, "").with_fields(vec![
        context_logger::Field::new("msg", "order created"),
        context_logger::Field::new("order_id", 42),
        context_logger::Field::new("tracing_id", "4f1c2d1e-0c6b-4b7e-9a55-0d0b4c3b8d11"),
    ]);

    let json = Encoder::json(EncoderConfig::production());
    group.bench_function("json", |b| {
        b.iter(|| black_box(json.encode(black_box(&record), None)));
    });

    let console = Encoder::console(EncoderConfig::development());
    group.bench_function("console", |b| {
        b.iter(|| black_box(console.encode(black_box(&record), None)));
    });

    group.finish();
}

// ============================================================================
// Concurrent Logging Benchmarks
// ============================================================================

fn bench_concurrent_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent_logging");

    let (sink, output) = new_memory_sink(Mode::Production);
    let logger = Arc::new(Logger::new(sink));
    let kvs: Arc<[FieldValue]> = Arc::from(vec!["event".into(), "concurrent".into()]);

    group.bench_function("multi_thread_4", |b| {
        b.iter(|| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    let logger = Arc::clone(&logger);
                    let kvs = Arc::clone(&kvs);
                    std::thread::spawn(move || {
                        logger.infow(black_box(&kvs));
                    })
                })
                .collect();

            for handle in handles {
                handle.join().unwrap();
            }
        });
        output.clear();
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_logger_creation,
    bench_leveled_calls,
    bench_encoding,
    bench_concurrent_logging,
);
criterion_main!(benches);
