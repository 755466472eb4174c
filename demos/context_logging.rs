//! Context logging example
//!
//! Resolves a logger per simulated request, carries it in a context, and
//! writes through both the stdout and rotating file sinks.
//!
//! Run with: cargo run --example context_logging

use context_logger::prelude::*;
use context_logger::{errorw, infof, infow, warn, EnvSource};

fn handle_request(ctx: &Context, config: &LoggerConfig, order_id: u64) {
    let logger = log_context(ctx, config);

    infof!(logger, "Handling order {}", order_id);
    infow!(logger, "order_id", order_id, "items", 3);
    if order_id % 2 == 0 {
        warn!(logger, "order ", order_id, " needs manual review");
    }
}

fn main() -> Result<()> {
    println!("=== Context Logger - Context Logging Example ===\n");

    // Settings come from LOGGER_* / ENV / LOG_TYPE variables when present
    let config = LoggerConfig::resolve(&EnvSource::new());
    println!("Resolved config: {:?}\n", config);

    println!("1. Development stdout logger bound per request:");
    let dev = LoggerConfig::new(Mode::Development, SinkType::Default);
    for (i, request_id) in ["req-100", "req-101"].iter().enumerate() {
        let ctx = Context::background().with_tracing_id(*request_id);
        let ctx = bind_logger(&ctx, &dev)?;
        handle_request(&ctx, &dev, i as u64 + 1);
    }

    println!("\n2. Production JSON on stdout:");
    let prod = LoggerConfig::new(Mode::Production, SinkType::Default);
    let ctx = bind_logger(&Context::background(), &prod)?;
    handle_request(&ctx, &prod, 7);
    errorw!(log_context(&ctx, &prod), "order_id", 7, "reason", "card declined");

    println!("\n3. Rotating file logger:");
    let file = LoggerConfig::new(Mode::Production, SinkType::File)
        .with_rotation(RotationConfig::new("./logger/demo.logger").with_max_size_mb(1));
    let logger = try_log_context(&Context::background(), &file)?;
    for order_id in 1..=5_u64 {
        infow!(logger, "order_id", order_id, "status", "shipped");
    }
    logger.close()?;

    println!("\n=== Example completed successfully! ===");
    println!("Check './logger/demo.logger' for the file output");

    Ok(())
}
