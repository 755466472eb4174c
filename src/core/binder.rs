//! Binding loggers to contexts
//!
//! A request handler typically resolves its logger once at the edge:
//!
//! ```
//! use context_logger::prelude::*;
//!
//! let config = LoggerConfig::new(Mode::Production, SinkType::Default);
//! let ctx = Context::background().with_tracing_id("req-42");
//!
//! let ctx = bind_logger(&ctx, &config).unwrap();
//! let logger = log_context(&ctx, &config);
//! assert_eq!(logger.tracing_id(), Some("req-42"));
//! ```

use super::{
    config::{LoggerConfig, Mode, RotationConfig, SinkType},
    context::Context,
    error::{LoggerError, Result},
    logger::{Logger, DEFAULT_MESSAGE_KEY},
};
use crate::sinks::{new_default_sink, new_file_sink};
use std::sync::Arc;
use uuid::Uuid;

/// A fresh random tracing identifier
pub fn new_tracing_id() -> String {
    Uuid::new_v4().to_string()
}

/// Attach `logger` to `ctx` unless a logger is already bound there.
pub fn add_logger_to_ctx(ctx: &Context, logger: Arc<Logger>) -> Context {
    if ctx.has_logger() {
        return ctx.clone();
    }
    ctx.with_logger(logger)
}

/// The logger bound to `ctx`, or a new one built from `config`.
///
/// # Errors
///
/// Returns error if a file sink is selected and the log file cannot be opened
pub fn try_log_context(ctx: &Context, config: &LoggerConfig) -> Result<Arc<Logger>> {
    if let Some(logger) = ctx.logger() {
        return Ok(Arc::clone(logger));
    }

    match (config.mode, config.sink_type) {
        (Mode::Development, SinkType::File) => new_development_file_logger(ctx, &config.rotation),
        (Mode::Production, SinkType::File) => new_production_file_logger(ctx, &config.rotation),
        (Mode::Development, SinkType::Default) => Ok(new_development_default_logger(ctx)),
        (Mode::Production, SinkType::Default) => Ok(new_production_default_logger(ctx)),
    }
}

/// Like [`try_log_context`], but never fails.
///
/// When the configured logger cannot be built, a development stdout logger is
/// returned instead and the failure is logged through it at warn level.
#[track_caller]
pub fn log_context(ctx: &Context, config: &LoggerConfig) -> Arc<Logger> {
    match try_log_context(ctx, config) {
        Ok(logger) => logger,
        Err(e) => {
            let fallback = new_development_default_logger(ctx);
            report_fallback(&fallback, &e);
            fallback
        }
    }
}

#[track_caller]
fn report_fallback(logger: &Logger, error: &LoggerError) {
    logger.warnw(&[
        DEFAULT_MESSAGE_KEY.into(),
        "Failed to create configured logger, using stdout".into(),
        "error".into(),
        error.to_string().into(),
    ]);
}

/// Resolve a logger for `ctx` and return the context with it attached
pub fn bind_logger(ctx: &Context, config: &LoggerConfig) -> Result<Context> {
    let logger = try_log_context(ctx, config)?;
    Ok(add_logger_to_ctx(ctx, logger))
}

pub fn new_development_file_logger(ctx: &Context, rotation: &RotationConfig) -> Result<Arc<Logger>> {
    let sink = new_file_sink(Mode::Development, rotation)?;
    Ok(Logger::builder(sink)
        .tracing_id(new_tracing_id())
        .context(ctx)
        .build_shared())
}

pub fn new_production_file_logger(ctx: &Context, rotation: &RotationConfig) -> Result<Arc<Logger>> {
    let sink = new_file_sink(Mode::Production, rotation)?;
    Ok(Logger::builder(sink)
        .tracing_id(new_tracing_id())
        .context(ctx)
        .build_shared())
}

pub fn new_development_default_logger(ctx: &Context) -> Arc<Logger> {
    Logger::builder(new_default_sink(Mode::Development))
        .tracing_id(context_tracing_id(ctx))
        .context(ctx)
        .build_shared()
}

pub fn new_production_default_logger(ctx: &Context) -> Arc<Logger> {
    Logger::builder(new_default_sink(Mode::Production))
        .tracing_id(context_tracing_id(ctx))
        .context(ctx)
        .build_shared()
}

fn context_tracing_id(ctx: &Context) -> String {
    match ctx.tracing_id() {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => new_tracing_id(),
    }
}
