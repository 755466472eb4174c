//! # Context Logger
//!
//! A structured logging facade that binds a tracing identifier and an ambient
//! context to every logger instance.
//!
//! ## Features
//!
//! - **Leveled API**: plain, key-value and formatted entry points per level
//! - **Context Binding**: resolve one logger per request and carry it in a [`Context`]
//! - **Sinks**: human readable or JSON stdout, or size-rotated gzip-compressed files
//! - **Explicit Configuration**: [`LoggerConfig`] resolved once from any [`ConfigSource`]
//!
//! ## Example
//!
//! ```
//! use context_logger::prelude::*;
//!
//! let config = LoggerConfig::new(Mode::Development, SinkType::Default);
//! let ctx = Context::background().with_tracing_id("req-1");
//!
//! let logger = log_context(&ctx, &config);
//! logger.infof(format_args!("Hello {}", "Nam"));
//! logger.infow(&["shop_id".into(), 1_i64.into()]);
//! logger.close().unwrap();
//! ```

pub mod core;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        add_logger_to_ctx, bind_logger, log_context, try_log_context, ConfigSource, Context,
        EnvSource, FieldValue, Level, Logger, LoggerBuilder, LoggerConfig, LoggerError, Mode,
        Result, RotationConfig, Sink, SinkType, StructuredLog,
    };
    pub use crate::sinks::{new_default_sink, new_file_sink, new_memory_sink, parse_mode};
}

pub use core::{
    add_logger_to_ctx, bind_logger, level_name, log_context, new_development_default_logger,
    new_development_file_logger, new_production_default_logger, new_production_file_logger,
    new_tracing_id, try_log_context, CallerEncoding, ConfigSource, Context, Encoder,
    EncoderConfig, Encoding, EnvSource, Field, FieldValue, Level, LevelEncoding, Logger,
    LoggerBuilder, LoggerConfig, LoggerError, Mode, ProcessExit, Record, RecordingTerminator,
    Result, RotationConfig, Sink, SinkMetrics, SinkType, StructuredLog, Terminator,
    TimestampFormat, WriteSync, DEFAULT_FILE_PATH, DEFAULT_MAX_AGE_DAYS, DEFAULT_MAX_BACKUPS,
    DEFAULT_MAX_SIZE_MB, DEFAULT_MESSAGE_KEY, FATAL_EXIT_CODE, TRACING_ID_KEY,
};
pub use sinks::{
    new_default_sink, new_file_sink, new_memory_sink, parse_mode, ConsoleWriter, EncoderSink,
    MemoryWriter, RotatingFile,
};
