//! Core logger types and traits

pub mod binder;
pub mod config;
pub mod context;
pub mod encoder;
pub mod error;
pub mod field;
pub mod level;
pub mod logger;
pub mod metrics;
pub mod record;
pub mod sink;
pub mod terminator;
pub mod timestamp;

pub use binder::{
    add_logger_to_ctx, bind_logger, log_context, new_development_default_logger,
    new_development_file_logger, new_production_default_logger, new_production_file_logger,
    new_tracing_id, try_log_context,
};
pub use config::{
    ConfigSource, EnvSource, LoggerConfig, Mode, RotationConfig, SinkType, DEFAULT_FILE_PATH,
    DEFAULT_MAX_AGE_DAYS, DEFAULT_MAX_BACKUPS, DEFAULT_MAX_SIZE_MB,
};
pub use context::Context;
pub use encoder::{CallerEncoding, Encoder, EncoderConfig, Encoding, LevelEncoding};
pub use error::{LoggerError, Result};
pub use field::{Field, FieldValue};
pub use level::{level_name, Level};
pub use logger::{Logger, LoggerBuilder, StructuredLog, DEFAULT_MESSAGE_KEY, TRACING_ID_KEY};
pub use metrics::SinkMetrics;
pub use record::Record;
pub use sink::{Sink, WriteSync};
pub use terminator::{ProcessExit, RecordingTerminator, Terminator, FATAL_EXIT_CODE};
pub use timestamp::TimestampFormat;
