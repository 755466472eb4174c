//! Logging macros wrapping the facade's leveled methods.
//!
//! Each level has three forms:
//!
//! - `info!(logger, args...)`: arguments concatenated into the message
//! - `infow!(logger, key, value, ...)`: alternating keys and values
//! - `infof!(logger, "format {}", args...)`: `format!`-style message
//!
//! Arguments are converted with [`FieldValue::from`](crate::FieldValue), so
//! strings, integers, floats, booleans and `serde_json::Value`s can be mixed.
//!
//! # Examples
//!
//! ```
//! use context_logger::prelude::*;
//! use context_logger::{info, infof, infow};
//!
//! let (sink, output) = new_memory_sink(Mode::Production);
//! let logger = Logger::new(sink);
//!
//! info!(logger, "shop_id: ", 1);
//! infow!(logger, "shop_id", 1, "user_id", 2);
//! infof!(logger, "Hello {}", "Nam");
//!
//! assert_eq!(output.lines().len(), 3);
//! ```

/// Log alternating keys and values at an explicit level.
///
/// Evaluates to the `Result` returned by [`Logger::log`](crate::Logger::log).
///
/// # Examples
///
/// ```
/// # use context_logger::prelude::*;
/// # let (sink, _output) = new_memory_sink(Mode::Production);
/// # let logger = Logger::new(sink);
/// use context_logger::log;
/// log!(logger, Level::Warn, "attempt", 3).unwrap();
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr $(, $kv:expr)* $(,)?) => {
        $logger.log($level, &[$($crate::FieldValue::from($kv)),*])
    };
}

/// Log the concatenated arguments at debug level.
#[macro_export]
macro_rules! debug {
    ($logger:expr $(, $arg:expr)* $(,)?) => {
        $logger.debug(&[$($crate::FieldValue::from($arg)),*])
    };
}

/// Log alternating keys and values at debug level.
#[macro_export]
macro_rules! debugw {
    ($logger:expr $(, $kv:expr)* $(,)?) => {
        $logger.debugw(&[$($crate::FieldValue::from($kv)),*])
    };
}

/// Log a formatted message at debug level.
#[macro_export]
macro_rules! debugf {
    ($logger:expr, $($arg:tt)+) => {
        $logger.debugf(format_args!($($arg)+))
    };
}

/// Log the concatenated arguments at info level.
#[macro_export]
macro_rules! info {
    ($logger:expr $(, $arg:expr)* $(,)?) => {
        $logger.info(&[$($crate::FieldValue::from($arg)),*])
    };
}

/// Log alternating keys and values at info level.
#[macro_export]
macro_rules! infow {
    ($logger:expr $(, $kv:expr)* $(,)?) => {
        $logger.infow(&[$($crate::FieldValue::from($kv)),*])
    };
}

/// Log a formatted message at info level.
#[macro_export]
macro_rules! infof {
    ($logger:expr, $($arg:tt)+) => {
        $logger.infof(format_args!($($arg)+))
    };
}

/// Log the concatenated arguments at warn level.
#[macro_export]
macro_rules! warn {
    ($logger:expr $(, $arg:expr)* $(,)?) => {
        $logger.warn(&[$($crate::FieldValue::from($arg)),*])
    };
}

/// Log alternating keys and values at warn level.
#[macro_export]
macro_rules! warnw {
    ($logger:expr $(, $kv:expr)* $(,)?) => {
        $logger.warnw(&[$($crate::FieldValue::from($kv)),*])
    };
}

/// Log a formatted message at warn level.
#[macro_export]
macro_rules! warnf {
    ($logger:expr, $($arg:tt)+) => {
        $logger.warnf(format_args!($($arg)+))
    };
}

/// Log the concatenated arguments at error level.
#[macro_export]
macro_rules! error {
    ($logger:expr $(, $arg:expr)* $(,)?) => {
        $logger.error(&[$($crate::FieldValue::from($arg)),*])
    };
}

/// Log alternating keys and values at error level.
#[macro_export]
macro_rules! errorw {
    ($logger:expr $(, $kv:expr)* $(,)?) => {
        $logger.errorw(&[$($crate::FieldValue::from($kv)),*])
    };
}

/// Log a formatted message at error level.
#[macro_export]
macro_rules! errorf {
    ($logger:expr, $($arg:tt)+) => {
        $logger.errorf(format_args!($($arg)+))
    };
}

/// Log the concatenated arguments at fatal level.
///
/// Terminates through the logger's terminator after writing.
#[macro_export]
macro_rules! fatal {
    ($logger:expr $(, $arg:expr)* $(,)?) => {
        $logger.fatal(&[$($crate::FieldValue::from($arg)),*])
    };
}

/// Log alternating keys and values at fatal level.
#[macro_export]
macro_rules! fatalw {
    ($logger:expr $(, $kv:expr)* $(,)?) => {
        $logger.fatalw(&[$($crate::FieldValue::from($kv)),*])
    };
}

/// Log a formatted message at fatal level.
#[macro_export]
macro_rules! fatalf {
    ($logger:expr, $($arg:tt)+) => {
        $logger.fatalf(format_args!($($arg)+))
    };
}
