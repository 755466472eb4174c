//! Logger facade
//!
//! A [`Logger`] wraps one sink and decorates every record with the facade's
//! tracing identifier. Each level has three entry points:
//!
//! - plain (`info`): arguments concatenated into one message under `msg`
//! - key-value (`infow`): alternating keys and values, passed through as-is
//! - formatted (`infof`): `format_args!` output under `msg`
//!
//! Logging never fails from the caller's point of view. Malformed key-value
//! sequences are reported through the sink and padded, and sink errors are
//! left to the sink to count and report.

use super::{
    context::Context,
    error::Result,
    field::{bracketed, pairs_to_fields, sprint, FieldValue},
    level::Level,
    record::Record,
    sink::Sink,
    terminator::{ProcessExit, Terminator, FATAL_EXIT_CODE},
};
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

/// Key under which plain and formatted messages are recorded
pub const DEFAULT_MESSAGE_KEY: &str = "msg";

/// Key under which the facade's tracing identifier is recorded
pub const TRACING_ID_KEY: &str = "tracing_id";

/// The key-value entry point on its own, for call sites that need nothing else
pub trait StructuredLog: Send + Sync {
    fn log(&self, level: Level, kvs: &[FieldValue]) -> Result<()>;
}

pub struct Logger {
    sink: Box<dyn Sink>,
    tracing_id: Option<String>,
    context: Option<Context>,
    message_key: &'static str,
    terminator: Arc<dyn Terminator>,
}

macro_rules! leveled_methods {
    ($(($level:expr, $plain:ident, $kv:ident, $formatted:ident, $name:literal)),* $(,)?) => {
        $(
            #[doc = concat!("Log the concatenated arguments at ", $name, " level")]
            #[track_caller]
            pub fn $plain(&self, args: &[FieldValue]) {
                let _ = self.log($level, &self.message_pair(sprint(args)));
            }

            #[doc = concat!("Log alternating keys and values at ", $name, " level")]
            #[track_caller]
            pub fn $kv(&self, kvs: &[FieldValue]) {
                let _ = self.log($level, kvs);
            }

            #[doc = concat!("Log a formatted message at ", $name, " level")]
            #[track_caller]
            pub fn $formatted(&self, args: fmt::Arguments<'_>) {
                let _ = self.log($level, &self.message_pair(args.to_string()));
            }
        )*
    };
}

impl Logger {
    /// Create a logger with no tracing identifier and no bound context
    #[must_use]
    pub fn new<S: Sink + 'static>(sink: S) -> Self {
        Self::builder(sink).build()
    }

    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use context_logger::prelude::*;
    ///
    /// let (sink, output) = new_memory_sink(Mode::Production);
    /// let logger = Logger::builder(sink).tracing_id("xyz").build();
    /// logger.infof(format_args!("logger {}", "debug"));
    ///
    /// assert!(output.contents().contains("\"tracing_id\":\"xyz\""));
    /// ```
    #[must_use]
    pub fn builder<S: Sink + 'static>(sink: S) -> LoggerBuilder {
        LoggerBuilder::new(Box::new(sink))
    }

    pub fn tracing_id(&self) -> Option<&str> {
        self.tracing_id.as_deref()
    }

    pub fn message_key(&self) -> &str {
        self.message_key
    }

    pub fn sink(&self) -> &dyn Sink {
        self.sink.as_ref()
    }

    /// The context bound at construction, with this logger attached to it.
    ///
    /// Returns `None` when the logger was built without a context.
    pub fn bound_context(self: &Arc<Self>) -> Option<Context> {
        self.context
            .as_ref()
            .map(|parent| parent.with_logger(Arc::clone(self)))
    }

    /// Write one record built from alternating keys and values.
    ///
    /// An empty or odd-length `kvs` first produces a warning record; an odd
    /// sequence is then padded with an empty value. Fatal records are written
    /// like any other level and do not end the process here.
    ///
    /// Always returns `Ok(())`.
    #[track_caller]
    pub fn log(&self, level: Level, kvs: &[FieldValue]) -> Result<()> {
        let caller = Location::caller();
        let mut kvs = kvs.to_vec();

        if kvs.is_empty() || kvs.len() % 2 != 0 {
            let warning = Record::new(
                Level::Warn,
                format!("Key-value must appear in pairs: {}", bracketed(&kvs)),
            )
            .with_caller(caller);
            self.emit(&warning);

            if kvs.len() % 2 != 0 {
                kvs.push(FieldValue::from(""));
            }
        }

        if let Some(tracing_id) = &self.tracing_id {
            kvs.push(FieldValue::from(TRACING_ID_KEY));
            kvs.push(FieldValue::from(tracing_id));
        }

        let record = Record::new(level, "")
            .with_caller(caller)
            .with_fields(pairs_to_fields(&kvs));
        self.emit(&record);

        Ok(())
    }

    leveled_methods!(
        (Level::Debug, debug, debugw, debugf, "debug"),
        (Level::Info, info, infow, infof, "info"),
        (Level::Warn, warn, warnw, warnf, "warn"),
        (Level::Error, error, errorw, errorf, "error"),
    );

    /// Log the concatenated arguments at fatal level, then terminate
    #[track_caller]
    pub fn fatal(&self, args: &[FieldValue]) {
        let _ = self.log(Level::Fatal, &self.message_pair(sprint(args)));
        self.terminate();
    }

    /// Log alternating keys and values at fatal level, then terminate
    #[track_caller]
    pub fn fatalw(&self, kvs: &[FieldValue]) {
        let _ = self.log(Level::Fatal, kvs);
        self.terminate();
    }

    /// Log a formatted message at fatal level, then terminate
    #[track_caller]
    pub fn fatalf(&self, args: fmt::Arguments<'_>) {
        let _ = self.log(Level::Fatal, &self.message_pair(args.to_string()));
        self.terminate();
    }

    /// Flush everything buffered by the sink.
    ///
    /// File-backed loggers must be closed before the process exits or the
    /// tail of the log may be lost.
    pub fn close(&self) -> Result<()> {
        self.sink.sync()
    }

    fn message_pair(&self, message: String) -> [FieldValue; 2] {
        [FieldValue::from(self.message_key), FieldValue::from(message)]
    }

    fn emit(&self, record: &Record) {
        // Sinks count and report their own failures
        let _ = self.sink.write(record);
    }

    fn terminate(&self) {
        let _ = self.sink.sync();
        self.terminator.terminate(FATAL_EXIT_CODE);
    }
}

impl StructuredLog for Logger {
    #[track_caller]
    fn log(&self, level: Level, kvs: &[FieldValue]) -> Result<()> {
        Logger::log(self, level, kvs)
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("sink", &self.sink.name())
            .field("tracing_id", &self.tracing_id)
            .field("message_key", &self.message_key)
            .finish()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if let Err(e) = self.sink.sync() {
            eprintln!("[LOGGER ERROR] Failed to sync sink '{}' on drop: {}", self.sink.name(), e);
        }
    }
}

/// Builder for constructing Logger with a fluent API
///
/// Settings are applied in call order; a later call replaces an earlier one.
pub struct LoggerBuilder {
    sink: Box<dyn Sink>,
    tracing_id: Option<String>,
    context: Option<Context>,
    terminator: Arc<dyn Terminator>,
}

impl LoggerBuilder {
    fn new(sink: Box<dyn Sink>) -> Self {
        Self {
            sink,
            tracing_id: None,
            context: None,
            terminator: Arc::new(ProcessExit),
        }
    }

    /// Set the tracing identifier; an empty string leaves it unset
    #[must_use = "builder methods return a new value"]
    pub fn tracing_id(mut self, tracing_id: impl Into<String>) -> Self {
        let tracing_id = tracing_id.into();
        self.tracing_id = (!tracing_id.is_empty()).then_some(tracing_id);
        self
    }

    /// Bind the logger to an ambient context
    #[must_use = "builder methods return a new value"]
    pub fn context(mut self, ctx: &Context) -> Self {
        self.context = Some(ctx.clone());
        self
    }

    /// Replace what happens after a fatal record (process exit by default)
    #[must_use = "builder methods return a new value"]
    pub fn terminator(mut self, terminator: Arc<dyn Terminator>) -> Self {
        self.terminator = terminator;
        self
    }

    pub fn build(self) -> Logger {
        Logger {
            sink: self.sink,
            tracing_id: self.tracing_id,
            context: self.context,
            message_key: DEFAULT_MESSAGE_KEY,
            terminator: self.terminator,
        }
    }

    pub fn build_shared(self) -> Arc<Logger> {
        Arc::new(self.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Mode;
    use crate::core::terminator::RecordingTerminator;
    use crate::sinks::{new_memory_sink, MemoryWriter};

    fn production_logger() -> (Logger, MemoryWriter) {
        let (sink, output) = new_memory_sink(Mode::Production);
        (Logger::new(sink), output)
    }

    fn records(output: &MemoryWriter) -> Vec<serde_json::Value> {
        output
            .lines()
            .iter()
            .map(|line| serde_json::from_str(line).expect("valid JSON line"))
            .collect()
    }

    #[test]
    fn test_plain_form_concatenates() {
        let (logger, output) = production_logger();
        logger.info(&["shop_id: ".into(), 1_i64.into()]);

        let records = records(&output);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["msg"], "shop_id: 1");
        assert_eq!(records[0]["level"], "info");
    }

    #[test]
    fn test_kv_form_passes_pairs_through() {
        let (logger, output) = production_logger();
        logger.infow(&["shop_id".into(), 1_i64.into(), "user_id".into(), 2_i64.into()]);

        let records = records(&output);
        assert_eq!(records[0]["shop_id"], 1);
        assert_eq!(records[0]["user_id"], 2);
        assert!(records[0].get("msg").is_none());
    }

    #[test]
    fn test_formatted_form() {
        let (logger, output) = production_logger();
        logger.infof(format_args!("Hello {}", "Nam"));
        assert_eq!(records(&output)[0]["msg"], "Hello Nam");
    }

    #[test]
    fn test_odd_pairs_are_padded() {
        let (logger, output) = production_logger();
        assert!(logger.log(Level::Info, &["user_id".into()]).is_ok());

        let records = records(&output);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["level"], "warn");
        assert_eq!(records[0]["msg"], "Key-value must appear in pairs: [user_id]");
        assert_eq!(records[1]["user_id"], "");
    }

    #[test]
    fn test_empty_pairs_warn() {
        let (logger, output) = production_logger();
        assert!(logger.log(Level::Error, &[]).is_ok());

        let records = records(&output);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["msg"], "Key-value must appear in pairs: []");
        assert_eq!(records[1]["level"], "error");
    }

    #[test]
    fn test_tracing_id_is_appended() {
        let (sink, output) = new_memory_sink(Mode::Production);
        let logger = Logger::builder(sink).tracing_id("xyz").build();
        logger.debugw(&["k".into(), "v".into()]);
        logger.warn(&[]);

        let records = records(&output);
        assert_eq!(records.len(), 2);
        for record in &records {
            assert_eq!(record["tracing_id"], "xyz");
        }
        assert_eq!(records[1]["msg"], "");
    }

    #[test]
    fn test_empty_tracing_id_is_unset() {
        let (sink, _output) = new_memory_sink(Mode::Production);
        let logger = Logger::builder(sink).tracing_id("").build();
        assert!(logger.tracing_id().is_none());
    }

    #[test]
    fn test_caller_is_call_site() {
        let (logger, output) = production_logger();
        let line = line!() + 1;
        logger.error(&["boom".into()]);

        let records = records(&output);
        let caller = records[0]["caller"].as_str().unwrap();
        assert_eq!(caller, format!("core/logger.rs:{}", line));
        assert!(records[0]["stacktrace"].is_string());
    }

    #[test]
    fn test_fatal_terminates_after_writing() {
        let terminator = Arc::new(RecordingTerminator::new());
        let (sink, output) = new_memory_sink(Mode::Production);
        let logger = Logger::builder(sink).terminator(terminator.clone()).build();

        logger.fatal(&["a".into()]);
        logger.fatalw(&["k".into(), "v".into()]);
        logger.fatalf(format_args!("x"));

        assert_eq!(terminator.count(), 3);
        assert_eq!(terminator.last_code(), Some(FATAL_EXIT_CODE));
        let records = records(&output);
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r["level"] == "fatal"));
        assert_eq!(records[2]["msg"], "x");
    }

    #[test]
    fn test_log_at_fatal_does_not_terminate() {
        let terminator = Arc::new(RecordingTerminator::new());
        let (sink, _output) = new_memory_sink(Mode::Production);
        let logger = Logger::builder(sink).terminator(terminator.clone()).build();

        assert!(logger.log(Level::Fatal, &["k".into(), "v".into()]).is_ok());
        assert_eq!(terminator.count(), 0);
    }

    #[test]
    fn test_bound_context_refers_back() {
        let parent = Context::background().with_tracing_id("req-9");
        let (sink, _output) = new_memory_sink(Mode::Development);
        let logger = Logger::builder(sink).context(&parent).build_shared();

        let bound = logger.bound_context().expect("context bound");
        assert!(Arc::ptr_eq(bound.logger().unwrap(), &logger));
        assert_eq!(bound.tracing_id(), Some("req-9"));
        assert!(!parent.has_logger());
    }

    #[test]
    fn test_structured_log_trait_object() {
        let (logger, output) = production_logger();
        let capability: &dyn StructuredLog = &logger;
        capability
            .log(Level::Warn, &["attempt".into(), 3_i64.into()])
            .unwrap();
        assert_eq!(records(&output)[0]["attempt"], 3);
    }

    #[test]
    fn test_close_flushes() {
        let (logger, _output) = production_logger();
        logger.info(&["done".into()]);
        assert!(logger.close().is_ok());
    }
}
