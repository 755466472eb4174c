//! Sink combining an encoder, a writer and a level gate

use crate::core::{
    encoder::Encoder,
    error::{LoggerError, Result},
    level::Level,
    metrics::SinkMetrics,
    record::Record,
    sink::{Sink, WriteSync},
};
use super::console::ConsoleWriter;
use chrono::Local;
use parking_lot::Mutex;
use std::backtrace::Backtrace;
use std::io::Write;

/// Encodes records and writes them to a [`WriteSync`] destination.
///
/// Records below `min_level` are dropped. Records at or above
/// `stacktrace_level` carry a captured stack trace. Anything above
/// [`Level::Error`] forces a sync before `write` returns. Write failures are
/// counted and reported as one line on the error output.
pub struct EncoderSink {
    name: String,
    encoder: Encoder,
    writer: Mutex<Box<dyn WriteSync>>,
    error_output: Mutex<Box<dyn WriteSync>>,
    min_level: Level,
    stacktrace_level: Level,
    metrics: SinkMetrics,
}

impl EncoderSink {
    pub fn builder<W: WriteSync + 'static>(encoder: Encoder, writer: W) -> EncoderSinkBuilder {
        EncoderSinkBuilder {
            name: "encoder".to_string(),
            encoder,
            writer: Box::new(writer),
            error_output: Box::new(ConsoleWriter::stderr()),
            min_level: Level::Debug,
            stacktrace_level: Level::Error,
        }
    }

    pub fn encoder(&self) -> &Encoder {
        &self.encoder
    }

    pub fn min_level(&self) -> Level {
        self.min_level
    }

    pub fn stacktrace_level(&self) -> Level {
        self.stacktrace_level
    }

    pub fn metrics(&self) -> &SinkMetrics {
        &self.metrics
    }

    fn report(&self, message: &str) {
        let line = format!("{} {}\n", Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%z"), message);
        let mut out = self.error_output.lock();
        let _ = out.write_all(line.as_bytes()).and_then(|_| out.sync());
    }
}

impl Sink for EncoderSink {
    fn enabled(&self, level: Level) -> bool {
        level >= self.min_level
    }

    fn write(&self, record: &Record) -> Result<()> {
        if !self.enabled(record.level) {
            self.metrics.record_filtered();
            return Ok(());
        }

        let stacktrace = (record.level >= self.stacktrace_level)
            .then(|| Backtrace::force_capture().to_string());
        let line = self.encoder.encode(record, stacktrace.as_deref());

        let result = {
            let mut writer = self.writer.lock();
            writer.write_all(line.as_bytes()).and_then(|_| {
                if record.level > Level::Error {
                    writer.sync()
                } else {
                    Ok(())
                }
            })
        };

        match result {
            Ok(()) => {
                self.metrics.record_written();
                Ok(())
            }
            Err(e) => {
                self.metrics.record_failed();
                self.report(&format!("write error: {}", e));
                Err(LoggerError::io_operation(
                    "write log record",
                    format!("Sink '{}' failed to write", self.name),
                    e,
                ))
            }
        }
    }

    fn sync(&self) -> Result<()> {
        self.writer.lock().sync().map_err(|e| {
            LoggerError::io_operation(
                "sync log sink",
                format!("Sink '{}' failed to sync", self.name),
                e,
            )
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Builder for [`EncoderSink`]
pub struct EncoderSinkBuilder {
    name: String,
    encoder: Encoder,
    writer: Box<dyn WriteSync>,
    error_output: Box<dyn WriteSync>,
    min_level: Level,
    stacktrace_level: Level,
}

impl EncoderSinkBuilder {
    #[must_use = "builder methods return a new value"]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: Level) -> Self {
        self.min_level = level;
        self
    }

    /// Attach stack traces to records at `level` and above
    #[must_use = "builder methods return a new value"]
    pub fn stacktrace_at(mut self, level: Level) -> Self {
        self.stacktrace_level = level;
        self
    }

    /// Where the sink reports its own failures (stderr by default)
    #[must_use = "builder methods return a new value"]
    pub fn error_output<W: WriteSync + 'static>(mut self, output: W) -> Self {
        self.error_output = Box::new(output);
        self
    }

    pub fn build(self) -> EncoderSink {
        EncoderSink {
            name: self.name,
            encoder: self.encoder,
            writer: Mutex::new(self.writer),
            error_output: Mutex::new(self.error_output),
            min_level: self.min_level,
            stacktrace_level: self.stacktrace_level,
            metrics: SinkMetrics::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::encoder::EncoderConfig;
    use crate::core::field::Field;
    use crate::sinks::MemoryWriter;
    use std::io;

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl WriteSync for FailingWriter {}

    fn json_sink(output: &MemoryWriter) -> EncoderSink {
        EncoderSink::builder(Encoder::json(EncoderConfig::production()), output.clone())
            .min_level(Level::Info)
            .build()
    }

    #[test]
    fn test_filters_below_min_level() {
        let output = MemoryWriter::new();
        let sink = json_sink(&output);

        assert!(!sink.enabled(Level::Debug));
        sink.write(&Record::new(Level::Debug, "hidden")).unwrap();
        sink.write(&Record::new(Level::Info, "shown")).unwrap();

        assert_eq!(output.lines().len(), 1);
        assert_eq!(sink.metrics().filtered_count(), 1);
        assert_eq!(sink.metrics().written_count(), 1);
    }

    #[test]
    fn test_stacktrace_policy() {
        let output = MemoryWriter::new();
        let sink = json_sink(&output);

        sink.write(&Record::new(Level::Warn, "no trace")).unwrap();
        sink.write(&Record::new(Level::Error, "trace")).unwrap();

        let lines = output.lines();
        let warn: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
        let error: serde_json::Value = serde_json::from_str(&lines[1]).unwrap();
        assert!(warn.get("stacktrace").is_none());
        assert!(error["stacktrace"].is_string());
    }

    #[test]
    fn test_fields_are_encoded() {
        let output = MemoryWriter::new();
        let sink = json_sink(&output);

        let record = Record::new(Level::Info, "").with_fields(vec![Field::new("order", 42)]);
        sink.write(&record).unwrap();

        let value: serde_json::Value = serde_json::from_str(&output.lines()[0]).unwrap();
        assert_eq!(value["order"], 42);
    }

    #[test]
    fn test_write_failure_is_reported() {
        let errors = MemoryWriter::new();
        let sink = EncoderSink::builder(Encoder::json(EncoderConfig::production()), FailingWriter)
            .name("broken")
            .error_output(errors.clone())
            .build();

        let result = sink.write(&Record::new(Level::Info, "lost"));
        assert!(matches!(result, Err(LoggerError::IoOperation { .. })));
        assert_eq!(sink.metrics().failed_count(), 1);
        assert!(errors.contents().contains("write error: disk full"));
        assert_eq!(sink.name(), "broken");
    }
}
