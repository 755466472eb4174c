//! Record encoders
//!
//! Two encodings are supported:
//! - Json: one JSON object per line, for files and production stdout
//! - Console: tab separated human-readable line, for development stdout
//!
//! Key names, level casing and caller rendering come from an
//! [`EncoderConfig`]. The development and production presets differ in their
//! field naming convention (`T`/`L`/`C`/`M` versus `ts`/`level`/`caller`/`msg`).

use super::config::Mode;
use super::field::Field;
use super::level::Level;
use super::record::Record;
use super::timestamp::TimestampFormat;
use std::panic::Location;

/// How a level is written into a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelEncoding {
    /// `INFO`
    Capital,
    /// `INFO` wrapped in terminal color codes
    CapitalColor,
    /// `info`
    Lowercase,
}

/// How the caller location is written into a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallerEncoding {
    /// Last directory and file name: `core/logger.rs:42`
    Short,
    /// Path as recorded by the compiler
    Full,
}

/// Key names and value encodings used by an [`Encoder`]
///
/// An empty key omits that element from the output.
#[derive(Debug, Clone, PartialEq)]
pub struct EncoderConfig {
    pub time_key: String,
    pub level_key: String,
    pub caller_key: String,
    pub message_key: String,
    pub stacktrace_key: String,
    pub level_encoding: LevelEncoding,
    pub caller_encoding: CallerEncoding,
    pub time_format: TimestampFormat,
}

impl EncoderConfig {
    /// Verbose preset with single letter keys and capital levels
    #[must_use]
    pub fn development() -> Self {
        Self {
            time_key: "T".to_string(),
            level_key: "L".to_string(),
            caller_key: "C".to_string(),
            message_key: "M".to_string(),
            stacktrace_key: "S".to_string(),
            level_encoding: LevelEncoding::Capital,
            caller_encoding: CallerEncoding::Short,
            time_format: TimestampFormat::Iso8601,
        }
    }

    /// Compact preset with descriptive keys and lowercase levels
    #[must_use]
    pub fn production() -> Self {
        Self {
            time_key: "ts".to_string(),
            level_key: "level".to_string(),
            caller_key: "caller".to_string(),
            message_key: "msg".to_string(),
            stacktrace_key: "stacktrace".to_string(),
            level_encoding: LevelEncoding::Lowercase,
            caller_encoding: CallerEncoding::Short,
            time_format: TimestampFormat::Epoch,
        }
    }

    #[must_use]
    pub fn for_mode(mode: Mode) -> Self {
        match mode {
            Mode::Development => Self::development(),
            Mode::Production => Self::production(),
        }
    }

    #[must_use]
    pub fn with_time_format(mut self, format: TimestampFormat) -> Self {
        self.time_format = format;
        self
    }

    #[must_use]
    pub fn with_level_encoding(mut self, encoding: LevelEncoding) -> Self {
        self.level_encoding = encoding;
        self
    }

    #[must_use]
    pub fn with_caller_encoding(mut self, encoding: CallerEncoding) -> Self {
        self.caller_encoding = encoding;
        self
    }

    fn encode_level(&self, level: Level) -> String {
        match self.level_encoding {
            LevelEncoding::Capital => level.to_str().to_string(),
            LevelEncoding::Lowercase => level.to_lowercase_str().to_string(),
            LevelEncoding::CapitalColor => colorize(level),
        }
    }

    fn encode_caller(&self, caller: &Location<'_>) -> String {
        match self.caller_encoding {
            CallerEncoding::Full => format!("{}:{}", caller.file(), caller.line()),
            CallerEncoding::Short => format!("{}:{}", short_path(caller.file()), caller.line()),
        }
    }
}

#[cfg(feature = "console")]
fn colorize(level: Level) -> String {
    use colored::Colorize;
    level.to_str().color(level.color_code()).to_string()
}

#[cfg(not(feature = "console"))]
fn colorize(level: Level) -> String {
    level.to_str().to_string()
}

/// Keep the last directory and the file name of a source path
fn short_path(path: &str) -> &str {
    let mut separators = path
        .char_indices()
        .rev()
        .filter(|(_, c)| *c == '/' || *c == '\\');
    match (separators.next(), separators.next()) {
        (Some(_), Some((idx, _))) => &path[idx + 1..],
        _ => path,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Json,
    Console,
}

/// Renders a [`Record`] to one line of text, newline included
#[derive(Debug, Clone)]
pub struct Encoder {
    encoding: Encoding,
    config: EncoderConfig,
}

impl Encoder {
    #[must_use]
    pub fn json(config: EncoderConfig) -> Self {
        Self {
            encoding: Encoding::Json,
            config,
        }
    }

    #[must_use]
    pub fn console(config: EncoderConfig) -> Self {
        Self {
            encoding: Encoding::Console,
            config,
        }
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Encode a record, optionally with a captured stack trace
    pub fn encode(&self, record: &Record, stacktrace: Option<&str>) -> String {
        match self.encoding {
            Encoding::Json => self.encode_json(record, stacktrace),
            Encoding::Console => self.encode_console(record, stacktrace),
        }
    }

    fn encode_json(&self, record: &Record, stacktrace: Option<&str>) -> String {
        let cfg = &self.config;
        let mut obj = JsonLine::new();

        if !cfg.level_key.is_empty() {
            obj.push(
                &cfg.level_key,
                &serde_json::Value::String(cfg.encode_level(record.level)),
            );
        }
        if !cfg.time_key.is_empty() {
            obj.push(&cfg.time_key, &cfg.time_format.to_json_value(&record.timestamp));
        }
        if let (false, Some(caller)) = (cfg.caller_key.is_empty(), record.caller) {
            obj.push(
                &cfg.caller_key,
                &serde_json::Value::String(cfg.encode_caller(caller)),
            );
        }
        if !cfg.message_key.is_empty() && !record.message.is_empty() {
            obj.push(
                &cfg.message_key,
                &serde_json::Value::String(record.message.clone()),
            );
        }
        for field in &record.fields {
            obj.push(&field.key, &field.value.to_json_value());
        }
        if let (false, Some(stack)) = (cfg.stacktrace_key.is_empty(), stacktrace) {
            obj.push(
                &cfg.stacktrace_key,
                &serde_json::Value::String(stack.to_string()),
            );
        }

        obj.finish()
    }

    fn encode_console(&self, record: &Record, stacktrace: Option<&str>) -> String {
        let cfg = &self.config;
        let mut parts: Vec<String> = Vec::with_capacity(5);

        if !cfg.time_key.is_empty() {
            parts.push(cfg.time_format.format(&record.timestamp));
        }
        if !cfg.level_key.is_empty() {
            parts.push(cfg.encode_level(record.level));
        }
        if let (false, Some(caller)) = (cfg.caller_key.is_empty(), record.caller) {
            parts.push(cfg.encode_caller(caller));
        }
        if !cfg.message_key.is_empty() && !record.message.is_empty() {
            parts.push(record.message.clone());
        }
        if !record.fields.is_empty() {
            parts.push(fields_object(&record.fields));
        }

        let mut line = parts.join("\t");
        if let (false, Some(stack)) = (cfg.stacktrace_key.is_empty(), stacktrace) {
            line.push('\n');
            line.push_str(stack.trim_end());
        }
        line.push('\n');
        line
    }
}

fn fields_object(fields: &[Field]) -> String {
    let mut obj = JsonLine::new();
    for field in fields {
        obj.push(&field.key, &field.value.to_json_value());
    }
    let mut rendered = obj.finish();
    rendered.pop();
    rendered
}

/// Incrementally built JSON object that keeps insertion order
struct JsonLine {
    buf: String,
    empty: bool,
}

impl JsonLine {
    fn new() -> Self {
        Self {
            buf: String::from("{"),
            empty: true,
        }
    }

    fn push(&mut self, key: &str, value: &serde_json::Value) {
        if !self.empty {
            self.buf.push(',');
        }
        self.empty = false;
        self.buf
            .push_str(&serde_json::Value::String(key.to_string()).to_string());
        self.buf.push(':');
        self.buf.push_str(&value.to_string());
    }

    fn finish(mut self) -> String {
        self.buf.push_str("}\n");
        self.buf
    }
}
