//! Sink construction per mode and destination
//!
//! | sink            | encoding            | keys        | minimum | errors to |
//! |-----------------|---------------------|-------------|---------|-----------|
//! | file, any mode  | JSON                | mode preset | Info    | stderr    |
//! | default, dev    | console (tabulated) | development | Debug   | stdout    |
//! | default, prod   | JSON                | production  | Info    | stdout    |
//!
//! Every sink stamps ISO-8601 times and attaches stack traces from Error up.

use super::{
    console::ConsoleWriter, encoded::EncoderSink, memory::MemoryWriter,
    rotating_file::RotatingFile,
};
use crate::core::{
    config::{Mode, RotationConfig},
    encoder::{Encoder, EncoderConfig},
    error::Result,
    level::Level,
    timestamp::TimestampFormat,
};

fn encoder_config(mode: Mode) -> EncoderConfig {
    EncoderConfig::for_mode(mode).with_time_format(TimestampFormat::Iso8601)
}

/// Create a JSON sink writing through a rotating file.
///
/// The file is opened (or rotated) immediately.
///
/// # Errors
///
/// Returns error if the log directory or file cannot be created
pub fn new_file_sink(mode: Mode, rotation: &RotationConfig) -> Result<EncoderSink> {
    let file = RotatingFile::new(rotation)?;
    let name = format!("file:{}", file.path().display());
    Ok(EncoderSink::builder(Encoder::json(encoder_config(mode)), file)
        .name(name)
        .min_level(Level::Info)
        .stacktrace_at(Level::Error)
        .error_output(ConsoleWriter::stderr())
        .build())
}

/// Create a sink writing to stdout.
///
/// Development output is human readable; production output is JSON.
pub fn new_default_sink(mode: Mode) -> EncoderSink {
    let (encoder, min_level) = match mode {
        Mode::Development => (Encoder::console(encoder_config(mode)), Level::Debug),
        Mode::Production => (Encoder::json(encoder_config(mode)), Level::Info),
    };
    EncoderSink::builder(encoder, ConsoleWriter::stdout())
        .name(format!("stdout:{}", mode))
        .min_level(min_level)
        .stacktrace_at(Level::Error)
        .error_output(ConsoleWriter::stdout())
        .build()
}

/// Create a JSON sink capturing into memory, plus a handle to read it back.
///
/// Accepts every level.
pub fn new_memory_sink(mode: Mode) -> (EncoderSink, MemoryWriter) {
    let output = MemoryWriter::new();
    let sink = EncoderSink::builder(Encoder::json(encoder_config(mode)), output.clone())
        .name(format!("memory:{}", mode))
        .min_level(Level::Debug)
        .stacktrace_at(Level::Error)
        .error_output(ConsoleWriter::stderr())
        .build();
    (sink, output)
}

/// Parse a mode name, aborting on anything unrecognized.
///
/// # Panics
///
/// Panics with `Not support this mode <name>` when `name` is neither
/// `development` nor `production`
pub fn parse_mode(name: &str) -> Mode {
    match name.parse() {
        Ok(mode) => mode,
        Err(e) => panic!("{}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::encoder::Encoding;
    use crate::core::record::Record;
    use crate::core::sink::Sink;
    use tempfile::tempdir;

    #[test]
    fn test_default_sink_per_mode() {
        let dev = new_default_sink(Mode::Development);
        assert_eq!(dev.encoder().encoding(), Encoding::Console);
        assert_eq!(dev.min_level(), Level::Debug);

        let prod = new_default_sink(Mode::Production);
        assert_eq!(prod.encoder().encoding(), Encoding::Json);
        assert_eq!(prod.min_level(), Level::Info);
        assert!(!prod.enabled(Level::Debug));
        assert_eq!(prod.encoder().config().level_key, "level");
    }

    #[test]
    fn test_file_sink_writes_json() {
        let dir = tempdir().unwrap();
        let rotation = RotationConfig::new(dir.path().join("logs/app.logger"));

        let sink = new_file_sink(Mode::Development, &rotation).unwrap();
        assert_eq!(sink.min_level(), Level::Info);
        assert_eq!(sink.stacktrace_level(), Level::Error);

        sink.write(&Record::new(Level::Debug, "dropped")).unwrap();
        sink.write(&Record::new(Level::Info, "kept")).unwrap();
        sink.sync().unwrap();

        let contents = std::fs::read_to_string(&rotation.filename).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 1);
        let value: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(value["L"], "INFO");
        assert_eq!(value["M"], "kept");
    }

    #[test]
    fn test_file_sink_unwritable_path() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"a file, not a directory").unwrap();

        let rotation = RotationConfig::new(blocker.join("app.logger"));
        assert!(new_file_sink(Mode::Production, &rotation).is_err());
    }

    #[test]
    fn test_memory_sink_accepts_debug() {
        let (sink, output) = new_memory_sink(Mode::Production);
        sink.write(&Record::new(Level::Debug, "visible")).unwrap();
        assert!(output.contents().contains("\"level\":\"debug\""));
    }

    #[test]
    fn test_parse_mode() {
        assert_eq!(parse_mode("development"), Mode::Development);
        assert_eq!(parse_mode("production"), Mode::Production);
    }

    #[test]
    #[should_panic(expected = "Not support this mode staging")]
    fn test_parse_mode_unknown_panics() {
        parse_mode("staging");
    }
}
