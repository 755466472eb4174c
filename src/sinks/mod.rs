//! Sink implementations and the sink factory

pub mod console;
pub mod encoded;
pub mod factory;
pub mod memory;
pub mod rotating_file;

pub use console::{ConsoleTarget, ConsoleWriter};
pub use encoded::{EncoderSink, EncoderSinkBuilder};
pub use factory::{new_default_sink, new_file_sink, new_memory_sink, parse_mode};
pub use memory::MemoryWriter;
pub use rotating_file::RotatingFile;
