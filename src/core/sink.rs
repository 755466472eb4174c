//! Sink and writer traits

use super::{error::Result, level::Level, record::Record};
use std::io::{self, Write};

/// A byte destination that can be flushed through to durable storage.
pub trait WriteSync: Write + Send {
    fn sync(&mut self) -> io::Result<()> {
        self.flush()
    }
}

/// The destination and encoding pipeline a logger writes records into.
///
/// Implementations serialize their own physical writes; a sink is shared by
/// every thread logging through the same facade.
pub trait Sink: Send + Sync {
    fn enabled(&self, level: Level) -> bool;
    fn write(&self, record: &Record) -> Result<()>;
    fn sync(&self) -> Result<()>;
    fn name(&self) -> &str;
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn enabled(&self, level: Level) -> bool {
        (**self).enabled(level)
    }

    fn write(&self, record: &Record) -> Result<()> {
        (**self).write(record)
    }

    fn sync(&self) -> Result<()> {
        (**self).sync()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
