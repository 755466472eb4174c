//! Ambient context carried across call boundaries
//!
//! A [`Context`] is an immutable snapshot holding at most one bound logger and
//! an optional tracing identifier. Deriving a new snapshot never changes the
//! one it came from, so a context can be cloned into threads and nested calls
//! freely.

use super::logger::Logger;
use std::fmt;
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct Context {
    logger: Option<Arc<Logger>>,
    tracing_id: Option<Arc<str>>,
}

impl Context {
    /// An empty root context
    pub fn background() -> Self {
        Self::default()
    }

    /// Derive a context carrying the given tracing identifier
    #[must_use]
    pub fn with_tracing_id(&self, tracing_id: impl Into<String>) -> Self {
        Self {
            logger: self.logger.clone(),
            tracing_id: Some(Arc::from(tracing_id.into())),
        }
    }

    pub fn tracing_id(&self) -> Option<&str> {
        self.tracing_id.as_deref()
    }

    pub fn logger(&self) -> Option<&Arc<Logger>> {
        self.logger.as_ref()
    }

    pub fn has_logger(&self) -> bool {
        self.logger.is_some()
    }

    /// Derive a context with `logger` attached, shadowing any existing binding.
    ///
    /// Use [`add_logger_to_ctx`](crate::add_logger_to_ctx) for the
    /// non-overwriting variant.
    pub(crate) fn with_logger(&self, logger: Arc<Logger>) -> Self {
        Self {
            logger: Some(logger),
            tracing_id: self.tracing_id.clone(),
        }
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("tracing_id", &self.tracing_id)
            .field("logger", &self.logger.as_ref().map(|l| l.tracing_id()))
            .finish()
    }
}
