//! Process termination for fatal records

use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};

/// Exit status used after a fatal record
pub const FATAL_EXIT_CODE: i32 = 1;

/// Ends the process after a fatal record has been written.
pub trait Terminator: Send + Sync {
    fn terminate(&self, code: i32);
}

/// Exits the current process
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessExit;

impl Terminator for ProcessExit {
    fn terminate(&self, code: i32) {
        std::process::exit(code);
    }
}

/// Counts termination requests instead of exiting
///
/// # Example
///
/// ```
/// use context_logger::{RecordingTerminator, Terminator};
///
/// let terminator = RecordingTerminator::new();
/// terminator.terminate(1);
/// assert_eq!(terminator.count(), 1);
/// assert_eq!(terminator.last_code(), Some(1));
/// ```
#[derive(Debug, Default)]
pub struct RecordingTerminator {
    calls: AtomicUsize,
    last_code: AtomicI32,
}

impl RecordingTerminator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_code(&self) -> Option<i32> {
        (self.count() > 0).then(|| self.last_code.load(Ordering::SeqCst))
    }
}

impl Terminator for RecordingTerminator {
    fn terminate(&self, code: i32) {
        self.last_code.store(code, Ordering::SeqCst);
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}
