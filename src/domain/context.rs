use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::errors::StorageError;

/// Cancellation and deadline signal handed to every storage call.
///
/// Clones share the cancellation flag, so a caller can keep one copy and
/// cancel work running on another thread.
#[derive(Debug, Clone, Default)]
pub struct OpContext {
    deadline: Option<Instant>,
    cancelled: Arc<AtomicBool>,
}

impl OpContext {
    /// A context that never expires.
    pub fn background() -> Self {
        Self::default()
    }

    /// A context expiring `timeout` from now. A timeout too large to be
    /// represented as an instant never expires.
    pub fn with_timeout(timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => Self::with_deadline(deadline),
            None => Self::background(),
        }
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Guard that cancels this context (and every clone) when dropped.
    pub fn cancel_on_drop(&self) -> CancelOnDrop {
        CancelOnDrop(self.clone())
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Time left before the deadline, `None` when there is no deadline.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }

    /// Fails with [`StorageError::Cancelled`] once the context is cancelled
    /// or its deadline has passed.
    pub fn check(&self, op: &str) -> Result<(), StorageError> {
        let expired = self.remaining().is_some_and(|left| left.is_zero());
        if self.is_cancelled() || expired {
            return Err(StorageError::Cancelled { op: op.to_string() });
        }
        Ok(())
    }
}

/// Held by the awaiting side of a blocking call: once the caller goes away
/// the work still running on the blocking thread sees the cancellation.
#[must_use = "the context is cancelled as soon as the guard is dropped"]
#[derive(Debug)]
pub struct CancelOnDrop(OpContext);

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        self.0.cancel();
    }
}
