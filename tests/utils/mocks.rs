use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use cardgame::trace::{TraceError, TraceEvent, TraceSink};

// ============================================================================
// Mock Infrastructure
// ============================================================================

/// Accepts a fixed number of events, then fails every write like a full disk
pub struct FailingTraceSink {
    remaining: AtomicUsize,
}

impl FailingTraceSink {
    pub fn after(events: usize) -> Self {
        Self {
            remaining: AtomicUsize::new(events),
        }
    }
}

#[async_trait]
impl TraceSink for FailingTraceSink {
    async fn record(&self, _event: TraceEvent) -> Result<(), TraceError> {
        let accepted = self
            .remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if accepted {
            Ok(())
        } else {
            Err(std::io::Error::other("no space left on device").into())
        }
    }

    async fn flush(&self) -> Result<(), TraceError> {
        Ok(())
    }
}

/// Forwards to an inner sink until an event matching `fails_on` arrives,
/// which is rejected instead of written. Flushes always reach the inner sink.
pub struct RejectingTraceSink<F> {
    inner: Arc<dyn TraceSink>,
    fails_on: F,
    flushes: AtomicUsize,
}

impl<F> RejectingTraceSink<F>
where
    F: Fn(&TraceEvent) -> bool + Send + Sync,
{
    pub fn wrap(inner: Arc<dyn TraceSink>, fails_on: F) -> Self {
        Self {
            inner,
            fails_on,
            flushes: AtomicUsize::new(0),
        }
    }

    pub fn flushes(&self) -> usize {
        self.flushes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<F> TraceSink for RejectingTraceSink<F>
where
    F: Fn(&TraceEvent) -> bool + Send + Sync,
{
    async fn record(&self, event: TraceEvent) -> Result<(), TraceError> {
        if (self.fails_on)(&event) {
            return Err(std::io::Error::other("write rejected").into());
        }
        self.inner.record(event).await
    }

    async fn flush(&self) -> Result<(), TraceError> {
        self.flushes.fetch_add(1, Ordering::SeqCst);
        self.inner.flush().await
    }
}
