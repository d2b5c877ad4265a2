use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Semaphore;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GateError {
    #[error("Round gate was already opened")]
    AlreadyOpened,
    #[error("Round gate was closed before it opened")]
    Closed,
}

/// One-shot counted release gate for the start of a round.
///
/// The gate starts with zero passes. The dealer opens it once with one pass
/// per player, and every player consumes exactly one pass before its first
/// turn. Waiting players are parked by the runtime until a pass is available.
///
/// A gate serves a single round; the orchestrator builds a fresh one for each.
#[derive(Debug)]
pub struct RoundGate {
    passes: Semaphore,
    opened: AtomicBool,
}

impl Default for RoundGate {
    fn default() -> Self {
        Self::new()
    }
}

impl RoundGate {
    pub fn new() -> Self {
        Self {
            passes: Semaphore::new(0),
            opened: AtomicBool::new(false),
        }
    }

    /// Releases exactly `passes` waiters. Fails if the gate was already opened.
    pub fn open(&self, passes: usize) -> Result<(), GateError> {
        if self.passes.is_closed() {
            return Err(GateError::Closed);
        }
        if self.opened.swap(true, Ordering::SeqCst) {
            return Err(GateError::AlreadyOpened);
        }

        debug!(passes, "Opening round gate");
        self.passes.add_permits(passes);
        Ok(())
    }

    /// Waits for and consumes one pass.
    pub async fn pass(&self) -> Result<(), GateError> {
        let permit = self
            .passes
            .acquire()
            .await
            .map_err(|_| GateError::Closed)?;
        permit.forget();
        Ok(())
    }

    /// Wakes every waiter with `GateError::Closed`. Used when the round is
    /// abandoned before the dealer could open the gate.
    pub fn close(&self) {
        self.passes.close();
    }

    pub fn is_open(&self) -> bool {
        self.opened.load(Ordering::SeqCst)
    }

    /// Passes released but not yet consumed.
    pub fn remaining(&self) -> usize {
        self.passes.available_permits()
    }
}
