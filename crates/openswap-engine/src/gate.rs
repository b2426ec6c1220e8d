//! Execution gate: serializes state-changing calls and rejects re-entry.
//!
//! `execute_trade` calls out to registries *before* the trade is marked
//! CLOSED. A registry that calls back into the engine during that window
//! would see the trade still OPEN, so status checks cannot guard against
//! re-entry. The gate does:
//!
//! - **Other threads** block on the lock until the in-flight call finishes,
//!   giving a total order over create / execute / cancel.
//! - **The same thread** re-acquires the reentrant lock, finds an operation
//!   already in flight, and is rejected with
//!   [`SwapError::ReentrantCall`].
//!
//! The flag is cleared when the [`GatePass`] is dropped, including on early
//! return and unwinding.
//!
//! Re-entry is only recognized on the thread that holds the gate. A
//! registry that hands the callback to a worker thread and joins it makes
//! the worker wait on the outer call, which waits on the worker. A gate
//! built with [`ExecutionGate::with_timeout`] breaks that cycle by failing
//! the waiting call with [`SwapError::GateTimeout`]; without a timeout it
//! waits indefinitely.

use std::cell::Cell;
use std::time::Duration;

use openswap_types::{Result, SwapError};
use parking_lot::{ReentrantMutex, ReentrantMutexGuard};

/// A state-changing engine operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardedOp {
    Create,
    Execute,
    Cancel,
}

impl GuardedOp {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create_trade",
            Self::Execute => "execute_trade",
            Self::Cancel => "cancel_trade",
        }
    }
}

impl std::fmt::Display for GuardedOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Gate guarding every state-changing entry point of one engine.
#[derive(Debug, Default)]
pub struct ExecutionGate {
    in_flight: ReentrantMutex<Cell<Option<GuardedOp>>>,
    /// Longest wait for another thread's call; `None` waits indefinitely.
    timeout: Option<Duration>,
}

impl ExecutionGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gate whose waiters give up after `timeout` (`None` = never).
    #[must_use]
    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        Self {
            in_flight: ReentrantMutex::new(Cell::new(None)),
            timeout,
        }
    }

    /// Enter the gate for `op`, blocking while another thread holds it.
    ///
    /// # Errors
    /// - `ReentrantCall` if this thread is already inside the gate
    /// - `GateTimeout` if another thread held it past the timeout
    pub fn enter(&self, op: GuardedOp) -> Result<GatePass<'_>> {
        let guard = match self.timeout {
            None => self.in_flight.lock(),
            Some(timeout) => self.in_flight.try_lock_for(timeout).ok_or_else(|| {
                let waited_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
                tracing::warn!(attempted = %op, waited_ms, "OS_ERR_403: gate wait timed out");
                SwapError::GateTimeout {
                    attempted: op.as_str(),
                    waited_ms,
                }
            })?,
        };
        if let Some(active) = guard.get() {
            tracing::warn!(%active, attempted = %op, "OS_ERR_402: reentrant call rejected");
            return Err(SwapError::ReentrantCall {
                active: active.as_str(),
                attempted: op.as_str(),
            });
        }
        guard.set(Some(op));
        Ok(GatePass { guard })
    }

    /// The operation currently in flight on *this* thread, if any.
    /// Blocks while another thread is inside the gate.
    #[must_use]
    pub fn active(&self) -> Option<GuardedOp> {
        self.in_flight.lock().get()
    }
}

/// Proof of being inside the gate. Dropping it reopens the gate.
pub struct GatePass<'a> {
    guard: ReentrantMutexGuard<'a, Cell<Option<GuardedOp>>>,
}

impl GatePass<'_> {
    #[must_use]
    pub fn op(&self) -> Option<GuardedOp> {
        self.guard.get()
    }
}

impl Drop for GatePass<'_> {
    fn drop(&mut self) {
        self.guard.set(None);
    }
}
