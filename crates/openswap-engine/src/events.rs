//! Event emitter: the side channel to external indexers.
//!
//! The engine publishes a [`SwapEvent`] after each committed state change.
//! Sinks observe; they never feed back into engine control flow.

use openswap_types::{SwapEvent, TradeId};
use parking_lot::RwLock;

/// Destination for lifecycle events.
pub trait EventSink: Send + Sync {
    fn publish(&self, event: &SwapEvent);
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn publish(&self, _event: &SwapEvent) {}
}

/// Append-only in-memory event log.
#[derive(Debug, Default)]
pub struct EventLog {
    events: RwLock<Vec<SwapEvent>>,
}

impl EventLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every event in emission order.
    #[must_use]
    pub fn events(&self) -> Vec<SwapEvent> {
        self.events.read().clone()
    }

    /// Events for one trade, in emission order.
    #[must_use]
    pub fn events_for(&self, trade_id: TradeId) -> Vec<SwapEvent> {
        self.events
            .read()
            .iter()
            .filter(|e| e.trade_id == trade_id)
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn last(&self) -> Option<SwapEvent> {
        self.events.read().last().cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }
}

impl EventSink for EventLog {
    fn publish(&self, event: &SwapEvent) {
        self.events.write().push(event.clone());
    }
}
