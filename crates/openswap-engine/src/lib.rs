//! # openswap-engine
//!
//! **Swap engine**: trade lifecycle, authorization re-validation, atomic
//! two-leg execution, and lifecycle events.
//!
//! ## Architecture
//!
//! [`SwapEngine`] receives caller requests and:
//! 1. Serializes state-changing calls and rejects re-entry ([`ExecutionGate`])
//! 2. Validates inputs and the offered leg at listing time
//! 3. Re-validates both legs against the registries at execution time
//!    ([`AuthorizationChecker`])
//! 4. Moves both legs as one unit, reverting on failure ([`SwapExecutor`])
//! 5. Commits the status change in the [`TradeStore`]
//! 6. Publishes a [`SwapEvent`](openswap_types::SwapEvent) to the [`EventSink`]
//!
//! ## Trade Lifecycle
//!
//! - **OPEN**: listed, waiting for an executor or a cancel
//! - **CLOSED**: both legs swapped (terminal)
//! - **CANCELLED**: withdrawn by the lister (terminal)

pub mod authorization;
pub mod engine;
pub mod events;
pub mod executor;
pub mod gate;
pub mod store;

pub use authorization::AuthorizationChecker;
pub use engine::SwapEngine;
pub use events::{EventLog, EventSink, NullSink};
pub use executor::{Leg, SettledSwap, SwapExecutor};
pub use gate::{ExecutionGate, GatePass, GuardedOp};
pub use store::TradeStore;
