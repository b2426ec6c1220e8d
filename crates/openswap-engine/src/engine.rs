//! The swap engine facade.
//!
//! Ties the store, the authorization checker, the executor, the gate and
//! the event sink together behind the public operations:
//!
//! - `create_trade`: validate inputs and the offered leg, append an OPEN trade
//! - `execute_trade`: re-validate both legs, swap atomically, CLOSE
//! - `cancel_trade`: lister-only, OPEN → CANCELLED, no registry calls
//!
//! State-changing calls run inside the [`ExecutionGate`]. The store lock is
//! never held across a registry call: the trade is copied out, the
//! registries are consulted, and the write lock is taken only to commit.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use openswap_registry::RegistryBook;
use openswap_types::{
    Address, AssetKind, AssetRef, EngineConfig, Result, SwapError, SwapEvent, SwapEventKind,
    Trade, TradeId, TradeStatus,
};
use parking_lot::RwLock;

use crate::authorization::AuthorizationChecker;
use crate::events::EventSink;
use crate::executor::{SettledSwap, SwapExecutor};
use crate::gate::{ExecutionGate, GuardedOp};
use crate::store::TradeStore;

/// Peer-to-peer swap engine over external ownership registries.
pub struct SwapEngine {
    config: EngineConfig,
    registries: RegistryBook,
    store: RwLock<TradeStore>,
    gate: ExecutionGate,
    sink: Arc<dyn EventSink>,
    /// Sequence number of the last emitted event.
    sequence: AtomicU64,
}

impl SwapEngine {
    /// Build an engine over `registries`, publishing to `sink`.
    ///
    /// # Errors
    /// `Configuration` if `config` fails validation.
    pub fn new(
        config: EngineConfig,
        registries: RegistryBook,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self> {
        config.validate()?;
        let gate = ExecutionGate::with_timeout(config.gate_timeout());
        tracing::info!(
            operator = %config.operator,
            registries = registries.len(),
            max_trades_per_lister = config.max_trades_per_lister,
            "swap engine started"
        );
        Ok(Self {
            config,
            registries,
            store: RwLock::new(TradeStore::new()),
            gate,
            sink,
            sequence: AtomicU64::new(0),
        })
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // =================================================================
    // State-changing operations
    // =================================================================

    /// List `offered` (a uniquely identified asset `lister` owns) in
    /// exchange for `requested`.
    ///
    /// # Errors
    /// - `InvalidInput`: zero/unknown/wrong-kind registry, zero lister,
    ///   zero fungible amount (unless allowed), lister at its listing cap
    /// - `NotOwner` / `NotApproved`: offered leg not currently movable
    /// - `ReentrantCall`: called from inside another engine operation
    pub fn create_trade(
        &self,
        lister: Address,
        offered: AssetRef,
        requested: AssetRef,
        requested_kind: AssetKind,
    ) -> Result<TradeId> {
        let _pass = self.gate.enter(GuardedOp::Create)?;
        self.try_create(lister, offered, requested, requested_kind)
            .inspect_err(|e| log_rejection(GuardedOp::Create, None, e))
    }

    fn try_create(
        &self,
        lister: Address,
        offered: AssetRef,
        requested: AssetRef,
        requested_kind: AssetKind,
    ) -> Result<TradeId> {
        if offered.has_null_registry() || requested.has_null_registry() {
            return Err(SwapError::InvalidInput {
                reason: "registry reference is the zero address".into(),
            });
        }
        if lister.is_zero() {
            return Err(SwapError::InvalidInput {
                reason: "lister is the zero address".into(),
            });
        }
        self.registries
            .resolve(offered.registry, AssetKind::UniquelyIdentified)?;
        self.registries.resolve(requested.registry, requested_kind)?;
        if requested_kind == AssetKind::Fungible
            && requested.value == 0
            && !self.config.allow_zero_amount
        {
            return Err(SwapError::InvalidInput {
                reason: "requested fungible amount is zero".into(),
            });
        }
        let listed = self.store.read().lister_count(&lister);
        if !self.config.lister_has_capacity(listed) {
            return Err(SwapError::InvalidInput {
                reason: format!(
                    "{lister} reached the limit of {} trades",
                    self.config.max_trades_per_lister
                ),
            });
        }

        self.checker().validate_offered_leg(&offered, lister)?;

        let id = self
            .store
            .write()
            .insert(lister, offered, requested, requested_kind);
        tracing::info!(
            trade_id = %id,
            %lister,
            offered_registry = %offered.registry,
            offered_id = offered.value,
            requested_registry = %requested.registry,
            requested = requested.value,
            kind = %requested_kind,
            "trade listed"
        );
        self.emit(
            id,
            SwapEventKind::Listed {
                lister,
                offered_registry: offered.registry,
                offered_id: offered.value,
                requested_registry: requested.registry,
                requested_id_or_amount: requested.value,
                requested_kind,
            },
        );
        Ok(id)
    }

    /// Accept trade `id` as `executor`, swapping both legs atomically.
    ///
    /// # Errors
    /// In check order: `TradeNotFound`, `InvalidState`, `InvalidInput`
    /// (zero executor), `Unauthorized` (self-execution), offered-leg
    /// errors, requested-leg errors. Then `TransferRejected` /
    /// `RollbackFailed` from the transfers, `ReentrantCall` when called
    /// from inside another engine operation, and `GateTimeout`.
    /// On any error the trade stays OPEN.
    pub fn execute_trade(&self, id: TradeId, executor: Address) -> Result<SettledSwap> {
        let _pass = self.gate.enter(GuardedOp::Execute)?;
        self.try_execute(id, executor)
            .inspect_err(|e| log_rejection(GuardedOp::Execute, Some(id), e))
    }

    fn try_execute(&self, id: TradeId, executor: Address) -> Result<SettledSwap> {
        let trade = self.check_executable(id, executor)?;

        let settled = SwapExecutor::new(&self.registries, self.config.operator)
            .settle(&trade, executor)?;

        self.store.write().transition(id, TradeStatus::Closed)?;
        tracing::info!(
            trade_id = %id,
            lister = %trade.lister,
            %executor,
            "trade executed"
        );
        self.emit(
            id,
            SwapEventKind::Executed {
                lister: trade.lister,
                executor,
                offered_registry: trade.offered.registry,
                offered_id: trade.offered.value,
                requested_registry: trade.requested.registry,
                requested_id_or_amount: trade.requested.value,
            },
        );
        Ok(settled)
    }

    /// Withdraw trade `id`. Only its lister may cancel.
    ///
    /// # Errors
    /// In check order: `TradeNotFound`, `Unauthorized`, `InvalidState`;
    /// `ReentrantCall` when called from inside another engine operation.
    pub fn cancel_trade(&self, id: TradeId, caller: Address) -> Result<()> {
        let _pass = self.gate.enter(GuardedOp::Cancel)?;
        self.try_cancel(id, caller)
            .inspect_err(|e| log_rejection(GuardedOp::Cancel, Some(id), e))
    }

    fn try_cancel(&self, id: TradeId, caller: Address) -> Result<()> {
        let lister = {
            let mut store = self.store.write();
            let trade = store.get(id)?;
            if trade.lister != caller {
                return Err(SwapError::Unauthorized {
                    reason: format!("{caller} is not the lister of {id}"),
                });
            }
            store.transition(id, TradeStatus::Cancelled)?.lister
        };
        tracing::info!(trade_id = %id, %lister, "trade cancelled");
        self.emit(id, SwapEventKind::Cancelled { lister });
        Ok(())
    }

    // =================================================================
    // Queries
    // =================================================================

    /// Run every execution precondition for `executor` without moving
    /// anything.
    ///
    /// # Errors
    /// The error `execute_trade` would fail with before any transfer.
    pub fn preflight_execute(&self, id: TradeId, executor: Address) -> Result<()> {
        self.check_executable(id, executor).map(|_| ())
    }

    /// A copy of trade `id`.
    ///
    /// # Errors
    /// `TradeNotFound` if `id` is `0` or unassigned.
    pub fn get_trade(&self, id: TradeId) -> Result<Trade> {
        self.store.read().get(id).cloned()
    }

    /// Every trade `lister` created, in creation order.
    #[must_use]
    pub fn get_trades_by_lister(&self, lister: &Address) -> Vec<TradeId> {
        self.store.read().trades_by_lister(lister)
    }

    /// The still-OPEN subset of [`Self::get_trades_by_lister`].
    #[must_use]
    pub fn open_trades_by_lister(&self, lister: &Address) -> Vec<TradeId> {
        self.store.read().open_trades_by_lister(lister)
    }

    /// The ID the next created trade will receive.
    #[must_use]
    pub fn next_trade_id(&self) -> TradeId {
        self.store.read().next_trade_id()
    }

    #[must_use]
    pub fn trade_count(&self) -> usize {
        self.store.read().len()
    }

    // =================================================================
    // Internals
    // =================================================================

    fn checker(&self) -> AuthorizationChecker<'_> {
        AuthorizationChecker::new(&self.registries, self.config.operator)
    }

    /// Preconditions 1–5 of an execution; returns a snapshot of the trade.
    fn check_executable(&self, id: TradeId, executor: Address) -> Result<Trade> {
        let trade = self.store.read().get(id)?.clone();
        if !trade.is_open() {
            return Err(SwapError::InvalidState {
                trade_id: id,
                status: trade.status,
            });
        }
        if executor.is_zero() {
            return Err(SwapError::InvalidInput {
                reason: "executor is the zero address".into(),
            });
        }
        if executor == trade.lister {
            return Err(SwapError::Unauthorized {
                reason: "cannot accept own trade".into(),
            });
        }
        let checker = self.checker();
        checker.validate_offered_leg(&trade.offered, trade.lister)?;
        checker.validate_requested_leg(&trade.requested, trade.requested_kind, executor)?;
        Ok(trade)
    }

    fn emit(&self, trade_id: TradeId, kind: SwapEventKind) {
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let event = SwapEvent::new(sequence, trade_id, kind);
        tracing::debug!(%event, "publishing event");
        self.sink.publish(&event);
    }
}

impl std::fmt::Debug for SwapEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SwapEngine")
            .field("config", &self.config)
            .field("registries", &self.registries)
            .field("trades", &self.store.read().len())
            .field("sequence", &self.sequence.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

fn log_rejection(op: GuardedOp, trade_id: Option<TradeId>, err: &SwapError) {
    // Rollback failures are already logged at error level by the executor.
    if matches!(err, SwapError::RollbackFailed { .. }) {
        return;
    }
    match trade_id {
        Some(id) => tracing::warn!(%op, trade_id = %id, code = err.code(), "rejected: {err}"),
        None => tracing::warn!(%op, code = err.code(), "rejected: {err}"),
    }
}
