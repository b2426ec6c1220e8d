//! Swap executor: moves both legs as one indivisible unit.
//!
//! 1. Transfer the offered asset: lister → executor
//! 2. Transfer the requested asset: executor → lister
//! 3. If any leg fails, revert every completed leg (newest first) and
//!    return the original error
//! 4. Once both legs went through, commit them so neither can be reverted
//!
//! The executor does not touch trade status; the engine closes the trade
//! only after [`SwapExecutor::settle`] returns `Ok`.

use chrono::{DateTime, Utc};
use openswap_registry::RegistryBook;
use openswap_types::{Address, AssetKind, AssetRef, Result, SwapError, Trade, TradeId};

/// One directed transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Leg {
    pub asset: AssetRef,
    pub kind: AssetKind,
    pub from: Address,
    pub to: Address,
}

impl Leg {
    /// The offered leg of `trade` (lister → executor).
    #[must_use]
    pub fn offered(trade: &Trade, executor: Address) -> Self {
        Self {
            asset: trade.offered,
            kind: AssetKind::UniquelyIdentified,
            from: trade.lister,
            to: executor,
        }
    }

    /// The requested leg of `trade` (executor → lister).
    #[must_use]
    pub fn requested(trade: &Trade, executor: Address) -> Self {
        Self {
            asset: trade.requested,
            kind: trade.requested_kind,
            from: executor,
            to: trade.lister,
        }
    }
}

/// Summary of a completed swap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettledSwap {
    pub trade_id: TradeId,
    pub lister: Address,
    pub executor: Address,
    pub offered: AssetRef,
    pub requested: AssetRef,
    pub settled_at: DateTime<Utc>,
}

/// Performs the two transfers of a swap against the registries.
pub struct SwapExecutor<'a> {
    registries: &'a RegistryBook,
    /// The engine's identity in the registries.
    operator: Address,
}

impl<'a> SwapExecutor<'a> {
    #[must_use]
    pub fn new(registries: &'a RegistryBook, operator: Address) -> Self {
        Self {
            registries,
            operator,
        }
    }

    /// Execute both legs of `trade` for `executor`, all or nothing.
    ///
    /// # Errors
    /// - `TransferRejected` if a registry refuses a leg (all completed legs
    ///   were reverted)
    /// - `RollbackFailed` if a compensating revert itself failed
    pub fn settle(&self, trade: &Trade, executor: Address) -> Result<SettledSwap> {
        let legs = [Leg::offered(trade, executor), Leg::requested(trade, executor)];
        let mut completed: Vec<&Leg> = Vec::with_capacity(legs.len());

        for leg in &legs {
            if let Err(err) = self.transfer(leg) {
                tracing::warn!(
                    trade_id = %trade.id,
                    registry = %leg.asset.registry,
                    completed = completed.len(),
                    "leg failed, rolling back: {err}"
                );
                for done in completed.iter().rev() {
                    self.revert(done)?;
                }
                return Err(err);
            }
            completed.push(leg);
        }
        for leg in &legs {
            self.commit(leg);
        }

        Ok(SettledSwap {
            trade_id: trade.id,
            lister: trade.lister,
            executor,
            offered: trade.offered,
            requested: trade.requested,
            settled_at: Utc::now(),
        })
    }

    fn transfer(&self, leg: &Leg) -> Result<()> {
        tracing::debug!(
            registry = %leg.asset.registry,
            kind = %leg.kind,
            value = leg.asset.value,
            from = %leg.from,
            to = %leg.to,
            "transferring leg"
        );
        let outcome = match leg.kind {
            AssetKind::UniquelyIdentified => self
                .registries
                .unique(leg.asset.registry)?
                .transfer_from(self.operator, leg.from, leg.to, leg.asset.value),
            AssetKind::Fungible => self
                .registries
                .fungible(leg.asset.registry)?
                .transfer_from(self.operator, leg.from, leg.to, leg.asset.value),
        };
        outcome.map_err(|e| SwapError::TransferRejected {
            registry: leg.asset.registry,
            reason: e.to_string(),
        })
    }

    fn commit(&self, leg: &Leg) {
        let registry = leg.asset.registry;
        let outcome = match leg.kind {
            AssetKind::UniquelyIdentified => self
                .registries
                .unique(registry)
                .map(|r| r.commit_transfer(leg.from, leg.to, leg.asset.value)),
            AssetKind::Fungible => self
                .registries
                .fungible(registry)
                .map(|r| r.commit_transfer(leg.from, leg.to, leg.asset.value)),
        };
        if let Err(e) = outcome {
            tracing::error!(%registry, "leg settled but could not be committed: {e}");
        }
    }

    fn revert(&self, leg: &Leg) -> Result<()> {
        let outcome = match leg.kind {
            AssetKind::UniquelyIdentified => self
                .registries
                .unique(leg.asset.registry)?
                .revert_transfer(leg.from, leg.to, leg.asset.value),
            AssetKind::Fungible => self
                .registries
                .fungible(leg.asset.registry)?
                .revert_transfer(leg.from, leg.to, leg.asset.value),
        };
        outcome.map_err(|e| {
            tracing::error!(
                registry = %leg.asset.registry,
                value = leg.asset.value,
                from = %leg.from,
                to = %leg.to,
                "OS_ERR_401: rollback failed: {e}"
            );
            SwapError::RollbackFailed {
                registry: leg.asset.registry,
                reason: e.to_string(),
            }
        })
    }
}
