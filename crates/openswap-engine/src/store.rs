//! Trade store: the append-only, ID-indexed set of trades.
//!
//! The store exclusively owns every [`Trade`] and the per-lister index.
//! IDs come from a single monotonic counter that starts at
//! [`FIRST_TRADE_ID`](openswap_types::constants::FIRST_TRADE_ID); the
//! counter, the record, and the lister index are updated together in
//! [`TradeStore::insert`], so callers holding `&mut TradeStore` always see
//! all three or none.

use std::collections::{BTreeMap, HashMap};

use openswap_types::{
    Address, AssetKind, AssetRef, Result, SwapError, Trade, TradeId, TradeStatus, constants,
};

/// Append-only trade storage with a per-lister history index.
#[derive(Debug)]
pub struct TradeStore {
    /// All trades by ID. Records are never removed.
    trades: BTreeMap<TradeId, Trade>,
    /// Lister → IDs in creation order. Never pruned.
    by_lister: HashMap<Address, Vec<TradeId>>,
    /// The ID the next insert will receive.
    next_id: TradeId,
}

impl TradeStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            trades: BTreeMap::new(),
            by_lister: HashMap::new(),
            next_id: TradeId(constants::FIRST_TRADE_ID),
        }
    }

    /// Append a new OPEN trade and return its ID.
    ///
    /// Performs no validation; the engine checks inputs and the offered
    /// leg before calling this.
    pub fn insert(
        &mut self,
        lister: Address,
        offered: AssetRef,
        requested: AssetRef,
        requested_kind: AssetKind,
    ) -> TradeId {
        let id = self.next_id;
        self.next_id = id.next();
        self.trades
            .insert(id, Trade::open(id, lister, offered, requested, requested_kind));
        self.by_lister.entry(lister).or_default().push(id);
        id
    }

    /// Look up a trade. `0` and unassigned IDs are `TradeNotFound`.
    pub fn get(&self, id: TradeId) -> Result<&Trade> {
        if id.is_none() {
            return Err(SwapError::TradeNotFound(id));
        }
        self.trades.get(&id).ok_or(SwapError::TradeNotFound(id))
    }

    /// Move an OPEN trade to `target`. Returns the updated record.
    ///
    /// # Errors
    /// `TradeNotFound` for unknown IDs, `InvalidState` if the trade is not
    /// OPEN or `target` is not a terminal status.
    pub fn transition(&mut self, id: TradeId, target: TradeStatus) -> Result<&Trade> {
        if id.is_none() {
            return Err(SwapError::TradeNotFound(id));
        }
        let trade = self
            .trades
            .get_mut(&id)
            .ok_or(SwapError::TradeNotFound(id))?;
        match target {
            TradeStatus::Closed => trade.mark_closed()?,
            TradeStatus::Cancelled => trade.mark_cancelled()?,
            TradeStatus::Open => {
                return Err(SwapError::InvalidState {
                    trade_id: id,
                    status: trade.status,
                });
            }
        }
        Ok(&*trade)
    }

    /// IDs created by `lister`, in creation order. Empty if none.
    #[must_use]
    pub fn trades_by_lister(&self, lister: &Address) -> Vec<TradeId> {
        self.by_lister.get(lister).cloned().unwrap_or_default()
    }

    /// Number of trades `lister` has ever created.
    #[must_use]
    pub fn lister_count(&self, lister: &Address) -> usize {
        self.by_lister.get(lister).map_or(0, Vec::len)
    }

    /// The subset of `lister`'s trades that are still OPEN, in creation order.
    #[must_use]
    pub fn open_trades_by_lister(&self, lister: &Address) -> Vec<TradeId> {
        self.by_lister
            .get(lister)
            .map(|ids| {
                ids.iter()
                    .copied()
                    .filter(|id| self.trades.get(id).is_some_and(Trade::is_open))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The value that will be assigned to the next created trade.
    #[must_use]
    pub fn next_trade_id(&self) -> TradeId {
        self.next_id
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.trades.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }
}

impl Default for TradeStore {
    fn default() -> Self {
        Self::new()
    }
}
