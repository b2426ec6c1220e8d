//! The trade record and its lifecycle.
//!
//! ## State Machine
//!
//! ```text
//!   ┌──────┐  execute   ┌────────┐
//!   │ OPEN ├───────────▶│ CLOSED │
//!   └──┬───┘            └────────┘
//!      │ cancel (lister only)
//!      ▼
//!   ┌───────────┐
//!   │ CANCELLED │
//!   └───────────┘
//! ```
//!
//! `Open` is the only initial state. `Closed` and `Cancelled` are terminal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Address, AssetKind, AssetRef, SwapError, TradeId};

/// Lifecycle status of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradeStatus {
    /// Listed and waiting for a counter-party.
    Open,
    /// Both legs transferred. **Terminal.**
    Closed,
    /// Withdrawn by the lister. **Terminal.**
    Cancelled,
}

impl TradeStatus {
    /// Can a trade in this status move to `target`?
    #[must_use]
    pub fn can_transition_to(&self, target: Self) -> bool {
        matches!((self, target), (Self::Open, Self::Closed | Self::Cancelled))
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Open)
    }
}

impl std::fmt::Display for TradeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "OPEN"),
            Self::Closed => write!(f, "CLOSED"),
            Self::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

/// A listed offer: the lister gives up `offered` (always uniquely
/// identified) in exchange for `requested`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    /// Sequential identifier, never `0`.
    pub id: TradeId,
    /// Creator of the trade. Immutable.
    pub lister: Address,
    /// The asset the lister is giving up.
    pub offered: AssetRef,
    /// The asset the lister wants in return.
    pub requested: AssetRef,
    /// How `requested.value` is interpreted.
    pub requested_kind: AssetKind,
    /// Current lifecycle status.
    pub status: TradeStatus,
    /// When the trade was listed. Immutable.
    pub created_at: DateTime<Utc>,
    /// When the status last changed (equals `created_at` while open).
    pub updated_at: DateTime<Utc>,
}

impl Trade {
    /// Build a freshly listed trade.
    #[must_use]
    pub fn open(
        id: TradeId,
        lister: Address,
        offered: AssetRef,
        requested: AssetRef,
        requested_kind: AssetKind,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            lister,
            offered,
            requested,
            requested_kind,
            status: TradeStatus::Open,
            created_at: now,
            updated_at: now,
        }
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status == TradeStatus::Open
    }

    /// Transition to CLOSED after both legs settled.
    ///
    /// # Errors
    /// Returns `InvalidState` if the trade is not open.
    pub fn mark_closed(&mut self) -> crate::Result<()> {
        self.transition(TradeStatus::Closed)
    }

    /// Transition to CANCELLED.
    ///
    /// # Errors
    /// Returns `InvalidState` if the trade is not open.
    pub fn mark_cancelled(&mut self) -> crate::Result<()> {
        self.transition(TradeStatus::Cancelled)
    }

    fn transition(&mut self, target: TradeStatus) -> crate::Result<()> {
        if !self.status.can_transition_to(target) {
            return Err(SwapError::InvalidState {
                trade_id: self.id,
                status: self.status,
            });
        }
        self.status = target;
        self.updated_at = Utc::now();
        Ok(())
    }
}

impl std::fmt::Display for Trade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Trade[{}] {} offers {} for {} {} ({})",
            self.id, self.lister, self.offered, self.requested_kind, self.requested, self.status,
        )
    }
}

/// Dummy trade for testing. **Never use in production.**
#[cfg(any(test, feature = "test-helpers"))]
impl Trade {
    /// An open trade offering unique asset `offered_id` for `amount` fungible
    /// units, with random registries.
    pub fn dummy_open(id: u64, lister: Address, offered_id: u128, amount: u128) -> Self {
        Self::open(
            TradeId(id),
            lister,
            AssetRef::new(Address::random(), offered_id),
            AssetRef::new(Address::random(), amount),
            AssetKind::Fungible,
        )
    }
}
