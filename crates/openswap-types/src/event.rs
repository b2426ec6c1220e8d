//! Lifecycle events published for external indexers.
//!
//! Events are immutable facts emitted *after* a state change commits. The
//! engine never reads them back for control flow. Delivery is
//! at-least-once, so every event carries an [`EventId`] for de-duplication
//! and a `sequence` giving a total (and therefore per-trade) order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{Address, AssetKind, EventId, TradeId, constants};

/// What happened to the trade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SwapEventKind {
    /// A trade was created in the OPEN state.
    Listed {
        lister: Address,
        offered_registry: Address,
        #[serde(with = "crate::serde_util::u128_str")]
        offered_id: u128,
        requested_registry: Address,
        #[serde(with = "crate::serde_util::u128_str")]
        requested_id_or_amount: u128,
        requested_kind: AssetKind,
    },
    /// Both legs transferred and the trade CLOSED.
    Executed {
        lister: Address,
        executor: Address,
        offered_registry: Address,
        #[serde(with = "crate::serde_util::u128_str")]
        offered_id: u128,
        requested_registry: Address,
        #[serde(with = "crate::serde_util::u128_str")]
        requested_id_or_amount: u128,
    },
    /// The lister withdrew the trade.
    Cancelled { lister: Address },
}

impl SwapEventKind {
    /// Short upper-case label for logs.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Listed { .. } => "LISTED",
            Self::Executed { .. } => "EXECUTED",
            Self::Cancelled { .. } => "CANCELLED",
        }
    }
}

/// A single emitted lifecycle fact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapEvent {
    /// De-duplication key for at-least-once consumers.
    pub event_id: EventId,
    /// Engine-wide emission order, starting at 1.
    pub sequence: u64,
    /// The trade this event is about.
    pub trade_id: TradeId,
    /// When the event was emitted.
    pub emitted_at: DateTime<Utc>,
    /// The fact itself.
    #[serde(flatten)]
    pub kind: SwapEventKind,
}

impl SwapEvent {
    #[must_use]
    pub fn new(sequence: u64, trade_id: TradeId, kind: SwapEventKind) -> Self {
        Self {
            event_id: EventId::new(),
            sequence,
            trade_id,
            emitted_at: Utc::now(),
            kind,
        }
    }

    /// SHA-256 over the domain separator and the canonical JSON encoding.
    ///
    /// # Errors
    /// Returns `Serialization` if the event cannot be encoded.
    pub fn digest(&self) -> crate::Result<[u8; 32]> {
        let payload = serde_json::to_vec(self)?;
        let mut hasher = Sha256::new();
        hasher.update(constants::EVENT_DIGEST_DOMAIN);
        hasher.update(&payload);
        Ok(hasher.finalize().into())
    }

    /// Hex rendering of [`Self::digest`].
    pub fn digest_hex(&self) -> crate::Result<String> {
        self.digest().map(hex::encode)
    }
}

impl std::fmt::Display for SwapEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{} {} {}", self.sequence, self.kind.label(), self.trade_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cancelled(seq: u64) -> SwapEvent {
        SwapEvent::new(
            seq,
            TradeId(4),
            SwapEventKind::Cancelled {
                lister: Address::from_low_u8(1),
            },
        )
    }

    #[test]
    fn labels() {
        assert_eq!(cancelled(1).kind.label(), "CANCELLED");
        assert_eq!(format!("{}", cancelled(3)), "#3 CANCELLED trade:4");
    }

    #[test]
    fn json_is_flat_and_tagged() {
        let json = serde_json::to_value(cancelled(1)).unwrap();
        assert_eq!(json["type"], "cancelled");
        assert_eq!(json["sequence"], 1);
        assert!(json["lister"].as_str().unwrap().starts_with("0x"));
    }

    #[test]
    fn serde_roundtrip() {
        let ev = SwapEvent::new(
            2,
            TradeId(1),
            SwapEventKind::Listed {
                lister: Address::random(),
                offered_registry: Address::random(),
                offered_id: 1,
                requested_registry: Address::random(),
                requested_id_or_amount: 100,
                requested_kind: AssetKind::Fungible,
            },
        );
        let json = serde_json::to_string(&ev).unwrap();
        let back: SwapEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(ev, back);
    }

    #[test]
    fn digest_deterministic_and_distinct() {
        let a = cancelled(1);
        assert_eq!(a.digest().unwrap(), a.digest().unwrap());
        let mut b = a.clone();
        b.sequence = 2;
        assert_ne!(a.digest().unwrap(), b.digest().unwrap());
        assert_eq!(a.digest_hex().unwrap().len(), 64);
    }
}
