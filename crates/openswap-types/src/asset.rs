//! Asset references for the two legs of a trade.
//!
//! The engine never holds assets. An [`AssetRef`] only names *where* an
//! asset lives (its registry) and *which* asset or *how much* of it.

use serde::{Deserialize, Serialize};

use crate::Address;

/// The semantics of the registry an asset lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum AssetKind {
    /// Each asset has its own identifier and a single owner.
    UniquelyIdentified,
    /// Interchangeable units tracked as balances.
    Fungible,
}

impl std::fmt::Display for AssetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UniquelyIdentified => write!(f, "UNIQUE"),
            Self::Fungible => write!(f, "FUNGIBLE"),
        }
    }
}

/// A `(registry, identifierOrAmount)` pair.
///
/// `value` is the asset identifier for [`AssetKind::UniquelyIdentified`]
/// and the quantity in base units for [`AssetKind::Fungible`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetRef {
    pub registry: Address,
    #[serde(with = "crate::serde_util::u128_str")]
    pub value: u128,
}

impl AssetRef {
    #[must_use]
    pub const fn new(registry: Address, value: u128) -> Self {
        Self { registry, value }
    }

    /// True when the registry reference is the null address.
    #[must_use]
    pub fn has_null_registry(&self) -> bool {
        self.registry.is_zero()
    }
}

impl std::fmt::Display for AssetRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.registry, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_registry_detected() {
        assert!(AssetRef::new(Address::ZERO, 1).has_null_registry());
        assert!(!AssetRef::new(Address::from_low_u8(9), 0).has_null_registry());
    }

    #[test]
    fn kind_display() {
        assert_eq!(AssetKind::UniquelyIdentified.to_string(), "UNIQUE");
        assert_eq!(AssetKind::Fungible.to_string(), "FUNGIBLE");
    }

    #[test]
    fn asset_ref_display() {
        let r = AssetRef::new(Address::from_low_u8(1), 42);
        assert!(r.to_string().ends_with("01#42"));
    }
}
