//! Registry capability traits.
//!
//! The engine talks to ownership registries only through these traits. It
//! treats every answer as authoritative and caches nothing across calls.
//!
//! `revert_transfer` is the undo half of a transfer: it lets the swap
//! executor compensate a leg that already went through when the other leg
//! fails, so no partial swap is ever left behind. Adapters must accept a
//! revert for any transfer they performed within the current unit of work,
//! regardless of allowances or approvals.
//!
//! `commit_transfer` ends that unit of work. Once a transfer is committed,
//! `revert_transfer` for it must fail.

use std::sync::Arc;

use openswap_types::{Address, AssetKind, RegistryError};

/// Registry for uniquely identified assets (one owner per identifier).
pub trait UniqueAssetRegistry: Send + Sync {
    /// Current owner of `id`.
    fn owner_of(&self, id: u128) -> Result<Address, RegistryError>;

    /// The address individually approved to move `id`, if any.
    fn get_approved(&self, id: u128) -> Result<Option<Address>, RegistryError>;

    /// Whether `operator` may move every asset of `owner`.
    fn is_approved_for_all(&self, owner: Address, operator: Address) -> bool;

    /// Move `id` from `from` to `to`, acting as `operator`.
    fn transfer_from(
        &self,
        operator: Address,
        from: Address,
        to: Address,
        id: u128,
    ) -> Result<(), RegistryError>;

    /// Undo a `transfer_from(_, from, to, id)` performed in the current unit
    /// of work, returning `id` to `from`.
    fn revert_transfer(&self, from: Address, to: Address, id: u128) -> Result<(), RegistryError>;

    /// Make a `transfer_from(_, from, to, id)` final. It can no longer be
    /// reverted.
    fn commit_transfer(&self, from: Address, to: Address, id: u128);
}

/// Registry for fungible assets (balances and spend allowances).
pub trait FungibleAssetRegistry: Send + Sync {
    fn balance_of(&self, owner: Address) -> u128;

    /// How much `spender` may still move out of `owner`'s balance.
    fn allowance(&self, owner: Address, spender: Address) -> u128;

    /// Move `amount` from `from` to `to`, spending `spender`'s allowance.
    fn transfer_from(
        &self,
        spender: Address,
        from: Address,
        to: Address,
        amount: u128,
    ) -> Result<(), RegistryError>;

    /// Undo a `transfer_from(_, from, to, amount)` performed in the current
    /// unit of work, restoring balances and the consumed allowance.
    fn revert_transfer(
        &self,
        from: Address,
        to: Address,
        amount: u128,
    ) -> Result<(), RegistryError>;

    /// Make a `transfer_from(_, from, to, amount)` final. It can no longer
    /// be reverted.
    fn commit_transfer(&self, from: Address, to: Address, amount: u128);
}

/// A registry handle, polymorphic over the two supported kinds.
#[derive(Clone)]
pub enum AssetRegistry {
    Unique(Arc<dyn UniqueAssetRegistry>),
    Fungible(Arc<dyn FungibleAssetRegistry>),
}

impl AssetRegistry {
    #[must_use]
    pub fn kind(&self) -> AssetKind {
        match self {
            Self::Unique(_) => AssetKind::UniquelyIdentified,
            Self::Fungible(_) => AssetKind::Fungible,
        }
    }
}

impl std::fmt::Debug for AssetRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AssetRegistry({})", self.kind())
    }
}
