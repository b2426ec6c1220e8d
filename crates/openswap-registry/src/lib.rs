//! # openswap-registry
//!
//! **Ownership registries**: the external, authoritative source of who owns
//! what and who may move it.
//!
//! ## Architecture
//!
//! The engine consumes registries through a small capability set:
//! 1. **UniqueAssetRegistry**: `owner_of`, `get_approved`, `is_approved_for_all`, `transfer_from`
//! 2. **FungibleAssetRegistry**: `balance_of`, `allowance`, `transfer_from`
//! 3. **AssetRegistry**: a handle over either kind, so the state machine
//!    never hard-codes a registry implementation
//! 4. **RegistryBook**: resolves a registry address to its handle
//!
//! `InMemoryUniqueRegistry` and `InMemoryFungibleRegistry` are complete
//! reference implementations used by tests and local deployments.

pub mod book;
pub mod capability;
pub mod fungible;
pub mod unique;

pub use book::RegistryBook;
pub use capability::{AssetRegistry, FungibleAssetRegistry, UniqueAssetRegistry};
pub use fungible::InMemoryFungibleRegistry;
pub use unique::InMemoryUniqueRegistry;

/// Maximum number of revertible transfers an in-memory registry remembers.
pub const JOURNAL_CAPACITY: usize = 1024;
