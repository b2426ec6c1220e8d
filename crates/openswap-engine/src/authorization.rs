//! Authorization checker: are both legs of a swap permitted *right now*?
//!
//! Every check re-queries the registries. Nothing learned at listing time
//! is trusted at execution time: ownership can move and approvals can be
//! revoked in between.

use openswap_registry::RegistryBook;
use openswap_types::{Address, AssetKind, AssetRef, RegistryError, Result, SwapError};

/// Read-only checks of the two swap legs against the registries.
pub struct AuthorizationChecker<'a> {
    registries: &'a RegistryBook,
    /// The engine's identity in the registries.
    operator: Address,
}

impl<'a> AuthorizationChecker<'a> {
    #[must_use]
    pub fn new(registries: &'a RegistryBook, operator: Address) -> Self {
        Self {
            registries,
            operator,
        }
    }

    /// The offered (always uniquely identified) asset is owned by `lister`
    /// and the engine may move it, via either a per-asset approval or a
    /// blanket operator approval.
    ///
    /// # Errors
    /// `NotOwner`, `NotApproved`, or `InvalidInput` for a bad registry.
    pub fn validate_offered_leg(&self, offered: &AssetRef, lister: Address) -> Result<()> {
        self.validate_unique(offered, lister)
    }

    /// `executor` can currently deliver the requested asset.
    ///
    /// Unique: `executor` owns the identifier and the engine is approved.
    /// Fungible: balance and allowance to the engine both cover the amount.
    ///
    /// # Errors
    /// `NotOwner`, `NotApproved`, `InsufficientBalance`,
    /// `InsufficientAllowance`, or `InvalidInput` for a bad registry.
    pub fn validate_requested_leg(
        &self,
        requested: &AssetRef,
        kind: AssetKind,
        executor: Address,
    ) -> Result<()> {
        match kind {
            AssetKind::UniquelyIdentified => self.validate_unique(requested, executor),
            AssetKind::Fungible => self.validate_fungible(requested, executor),
        }
    }

    fn validate_unique(&self, asset: &AssetRef, holder: Address) -> Result<()> {
        let registry = self.registries.unique(asset.registry)?;
        let not_owner = |actual| SwapError::NotOwner {
            registry: asset.registry,
            asset_id: asset.value,
            expected: holder,
            actual,
        };

        let owner = match registry.owner_of(asset.value) {
            Ok(owner) => owner,
            Err(RegistryError::UnknownAsset(_)) => return Err(not_owner(None)),
            Err(e) => return Err(e.into()),
        };
        if owner != holder {
            tracing::debug!(registry = %asset.registry, asset_id = asset.value, %owner, expected = %holder, "ownership check failed");
            return Err(not_owner(Some(owner)));
        }

        let approved = registry.get_approved(asset.value)? == Some(self.operator)
            || registry.is_approved_for_all(owner, self.operator);
        if !approved {
            tracing::debug!(registry = %asset.registry, asset_id = asset.value, "approval check failed");
            return Err(SwapError::NotApproved {
                registry: asset.registry,
                asset_id: asset.value,
            });
        }
        Ok(())
    }

    fn validate_fungible(&self, asset: &AssetRef, holder: Address) -> Result<()> {
        let registry = self.registries.fungible(asset.registry)?;
        let needed = asset.value;

        let balance = registry.balance_of(holder);
        if balance < needed {
            tracing::debug!(registry = %asset.registry, needed, balance, "balance check failed");
            return Err(SwapError::InsufficientBalance {
                registry: asset.registry,
                needed,
                available: balance,
            });
        }

        let allowance = registry.allowance(holder, self.operator);
        if allowance < needed {
            tracing::debug!(registry = %asset.registry, needed, allowance, "allowance check failed");
            return Err(SwapError::InsufficientAllowance {
                registry: asset.registry,
                needed,
                available: allowance,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use openswap_registry::{InMemoryFungibleRegistry, InMemoryUniqueRegistry};

    use super::*;

    const NFT: Address = Address::from_low_u8(0xa1);
    const TOKEN: Address = Address::from_low_u8(0xb2);
    const ENGINE: Address = Address::from_low_u8(0xee);
    const ALICE: Address = Address::from_low_u8(1);
    const BOB: Address = Address::from_low_u8(2);

    fn setup() -> (RegistryBook, Arc<InMemoryUniqueRegistry>, Arc<InMemoryFungibleRegistry>) {
        let nft = Arc::new(InMemoryUniqueRegistry::new());
        let token = Arc::new(InMemoryFungibleRegistry::new());
        let book = RegistryBook::new()
            .with_unique(NFT, nft.clone())
            .unwrap()
            .with_fungible(TOKEN, token.clone())
            .unwrap();
        (book, nft, token)
    }

    #[test]
    fn offered_leg_ok_with_per_asset_approval() {
        let (book, nft, _) = setup();
        nft.mint(ALICE, 1).unwrap();
        nft.approve(ALICE, ENGINE, 1).unwrap();
        let checker = AuthorizationChecker::new(&book, ENGINE);
        checker.validate_offered_leg(&AssetRef::new(NFT, 1), ALICE).unwrap();
    }

    #[test]
    fn offered_leg_ok_with_operator_approval() {
        let (book, nft, _) = setup();
        nft.mint(ALICE, 1).unwrap();
        nft.set_approval_for_all(ALICE, ENGINE, true);
        let checker = AuthorizationChecker::new(&book, ENGINE);
        checker.validate_offered_leg(&AssetRef::new(NFT, 1), ALICE).unwrap();
    }

    #[test]
    fn offered_leg_not_owner() {
        let (book, nft, _) = setup();
        nft.mint(BOB, 1).unwrap();
        let checker = AuthorizationChecker::new(&book, ENGINE);
        let err = checker
            .validate_offered_leg(&AssetRef::new(NFT, 1), ALICE)
            .unwrap_err();
        assert!(matches!(err, SwapError::NotOwner { actual: Some(a), .. } if a == BOB));
    }

    #[test]
    fn offered_leg_unknown_asset_is_not_owner() {
        let (book, _, _) = setup();
        let checker = AuthorizationChecker::new(&book, ENGINE);
        let err = checker
            .validate_offered_leg(&AssetRef::new(NFT, 404), ALICE)
            .unwrap_err();
        assert!(matches!(err, SwapError::NotOwner { actual: None, .. }));
    }

    #[test]
    fn offered_leg_not_approved() {
        let (book, nft, _) = setup();
        nft.mint(ALICE, 1).unwrap();
        nft.approve(ALICE, BOB, 1).unwrap();
        let checker = AuthorizationChecker::new(&book, ENGINE);
        let err = checker
            .validate_offered_leg(&AssetRef::new(NFT, 1), ALICE)
            .unwrap_err();
        assert!(matches!(err, SwapError::NotApproved { asset_id: 1, .. }));
    }

    #[test]
    fn offered_leg_on_fungible_registry_is_invalid_input() {
        let (book, _, _) = setup();
        let checker = AuthorizationChecker::new(&book, ENGINE);
        let err = checker
            .validate_offered_leg(&AssetRef::new(TOKEN, 1), ALICE)
            .unwrap_err();
        assert!(matches!(err, SwapError::InvalidInput { .. }));
    }

    #[test]
    fn requested_fungible_checks_balance_then_allowance() {
        let (book, _, token) = setup();
        let checker = AuthorizationChecker::new(&book, ENGINE);
        let want = AssetRef::new(TOKEN, 100);

        token.mint(BOB, 50).unwrap();
        token.approve(BOB, ENGINE, 10);
        let err = checker
            .validate_requested_leg(&want, AssetKind::Fungible, BOB)
            .unwrap_err();
        assert!(matches!(
            err,
            SwapError::InsufficientBalance { needed: 100, available: 50, .. }
        ));

        token.mint(BOB, 50).unwrap();
        let err = checker
            .validate_requested_leg(&want, AssetKind::Fungible, BOB)
            .unwrap_err();
        assert!(matches!(
            err,
            SwapError::InsufficientAllowance { needed: 100, available: 10, .. }
        ));

        token.approve(BOB, ENGINE, 100);
        checker
            .validate_requested_leg(&want, AssetKind::Fungible, BOB)
            .unwrap();
    }

    #[test]
    fn requested_unique_leg() {
        let (book, nft, _) = setup();
        nft.mint(BOB, 2).unwrap();
        let checker = AuthorizationChecker::new(&book, ENGINE);
        let want = AssetRef::new(NFT, 2);

        let err = checker
            .validate_requested_leg(&want, AssetKind::UniquelyIdentified, BOB)
            .unwrap_err();
        assert!(matches!(err, SwapError::NotApproved { .. }));

        nft.approve(BOB, ENGINE, 2).unwrap();
        checker
            .validate_requested_leg(&want, AssetKind::UniquelyIdentified, BOB)
            .unwrap();

        let err = checker
            .validate_requested_leg(&want, AssetKind::UniquelyIdentified, ALICE)
            .unwrap_err();
        assert!(matches!(err, SwapError::NotOwner { .. }));
    }

    #[test]
    fn kind_mismatch_is_invalid_input() {
        let (book, _, _) = setup();
        let checker = AuthorizationChecker::new(&book, ENGINE);
        let err = checker
            .validate_requested_leg(&AssetRef::new(NFT, 5), AssetKind::Fungible, BOB)
            .unwrap_err();
        assert!(matches!(err, SwapError::InvalidInput { .. }));
    }
}
