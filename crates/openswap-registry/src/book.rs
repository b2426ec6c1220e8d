//! Registry book: resolves a registry reference to its capability handle.

use std::collections::HashMap;
use std::sync::Arc;

use openswap_types::{Address, AssetKind, Result, SwapError};

use crate::capability::{AssetRegistry, FungibleAssetRegistry, UniqueAssetRegistry};

/// Maps registry addresses to the adapters the engine may call.
///
/// Resolution never falls back: a null, unknown, or wrong-kind reference
/// is an `InvalidInput` error.
#[derive(Debug, Default, Clone)]
pub struct RegistryBook {
    registries: HashMap<Address, AssetRegistry>,
}

impl RegistryBook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the adapter at `address`.
    ///
    /// # Errors
    /// Returns `InvalidInput` if `address` is the zero address.
    pub fn register(&mut self, address: Address, registry: AssetRegistry) -> Result<()> {
        if address.is_zero() {
            return Err(SwapError::InvalidInput {
                reason: "cannot register a registry at the zero address".into(),
            });
        }
        if let Some(prev) = self.registries.insert(address, registry) {
            tracing::warn!(registry = %address, kind = %prev.kind(), "registry replaced");
        }
        Ok(())
    }

    /// Builder-style [`Self::register`] for a unique registry.
    pub fn with_unique(
        mut self,
        address: Address,
        registry: Arc<dyn UniqueAssetRegistry>,
    ) -> Result<Self> {
        self.register(address, AssetRegistry::Unique(registry))?;
        Ok(self)
    }

    /// Builder-style [`Self::register`] for a fungible registry.
    pub fn with_fungible(
        mut self,
        address: Address,
        registry: Arc<dyn FungibleAssetRegistry>,
    ) -> Result<Self> {
        self.register(address, AssetRegistry::Fungible(registry))?;
        Ok(self)
    }

    #[must_use]
    pub fn get(&self, address: &Address) -> Option<&AssetRegistry> {
        self.registries.get(address)
    }

    /// Resolve `address` and check it has the expected `kind`.
    pub fn resolve(&self, address: Address, kind: AssetKind) -> Result<&AssetRegistry> {
        if address.is_zero() {
            return Err(SwapError::InvalidInput {
                reason: "registry reference is the zero address".into(),
            });
        }
        let registry = self
            .registries
            .get(&address)
            .ok_or_else(|| SwapError::InvalidInput {
                reason: format!("unknown registry {address}"),
            })?;
        if registry.kind() != kind {
            return Err(SwapError::InvalidInput {
                reason: format!(
                    "registry {address} is {}, expected {kind}",
                    registry.kind()
                ),
            });
        }
        Ok(registry)
    }

    /// Resolve a uniquely-identified registry.
    pub fn unique(&self, address: Address) -> Result<&dyn UniqueAssetRegistry> {
        match self.resolve(address, AssetKind::UniquelyIdentified)? {
            AssetRegistry::Unique(r) => Ok(r.as_ref()),
            AssetRegistry::Fungible(_) => Err(SwapError::Internal(format!(
                "registry {address} resolved to the wrong kind"
            ))),
        }
    }

    /// Resolve a fungible registry.
    pub fn fungible(&self, address: Address) -> Result<&dyn FungibleAssetRegistry> {
        match self.resolve(address, AssetKind::Fungible)? {
            AssetRegistry::Fungible(r) => Ok(r.as_ref()),
            AssetRegistry::Unique(_) => Err(SwapError::Internal(format!(
                "registry {address} resolved to the wrong kind"
            ))),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.registries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registries.is_empty()
    }
}
