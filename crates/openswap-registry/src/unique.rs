//! In-memory registry for uniquely identified assets.
//!
//! Follows the usual non-fungible semantics: one owner per identifier,
//! an optional per-asset approved address that is cleared on every
//! transfer, and blanket operator approvals per owner.

use std::collections::{HashMap, HashSet, VecDeque};

use openswap_types::{Address, RegistryError};
use parking_lot::RwLock;

use crate::capability::UniqueAssetRegistry;
use crate::JOURNAL_CAPACITY;

#[derive(Debug, Clone, Copy)]
struct JournalEntry {
    from: Address,
    to: Address,
    id: u128,
    /// Per-asset approval cleared by the transfer.
    cleared_approval: Option<Address>,
}

#[derive(Debug, Default)]
struct State {
    owners: HashMap<u128, Address>,
    approvals: HashMap<u128, Address>,
    /// `(owner, operator)` pairs with blanket approval.
    operators: HashSet<(Address, Address)>,
    /// Recent operator transfers, newest at the back, for `revert_transfer`.
    journal: VecDeque<JournalEntry>,
}

/// Thread-safe in-memory unique-asset registry.
#[derive(Debug, Default)]
pub struct InMemoryUniqueRegistry {
    state: RwLock<State>,
}

impl InMemoryUniqueRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create asset `id` owned by `to`.
    pub fn mint(&self, to: Address, id: u128) -> Result<(), RegistryError> {
        if to.is_zero() {
            return Err(RegistryError::Rejected {
                reason: "mint to the zero address".into(),
            });
        }
        let mut st = self.state.write();
        if st.owners.contains_key(&id) {
            return Err(RegistryError::Rejected {
                reason: format!("asset {id} already minted"),
            });
        }
        st.owners.insert(id, to);
        Ok(())
    }

    /// Approve `spender` to move `id`. `caller` must be the owner or one of
    /// the owner's blanket operators. Passing `Address::ZERO` clears it.
    pub fn approve(&self, caller: Address, spender: Address, id: u128) -> Result<(), RegistryError> {
        let mut st = self.state.write();
        let owner = *st.owners.get(&id).ok_or(RegistryError::UnknownAsset(id))?;
        if caller != owner && !st.operators.contains(&(owner, caller)) {
            return Err(RegistryError::Unauthorized { operator: caller });
        }
        if spender.is_zero() {
            st.approvals.remove(&id);
        } else {
            st.approvals.insert(id, spender);
        }
        Ok(())
    }

    /// Clear the per-asset approval on `id`.
    pub fn revoke(&self, caller: Address, id: u128) -> Result<(), RegistryError> {
        self.approve(caller, Address::ZERO, id)
    }

    /// Grant or revoke blanket approval of `operator` over all of `owner`'s
    /// assets.
    pub fn set_approval_for_all(&self, owner: Address, operator: Address, approved: bool) {
        let mut st = self.state.write();
        if approved {
            st.operators.insert((owner, operator));
        } else {
            st.operators.remove(&(owner, operator));
        }
    }

    /// Owner-initiated transfer. Not journaled and not revertible.
    pub fn transfer(&self, caller: Address, to: Address, id: u128) -> Result<(), RegistryError> {
        if to.is_zero() {
            return Err(RegistryError::Rejected {
                reason: "transfer to the zero address".into(),
            });
        }
        let mut st = self.state.write();
        let owner = *st.owners.get(&id).ok_or(RegistryError::UnknownAsset(id))?;
        if owner != caller {
            return Err(RegistryError::Unauthorized { operator: caller });
        }
        st.approvals.remove(&id);
        st.owners.insert(id, to);
        Ok(())
    }

    /// Number of journaled (revertible) transfers.
    #[must_use]
    pub fn journal_len(&self) -> usize {
        self.state.read().journal.len()
    }
}

impl UniqueAssetRegistry for InMemoryUniqueRegistry {
    fn owner_of(&self, id: u128) -> Result<Address, RegistryError> {
        self.state
            .read()
            .owners
            .get(&id)
            .copied()
            .ok_or(RegistryError::UnknownAsset(id))
    }

    fn get_approved(&self, id: u128) -> Result<Option<Address>, RegistryError> {
        let st = self.state.read();
        if !st.owners.contains_key(&id) {
            return Err(RegistryError::UnknownAsset(id));
        }
        Ok(st.approvals.get(&id).copied())
    }

    fn is_approved_for_all(&self, owner: Address, operator: Address) -> bool {
        self.state.read().operators.contains(&(owner, operator))
    }

    fn transfer_from(
        &self,
        operator: Address,
        from: Address,
        to: Address,
        id: u128,
    ) -> Result<(), RegistryError> {
        if to.is_zero() {
            return Err(RegistryError::Rejected {
                reason: "transfer to the zero address".into(),
            });
        }
        let mut st = self.state.write();
        let owner = *st.owners.get(&id).ok_or(RegistryError::UnknownAsset(id))?;
        if owner != from {
            return Err(RegistryError::Rejected {
                reason: format!("asset {id} is not owned by {from}"),
            });
        }
        let approved = st.approvals.get(&id).copied();
        let authorized = operator == owner
            || approved == Some(operator)
            || st.operators.contains(&(owner, operator));
        if !authorized {
            return Err(RegistryError::Unauthorized { operator });
        }

        st.approvals.remove(&id);
        st.owners.insert(id, to);

        if st.journal.len() >= JOURNAL_CAPACITY {
            st.journal.pop_front();
        }
        st.journal.push_back(JournalEntry {
            from,
            to,
            id,
            cleared_approval: approved,
        });
        Ok(())
    }

    fn revert_transfer(&self, from: Address, to: Address, id: u128) -> Result<(), RegistryError> {
        let mut st = self.state.write();
        let pos = st
            .journal
            .iter()
            .rposition(|e| e.from == from && e.to == to && e.id == id)
            .ok_or_else(|| RegistryError::Rejected {
                reason: format!("no journaled transfer of {id} from {from} to {to}"),
            })?;
        if st.owners.get(&id) != Some(&to) {
            return Err(RegistryError::Rejected {
                reason: format!("asset {id} moved on since the transfer"),
            });
        }
        let entry = st.journal.remove(pos).ok_or_else(|| RegistryError::Rejected {
            reason: "journal entry vanished".into(),
        })?;
        st.owners.insert(id, from);
        if let Some(prev) = entry.cleared_approval {
            st.approvals.insert(id, prev);
        }
        Ok(())
    }

    fn commit_transfer(&self, from: Address, to: Address, id: u128) {
        let mut st = self.state.write();
        if let Some(pos) = st
            .journal
            .iter()
            .rposition(|e| e.from == from && e.to == to && e.id == id)
        {
            st.journal.remove(pos);
        }
    }
}
