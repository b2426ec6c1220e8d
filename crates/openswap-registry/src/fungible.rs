//! In-memory registry for fungible assets.
//!
//! Balances and spend allowances per `(owner, spender)`. Every mutation is
//! atomic: either the full operation succeeds or nothing changes.

use std::collections::{HashMap, VecDeque};

use openswap_types::{Address, RegistryError};
use parking_lot::RwLock;

use crate::capability::FungibleAssetRegistry;
use crate::JOURNAL_CAPACITY;

#[derive(Debug, Clone, Copy)]
struct JournalEntry {
    spender: Address,
    from: Address,
    to: Address,
    amount: u128,
}

#[derive(Debug, Default)]
struct State {
    balances: HashMap<Address, u128>,
    allowances: HashMap<(Address, Address), u128>,
    journal: VecDeque<JournalEntry>,
}

impl State {
    fn balance(&self, owner: Address) -> u128 {
        self.balances.get(&owner).copied().unwrap_or(0)
    }

    /// Move `amount` between balances, checking both sides before touching
    /// either.
    fn move_balance(&mut self, from: Address, to: Address, amount: u128) -> Result<(), RegistryError> {
        let available = self.balance(from);
        if available < amount {
            return Err(RegistryError::InsufficientFunds {
                needed: amount,
                available,
            });
        }
        if from != to {
            let credited = self
                .balance(to)
                .checked_add(amount)
                .ok_or_else(|| RegistryError::Rejected {
                    reason: format!("balance overflow for {to}"),
                })?;
            self.balances.insert(from, available - amount);
            self.balances.insert(to, credited);
        }
        Ok(())
    }
}

/// Thread-safe in-memory fungible-asset registry.
#[derive(Debug, Default)]
pub struct InMemoryFungibleRegistry {
    state: RwLock<State>,
}

impl InMemoryFungibleRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit `amount` new units to `to`.
    pub fn mint(&self, to: Address, amount: u128) -> Result<(), RegistryError> {
        let mut st = self.state.write();
        let credited = st
            .balance(to)
            .checked_add(amount)
            .ok_or_else(|| RegistryError::Rejected {
                reason: format!("balance overflow for {to}"),
            })?;
        st.balances.insert(to, credited);
        Ok(())
    }

    /// Set (not add to) the allowance `owner` grants `spender`.
    pub fn approve(&self, owner: Address, spender: Address, amount: u128) {
        let mut st = self.state.write();
        if amount == 0 {
            st.allowances.remove(&(owner, spender));
        } else {
            st.allowances.insert((owner, spender), amount);
        }
    }

    /// Owner-initiated transfer. Not journaled and not revertible.
    pub fn transfer(&self, from: Address, to: Address, amount: u128) -> Result<(), RegistryError> {
        self.state.write().move_balance(from, to, amount)
    }

    /// Sum of all balances.
    #[must_use]
    pub fn total_supply(&self) -> u128 {
        self.state.read().balances.values().sum()
    }

    /// Number of journaled (revertible) transfers.
    #[must_use]
    pub fn journal_len(&self) -> usize {
        self.state.read().journal.len()
    }
}

impl FungibleAssetRegistry for InMemoryFungibleRegistry {
    fn balance_of(&self, owner: Address) -> u128 {
        self.state.read().balance(owner)
    }

    fn allowance(&self, owner: Address, spender: Address) -> u128 {
        self.state
            .read()
            .allowances
            .get(&(owner, spender))
            .copied()
            .unwrap_or(0)
    }

    fn transfer_from(
        &self,
        spender: Address,
        from: Address,
        to: Address,
        amount: u128,
    ) -> Result<(), RegistryError> {
        if to.is_zero() {
            return Err(RegistryError::Rejected {
                reason: "transfer to the zero address".into(),
            });
        }
        let mut st = self.state.write();
        let allowed = st.allowances.get(&(from, spender)).copied().unwrap_or(0);
        if spender != from && allowed < amount {
            return Err(RegistryError::Unauthorized { operator: spender });
        }
        st.move_balance(from, to, amount)?;
        if spender != from {
            st.allowances.insert((from, spender), allowed - amount);
        }

        if st.journal.len() >= JOURNAL_CAPACITY {
            st.journal.pop_front();
        }
        st.journal.push_back(JournalEntry {
            spender,
            from,
            to,
            amount,
        });
        Ok(())
    }

    fn revert_transfer(&self, from: Address, to: Address, amount: u128) -> Result<(), RegistryError> {
        let mut st = self.state.write();
        let pos = st
            .journal
            .iter()
            .rposition(|e| e.from == from && e.to == to && e.amount == amount)
            .ok_or_else(|| RegistryError::Rejected {
                reason: format!("no journaled transfer of {amount} from {from} to {to}"),
            })?;
        st.move_balance(to, from, amount)?;
        let entry = st.journal.remove(pos).ok_or_else(|| RegistryError::Rejected {
            reason: "journal entry vanished".into(),
        })?;
        if entry.spender != entry.from {
            let restored = st
                .allowances
                .get(&(entry.from, entry.spender))
                .copied()
                .unwrap_or(0)
                .saturating_add(amount);
            st.allowances.insert((entry.from, entry.spender), restored);
        }
        Ok(())
    }

    fn commit_transfer(&self, from: Address, to: Address, amount: u128) {
        let mut st = self.state.write();
        if let Some(pos) = st
            .journal
            .iter()
            .rposition(|e| e.from == from && e.to == to && e.amount == amount)
        {
            st.journal.remove(pos);
        }
    }
}
