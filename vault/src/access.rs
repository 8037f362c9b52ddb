//! # Withdrawer Capability Set
//!
//! The set of addresses permitted to initiate withdrawals. Membership is
//! data, not behavior: the set itself enforces nothing — the [`Vault`]
//! (which owns the only instance) gates every mutation behind its
//! administrator check.
//!
//! Grant and revoke are idempotent. Granting an existing member or
//! revoking an absent one is a no-op, not an error, so administrative
//! scripts can be replayed safely.
//!
//! [`Vault`]: crate::vault::Vault

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use custodia_ledger::Address;

/// An explicit owned collection of withdrawer addresses.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct WithdrawerSet {
    members: HashSet<Address>,
}

impl WithdrawerSet {
    /// Creates an empty set. Nobody can withdraw from a fresh vault.
    pub fn new() -> Self {
        Self {
            members: HashSet::new(),
        }
    }

    /// Adds `address` to the set. Returns `true` if it was newly added,
    /// `false` if it was already a member.
    pub fn grant(&mut self, address: Address) -> bool {
        self.members.insert(address)
    }

    /// Removes `address` from the set. Returns `true` if it was a member,
    /// `false` if it was already absent.
    pub fn revoke(&mut self, address: &Address) -> bool {
        self.members.remove(address)
    }

    /// Returns `true` if `address` holds the withdrawer capability.
    pub fn contains(&self, address: &Address) -> bool {
        self.members.contains(address)
    }

    /// Returns the number of withdrawers.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` if nobody holds the capability.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Iterates over the member addresses in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &Address> {
        self.members.iter()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
