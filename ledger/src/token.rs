//! # Token Ledger
//!
//! The [`TokenLedger`] trait is the boundary the vault sees: balances,
//! allowances, and atomic transfers. Any implementation that honors the
//! trait contract — transfers either move exactly the requested amount or
//! fail leaving all state unchanged — can sit behind a vault.
//!
//! [`InMemoryLedger`] is the reference implementation: a single fungible
//! token with a balance table and an owner → spender allowance table,
//! following the familiar transfer/approve/transfer_from model. It also
//! carries a [`mint`](InMemoryLedger::mint) operation for genesis and test
//! funding; issuance policy beyond that is out of scope for this crate.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::address::Address;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur during ledger operations.
///
/// Every variant leaves the ledger exactly as it was — a failed transfer
/// never moves partial funds or consumes allowance.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The source account does not hold enough funds.
    #[error("insufficient balance: account {account} holds {available}, requested {requested}")]
    InsufficientBalance {
        /// The account being debited.
        account: Address,
        /// Its current balance.
        available: u64,
        /// The amount that was requested.
        requested: u64,
    },

    /// The spender's allowance does not cover the requested amount.
    #[error(
        "insufficient allowance: {spender} may spend {allowance} of {owner}'s funds, requested {requested}"
    )]
    InsufficientAllowance {
        /// The account whose funds were being spent.
        owner: Address,
        /// The account attempting the spend.
        spender: Address,
        /// The current approved amount.
        allowance: u64,
        /// The amount that was requested.
        requested: u64,
    },

    /// Crediting the destination would overflow `u64`.
    #[error("balance overflow: account {account} holds {current}, credit {credit}")]
    Overflow {
        /// The account being credited.
        account: Address,
        /// Its balance before the failed credit.
        current: u64,
        /// The amount that caused the overflow.
        credit: u64,
    },
}

// ---------------------------------------------------------------------------
// TokenLedger trait
// ---------------------------------------------------------------------------

/// The external balance-tracking collaborator a vault moves funds through.
///
/// # Contract
///
/// - `transfer` and `transfer_from` are all-or-nothing: on `Err`, every
///   balance and allowance is unchanged.
/// - `balance_of` and `allowance` return 0 for unknown accounts rather
///   than failing — an account with no entry simply holds nothing.
pub trait TokenLedger {
    /// The address identifying this token.
    fn token_address(&self) -> Address;

    /// Returns the balance of `account` (0 if unknown).
    fn balance_of(&self, account: &Address) -> u64;

    /// Returns how much `spender` may currently move out of `owner`'s
    /// balance (0 if never approved).
    fn allowance(&self, owner: &Address, spender: &Address) -> u64;

    /// Sets `spender`'s allowance over `owner`'s funds to exactly `amount`,
    /// replacing any prior approval.
    fn approve(&mut self, owner: &Address, spender: &Address, amount: u64);

    /// Moves `amount` from `from` to `to`.
    fn transfer(&mut self, from: &Address, to: &Address, amount: u64) -> Result<(), LedgerError>;

    /// Moves `amount` from `from` to `to` on the authority of `spender`,
    /// consuming `amount` of `spender`'s allowance on success.
    fn transfer_from(
        &mut self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: u64,
    ) -> Result<(), LedgerError>;
}

// ---------------------------------------------------------------------------
// InMemoryLedger
// ---------------------------------------------------------------------------

/// A single-token in-memory ledger.
///
/// The reference [`TokenLedger`] implementation used by the test harness
/// and by deployments that keep ledger state in process. The token address
/// is content-addressed from the token's canonical properties, so the same
/// (name, symbol, decimals) triple always yields the same address.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InMemoryLedger {
    /// Content-addressed identifier for this token.
    address: Address,
    /// Human-readable token name (e.g., "Custodia Test Token").
    name: String,
    /// Ticker symbol (e.g., "CTT").
    symbol: String,
    /// Display decimal places. The ledger itself never divides.
    decimals: u8,
    /// Current total supply in smallest units. Updated by `mint`.
    total_supply: u64,
    /// Account balances.
    balances: HashMap<Address, u64>,
    /// Allowances: owner -> (spender -> approved amount).
    allowances: HashMap<Address, HashMap<Address, u64>>,
}

impl InMemoryLedger {
    /// Creates an empty ledger for a token with the given properties.
    ///
    /// The token address is derived as
    /// `BLAKE3("token:" || name || ":" || symbol || ":" || decimals)`
    /// truncated to 20 bytes.
    pub fn new(name: &str, symbol: &str, decimals: u8) -> Self {
        let address = Address::derive(&format!("token:{}:{}:{}", name, symbol, decimals));
        Self {
            address,
            name: name.to_string(),
            symbol: symbol.to_string(),
            decimals,
            total_supply: 0,
            balances: HashMap::new(),
            allowances: HashMap::new(),
        }
    }

    /// Returns the token name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the ticker symbol.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Returns the display decimal places.
    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    /// Returns the current total supply.
    pub fn total_supply(&self) -> u64 {
        self.total_supply
    }

    /// Creates `amount` new units in `to`'s balance.
    ///
    /// Genesis/test funding facility. Returns the recipient's new balance.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Overflow`] if the recipient's balance or the
    /// total supply would exceed `u64::MAX`.
    pub fn mint(&mut self, to: &Address, amount: u64) -> Result<u64, LedgerError> {
        let current = self.balance_of(to);
        let new_balance = current.checked_add(amount).ok_or(LedgerError::Overflow {
            account: *to,
            current,
            credit: amount,
        })?;
        let new_supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(LedgerError::Overflow {
                account: *to,
                current: self.total_supply,
                credit: amount,
            })?;

        self.balances.insert(*to, new_balance);
        self.total_supply = new_supply;

        debug!(to = %to, amount, new_balance, "minted");
        Ok(new_balance)
    }
}

impl TokenLedger for InMemoryLedger {
    fn token_address(&self) -> Address {
        self.address
    }

    fn balance_of(&self, account: &Address) -> u64 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    fn allowance(&self, owner: &Address, spender: &Address) -> u64 {
        self.allowances
            .get(owner)
            .and_then(|spenders| spenders.get(spender))
            .copied()
            .unwrap_or(0)
    }

    fn approve(&mut self, owner: &Address, spender: &Address, amount: u64) {
        self.allowances
            .entry(*owner)
            .or_default()
            .insert(*spender, amount);
        debug!(owner = %owner, spender = %spender, amount, "allowance set");
    }

    fn transfer(&mut self, from: &Address, to: &Address, amount: u64) -> Result<(), LedgerError> {
        let from_balance = self.balance_of(from);
        if from_balance < amount {
            return Err(LedgerError::InsufficientBalance {
                account: *from,
                available: from_balance,
                requested: amount,
            });
        }

        // Self-transfer: funds available, nothing moves.
        if from == to {
            return Ok(());
        }

        let to_balance = self.balance_of(to);
        let new_to = to_balance.checked_add(amount).ok_or(LedgerError::Overflow {
            account: *to,
            current: to_balance,
            credit: amount,
        })?;

        // All checks passed — commit both sides.
        self.balances.insert(*from, from_balance - amount);
        self.balances.insert(*to, new_to);
        Ok(())
    }

    fn transfer_from(
        &mut self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: u64,
    ) -> Result<(), LedgerError> {
        let approved = self.allowance(from, spender);
        if approved < amount {
            return Err(LedgerError::InsufficientAllowance {
                owner: *from,
                spender: *spender,
                allowance: approved,
                requested: amount,
            });
        }

        // The transfer performs its own checks; allowance is only consumed
        // after it succeeds, keeping the whole operation all-or-nothing.
        self.transfer(from, to, amount)?;

        self.allowances
            .entry(*from)
            .or_default()
            .insert(*spender, approved - amount);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
