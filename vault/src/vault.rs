//! # The Vault
//!
//! A custodial account on a token ledger, governed by one administrator
//! and drained only by holders of the withdrawer capability. The lifecycle
//! is:
//!
//! 1. **Deploy** — the deployer becomes the administrator; every gate
//!    starts closed and no token is bound.
//! 2. **Configure** — the administrator binds the token, grants withdrawer
//!    capabilities, enables withdrawals, and sets the per-call ceiling.
//! 3. **Operate** — anyone deposits (after approving the vault on the
//!    ledger); withdrawers direct pooled funds to any destination, subject
//!    to the enable switch and the ceiling.
//!
//! There is no teardown. A vault, once deployed, operates indefinitely.
//!
//! ## Security Model
//!
//! - **Administrator gating**: every configuration mutation requires
//!   `caller == administrator`. Administration is exclusive and moves only
//!   through [`transfer_administration`](Vault::transfer_administration).
//! - **Withdrawer gating**: `withdraw` requires membership in the
//!   [`WithdrawerSet`]. The capability authorizes *directing* funds — the
//!   destination is the caller's choice and need not be the caller.
//! - **No shadow ledger**: the vault's pooled balance is whatever the
//!   token ledger says it is. Deposits and withdrawals mutate the ledger,
//!   never a counter inside the vault.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use custodia_ledger::{Address, LedgerError, TokenLedger};

use crate::access::WithdrawerSet;
use crate::config::VaultConfig;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur during vault operations.
///
/// Every variant is an atomic rejection: vault state and ledger balances
/// are exactly as they were before the failing call.
#[derive(Debug, Error)]
pub enum VaultError {
    /// The caller lacks the capability the operation requires.
    #[error("unauthorized: {caller} lacks the {required} capability")]
    Unauthorized {
        /// Who attempted the call.
        caller: Address,
        /// The capability that was required ("administrator" or "withdrawer").
        required: &'static str,
    },

    /// The vault is not bound to the token ledger this operation targets.
    #[error("vault is not bound to this token ledger")]
    Unconfigured,

    /// The global withdrawal switch is off.
    #[error("withdrawals are disabled")]
    WithdrawalsDisabled,

    /// The requested amount exceeds the per-call ceiling.
    #[error("exceeds withdrawal limit: requested {amount}, ceiling {max}")]
    ExceedsLimit {
        /// The amount that was requested.
        amount: u64,
        /// The current per-call ceiling.
        max: u64,
    },

    /// Zero-amount deposits are a no-op and likely a caller bug.
    #[error("zero-amount deposits are not permitted")]
    ZeroAmount,

    /// The underlying ledger transfer was rejected (insufficient balance
    /// or insufficient authorization).
    #[error("transfer failed: {0}")]
    Transfer(#[from] LedgerError),
}

// ---------------------------------------------------------------------------
// Vault
// ---------------------------------------------------------------------------

/// A custodial vault pooling one fungible token.
///
/// The vault holds funds under its own [`Address`] on the bound token
/// ledger. Depositor identity is not recorded — funds are pooled fungibly,
/// and any withdrawer may move any pooled funds to any destination. That
/// is a deliberate trust assumption of the design, not an oversight.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Vault {
    /// The vault's own account on the token ledger.
    address: Address,

    /// The identity permitted to mutate configuration. Exclusive.
    administrator: Address,

    /// The bound token, or `None` while unconfigured. Deposits and
    /// withdrawals are rejected until a token is bound.
    token: Option<Address>,

    /// Addresses holding the withdrawer capability.
    withdrawers: WithdrawerSet,

    /// Global withdrawal switch. While `false`, withdrawals fail
    /// regardless of capability.
    withdraw_enabled: bool,

    /// Ceiling on the amount movable by a single withdraw call.
    max_withdraw_amount: u64,

    /// Timestamp when the vault was deployed.
    created_at: DateTime<Utc>,

    /// Timestamp of the most recent configuration change.
    updated_at: DateTime<Utc>,
}

impl Vault {
    /// Deploys a vault with fully closed gates.
    ///
    /// The deployer becomes the administrator. No token is bound, the
    /// withdrawer set is empty, withdrawals are disabled, and the ceiling
    /// is zero.
    pub fn deploy(administrator: Address) -> Self {
        Self::deploy_with_config(administrator, VaultConfig::default())
    }

    /// Deploys a vault with explicit initial gate settings.
    ///
    /// The vault's own address is derived from a fresh UUID, so every
    /// deployment gets a distinct account on the ledger.
    pub fn deploy_with_config(administrator: Address, config: VaultConfig) -> Self {
        let now = Utc::now();
        let address = Address::derive(&format!("custodia:vault:{}", Uuid::new_v4()));
        info!(vault = %address, administrator = %administrator, "vault deployed");
        Self {
            address,
            administrator,
            token: None,
            withdrawers: WithdrawerSet::new(),
            withdraw_enabled: config.withdraw_enabled,
            max_withdraw_amount: config.max_withdraw_amount,
            created_at: now,
            updated_at: now,
        }
    }

    // -----------------------------------------------------------------------
    // Read-only queries
    // -----------------------------------------------------------------------

    /// The vault's own account address on the ledger.
    pub fn address(&self) -> Address {
        self.address
    }

    /// The current administrator.
    pub fn administrator(&self) -> Address {
        self.administrator
    }

    /// The bound token, or `None` while unconfigured.
    pub fn token(&self) -> Option<Address> {
        self.token
    }

    /// Returns `true` if `address` holds the withdrawer capability.
    pub fn has_withdrawer(&self, address: &Address) -> bool {
        self.withdrawers.contains(address)
    }

    /// The number of addresses holding the withdrawer capability.
    pub fn withdrawer_count(&self) -> usize {
        self.withdrawers.len()
    }

    /// The global withdrawal switch.
    pub fn withdraw_enabled(&self) -> bool {
        self.withdraw_enabled
    }

    /// The per-call withdrawal ceiling.
    pub fn max_withdraw_amount(&self) -> u64 {
        self.max_withdraw_amount
    }

    /// When the vault was deployed.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// The vault's pooled balance as the ledger sees it.
    ///
    /// This is the only balance there is — the vault keeps no counter of
    /// its own.
    pub fn pooled_balance(&self, ledger: &impl TokenLedger) -> u64 {
        ledger.balance_of(&self.address)
    }

    // -----------------------------------------------------------------------
    // Administration
    // -----------------------------------------------------------------------

    /// Binds the vault to a token ledger.
    ///
    /// Must be called before any deposit or withdraw traffic. Rebinding is
    /// permitted but logged loudly: balance pooled under the previous
    /// token stays on that ledger, unreachable through this vault.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Unauthorized`] unless the caller is the
    /// administrator.
    pub fn set_token(&mut self, caller: &Address, token: Address) -> Result<(), VaultError> {
        self.require_administrator(caller)?;

        if let Some(previous) = self.token {
            if previous != token {
                warn!(
                    vault = %self.address,
                    previous = %previous,
                    new = %token,
                    "rebinding token; funds pooled under the previous token are orphaned"
                );
            }
        }

        self.token = Some(token);
        self.updated_at = Utc::now();
        debug!(vault = %self.address, token = %token, "token bound");
        Ok(())
    }

    /// Hands exclusive administration to `new_administrator`.
    ///
    /// The caller immediately loses all administrative authority. The new
    /// administrator does not gain the withdrawer capability — that must
    /// be granted separately if wanted.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Unauthorized`] unless the caller is the
    /// current administrator.
    pub fn transfer_administration(
        &mut self,
        caller: &Address,
        new_administrator: Address,
    ) -> Result<(), VaultError> {
        self.require_administrator(caller)?;
        info!(
            vault = %self.address,
            from = %self.administrator,
            to = %new_administrator,
            "administration transferred"
        );
        self.administrator = new_administrator;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Grants the withdrawer capability to `address`.
    ///
    /// Idempotent: granting an existing withdrawer is a no-op, not an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Unauthorized`] unless the caller is the
    /// administrator.
    pub fn grant_withdrawer(&mut self, caller: &Address, address: Address) -> Result<(), VaultError> {
        self.require_administrator(caller)?;
        let newly_added = self.withdrawers.grant(address);
        self.updated_at = Utc::now();
        info!(vault = %self.address, withdrawer = %address, newly_added, "withdrawer granted");
        Ok(())
    }

    /// Revokes the withdrawer capability from `address`.
    ///
    /// Idempotent: revoking an absent address is a no-op, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Unauthorized`] unless the caller is the
    /// administrator.
    pub fn revoke_withdrawer(
        &mut self,
        caller: &Address,
        address: &Address,
    ) -> Result<(), VaultError> {
        self.require_administrator(caller)?;
        let was_member = self.withdrawers.revoke(address);
        self.updated_at = Utc::now();
        info!(vault = %self.address, withdrawer = %address, was_member, "withdrawer revoked");
        Ok(())
    }

    /// Flips the global withdrawal switch. Effective immediately for
    /// subsequent calls — no grace period, no pending-withdrawal drain.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Unauthorized`] unless the caller is the
    /// administrator.
    pub fn set_withdraw_enable(&mut self, caller: &Address, enabled: bool) -> Result<(), VaultError> {
        self.require_administrator(caller)?;
        self.withdraw_enabled = enabled;
        self.updated_at = Utc::now();
        info!(vault = %self.address, enabled, "withdrawal switch set");
        Ok(())
    }

    /// Replaces the per-call withdrawal ceiling atomically.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Unauthorized`] unless the caller is the
    /// administrator.
    pub fn set_max_withdraw_amount(&mut self, caller: &Address, max: u64) -> Result<(), VaultError> {
        self.require_administrator(caller)?;
        self.max_withdraw_amount = max;
        self.updated_at = Utc::now();
        info!(vault = %self.address, max, "withdrawal ceiling set");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Deposit / Withdraw
    // -----------------------------------------------------------------------

    /// Deposits `amount` of the depositor's funds into the pool.
    ///
    /// Callable by anyone, no capability required. The depositor must have
    /// approved the vault for at least `amount` on the ledger beforehand —
    /// the ledger enforces that, not the vault. Returns the new pooled
    /// balance.
    ///
    /// Depositor identity is not recorded; the pool is fungible.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Unconfigured`] if no token is bound or the
    /// given ledger is not the bound token.
    /// Returns [`VaultError::ZeroAmount`] if `amount` is 0.
    /// Returns [`VaultError::Transfer`] if the ledger rejects the move
    /// (insufficient balance or allowance); nothing changes in that case.
    pub fn deposit(
        &self,
        ledger: &mut impl TokenLedger,
        depositor: &Address,
        amount: u64,
    ) -> Result<u64, VaultError> {
        self.require_bound(ledger)?;

        if amount == 0 {
            return Err(VaultError::ZeroAmount);
        }

        // The vault spends the depositor's pre-approved allowance to pull
        // funds into its own account. All-or-nothing per the trait contract.
        ledger.transfer_from(&self.address, depositor, &self.address, amount)?;

        let pooled = ledger.balance_of(&self.address);
        info!(
            vault = %self.address,
            depositor = %depositor,
            amount,
            pooled,
            "deposit accepted"
        );
        Ok(pooled)
    }

    /// Withdraws `amount` from the pool directly to `destination`.
    ///
    /// Callable only by a holder of the withdrawer capability. The funds
    /// go to `destination`, not to the caller — the capability authorizes
    /// directing funds, nothing more. Returns the remaining pooled
    /// balance.
    ///
    /// # Errors
    ///
    /// Checked in order, each an independent failure mode:
    ///
    /// 1. [`VaultError::Unauthorized`] — caller is not a withdrawer.
    /// 2. [`VaultError::WithdrawalsDisabled`] — the global switch is off.
    /// 3. [`VaultError::ExceedsLimit`] — `amount` is above the ceiling.
    /// 4. [`VaultError::Unconfigured`] — no token bound, or wrong ledger.
    /// 5. [`VaultError::Transfer`] — the pool holds less than `amount`.
    ///
    /// Any failure leaves vault and ledger state unchanged.
    pub fn withdraw(
        &self,
        ledger: &mut impl TokenLedger,
        caller: &Address,
        amount: u64,
        destination: &Address,
    ) -> Result<u64, VaultError> {
        if !self.withdrawers.contains(caller) {
            return Err(VaultError::Unauthorized {
                caller: *caller,
                required: "withdrawer",
            });
        }

        if !self.withdraw_enabled {
            return Err(VaultError::WithdrawalsDisabled);
        }

        if amount > self.max_withdraw_amount {
            return Err(VaultError::ExceedsLimit {
                amount,
                max: self.max_withdraw_amount,
            });
        }

        self.require_bound(ledger)?;

        ledger.transfer(&self.address, destination, amount)?;

        let pooled = ledger.balance_of(&self.address);
        info!(
            vault = %self.address,
            caller = %caller,
            destination = %destination,
            amount,
            pooled,
            "withdrawal executed"
        );
        Ok(pooled)
    }

    // -----------------------------------------------------------------------
    // Internal Helpers
    // -----------------------------------------------------------------------

    /// Validates that the caller is the administrator.
    fn require_administrator(&self, caller: &Address) -> Result<(), VaultError> {
        if *caller != self.administrator {
            return Err(VaultError::Unauthorized {
                caller: *caller,
                required: "administrator",
            });
        }
        Ok(())
    }

    /// Validates that a token is bound and that `ledger` is that token.
    fn require_bound(&self, ledger: &impl TokenLedger) -> Result<(), VaultError> {
        match self.token {
            Some(token) if token == ledger.token_address() => Ok(()),
            _ => Err(VaultError::Unconfigured),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use custodia_ledger::InMemoryLedger;

    fn addr(label: &str) -> Address {
        Address::derive(label)
    }

    fn admin() -> Address {
        addr("admin")
    }

    /// A vault bound to a fresh ledger, with Alice funded and approved.
    fn bound_vault() -> (Vault, InMemoryLedger) {
        let mut ledger = InMemoryLedger::new("Custodia Test Token", "CTT", 8);
        let mut vault = Vault::deploy(admin());
        vault.set_token(&admin(), ledger.token_address()).unwrap();

        ledger.mint(&addr("alice"), 1_000_000).unwrap();
        ledger.approve(&addr("alice"), &vault.address(), u64::MAX);
        (vault, ledger)
    }

    #[test]
    fn deploy_starts_fully_closed() {
        let vault = Vault::deploy(admin());
        assert_eq!(vault.administrator(), admin());
        assert_eq!(vault.token(), None);
        assert_eq!(vault.withdrawer_count(), 0);
        assert!(!vault.withdraw_enabled());
        assert_eq!(vault.max_withdraw_amount(), 0);
    }

    #[test]
    fn deployments_get_distinct_addresses() {
        let a = Vault::deploy(admin());
        let b = Vault::deploy(admin());
        assert_ne!(a.address(), b.address());
    }

    #[test]
    fn deploy_with_config_applies_gates() {
        let vault = Vault::deploy_with_config(
            admin(),
            VaultConfig {
                withdraw_enabled: true,
                max_withdraw_amount: 500,
            },
        );
        assert!(vault.withdraw_enabled());
        assert_eq!(vault.max_withdraw_amount(), 500);
    }

    #[test]
    fn administrator_is_not_implicitly_a_withdrawer() {
        let vault = Vault::deploy(admin());
        assert!(!vault.has_withdrawer(&admin()));
    }

    // -- administrator gating ----------------------------------------------

    #[test]
    fn non_admin_configuration_rejected() {
        let mut vault = Vault::deploy(admin());
        let mallory = addr("mallory");
        let token = addr("some-token");

        assert!(matches!(
            vault.set_token(&mallory, token),
            Err(VaultError::Unauthorized { .. })
        ));
        assert!(matches!(
            vault.grant_withdrawer(&mallory, mallory),
            Err(VaultError::Unauthorized { .. })
        ));
        assert!(matches!(
            vault.revoke_withdrawer(&mallory, &mallory),
            Err(VaultError::Unauthorized { .. })
        ));
        assert!(matches!(
            vault.set_withdraw_enable(&mallory, true),
            Err(VaultError::Unauthorized { .. })
        ));
        assert!(matches!(
            vault.set_max_withdraw_amount(&mallory, 1),
            Err(VaultError::Unauthorized { .. })
        ));
        assert!(matches!(
            vault.transfer_administration(&mallory, mallory),
            Err(VaultError::Unauthorized { .. })
        ));

        // Nothing mutated.
        assert_eq!(vault.token(), None);
        assert_eq!(vault.withdrawer_count(), 0);
        assert!(!vault.withdraw_enabled());
        assert_eq!(vault.max_withdraw_amount(), 0);
        assert_eq!(vault.administrator(), admin());
    }

    #[test]
    fn grant_and_revoke_are_idempotent() {
        let mut vault = Vault::deploy(admin());
        let bob = addr("bob");

        vault.grant_withdrawer(&admin(), bob).unwrap();
        vault.grant_withdrawer(&admin(), bob).unwrap();
        assert_eq!(vault.withdrawer_count(), 1);
        assert!(vault.has_withdrawer(&bob));

        vault.revoke_withdrawer(&admin(), &bob).unwrap();
        vault.revoke_withdrawer(&admin(), &bob).unwrap();
        assert_eq!(vault.withdrawer_count(), 0);
        assert!(!vault.has_withdrawer(&bob));
    }

    #[test]
    fn transfer_administration_hands_over_exclusively() {
        let mut vault = Vault::deploy(admin());
        let successor = addr("successor");

        vault.transfer_administration(&admin(), successor).unwrap();
        assert_eq!(vault.administrator(), successor);

        // The old administrator is out.
        assert!(matches!(
            vault.set_withdraw_enable(&admin(), true),
            Err(VaultError::Unauthorized { .. })
        ));
        // The new one is in, but holds no withdrawer capability.
        vault.set_withdraw_enable(&successor, true).unwrap();
        assert!(!vault.has_withdrawer(&successor));
    }

    #[test]
    fn rebinding_token_is_permitted() {
        let mut vault = Vault::deploy(admin());
        let first = addr("token-a");
        let second = addr("token-b");

        vault.set_token(&admin(), first).unwrap();
        vault.set_token(&admin(), second).unwrap();
        assert_eq!(vault.token(), Some(second));
    }

    // -- deposit ------------------------------------------------------------

    #[test]
    fn deposit_before_binding_rejected() {
        let mut ledger = InMemoryLedger::new("Custodia Test Token", "CTT", 8);
        let vault = Vault::deploy(admin());
        ledger.mint(&addr("alice"), 1000).unwrap();

        let result = vault.deposit(&mut ledger, &addr("alice"), 100);
        assert!(matches!(result, Err(VaultError::Unconfigured)));
        assert_eq!(ledger.balance_of(&addr("alice")), 1000);
    }

    #[test]
    fn deposit_against_wrong_ledger_rejected() {
        let (vault, _ledger) = bound_vault();
        let mut other = InMemoryLedger::new("Impostor", "IMP", 8);
        other.mint(&addr("alice"), 1000).unwrap();
        other.approve(&addr("alice"), &vault.address(), u64::MAX);

        let result = vault.deposit(&mut other, &addr("alice"), 100);
        assert!(matches!(result, Err(VaultError::Unconfigured)));
        assert_eq!(other.balance_of(&addr("alice")), 1000);
    }

    #[test]
    fn deposit_zero_rejected() {
        let (vault, mut ledger) = bound_vault();
        let result = vault.deposit(&mut ledger, &addr("alice"), 0);
        assert!(matches!(result, Err(VaultError::ZeroAmount)));
    }

    #[test]
    fn deposit_pools_funds() {
        let (vault, mut ledger) = bound_vault();
        let pooled = vault.deposit(&mut ledger, &addr("alice"), 50_000).unwrap();
        assert_eq!(pooled, 50_000);
        assert_eq!(vault.pooled_balance(&ledger), 50_000);
        assert_eq!(ledger.balance_of(&addr("alice")), 950_000);
    }

    #[test]
    fn deposit_without_approval_fails_atomically() {
        let (vault, mut ledger) = bound_vault();
        // Bob holds funds but never approved the vault.
        ledger.mint(&addr("bob"), 1000).unwrap();

        let result = vault.deposit(&mut ledger, &addr("bob"), 500);
        assert!(matches!(
            result,
            Err(VaultError::Transfer(LedgerError::InsufficientAllowance { .. }))
        ));
        assert_eq!(ledger.balance_of(&addr("bob")), 1000);
        assert_eq!(vault.pooled_balance(&ledger), 0);
    }

    #[test]
    fn deposit_beyond_balance_fails_atomically() {
        let (vault, mut ledger) = bound_vault();
        let result = vault.deposit(&mut ledger, &addr("alice"), 2_000_000);
        assert!(matches!(
            result,
            Err(VaultError::Transfer(LedgerError::InsufficientBalance { .. }))
        ));
        assert_eq!(ledger.balance_of(&addr("alice")), 1_000_000);
        assert_eq!(vault.pooled_balance(&ledger), 0);
    }

    // -- withdraw -----------------------------------------------------------

    /// A bound vault with funds pooled and Bob set up as a withdrawer.
    fn operating_vault() -> (Vault, InMemoryLedger) {
        let (mut vault, mut ledger) = bound_vault();
        vault.deposit(&mut ledger, &addr("alice"), 500_000).unwrap();
        vault.grant_withdrawer(&admin(), addr("bob")).unwrap();
        vault.set_withdraw_enable(&admin(), true).unwrap();
        vault.set_max_withdraw_amount(&admin(), 1_000_000).unwrap();
        (vault, ledger)
    }

    #[test]
    fn withdraw_directs_funds_to_destination() {
        let (vault, mut ledger) = operating_vault();
        let remaining = vault
            .withdraw(&mut ledger, &addr("bob"), 300_000, &addr("alice"))
            .unwrap();

        assert_eq!(remaining, 200_000);
        assert_eq!(vault.pooled_balance(&ledger), 200_000);
        assert_eq!(ledger.balance_of(&addr("alice")), 800_000);
        // The caller received nothing.
        assert_eq!(ledger.balance_of(&addr("bob")), 0);
    }

    #[test]
    fn withdraw_by_non_withdrawer_rejected_even_for_zero() {
        let (vault, mut ledger) = operating_vault();
        for amount in [0u64, 1, 100_000] {
            let result = vault.withdraw(&mut ledger, &addr("carol"), amount, &addr("carol"));
            assert!(matches!(
                result,
                Err(VaultError::Unauthorized {
                    required: "withdrawer",
                    ..
                })
            ));
        }
        assert_eq!(vault.pooled_balance(&ledger), 500_000);
    }

    #[test]
    fn unauthorized_takes_precedence_over_disabled() {
        let (mut vault, mut ledger) = operating_vault();
        vault.set_withdraw_enable(&admin(), false).unwrap();

        let result = vault.withdraw(&mut ledger, &addr("carol"), 1, &addr("carol"));
        assert!(matches!(result, Err(VaultError::Unauthorized { .. })));
    }

    #[test]
    fn disabled_gate_blocks_valid_withdrawer() {
        let (mut vault, mut ledger) = operating_vault();
        vault.set_withdraw_enable(&admin(), false).unwrap();

        let result = vault.withdraw(&mut ledger, &addr("bob"), 100, &addr("bob"));
        assert!(matches!(result, Err(VaultError::WithdrawalsDisabled)));
        assert_eq!(vault.pooled_balance(&ledger), 500_000);
    }

    #[test]
    fn disabled_takes_precedence_over_limit() {
        let (mut vault, mut ledger) = operating_vault();
        vault.set_withdraw_enable(&admin(), false).unwrap();

        // Over the ceiling AND disabled — disabled wins, per check order.
        let result = vault.withdraw(&mut ledger, &addr("bob"), 2_000_000, &addr("bob"));
        assert!(matches!(result, Err(VaultError::WithdrawalsDisabled)));
    }

    #[test]
    fn limit_boundary_is_inclusive() {
        let (mut vault, mut ledger) = operating_vault();
        vault.set_max_withdraw_amount(&admin(), 500_000).unwrap();

        // Exactly at the ceiling: succeeds.
        vault
            .withdraw(&mut ledger, &addr("bob"), 500_000, &addr("bob"))
            .unwrap();
        assert_eq!(vault.pooled_balance(&ledger), 0);
    }

    #[test]
    fn over_limit_rejected() {
        let (mut vault, mut ledger) = operating_vault();
        vault.set_max_withdraw_amount(&admin(), 500_000).unwrap();

        let result = vault.withdraw(&mut ledger, &addr("bob"), 500_001, &addr("bob"));
        assert!(matches!(
            result,
            Err(VaultError::ExceedsLimit {
                amount: 500_001,
                max: 500_000,
            })
        ));
        assert_eq!(vault.pooled_balance(&ledger), 500_000);
    }

    #[test]
    fn withdraw_beyond_pool_fails_atomically() {
        let (vault, mut ledger) = operating_vault();
        let destination_before = ledger.balance_of(&addr("alice"));

        let result = vault.withdraw(&mut ledger, &addr("bob"), 600_000, &addr("alice"));
        assert!(matches!(
            result,
            Err(VaultError::Transfer(LedgerError::InsufficientBalance { .. }))
        ));
        assert_eq!(vault.pooled_balance(&ledger), 500_000);
        assert_eq!(ledger.balance_of(&addr("alice")), destination_before);
    }

    #[test]
    fn revoked_withdrawer_loses_access() {
        let (mut vault, mut ledger) = operating_vault();
        vault.revoke_withdrawer(&admin(), &addr("bob")).unwrap();

        let result = vault.withdraw(&mut ledger, &addr("bob"), 100, &addr("bob"));
        assert!(matches!(result, Err(VaultError::Unauthorized { .. })));
    }

    #[test]
    fn withdraw_before_binding_rejected_after_gates_pass() {
        let mut ledger = InMemoryLedger::new("Custodia Test Token", "CTT", 8);
        let mut vault = Vault::deploy(admin());
        vault.grant_withdrawer(&admin(), addr("bob")).unwrap();
        vault.set_withdraw_enable(&admin(), true).unwrap();
        vault.set_max_withdraw_amount(&admin(), 1_000).unwrap();

        let result = vault.withdraw(&mut ledger, &addr("bob"), 100, &addr("bob"));
        assert!(matches!(result, Err(VaultError::Unconfigured)));
    }

    // -- serialization ------------------------------------------------------

    #[test]
    fn vault_serialization_roundtrip() {
        let (vault, _ledger) = operating_vault();

        let json = serde_json::to_string(&vault).expect("serialize");
        let recovered: Vault = serde_json::from_str(&json).expect("deserialize");

        assert_eq!(recovered.address(), vault.address());
        assert_eq!(recovered.administrator(), vault.administrator());
        assert_eq!(recovered.token(), vault.token());
        assert!(recovered.has_withdrawer(&addr("bob")));
        assert!(recovered.withdraw_enabled());
        assert_eq!(recovered.max_withdraw_amount(), 1_000_000);
    }
}
