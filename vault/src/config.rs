//! # Vault Deployment Configuration
//!
//! Initial values for the withdrawal gates. The defaults are deliberately
//! the most restrictive possible: withdrawals disabled and a zero per-call
//! ceiling. A freshly deployed vault can accept deposits but releases
//! nothing until the administrator explicitly opens each gate.

use serde::{Deserialize, Serialize};

/// Initial withdrawal-gate settings for a new vault.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultConfig {
    /// Whether withdrawals are enabled at deployment.
    pub withdraw_enabled: bool,

    /// The per-call withdrawal ceiling at deployment, in smallest units.
    pub max_withdraw_amount: u64,
}

impl Default for VaultConfig {
    /// Everything closed: withdrawals disabled, ceiling zero.
    fn default() -> Self {
        Self {
            withdraw_enabled: false,
            max_withdraw_amount: 0,
        }
    }
}
