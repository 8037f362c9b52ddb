//! # Custodia Vault
//!
//! A custodial vault that pools a fungible token on behalf of depositors
//! and releases funds only through a gated withdrawal path. The vault's
//! job is narrow and unforgiving: record deposits, decide who may withdraw,
//! enforce the per-call ceiling, and never let its books drift from the
//! token ledger's.
//!
//! ## Architecture
//!
//! ```text
//! access.rs — the withdrawer capability set (grant / revoke / contains)
//! config.rs — deployment-time defaults for the withdrawal gates
//! vault.rs  — the Vault itself: deposit, withdraw, administration
//! ```
//!
//! ## Design Principles
//!
//! 1. **The token ledger balance IS the pooled balance.** The vault keeps
//!    no shadow counter, so there is no second representation to drift.
//! 2. **Capabilities are explicit.** Withdrawal authority is an owned set
//!    of addresses mutated only by the administrator — no ambient roles,
//!    no inheritance, nobody (including the administrator) is a withdrawer
//!    until granted.
//! 3. **Every precondition failure is a distinct error** and leaves all
//!    state, vault and ledger alike, exactly as it was.
//! 4. **Pooled custody, by design.** Depositor identity is not recorded;
//!    any withdrawer may direct pooled funds to any destination.

pub mod access;
pub mod config;
pub mod vault;

pub use access::WithdrawerSet;
pub use config::VaultConfig;
pub use vault::{Vault, VaultError};
