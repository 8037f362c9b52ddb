//! # Custodia Ledger — Token Primitives
//!
//! The bottom layer of Custodia: accounts, balances, allowances, and the
//! transfer semantics everything above relies on. The vault crate never
//! touches a balance directly — every unit of value moves through the
//! [`TokenLedger`] trait defined here.
//!
//! ## Architecture
//!
//! ```text
//! address.rs — 20-byte account identifiers, hex-encoded, content-addressed
//! token.rs   — TokenLedger trait + InMemoryLedger reference implementation
//! ```
//!
//! ## Design Principles
//!
//! 1. **All amounts are `u64` in smallest-unit denomination.** No floating
//!    point, no decimals in arithmetic. The `decimals` field on a ledger is
//!    for display only.
//! 2. **Transfers are all-or-nothing.** A transfer either moves exactly the
//!    requested amount or fails leaving every balance and allowance intact.
//!    There is no partial application, ever.
//! 3. **Overflow is an error, not a wrap.** `checked_add`/`checked_sub` on
//!    every balance mutation, because wrapping arithmetic and money do not
//!    mix.
//! 4. **Serializable state.** Every public type derives `Serialize` and
//!    `Deserialize` so ledger state can be snapshotted or shipped as JSON.

pub mod address;
pub mod token;

pub use address::Address;
pub use token::{InMemoryLedger, LedgerError, TokenLedger};
