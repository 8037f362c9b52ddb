//! # Account Addresses
//!
//! Every participant in Custodia — depositors, withdrawers, administrators,
//! the vault itself, and the token ledger it is bound to — is identified by
//! a 20-byte [`Address`].
//!
//! Addresses are content-addressed: [`Address::derive`] hashes an arbitrary
//! label (a public key, a contract salt, a test fixture name) with BLAKE3
//! and truncates to 20 bytes. The same label always produces the same
//! address, so no registry or coordination is needed.
//!
//! The canonical text form is `0x`-prefixed lowercase hex, and that is also
//! the serde representation — addresses serialize as strings so that maps
//! keyed by `Address` produce valid JSON objects.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A 20-byte account identifier.
///
/// Derived from a label via BLAKE3, displayed and serialized as
/// `0x`-prefixed hex.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address([u8; 20]);

impl Address {
    /// Creates an `Address` from raw 20 bytes.
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Returns the raw 20-byte identifier.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Derives an `Address` from an arbitrary label.
    ///
    /// Computed as the first 20 bytes of `BLAKE3(label)`. Deterministic:
    /// the same label always yields the same address.
    pub fn derive(label: &str) -> Self {
        let hash = blake3::hash(label.as_bytes());
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&hash.as_bytes()[..20]);
        Self(bytes)
    }

    /// Returns the `0x`-prefixed lowercase hex encoding.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Parses a hex-encoded address. The `0x` prefix is optional.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let stripped = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(stripped)?;
        if bytes.len() != 20 {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        let mut arr = [0u8; 20];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({}...)", &self.to_hex()[..10])
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl std::str::FromStr for Address {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

// Serde: hex string, not a byte array. JSON map keys must be strings and
// addresses key both the balance and allowance tables.
impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Address::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
