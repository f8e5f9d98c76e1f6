//! Chained references
//!
//! The relayer stores the output of one call under a key and substitutes it
//! when a later call passes the matching reference as an amount. The builder
//! never knows these amounts; it only wires keys between steps.

use alloy_primitives::U256;
use std::fmt;

/// Prefix of references cleared once read
pub const TEMPORARY_PREFIX: u16 = 0xba10;

/// Prefix of references that survive being read
pub const READ_ONLY_PREFIX: u16 = 0xba11;

/// Bits below the two-byte prefix
const PREFIX_SHIFT: usize = 240;

/// A placeholder amount resolved by the relayer at execution time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChainedReference {
    key: u64,
    read_only: bool,
}

impl ChainedReference {
    pub const fn temporary(key: u64) -> Self {
        Self { key, read_only: false }
    }

    pub const fn read_only(key: u64) -> Self {
        Self { key, read_only: true }
    }

    pub fn key(&self) -> u64 {
        self.key
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// The `uint256` the relayer recognises as this reference
    pub fn value(&self) -> U256 {
        let prefix = if self.is_read_only() { READ_ONLY_PREFIX } else { TEMPORARY_PREFIX };
        (U256::from(prefix) << PREFIX_SHIFT) + U256::from(self.key)
    }

    /// Inverse of [`ChainedReference::value`] for keys that fit in a `u64`
    #[cfg(test)]
    fn from_value(value: U256) -> Option<Self> {
        let prefix = value >> PREFIX_SHIFT;
        let read_only = if prefix == U256::from(TEMPORARY_PREFIX) {
            false
        } else if prefix == U256::from(READ_ONLY_PREFIX) {
            true
        } else {
            return None;
        };

        let key = value - (prefix << PREFIX_SHIFT);
        let key = u64::try_from(key).ok()?;
        Some(Self { key, read_only })
    }
}

impl fmt::Display for ChainedReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_read_only() { "ro" } else { "tmp" };
        write!(f, "ref:{}({})", self.key, kind)
    }
}

/// An amount argument: either known now or produced by an earlier step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Amount {
    Literal(U256),
    Chained(ChainedReference),
}

impl Amount {
    pub const ZERO: Amount = Amount::Literal(U256::ZERO);

    pub fn to_u256(&self) -> U256 {
        match self {
            Amount::Literal(value) => *value,
            Amount::Chained(reference) => reference.value(),
        }
    }

    pub fn as_reference(&self) -> Option<ChainedReference> {
        match self {
            Amount::Chained(reference) => Some(*reference),
            Amount::Literal(_) => None,
        }
    }
}

impl From<ChainedReference> for Amount {
    fn from(reference: ChainedReference) -> Self {
        Amount::Chained(reference)
    }
}

impl From<U256> for Amount {
    fn from(value: U256) -> Self {
        Amount::Literal(value)
    }
}
