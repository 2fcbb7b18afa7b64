//! Pool identity and its derived id.

use std::fmt;

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};

use super::address::{Address, Currency};

/// Fields that identify a pool. Never stored verbatim by the registry; only
/// the derived `PoolId` is kept, and the key itself is observable through
/// the initialize event.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, BorshSerialize, BorshDeserialize, Serialize, Deserialize,
)]
pub struct PoolKey {
    pub currency0: Currency,
    pub currency1: Currency,
    /// Static LP fee in pips, or `DYNAMIC_FEE_FLAG`
    pub fee: u32,
    pub tick_spacing: i32,
    pub hooks: Address,
}

impl PoolKey {
    /// Keccak-256 of the Borsh encoding of the key
    pub fn to_id(&self) -> PoolId {
        PoolId(Keccak256::digest(self.encode()).into())
    }

    /// Borsh encoding hashed by `to_id`
    pub fn encode(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(20 + 20 + 4 + 4 + 20);
        // Writing into a Vec cannot fail
        let _ = BorshSerialize::serialize(self, &mut bytes);
        bytes
    }
}

/// Derived pool key used by the registry
#[derive(
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    BorshSerialize,
    BorshDeserialize,
    Serialize,
    Deserialize,
)]
pub struct PoolId(pub [u8; 32]);

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PoolId({})", self)
    }
}
