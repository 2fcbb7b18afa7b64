//! Hook permission decoding and address validation.
//!
//! A hook's lifecycle participation is fixed by the low 14 bits of its
//! address. The manager reads those bits before every callback, and the same
//! layout describes the capabilities this engine declares for itself.

use serde::{Deserialize, Serialize};

use super::fee::is_dynamic_fee;
use crate::constants::*;
use crate::state::Address;

/// Lifecycle callbacks a hook participates in
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Permissions {
    pub before_initialize: bool,
    pub after_initialize: bool,
    pub before_add_liquidity: bool,
    pub after_add_liquidity: bool,
    pub before_remove_liquidity: bool,
    pub after_remove_liquidity: bool,
    pub before_swap: bool,
    pub after_swap: bool,
    pub before_donate: bool,
    pub after_donate: bool,
    pub before_swap_returns_delta: bool,
    pub after_swap_returns_delta: bool,
    pub after_add_liquidity_returns_delta: bool,
    pub after_remove_liquidity_returns_delta: bool,
}

/// Permission set this engine declares: it rejects direct deposits and prices
/// every swap itself
pub const CAPABILITIES: Permissions = Permissions {
    before_initialize: false,
    after_initialize: false,
    before_add_liquidity: true,
    after_add_liquidity: false,
    before_remove_liquidity: false,
    after_remove_liquidity: false,
    before_swap: true,
    after_swap: false,
    before_donate: false,
    after_donate: false,
    before_swap_returns_delta: true,
    after_swap_returns_delta: false,
    after_add_liquidity_returns_delta: false,
    after_remove_liquidity_returns_delta: false,
};

const FLAG_TABLE: [u16; 14] = [
    BEFORE_INITIALIZE_FLAG,
    AFTER_INITIALIZE_FLAG,
    BEFORE_ADD_LIQUIDITY_FLAG,
    AFTER_ADD_LIQUIDITY_FLAG,
    BEFORE_REMOVE_LIQUIDITY_FLAG,
    AFTER_REMOVE_LIQUIDITY_FLAG,
    BEFORE_SWAP_FLAG,
    AFTER_SWAP_FLAG,
    BEFORE_DONATE_FLAG,
    AFTER_DONATE_FLAG,
    BEFORE_SWAP_RETURNS_DELTA_FLAG,
    AFTER_SWAP_RETURNS_DELTA_FLAG,
    AFTER_ADD_LIQUIDITY_RETURNS_DELTA_FLAG,
    AFTER_REMOVE_LIQUIDITY_RETURNS_DELTA_FLAG,
];

impl Permissions {
    /// Decode from the low bits of a hook address
    pub fn from_address(address: &Address) -> Self {
        Self::from_bits(address.low_bits())
    }

    pub fn from_bits(bits: u16) -> Self {
        let flags = FLAG_TABLE.map(|flag| bits & flag != 0);
        Self {
            before_initialize: flags[0],
            after_initialize: flags[1],
            before_add_liquidity: flags[2],
            after_add_liquidity: flags[3],
            before_remove_liquidity: flags[4],
            after_remove_liquidity: flags[5],
            before_swap: flags[6],
            after_swap: flags[7],
            before_donate: flags[8],
            after_donate: flags[9],
            before_swap_returns_delta: flags[10],
            after_swap_returns_delta: flags[11],
            after_add_liquidity_returns_delta: flags[12],
            after_remove_liquidity_returns_delta: flags[13],
        }
    }

    pub const fn bits(&self) -> u16 {
        let flags = [
            self.before_initialize,
            self.after_initialize,
            self.before_add_liquidity,
            self.after_add_liquidity,
            self.before_remove_liquidity,
            self.after_remove_liquidity,
            self.before_swap,
            self.after_swap,
            self.before_donate,
            self.after_donate,
            self.before_swap_returns_delta,
            self.after_swap_returns_delta,
            self.after_add_liquidity_returns_delta,
            self.after_remove_liquidity_returns_delta,
        ];
        let mut bits = 0u16;
        let mut i = 0;
        while i < flags.len() {
            if flags[i] {
                bits |= FLAG_TABLE[i];
            }
            i += 1;
        }
        bits
    }

    /// Whether `address` encodes exactly this permission set
    pub fn matches(&self, address: &Address) -> bool {
        address.low_bits() & ALL_HOOK_MASK == self.bits()
    }
}

/// Standard validity rules for a hook address paired with a pool fee:
/// delta-returning flags need their base flag, the zero address cannot carry a
/// dynamic fee, and any other hook must declare at least one flag or a
/// dynamic fee
pub fn is_valid_hook_address(address: &Address, fee: u32) -> bool {
    let permissions = Permissions::from_address(address);

    if permissions.before_swap_returns_delta && !permissions.before_swap {
        return false;
    }
    if permissions.after_swap_returns_delta && !permissions.after_swap {
        return false;
    }
    if permissions.after_add_liquidity_returns_delta && !permissions.after_add_liquidity {
        return false;
    }
    if permissions.after_remove_liquidity_returns_delta && !permissions.after_remove_liquidity {
        return false;
    }

    if address.is_zero() {
        !is_dynamic_fee(fee)
    } else {
        address.low_bits() & ALL_HOOK_MASK > 0 || is_dynamic_fee(fee)
    }
}
