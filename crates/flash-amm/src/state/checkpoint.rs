//! Window-scoped checkpoint and shadow state used by the swap engine.

use serde::{Deserialize, Serialize};

use super::pool::{CurveCursor, Slot0};

/// Slot0 as it stood before the first swap of a window
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot0Checkpoint {
    pub sqrt_price_x64: u128,
    pub tick: i32,
    pub protocol_fee: u32,
    pub lp_fee: u32,
}

impl From<&Slot0> for Slot0Checkpoint {
    fn from(slot0: &Slot0) -> Self {
        Self {
            sqrt_price_x64: slot0.sqrt_price_x64,
            tick: slot0.tick,
            protocol_fee: slot0.protocol_fee,
            lp_fee: slot0.lp_fee,
        }
    }
}

/// Two-sided replay of the pool for the rest of a window.
///
/// Sells walk the `bid` cursor, which starts at or below the checkpoint
/// price and only moves down. Buys walk the `offer` cursor, which starts at
/// or above it and only moves up. Net input from either side is parked at the
/// checkpoint price as synthetic depth for the opposite side:
/// `synthetic_bid` holds token1 that sellers of token0 fill against first,
/// `synthetic_offer` holds token0 for buyers.
///
/// Both cursors cross the pool's own ticks, so liquidity changes made while
/// the window is open must be applied to any cursor inside the changed range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ShadowPoolState {
    pub bid: CurveCursor,
    pub offer: CurveCursor,
    pub synthetic_bid: u128,
    pub synthetic_offer: u128,
}

/// Everything the engine keeps for a pool's current window
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WindowState {
    pub key: u64,
    pub checkpoint: Slot0Checkpoint,
    pub shadow: ShadowPoolState,
}
