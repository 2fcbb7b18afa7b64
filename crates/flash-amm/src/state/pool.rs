//! Pool state owned by the registry.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::address::Address;

/// Price, tick and fee parameters read on every swap
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot0 {
    pub sqrt_price_x64: u128,
    pub tick: i32,
    /// Two 12-bit per-direction protocol fees: low bits for zero-for-one
    pub protocol_fee: u32,
    pub lp_fee: u32,
}

/// Liquidity and fee-growth bookkeeping for an initialized tick
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInfo {
    pub liquidity_gross: u128,
    pub liquidity_net: i128,
    pub fee_growth_outside_0_x64: u128,
    pub fee_growth_outside_1_x64: u128,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PositionKey {
    pub owner: Address,
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub salt: [u8; 32],
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionInfo {
    pub liquidity: u128,
    pub fee_growth_inside_0_last_x64: u128,
    pub fee_growth_inside_1_last_x64: u128,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifyLiquidityParams {
    pub tick_lower: i32,
    pub tick_upper: i32,
    /// Positive to add, negative to remove
    pub liquidity_delta: i128,
    pub salt: [u8; 32],
}

/// The subset of pool state a curve swap reads and moves
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurveCursor {
    pub sqrt_price_x64: u128,
    pub tick: i32,
    pub liquidity: u128,
    pub fee_growth_global_0_x64: u128,
    pub fee_growth_global_1_x64: u128,
}

/// A tick crossed during a curve swap, with the global fee growth at the moment
/// of crossing. Replayed onto the tick map when the swap commits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CrossedTick {
    pub tick: i32,
    pub fee_growth_global_0_x64: u128,
    pub fee_growth_global_1_x64: u128,
}

#[derive(Clone, Debug, Default)]
pub struct PoolState {
    pub slot0: Slot0,
    /// Liquidity active at the current tick
    pub liquidity: u128,
    pub fee_growth_global_0_x64: u128,
    pub fee_growth_global_1_x64: u128,
    pub ticks: BTreeMap<i32, TickInfo>,
    pub positions: HashMap<PositionKey, PositionInfo>,
}

impl PoolState {
    pub fn new(sqrt_price_x64: u128, tick: i32, protocol_fee: u32, lp_fee: u32) -> Self {
        Self {
            slot0: Slot0 {
                sqrt_price_x64,
                tick,
                protocol_fee,
                lp_fee,
            },
            ..Self::default()
        }
    }

    pub fn cursor(&self) -> CurveCursor {
        CurveCursor {
            sqrt_price_x64: self.slot0.sqrt_price_x64,
            tick: self.slot0.tick,
            liquidity: self.liquidity,
            fee_growth_global_0_x64: self.fee_growth_global_0_x64,
            fee_growth_global_1_x64: self.fee_growth_global_1_x64,
        }
    }

    /// Move the pool to a swap's end state and flip fee growth outside on
    /// every tick it crossed
    pub fn apply_curve_swap(&mut self, end: &CurveCursor, crossed: &[CrossedTick]) {
        for crossing in crossed {
            if let Some(info) = self.ticks.get_mut(&crossing.tick) {
                info.fee_growth_outside_0_x64 = crossing
                    .fee_growth_global_0_x64
                    .wrapping_sub(info.fee_growth_outside_0_x64);
                info.fee_growth_outside_1_x64 = crossing
                    .fee_growth_global_1_x64
                    .wrapping_sub(info.fee_growth_outside_1_x64);
            }
        }

        self.slot0.sqrt_price_x64 = end.sqrt_price_x64;
        self.slot0.tick = end.tick;
        self.liquidity = end.liquidity;
        self.fee_growth_global_0_x64 = end.fee_growth_global_0_x64;
        self.fee_growth_global_1_x64 = end.fee_growth_global_1_x64;
    }
}
