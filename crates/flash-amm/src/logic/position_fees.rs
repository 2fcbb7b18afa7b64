//! Position fee calculation logic
//!
//! Handles fee accrual calculations for liquidity positions

use ethnum::U256;

use crate::error::{EngineError, EngineResult};
use crate::state::TickInfo;

/// Position fee accrual result
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PositionFeeAccrual {
    /// Current fee growth inside for token 0
    pub fee_growth_inside_0: u128,
    /// Current fee growth inside for token 1
    pub fee_growth_inside_1: u128,
    /// Fees owed for token 0 since the last snapshot
    pub fees_owed_0: u128,
    /// Fees owed for token 1 since the last snapshot
    pub fees_owed_1: u128,
}

/// Fee growth per unit of liquidity accumulated inside [lower, upper].
///
/// Accumulators are allowed to wrap, so every difference is taken modulo 2^128.
pub fn fee_growth_inside(
    current_tick: i32,
    tick_lower: i32,
    tick_upper: i32,
    fee_growth_global_0: u128,
    fee_growth_global_1: u128,
    lower: &TickInfo,
    upper: &TickInfo,
) -> (u128, u128) {
    let (below_0, below_1) = if current_tick >= tick_lower {
        (lower.fee_growth_outside_0_x64, lower.fee_growth_outside_1_x64)
    } else {
        (
            fee_growth_global_0.wrapping_sub(lower.fee_growth_outside_0_x64),
            fee_growth_global_1.wrapping_sub(lower.fee_growth_outside_1_x64),
        )
    };

    let (above_0, above_1) = if current_tick < tick_upper {
        (upper.fee_growth_outside_0_x64, upper.fee_growth_outside_1_x64)
    } else {
        (
            fee_growth_global_0.wrapping_sub(upper.fee_growth_outside_0_x64),
            fee_growth_global_1.wrapping_sub(upper.fee_growth_outside_1_x64),
        )
    };

    (
        fee_growth_global_0.wrapping_sub(below_0).wrapping_sub(above_0),
        fee_growth_global_1.wrapping_sub(below_1).wrapping_sub(above_1),
    )
}

/// Calculate position fee accrual
///
/// Given the pool globals, the updated boundary ticks, and the position's last
/// tracked fee growth inside, computes the current fee growth inside and the
/// fees owed to the position's existing liquidity since its last update.
#[allow(clippy::too_many_arguments)]
pub fn calculate_position_fee_accrual(
    current_tick: i32,
    position_tick_lower: i32,
    position_tick_upper: i32,
    position_liquidity: u128,
    fee_growth_global_0: u128,
    fee_growth_global_1: u128,
    lower_tick: &TickInfo,
    upper_tick: &TickInfo,
    last_fee_growth_inside_0: u128,
    last_fee_growth_inside_1: u128,
) -> EngineResult<PositionFeeAccrual> {
    let (fee_growth_inside_0, fee_growth_inside_1) = fee_growth_inside(
        current_tick,
        position_tick_lower,
        position_tick_upper,
        fee_growth_global_0,
        fee_growth_global_1,
        lower_tick,
        upper_tick,
    );

    let fees_owed_0 = fees_owed(
        fee_growth_inside_0.wrapping_sub(last_fee_growth_inside_0),
        position_liquidity,
    )?;
    let fees_owed_1 = fees_owed(
        fee_growth_inside_1.wrapping_sub(last_fee_growth_inside_1),
        position_liquidity,
    )?;

    Ok(PositionFeeAccrual {
        fee_growth_inside_0,
        fee_growth_inside_1,
        fees_owed_0,
        fees_owed_1,
    })
}

fn fees_owed(fee_growth_delta: u128, liquidity: u128) -> EngineResult<u128> {
    if liquidity == 0 || fee_growth_delta == 0 {
        return Ok(0);
    }
    let owed: U256 = (U256::from(fee_growth_delta) * U256::from(liquidity)) >> 64;
    if owed > U256::from(i128::MAX as u128) {
        return Err(EngineError::MathOverflow);
    }
    Ok(owed.as_u128())
}
