//! Tick <-> sqrt price conversions in Q64.64, bounded to the engine's range.

use orca_whirlpools_core::{sqrt_price_to_tick_index, tick_index_to_sqrt_price};

use crate::constants::{MAX_SQRT_PRICE_X64, MAX_TICK, MIN_SQRT_PRICE_X64, MIN_TICK};
use crate::error::{EngineError, EngineResult};

/// Sqrt price at `tick`, failing outside [MIN_TICK, MAX_TICK]
pub fn sqrt_price_at_tick(tick: i32) -> EngineResult<u128> {
    if !is_tick_valid(tick) {
        return Err(EngineError::TickOutOfBounds(tick));
    }
    Ok(tick_index_to_sqrt_price(tick))
}

/// Greatest tick whose sqrt price is <= `sqrt_price`
pub fn tick_at_sqrt_price(sqrt_price: u128) -> EngineResult<i32> {
    if !is_sqrt_price_valid(sqrt_price) {
        return Err(EngineError::InvalidSqrtPrice(sqrt_price));
    }
    Ok(sqrt_price_to_tick_index(sqrt_price).clamp(MIN_TICK, MAX_TICK - 1))
}

/// A pool price must lie in [MIN_SQRT_PRICE_X64, MAX_SQRT_PRICE_X64); the
/// upper bound is the price of MAX_TICK, which no tick below it can reach
pub fn is_sqrt_price_valid(sqrt_price: u128) -> bool {
    (MIN_SQRT_PRICE_X64..MAX_SQRT_PRICE_X64).contains(&sqrt_price)
}

/// Check if a tick is within the supported range
pub fn is_tick_valid(tick: i32) -> bool {
    (MIN_TICK..=MAX_TICK).contains(&tick)
}

/// Most extreme usable ticks for a spacing
pub fn min_usable_tick(tick_spacing: i32) -> i32 {
    (MIN_TICK / tick_spacing) * tick_spacing
}

pub fn max_usable_tick(tick_spacing: i32) -> i32 {
    (MAX_TICK / tick_spacing) * tick_spacing
}

/// Per-tick liquidity cap so that summing every usable tick cannot overflow
pub fn max_liquidity_per_tick(tick_spacing: i32) -> u128 {
    let num_ticks = ((max_usable_tick(tick_spacing) - min_usable_tick(tick_spacing))
        / tick_spacing) as u128
        + 1;
    u128::MAX / num_ticks
}
