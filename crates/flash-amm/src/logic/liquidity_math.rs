//! Liquidity math functions for AMM calculations
//!
//! Core mathematical functions for converting between
//! liquidity, amounts, and prices

use ethnum::U256;
use orca_whirlpools_core::{
    try_get_amount_delta_a, try_get_amount_delta_b, try_get_next_sqrt_price_from_a,
    try_get_next_sqrt_price_from_b, U128,
};

use crate::error::{EngineError, EngineResult};

/// Token amounts held by `liquidity` over [lower, upper] at `sqrt_price`
pub fn amounts_from_liquidity(
    sqrt_price: u128,
    sqrt_price_lower: u128,
    sqrt_price_upper: u128,
    liquidity: u128,
    round_up: bool,
) -> EngineResult<(u64, u64)> {
    // Handle degenerate cases
    if liquidity == 0 {
        return Ok((0, 0));
    }
    if sqrt_price_lower >= sqrt_price_upper {
        return Err(EngineError::InvalidSqrtPrice(sqrt_price_lower));
    }

    // If current price is below the range: fully in token0
    if sqrt_price <= sqrt_price_lower {
        let a0 = amount0_delta(liquidity, sqrt_price_lower, sqrt_price_upper, round_up)?;
        return Ok((a0, 0));
    }
    // If current price is above the range: fully in token1
    if sqrt_price >= sqrt_price_upper {
        let a1 = amount1_delta(liquidity, sqrt_price_lower, sqrt_price_upper, round_up)?;
        return Ok((0, a1));
    }
    // In-range: split
    let a0 = amount0_delta(liquidity, sqrt_price, sqrt_price_upper, round_up)?;
    let a1 = amount1_delta(liquidity, sqrt_price_lower, sqrt_price, round_up)?;
    Ok((a0, a1))
}

/// Calculate amount0 delta using Orca core
pub fn amount0_delta(
    liquidity: u128,
    sqrt_price_a: u128,
    sqrt_price_b: u128,
    round_up: bool,
) -> EngineResult<u64> {
    try_get_amount_delta_a(
        U128::from(sqrt_price_a.min(sqrt_price_b)),
        U128::from(sqrt_price_a.max(sqrt_price_b)),
        U128::from(liquidity),
        round_up,
    )
    .map_err(|_| EngineError::AmountOverflow)
}

/// Calculate amount1 delta using Orca core
pub fn amount1_delta(
    liquidity: u128,
    sqrt_price_a: u128,
    sqrt_price_b: u128,
    round_up: bool,
) -> EngineResult<u64> {
    try_get_amount_delta_b(
        U128::from(sqrt_price_a.min(sqrt_price_b)),
        U128::from(sqrt_price_a.max(sqrt_price_b)),
        U128::from(liquidity),
        round_up,
    )
    .map_err(|_| EngineError::AmountOverflow)
}

/// Price after adding `amount_in` of the input token
pub fn next_sqrt_price_from_input(
    sqrt_price: u128,
    liquidity: u128,
    amount_in: u64,
    zero_for_one: bool,
) -> EngineResult<u128> {
    let next = if zero_for_one {
        try_get_next_sqrt_price_from_a(U128::from(sqrt_price), U128::from(liquidity), amount_in, true)
    } else {
        try_get_next_sqrt_price_from_b(U128::from(sqrt_price), U128::from(liquidity), amount_in, true)
    };
    next.map(u128::from).map_err(|_| EngineError::MathOverflow)
}

/// Price after removing `amount_out` of the output token
pub fn next_sqrt_price_from_output(
    sqrt_price: u128,
    liquidity: u128,
    amount_out: u64,
    zero_for_one: bool,
) -> EngineResult<u128> {
    let next = if zero_for_one {
        try_get_next_sqrt_price_from_b(U128::from(sqrt_price), U128::from(liquidity), amount_out, false)
    } else {
        try_get_next_sqrt_price_from_a(U128::from(sqrt_price), U128::from(liquidity), amount_out, false)
    };
    next.map(u128::from).map_err(|_| EngineError::MathOverflow)
}

/// Apply a signed liquidity delta
pub fn add_liquidity_delta(liquidity: u128, delta: i128) -> EngineResult<u128> {
    if delta >= 0 {
        liquidity
            .checked_add(delta as u128)
            .ok_or(EngineError::MathOverflow)
    } else {
        liquidity
            .checked_sub(delta.unsigned_abs())
            .ok_or(EngineError::InsufficientLiquidity)
    }
}

/// floor(a * b / denominator) with a 256-bit intermediate
pub fn mul_div_floor(a: u128, b: u128, denominator: u128) -> EngineResult<u128> {
    if denominator == 0 {
        return Err(EngineError::MathOverflow);
    }
    let result = U256::from(a) * U256::from(b) / U256::from(denominator);
    narrow(result)
}

/// ceil(a * b / denominator) with a 256-bit intermediate
pub fn mul_div_ceil(a: u128, b: u128, denominator: u128) -> EngineResult<u128> {
    if denominator == 0 {
        return Err(EngineError::MathOverflow);
    }
    let product = U256::from(a) * U256::from(b);
    let denominator = U256::from(denominator);
    let mut result = product / denominator;
    if product % denominator != U256::ZERO {
        result += U256::ONE;
    }
    narrow(result)
}

fn narrow(value: U256) -> EngineResult<u128> {
    if value > U256::from(u128::MAX) {
        return Err(EngineError::MathOverflow);
    }
    Ok(value.as_u128())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::Q64;
    use crate::logic::tick_math::sqrt_price_at_tick;

    #[test]
    fn test_amounts_split_by_range_position() {
        let lower = sqrt_price_at_tick(-600).unwrap();
        let upper = sqrt_price_at_tick(600).unwrap();
        let liquidity = 1_000_000_000u128;

        let (a0, a1) = amounts_from_liquidity(Q64, lower, upper, liquidity, true).unwrap();
        assert!(a0 > 0 && a1 > 0);

        let (below0, below1) = amounts_from_liquidity(lower - 1, lower, upper, liquidity, true).unwrap();
        assert!(below0 > 0);
        assert_eq!(below1, 0);

        let (above0, above1) = amounts_from_liquidity(upper + 1, lower, upper, liquidity, true).unwrap();
        assert_eq!(above0, 0);
        assert!(above1 > 0);
    }

    #[test]
    fn test_rounding_direction() {
        let lower = sqrt_price_at_tick(-60).unwrap();
        let upper = sqrt_price_at_tick(60).unwrap();
        let up = amounts_from_liquidity(Q64, lower, upper, 12_345_679, true).unwrap();
        let down = amounts_from_liquidity(Q64, lower, upper, 12_345_679, false).unwrap();
        assert!(up.0 >= down.0);
        assert!(up.1 >= down.1);
        assert!(up.0 - down.0 <= 1);
    }

    #[test]
    fn test_next_price_moves_in_swap_direction() {
        let liquidity = 1_000_000_000u128;
        let down = next_sqrt_price_from_input(Q64, liquidity, 1_000, true).unwrap();
        let up = next_sqrt_price_from_input(Q64, liquidity, 1_000, false).unwrap();
        assert!(down < Q64);
        assert!(up > Q64);

        let down_out = next_sqrt_price_from_output(Q64, liquidity, 1_000, true).unwrap();
        assert!(down_out < Q64);
    }

    #[test]
    fn test_mul_div() {
        assert_eq!(mul_div_floor(10, 10, 3).unwrap(), 33);
        assert_eq!(mul_div_ceil(10, 10, 3).unwrap(), 34);
        assert_eq!(mul_div_ceil(10, 9, 3).unwrap(), 30);
        assert_eq!(mul_div_floor(u128::MAX, Q64, Q64).unwrap(), u128::MAX);
        assert!(mul_div_floor(u128::MAX, 2, 1).is_err());
        assert!(mul_div_floor(1, 1, 0).is_err());
    }

    #[test]
    fn test_add_liquidity_delta() {
        assert_eq!(add_liquidity_delta(10, -4).unwrap(), 6);
        assert_eq!(add_liquidity_delta(10, 4).unwrap(), 14);
        assert!(add_liquidity_delta(3, -4).is_err());
    }
}
