//! # Swap Step Engine
//!
//! One step of a concentrated liquidity swap: move from the current price
//! toward a target price within a single liquidity range, consuming as much
//! of the remaining amount as the range allows. Amounts into the pool round
//! up, amounts out of the pool round down.

use serde::{Deserialize, Serialize};

use super::liquidity_math::{
    amount0_delta, amount1_delta, mul_div_ceil, mul_div_floor, next_sqrt_price_from_input,
    next_sqrt_price_from_output,
};
use crate::constants::{MAX_LP_FEE, PIPS_DENOMINATOR};
use crate::error::{EngineError, EngineResult};

/// Swap direction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwapDirection {
    /// Sell token0 for token1, price moves down
    ZeroForOne,
    /// Sell token1 for token0, price moves up
    OneForZero,
}

impl SwapDirection {
    pub fn is_zero_for_one(self) -> bool {
        self == SwapDirection::ZeroForOne
    }
}

/// Result of a single swap step
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepResult {
    pub sqrt_price_next: u128,
    /// Input consumed by price movement, excluding fees
    pub amount_in: u64,
    pub amount_out: u64,
    /// Fee charged on top of `amount_in`
    pub fee_amount: u64,
}

/// Compute one swap step. Direction is implied by whether the target lies
/// below the current price. `fee_pips` is the combined swap fee.
pub fn compute_swap_step(
    sqrt_price_current: u128,
    sqrt_price_target: u128,
    liquidity: u128,
    amount_remaining: u64,
    exact_input: bool,
    fee_pips: u32,
) -> EngineResult<StepResult> {
    let zero_for_one = sqrt_price_current >= sqrt_price_target;
    let pips = PIPS_DENOMINATOR as u128;
    let fee = fee_pips as u128;

    if exact_input {
        let remaining_less_fee = mul_div_floor(amount_remaining as u128, pips - fee, pips)? as u64;

        // An amount beyond u64 means the target is out of reach for this step
        let to_target = if zero_for_one {
            amount0_delta(liquidity, sqrt_price_target, sqrt_price_current, true)
        } else {
            amount1_delta(liquidity, sqrt_price_current, sqrt_price_target, true)
        }
        .ok();

        let (sqrt_price_next, amount_in, fee_amount) = match to_target {
            Some(amount_in) if remaining_less_fee >= amount_in => {
                let fee_amount = if fee_pips == MAX_LP_FEE {
                    amount_in
                } else {
                    to_u64(mul_div_ceil(amount_in as u128, fee, pips - fee)?)?
                };
                (sqrt_price_target, amount_in, fee_amount)
            }
            _ => {
                let sqrt_price_next = if remaining_less_fee == 0 {
                    sqrt_price_current
                } else {
                    next_sqrt_price_from_input(
                        sqrt_price_current,
                        liquidity,
                        remaining_less_fee,
                        zero_for_one,
                    )?
                };
                (
                    sqrt_price_next,
                    remaining_less_fee,
                    amount_remaining - remaining_less_fee,
                )
            }
        };

        let amount_out = if zero_for_one {
            amount1_delta(liquidity, sqrt_price_next, sqrt_price_current, false)?
        } else {
            amount0_delta(liquidity, sqrt_price_current, sqrt_price_next, false)?
        };

        Ok(StepResult {
            sqrt_price_next,
            amount_in,
            amount_out,
            fee_amount,
        })
    } else {
        if fee_pips >= MAX_LP_FEE {
            return Err(EngineError::InvalidFeeForExactOut);
        }

        let to_target = if zero_for_one {
            amount1_delta(liquidity, sqrt_price_target, sqrt_price_current, false)
        } else {
            amount0_delta(liquidity, sqrt_price_current, sqrt_price_target, false)
        }
        .ok();

        let (sqrt_price_next, amount_out) = match to_target {
            Some(amount_out) if amount_remaining >= amount_out => (sqrt_price_target, amount_out),
            _ => (
                next_sqrt_price_from_output(
                    sqrt_price_current,
                    liquidity,
                    amount_remaining,
                    zero_for_one,
                )?,
                amount_remaining,
            ),
        };

        let amount_in = if zero_for_one {
            amount0_delta(liquidity, sqrt_price_next, sqrt_price_current, true)?
        } else {
            amount1_delta(liquidity, sqrt_price_current, sqrt_price_next, true)?
        };
        let fee_amount = to_u64(mul_div_ceil(amount_in as u128, fee, pips - fee)?)?;

        Ok(StepResult {
            sqrt_price_next,
            amount_in,
            amount_out,
            fee_amount,
        })
    }
}

fn to_u64(value: u128) -> EngineResult<u64> {
    u64::try_from(value).map_err(|_| EngineError::AmountOverflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::Q64;
    use crate::logic::tick_math::sqrt_price_at_tick;

    const LIQUIDITY: u128 = 1_000_000_000_000;

    #[test]
    fn test_exact_input_reaches_target() {
        let target = sqrt_price_at_tick(-10).unwrap();
        let step = compute_swap_step(Q64, target, LIQUIDITY, u64::MAX / 4, true, 3000).unwrap();
        assert_eq!(step.sqrt_price_next, target);
        assert!(step.amount_in > 0);
        assert!(step.amount_out > 0);
        assert!(step.amount_out <= step.amount_in);
        assert!(step.fee_amount > 0);
    }

    #[test]
    fn test_exact_input_partial_consumes_everything() {
        let target = sqrt_price_at_tick(-1000).unwrap();
        let amount = 10_000u64;
        let step = compute_swap_step(Q64, target, LIQUIDITY, amount, true, 3000).unwrap();
        assert!(step.sqrt_price_next < Q64);
        assert!(step.sqrt_price_next > target);
        assert_eq!(step.amount_in + step.fee_amount, amount);
        assert_eq!(step.fee_amount, 30);
    }

    #[test]
    fn test_one_for_zero_moves_up() {
        let target = sqrt_price_at_tick(1000).unwrap();
        let step = compute_swap_step(Q64, target, LIQUIDITY, 10_000, true, 500).unwrap();
        assert!(step.sqrt_price_next > Q64);
        assert!(step.sqrt_price_next < target);
    }

    #[test]
    fn test_exact_output_partial() {
        let target = sqrt_price_at_tick(-1000).unwrap();
        let step = compute_swap_step(Q64, target, LIQUIDITY, 5_000, false, 3000).unwrap();
        assert_eq!(step.amount_out, 5_000);
        assert!(step.amount_in >= 5_000);
        assert!(step.fee_amount > 0);
    }

    #[test]
    fn test_exact_output_rejects_full_fee() {
        let target = sqrt_price_at_tick(-10).unwrap();
        assert_eq!(
            compute_swap_step(Q64, target, LIQUIDITY, 100, false, MAX_LP_FEE),
            Err(EngineError::InvalidFeeForExactOut)
        );
    }

    #[test]
    fn test_zero_liquidity_jumps_to_target() {
        let target = sqrt_price_at_tick(-500).unwrap();
        let step = compute_swap_step(Q64, target, 0, 1_000, true, 3000).unwrap();
        assert_eq!(step.sqrt_price_next, target);
        assert_eq!(step.amount_in, 0);
        assert_eq!(step.amount_out, 0);
        assert_eq!(step.fee_amount, 0);
    }

    #[test]
    fn test_direction_helpers() {
        assert!(SwapDirection::ZeroForOne.is_zero_for_one());
        assert!(!SwapDirection::OneForZero.is_zero_for_one());
    }
}
