//! Curve swap loop.
//!
//! Walks a cursor across initialized ticks until the specified amount is
//! consumed. The loop never writes to the tick source: crossings are returned
//! so the caller can commit them once every part of the operation succeeded.

use super::engine::{compute_swap_step, SwapDirection};
use super::fee::swap_fee;
use super::liquidity_math::add_liquidity_delta;
use super::tick_math::{sqrt_price_at_tick, tick_at_sqrt_price};
use crate::constants::{MAX_SQRT_PRICE_X64, MAX_TICK, MIN_SQRT_PRICE_X64, MIN_TICK, PIPS_DENOMINATOR};
use crate::error::{EngineError, EngineResult};
use crate::state::{CrossedTick, CurveCursor, PoolState};

/// Read access to initialized ticks
pub trait TickCrossing {
    /// Nearest initialized tick at or below `tick` when `lte`, otherwise
    /// strictly above it
    fn next_initialized_tick(&self, tick: i32, lte: bool) -> Option<i32>;

    /// Liquidity added when crossing `tick` upward
    fn liquidity_net(&self, tick: i32) -> i128;
}

impl TickCrossing for PoolState {
    fn next_initialized_tick(&self, tick: i32, lte: bool) -> Option<i32> {
        if lte {
            self.ticks.range(..=tick).next_back().map(|(t, _)| *t)
        } else {
            self.ticks.range(tick.saturating_add(1)..).next().map(|(t, _)| *t)
        }
    }

    fn liquidity_net(&self, tick: i32) -> i128 {
        self.ticks.get(&tick).map_or(0, |info| info.liquidity_net)
    }
}

/// Fee parameters for one curve execution
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SwapFees {
    pub lp_fee: u32,
    /// Protocol fee for the swap's direction only
    pub protocol_fee: u32,
}

/// Outcome of a curve execution before anything is committed
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CurveSwapResult {
    pub cursor: CurveCursor,
    /// Input paid by the swapper, fees included
    pub amount_in: u64,
    pub amount_out: u64,
    /// Share of `amount_in` owed to the protocol
    pub protocol_fee_amount: u64,
    pub crossed: Vec<CrossedTick>,
    pub steps: u16,
}

/// Swap `amount` against the curve starting at `start`. `exact_input` selects
/// whether `amount` is the input to spend or the output to receive.
pub fn execute_curve_swap<T: TickCrossing + ?Sized>(
    start: CurveCursor,
    ticks: &T,
    direction: SwapDirection,
    exact_input: bool,
    amount: u64,
    fees: SwapFees,
    max_steps: u16,
) -> EngineResult<CurveSwapResult> {
    let zero_for_one = direction.is_zero_for_one();
    let fee_pips = swap_fee(fees.protocol_fee, fees.lp_fee);
    if !exact_input && fee_pips >= PIPS_DENOMINATOR {
        return Err(EngineError::InvalidFeeForExactOut);
    }

    let price_limit = if zero_for_one {
        MIN_SQRT_PRICE_X64 + 1
    } else {
        MAX_SQRT_PRICE_X64 - 1
    };

    let mut state = start;
    let mut result = CurveSwapResult::default();
    let mut amount_remaining = amount;
    let mut amount_in_total: u64 = 0;
    let mut amount_out_total: u64 = 0;

    while amount_remaining > 0 {
        if state.sqrt_price_x64 == price_limit {
            return Err(EngineError::InsufficientLiquidity);
        }

        result.steps += 1;
        if result.steps > max_steps {
            return Err(EngineError::SwapStepLimitExceeded(max_steps));
        }

        let tick_next = ticks
            .next_initialized_tick(state.tick, zero_for_one)
            .map(|tick| tick.clamp(MIN_TICK, MAX_TICK));
        let sqrt_price_next = match tick_next {
            Some(tick) => sqrt_price_at_tick(tick)?,
            None => price_limit,
        };

        // Clamp to the price limit
        let sqrt_price_target = if zero_for_one {
            sqrt_price_next.max(price_limit)
        } else {
            sqrt_price_next.min(price_limit)
        };

        let sqrt_price_start = state.sqrt_price_x64;
        let step = compute_swap_step(
            sqrt_price_start,
            sqrt_price_target,
            state.liquidity,
            amount_remaining,
            exact_input,
            fee_pips,
        )?;

        let step_in = step
            .amount_in
            .checked_add(step.fee_amount)
            .ok_or(EngineError::AmountOverflow)?;
        if exact_input {
            amount_remaining -= step_in;
        } else {
            amount_remaining -= step.amount_out;
        }
        amount_in_total = amount_in_total
            .checked_add(step_in)
            .ok_or(EngineError::AmountOverflow)?;
        amount_out_total = amount_out_total
            .checked_add(step.amount_out)
            .ok_or(EngineError::AmountOverflow)?;

        // Split the protocol's share out of the step fee
        let mut lp_fee_amount = step.fee_amount;
        if fees.protocol_fee > 0 {
            let protocol_delta = if fee_pips == fees.protocol_fee {
                step.fee_amount
            } else {
                ((step_in as u128 * fees.protocol_fee as u128) / PIPS_DENOMINATOR as u128) as u64
            }
            .min(step.fee_amount);
            lp_fee_amount -= protocol_delta;
            result.protocol_fee_amount += protocol_delta;
        }

        if state.liquidity > 0 && lp_fee_amount > 0 {
            let growth = ((lp_fee_amount as u128) << 64) / state.liquidity;
            if zero_for_one {
                state.fee_growth_global_0_x64 = state.fee_growth_global_0_x64.wrapping_add(growth);
            } else {
                state.fee_growth_global_1_x64 = state.fee_growth_global_1_x64.wrapping_add(growth);
            }
        }

        state.sqrt_price_x64 = step.sqrt_price_next;

        match tick_next {
            Some(tick) if step.sqrt_price_next == sqrt_price_next => {
                result.crossed.push(CrossedTick {
                    tick,
                    fee_growth_global_0_x64: state.fee_growth_global_0_x64,
                    fee_growth_global_1_x64: state.fee_growth_global_1_x64,
                });
                let liquidity_net = ticks.liquidity_net(tick);
                let liquidity_net = if zero_for_one {
                    -liquidity_net
                } else {
                    liquidity_net
                };
                state.liquidity = add_liquidity_delta(state.liquidity, liquidity_net)?;
                state.tick = if zero_for_one { tick - 1 } else { tick };
            }
            _ => {
                if step.sqrt_price_next != sqrt_price_start {
                    state.tick = tick_at_sqrt_price(step.sqrt_price_next)?;
                }
            }
        }
    }

    result.cursor = state;
    result.amount_in = amount_in_total;
    result.amount_out = amount_out_total;
    Ok(result)
}

/// Walk a cursor back to `sqrt_price_x64` without trading, undoing the
/// liquidity changes of every tick between the two prices
pub fn reposition_cursor<T: TickCrossing + ?Sized>(
    from: CurveCursor,
    ticks: &T,
    sqrt_price_x64: u128,
    tick: i32,
) -> EngineResult<CurveCursor> {
    let mut cursor = from;
    let mut current = from.tick;

    if tick > current {
        // Moving up re-enters ranges crossed on the way down
        while let Some(next) = ticks.next_initialized_tick(current, false) {
            if next > tick {
                break;
            }
            cursor.liquidity = add_liquidity_delta(cursor.liquidity, ticks.liquidity_net(next))?;
            current = next;
        }
    } else if tick < current {
        while let Some(next) = ticks.next_initialized_tick(current, true) {
            if next <= tick {
                break;
            }
            cursor.liquidity = add_liquidity_delta(cursor.liquidity, -ticks.liquidity_net(next))?;
            current = next - 1;
        }
    }

    cursor.sqrt_price_x64 = sqrt_price_x64;
    cursor.tick = tick;
    Ok(cursor)
}
