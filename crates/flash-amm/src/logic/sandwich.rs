//! # Sandwich-Resistant Swap Engine
//!
//! Every pool keeps its authoritative base state plus, per window, a
//! checkpoint of slot0 and a shadow replay. The first swap of a window is
//! priced by the base curve and seeds the shadow. Every later swap in the
//! same window still moves the base curve, but is priced by the shadow:
//!
//! - sells fill first against synthetic bid depth at exactly the checkpoint
//!   price, then walk down the bid cursor
//! - buys fill first against synthetic offer depth at the checkpoint price,
//!   then walk up the offer cursor
//! - net input on either side becomes synthetic depth for the other side
//!
//! The bid never rises above the checkpoint price and the offer never falls
//! below it, so a swap placed after a victim in the same window cannot
//! capture the price impact the victim created.
//!
//! The caller of a shadow-priced swap is never paid more, or charged less,
//! than the base curve moved. Whatever base moved beyond the caller's terms
//! stays in the pool as surplus for in-range liquidity.

use tracing::{debug, warn};

use super::engine::SwapDirection;
use super::fee::{directional_protocol_fee, swap_fee};
use super::liquidity_math::{mul_div_ceil, mul_div_floor};
use super::swap::{execute_curve_swap, reposition_cursor, CurveSwapResult, SwapFees};
use crate::constants::{PIPS_DENOMINATOR, Q64};
use crate::error::{EngineError, EngineResult};
use crate::state::{PoolState, ShadowPoolState, Slot0Checkpoint, WindowState};

/// What the caller asked to swap
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SwapRequest {
    pub direction: SwapDirection,
    pub exact_input: bool,
    /// Input to spend when `exact_input`, otherwise output to receive
    pub amount: u64,
}

/// Amounts charged to the swapper
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SwapAmounts {
    /// Input paid, fees included
    pub amount_in: u64,
    pub amount_out: u64,
    pub protocol_fee_amount: u64,
}

/// Which state priced a swap
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PricingSource {
    Base,
    Shadow,
}

/// Everything a swap will write, computed before any of it is committed
#[derive(Clone, Debug)]
pub struct SwapPlan {
    /// Base curve execution, always committed
    pub base: CurveSwapResult,
    /// Window state after this swap
    pub window: WindowState,
    pub accounted: SwapAmounts,
    /// Token0 the base curve moved beyond the accounted amounts
    pub surplus0: u64,
    /// Token1 the base curve moved beyond the accounted amounts
    pub surplus1: u64,
    /// LP fee applied to the accounted amounts
    pub lp_fee: u32,
    pub source: PricingSource,
}

#[derive(Clone, Copy, Debug)]
pub struct SandwichResistantSwapEngine {
    max_swap_steps: u16,
}

impl SandwichResistantSwapEngine {
    pub fn new(max_swap_steps: u16) -> Self {
        Self { max_swap_steps }
    }

    /// Plan a swap against `pool` for window `window_key`
    pub fn plan(
        &self,
        pool: &PoolState,
        window: Option<&WindowState>,
        window_key: u64,
        request: SwapRequest,
    ) -> EngineResult<SwapPlan> {
        let base_fees = SwapFees {
            lp_fee: pool.slot0.lp_fee,
            protocol_fee: directional_protocol_fee(pool.slot0.protocol_fee, request.direction),
        };
        let base = execute_curve_swap(
            pool.cursor(),
            pool,
            request.direction,
            request.exact_input,
            request.amount,
            base_fees,
            self.max_swap_steps,
        )?;

        match window {
            Some(current) if current.key == window_key => {
                let (shadow, priced) = self.execute_shadow_swap(pool, current, request)?;
                let (accounted, surplus) = reconcile(&base, priced, request.exact_input);
                let surplus_in_token0 = request.direction.is_zero_for_one() != request.exact_input;
                debug!(
                    window = window_key,
                    synthetic_bid = shadow.synthetic_bid,
                    synthetic_offer = shadow.synthetic_offer,
                    surplus,
                    "swap priced by shadow state"
                );
                Ok(SwapPlan {
                    base,
                    window: WindowState {
                        key: current.key,
                        checkpoint: current.checkpoint,
                        shadow,
                    },
                    accounted,
                    surplus0: if surplus_in_token0 { surplus } else { 0 },
                    surplus1: if surplus_in_token0 { 0 } else { surplus },
                    lp_fee: current.checkpoint.lp_fee,
                    source: PricingSource::Shadow,
                })
            }
            previous => {
                if let Some(previous) = previous {
                    if window_key < previous.key {
                        warn!(
                            previous = previous.key,
                            current = window_key,
                            "window key regressed, rebuilding shadow state"
                        );
                    }
                }
                debug!(window = window_key, "opening swap window");

                let checkpoint = Slot0Checkpoint::from(&pool.slot0);
                let window = open_window(window_key, checkpoint, pool, &base, request.direction)?;
                let accounted = SwapAmounts {
                    amount_in: base.amount_in,
                    amount_out: base.amount_out,
                    protocol_fee_amount: base.protocol_fee_amount,
                };
                Ok(SwapPlan {
                    base,
                    window,
                    accounted,
                    surplus0: 0,
                    surplus1: 0,
                    lp_fee: pool.slot0.lp_fee,
                    source: PricingSource::Base,
                })
            }
        }
    }

    /// Price a swap against the window's shadow, returning the updated shadow.
    /// Tick nets are read from `pool`; only the cursors live in the window.
    pub fn execute_shadow_swap(
        &self,
        pool: &PoolState,
        window: &WindowState,
        request: SwapRequest,
    ) -> EngineResult<(ShadowPoolState, SwapAmounts)> {
        let checkpoint = &window.checkpoint;
        let fees = SwapFees {
            lp_fee: checkpoint.lp_fee,
            protocol_fee: directional_protocol_fee(checkpoint.protocol_fee, request.direction),
        };
        let fee_pips = swap_fee(fees.protocol_fee, fees.lp_fee);
        if !request.exact_input && fee_pips >= PIPS_DENOMINATOR {
            return Err(EngineError::InvalidFeeForExactOut);
        }

        let mut shadow = window.shadow;
        let zero_for_one = request.direction.is_zero_for_one();
        let depth = if zero_for_one {
            shadow.synthetic_bid
        } else {
            shadow.synthetic_offer
        };

        let fill = fill_at_checkpoint(
            checkpoint.sqrt_price_x64,
            depth,
            request,
            fee_pips,
            fees.protocol_fee,
        )?;

        let mut cursor = if zero_for_one { shadow.bid } else { shadow.offer };
        if cursor.liquidity > 0 && fill.lp_fee_amount > 0 {
            let growth = ((fill.lp_fee_amount as u128) << 64) / cursor.liquidity;
            if zero_for_one {
                cursor.fee_growth_global_0_x64 = cursor.fee_growth_global_0_x64.wrapping_add(growth);
            } else {
                cursor.fee_growth_global_1_x64 = cursor.fee_growth_global_1_x64.wrapping_add(growth);
            }
        }

        let mut amounts = SwapAmounts {
            amount_in: fill.amount_in,
            amount_out: fill.amount_out,
            protocol_fee_amount: fill.protocol_fee_amount,
        };

        if fill.remaining > 0 {
            let curve = execute_curve_swap(
                cursor,
                pool,
                request.direction,
                request.exact_input,
                fill.remaining,
                fees,
                self.max_swap_steps,
            )?;
            cursor = curve.cursor;
            amounts.amount_in = amounts
                .amount_in
                .checked_add(curve.amount_in)
                .ok_or(EngineError::AmountOverflow)?;
            amounts.amount_out = amounts
                .amount_out
                .checked_add(curve.amount_out)
                .ok_or(EngineError::AmountOverflow)?;
            amounts.protocol_fee_amount += curve.protocol_fee_amount;
        }

        let parked = (amounts.amount_in - amounts.protocol_fee_amount) as u128;
        if zero_for_one {
            shadow.synthetic_bid -= fill.amount_out as u128;
            shadow.bid = cursor;
            shadow.synthetic_offer = shadow
                .synthetic_offer
                .checked_add(parked)
                .ok_or(EngineError::MathOverflow)?;
        } else {
            shadow.synthetic_offer -= fill.amount_out as u128;
            shadow.offer = cursor;
            shadow.synthetic_bid = shadow
                .synthetic_bid
                .checked_add(parked)
                .ok_or(EngineError::MathOverflow)?;
        }

        Ok((shadow, amounts))
    }
}

/// Build the window state after its first swap. The side the swap moved is
/// the base curve's end state; the other side is walked back to the
/// checkpoint price, and the swap's input is parked there as synthetic depth.
pub fn open_window(
    key: u64,
    checkpoint: Slot0Checkpoint,
    pool: &PoolState,
    base: &CurveSwapResult,
    direction: SwapDirection,
) -> EngineResult<WindowState> {
    let moved = base.cursor;
    let pinned = reposition_cursor(moved, pool, checkpoint.sqrt_price_x64, checkpoint.tick)?;
    let parked = (base.amount_in - base.protocol_fee_amount) as u128;

    let shadow = match direction {
        SwapDirection::ZeroForOne => ShadowPoolState {
            bid: moved,
            offer: pinned,
            synthetic_bid: 0,
            synthetic_offer: parked,
        },
        SwapDirection::OneForZero => ShadowPoolState {
            bid: pinned,
            offer: moved,
            synthetic_bid: parked,
            synthetic_offer: 0,
        },
    };

    Ok(WindowState {
        key,
        checkpoint,
        shadow,
    })
}

/// Caller amounts for a shadow-priced swap and the surplus base moved beyond
/// them. Exact input keeps the lower of the two outputs; exact output
/// charges the higher of the two inputs. The protocol's share is the one base
/// carved out of its own input.
fn reconcile(base: &CurveSwapResult, shadow: SwapAmounts, exact_input: bool) -> (SwapAmounts, u64) {
    if exact_input {
        let amount_out = shadow.amount_out.min(base.amount_out);
        let accounted = SwapAmounts {
            amount_in: base.amount_in,
            amount_out,
            protocol_fee_amount: base.protocol_fee_amount,
        };
        (accounted, base.amount_out - amount_out)
    } else {
        let amount_in = shadow.amount_in.max(base.amount_in);
        let accounted = SwapAmounts {
            amount_in,
            amount_out: base.amount_out,
            protocol_fee_amount: base.protocol_fee_amount,
        };
        (accounted, amount_in - base.amount_in)
    }
}

/// A fill against synthetic depth at a flat price
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FlatFill {
    /// Input paid, fees included
    pub amount_in: u64,
    pub amount_out: u64,
    pub lp_fee_amount: u64,
    pub protocol_fee_amount: u64,
    /// Unfilled part of the request, in the request's own units
    pub remaining: u64,
}

/// Fill as much of `request` as `depth` allows at exactly `sqrt_price_x64`.
/// Output rounds down and input rounds up, so the fill never beats the price.
pub fn fill_at_checkpoint(
    sqrt_price_x64: u128,
    depth: u128,
    request: SwapRequest,
    fee_pips: u32,
    protocol_fee: u32,
) -> EngineResult<FlatFill> {
    if depth == 0 || request.amount == 0 {
        return Ok(FlatFill {
            remaining: request.amount,
            ..FlatFill::default()
        });
    }

    let pips = PIPS_DENOMINATOR as u128;
    let fee = fee_pips as u128;
    let direction = request.direction;

    let (amount_in, net_in, amount_out, remaining) = if request.exact_input {
        let amount = request.amount as u128;
        let net_in = mul_div_floor(amount, pips - fee, pips)?;
        let full_out = flat_output(sqrt_price_x64, net_in, direction)?;
        if full_out <= depth {
            (amount, net_in, full_out, 0u128)
        } else {
            let needed_net = flat_input(sqrt_price_x64, depth, direction)?;
            let gross = mul_div_ceil(needed_net, pips, pips - fee)?.min(amount);
            let net_in = needed_net.min(gross);
            (gross, net_in, depth, amount - gross)
        }
    } else {
        let wanted = request.amount as u128;
        let amount_out = wanted.min(depth);
        let net_in = flat_input(sqrt_price_x64, amount_out, direction)?;
        let gross = mul_div_ceil(net_in, pips, pips - fee)?;
        (gross, net_in, amount_out, wanted - amount_out)
    };

    let fee_amount = amount_in - net_in;
    let protocol_fee_amount = if protocol_fee == 0 {
        0
    } else if fee_pips == protocol_fee {
        fee_amount
    } else {
        (amount_in * protocol_fee as u128 / pips).min(fee_amount)
    };

    Ok(FlatFill {
        amount_in: to_u64(amount_in)?,
        amount_out: to_u64(amount_out)?,
        lp_fee_amount: to_u64(fee_amount - protocol_fee_amount)?,
        protocol_fee_amount: to_u64(protocol_fee_amount)?,
        remaining: to_u64(remaining)?,
    })
}

/// Output for `amount_in` at a flat price, rounded down
fn flat_output(sqrt_price_x64: u128, amount_in: u128, direction: SwapDirection) -> EngineResult<u128> {
    match direction {
        // token1 out = token0 in * price
        SwapDirection::ZeroForOne => mul_div_floor(
            mul_div_floor(amount_in, sqrt_price_x64, Q64)?,
            sqrt_price_x64,
            Q64,
        ),
        // token0 out = token1 in / price
        SwapDirection::OneForZero => mul_div_floor(
            mul_div_floor(amount_in, Q64, sqrt_price_x64)?,
            Q64,
            sqrt_price_x64,
        ),
    }
}

/// Input needed for `amount_out` at a flat price, rounded up
fn flat_input(sqrt_price_x64: u128, amount_out: u128, direction: SwapDirection) -> EngineResult<u128> {
    match direction {
        SwapDirection::ZeroForOne => mul_div_ceil(
            mul_div_ceil(amount_out, Q64, sqrt_price_x64)?,
            Q64,
            sqrt_price_x64,
        ),
        SwapDirection::OneForZero => mul_div_ceil(
            mul_div_ceil(amount_out, sqrt_price_x64, Q64)?,
            sqrt_price_x64,
            Q64,
        ),
    }
}

fn to_u64(value: u128) -> EngineResult<u64> {
    u64::try_from(value).map_err(|_| EngineError::AmountOverflow)
}
