use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::host::Host;
use crate::instructions::donate::growth_per_liquidity;
use crate::logic::event::{EngineEvent, Swap};
use crate::logic::fee::is_dynamic_fee;
use crate::logic::{PricingSource, SwapDirection, SwapRequest};
use crate::manager::PoolManager;
use crate::state::{Address, BalanceDelta, PoolKey};

/// Swap parameters: a negative `amount_specified` is exact input, positive is
/// exact output
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapParams {
    pub direction: SwapDirection,
    pub amount_specified: i64,
}

impl SwapParams {
    pub fn exact_input(direction: SwapDirection, amount: u64) -> Self {
        Self {
            direction,
            amount_specified: -(amount.min(i64::MAX as u64) as i64),
        }
    }

    pub fn exact_output(direction: SwapDirection, amount: u64) -> Self {
        Self {
            direction,
            amount_specified: amount.min(i64::MAX as u64) as i64,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SwapOutcome {
    /// Caller's delta: negative for what it pays, positive for what it receives
    pub delta: BalanceDelta,
    /// LP fee applied, reported for dynamic-fee pools only
    pub fee_override: Option<u32>,
}

impl<H: Host> PoolManager<H> {
    /// Execute a swap through the sandwich-resistant engine and account the
    /// priced amounts to `sender`
    pub fn swap(
        &mut self,
        sender: Address,
        key: PoolKey,
        params: SwapParams,
    ) -> EngineResult<SwapOutcome> {
        self.state.lock.ensure_open()?;
        if params.amount_specified == 0 {
            return Err(EngineError::SwapAmountZero);
        }
        let (id, pool) = self.pool(&key)?;

        let request = SwapRequest {
            direction: params.direction,
            exact_input: params.amount_specified < 0,
            amount: params.amount_specified.unsigned_abs(),
        };
        let window_key = self.host.current_window();
        let plan = self
            .swap_engine
            .plan(pool, self.state.windows.get(&id), window_key, request)?;

        let amount_in = plan.accounted.amount_in as i128;
        let amount_out = plan.accounted.amount_out as i128;
        let protocol_fee = plan.accounted.protocol_fee_amount as u128;
        let (delta, protocol_fee0, protocol_fee1) = match params.direction {
            SwapDirection::ZeroForOne => {
                (BalanceDelta::new(-amount_in, amount_out), protocol_fee, 0)
            }
            SwapDirection::OneForZero => {
                (BalanceDelta::new(amount_out, -amount_in), 0, protocol_fee)
            }
        };

        // Surplus from a shadow-priced swap is earned by liquidity in range
        // after the base move; with none in range the protocol keeps it
        let liquidity_after = plan.base.cursor.liquidity;
        let (surplus0, surplus1) = (plan.surplus0 as u128, plan.surplus1 as u128);
        let (growth0, growth1, kept0, kept1) = if liquidity_after > 0 {
            (
                growth_per_liquidity(surplus0, liquidity_after)?,
                growth_per_liquidity(surplus1, liquidity_after)?,
                0,
                0,
            )
        } else {
            (0, 0, surplus0, surplus1)
        };
        let protocol_fees0 = self
            .protocol_fees_accrued(key.currency0)
            .checked_add(protocol_fee0 + kept0)
            .ok_or(EngineError::MathOverflow)?;
        let protocol_fees1 = self
            .protocol_fees_accrued(key.currency1)
            .checked_add(protocol_fee1 + kept1)
            .ok_or(EngineError::MathOverflow)?;

        self.state
            .ledger
            .apply_pair(key.currency0, key.currency1, delta, sender)?;

        let pool = self.pool_mut(&id)?;
        pool.apply_curve_swap(&plan.base.cursor, &plan.base.crossed);
        pool.fee_growth_global_0_x64 = pool.fee_growth_global_0_x64.wrapping_add(growth0);
        pool.fee_growth_global_1_x64 = pool.fee_growth_global_1_x64.wrapping_add(growth1);
        let (sqrt_price_x64, tick, liquidity) =
            (pool.slot0.sqrt_price_x64, pool.slot0.tick, pool.liquidity);

        for (currency, total) in [(key.currency0, protocol_fees0), (key.currency1, protocol_fees1)] {
            if total != 0 {
                self.state.protocol_fees_accrued.insert(currency, total);
            }
        }
        self.state.windows.insert(id, plan.window);

        let shadow = plan.source == PricingSource::Shadow;
        self.state.events.push(EngineEvent::Swap(Swap {
            id,
            sender,
            amount0: delta.amount0,
            amount1: delta.amount1,
            sqrt_price_x64,
            tick,
            liquidity,
            fee: plan.lp_fee,
            shadow,
        }));
        debug!(
            pool = %id,
            sender = %sender,
            amount0 = delta.amount0,
            amount1 = delta.amount1,
            base_in = plan.base.amount_in,
            base_out = plan.base.amount_out,
            surplus0 = plan.surplus0,
            surplus1 = plan.surplus1,
            tick,
            shadow,
            "swap executed"
        );

        Ok(SwapOutcome {
            delta,
            fee_override: is_dynamic_fee(key.fee).then_some(plan.lp_fee),
        })
    }
}
