use tracing::debug;

use crate::constants::{MAX_TICK, MIN_TICK};
use crate::error::{EngineError, EngineResult};
use crate::host::Host;
use crate::logic::event::{EngineEvent, ModifyLiquidity};
use crate::logic::liquidity_math::{add_liquidity_delta, amounts_from_liquidity};
use crate::logic::position_fees::calculate_position_fee_accrual;
use crate::logic::tick_math::{max_liquidity_per_tick, sqrt_price_at_tick};
use crate::logic::Permissions;
use crate::manager::PoolManager;
use crate::state::{
    Address, BalanceDelta, ModifyLiquidityParams, PoolKey, PoolState, PositionInfo, PositionKey,
    TickInfo, WindowState,
};

impl<H: Host> PoolManager<H> {
    /// Add or remove liquidity for the sender's position. Returns the
    /// caller's delta (principal plus fees) and the fees component alone.
    pub fn modify_liquidity(
        &mut self,
        sender: Address,
        key: PoolKey,
        params: ModifyLiquidityParams,
    ) -> EngineResult<(BalanceDelta, BalanceDelta)> {
        self.state.lock.ensure_open()?;
        let (id, pool) = self.pool(&key)?;
        check_ticks(&params, key.tick_spacing)?;

        let position_key = PositionKey {
            owner: sender,
            tick_lower: params.tick_lower,
            tick_upper: params.tick_upper,
            salt: params.salt,
        };
        let position = pool
            .positions
            .get(&position_key)
            .copied()
            .unwrap_or_default();

        let liquidity_delta = params.liquidity_delta;
        if liquidity_delta == 0 && position.liquidity == 0 {
            return Err(EngineError::CannotUpdateEmptyPosition);
        }
        let position_liquidity = if liquidity_delta < 0 {
            position
                .liquidity
                .checked_sub(liquidity_delta.unsigned_abs())
                .ok_or(EngineError::PositionLiquidityUnderflow)?
        } else {
            position
                .liquidity
                .checked_add(liquidity_delta as u128)
                .ok_or(EngineError::MathOverflow)?
        };

        let max_per_tick = max_liquidity_per_tick(key.tick_spacing);
        let lower = updated_tick(pool, params.tick_lower, liquidity_delta, false, max_per_tick)?;
        let upper = updated_tick(pool, params.tick_upper, liquidity_delta, true, max_per_tick)?;

        let accrual = calculate_position_fee_accrual(
            pool.slot0.tick,
            params.tick_lower,
            params.tick_upper,
            position.liquidity,
            pool.fee_growth_global_0_x64,
            pool.fee_growth_global_1_x64,
            &lower,
            &upper,
            position.fee_growth_inside_0_last_x64,
            position.fee_growth_inside_1_last_x64,
        )?;
        let fees_accrued = BalanceDelta::new(
            accrual.fees_owed_0 as i128,
            accrual.fees_owed_1 as i128,
        );

        let principal = principal_delta(pool, &params)?;
        let caller_delta = principal.checked_add(fees_accrued)?;

        let in_range = pool.slot0.tick >= params.tick_lower && pool.slot0.tick < params.tick_upper;
        let active_liquidity = if in_range {
            add_liquidity_delta(pool.liquidity, liquidity_delta)?
        } else {
            pool.liquidity
        };
        let window = self
            .state
            .windows
            .get(&id)
            .map(|window| shadow_after_liquidity_change(*window, &params))
            .transpose()?;

        // Everything above is validation; the ledger is the last fallible write
        self.state
            .ledger
            .apply_pair(key.currency0, key.currency1, caller_delta, sender)?;

        let pool = self.pool_mut(&id)?;
        write_tick(pool, params.tick_lower, lower);
        write_tick(pool, params.tick_upper, upper);
        pool.positions.insert(
            position_key,
            PositionInfo {
                liquidity: position_liquidity,
                fee_growth_inside_0_last_x64: accrual.fee_growth_inside_0,
                fee_growth_inside_1_last_x64: accrual.fee_growth_inside_1,
            },
        );
        pool.liquidity = active_liquidity;
        if let Some(window) = window {
            self.state.windows.insert(id, window);
        }

        self.state
            .events
            .push(EngineEvent::ModifyLiquidity(ModifyLiquidity {
                id,
                owner: sender,
                tick_lower: params.tick_lower,
                tick_upper: params.tick_upper,
                liquidity_delta,
            }));
        debug!(
            pool = %id,
            owner = %sender,
            tick_lower = params.tick_lower,
            tick_upper = params.tick_upper,
            liquidity_delta,
            amount0 = caller_delta.amount0,
            amount1 = caller_delta.amount1,
            "liquidity modified"
        );

        let permissions = Permissions::from_address(&key.hooks);
        let notify = if liquidity_delta > 0 {
            permissions.after_add_liquidity
        } else {
            permissions.after_remove_liquidity
        };
        if notify {
            self.host
                .after_modify_liquidity(sender, &key, &params, caller_delta, fees_accrued)?;
        }

        Ok((caller_delta, fees_accrued))
    }
}

fn check_ticks(params: &ModifyLiquidityParams, tick_spacing: i32) -> EngineResult<()> {
    if params.tick_lower >= params.tick_upper {
        return Err(EngineError::TicksMisordered(
            params.tick_lower,
            params.tick_upper,
        ));
    }
    if params.tick_lower < MIN_TICK {
        return Err(EngineError::TickLowerOutOfBounds(params.tick_lower));
    }
    if params.tick_upper > MAX_TICK {
        return Err(EngineError::TickUpperOutOfBounds(params.tick_upper));
    }
    for tick in [params.tick_lower, params.tick_upper] {
        if tick % tick_spacing != 0 {
            return Err(EngineError::TickMisaligned(tick, tick_spacing));
        }
    }
    Ok(())
}

/// The tick's state after applying `liquidity_delta`, without writing it
fn updated_tick(
    pool: &PoolState,
    tick: i32,
    liquidity_delta: i128,
    upper: bool,
    max_liquidity: u128,
) -> EngineResult<TickInfo> {
    let mut info = pool.ticks.get(&tick).copied().unwrap_or_default();
    let gross_before = info.liquidity_gross;
    let gross_after = add_liquidity_delta(gross_before, liquidity_delta)
        .map_err(|_| EngineError::PositionLiquidityUnderflow)?;
    if gross_after > max_liquidity {
        return Err(EngineError::TickLiquidityOverflow(tick));
    }

    // Growth below a newly initialized tick is assumed to have happened
    // outside it
    if gross_before == 0 && gross_after > 0 && tick <= pool.slot0.tick {
        info.fee_growth_outside_0_x64 = pool.fee_growth_global_0_x64;
        info.fee_growth_outside_1_x64 = pool.fee_growth_global_1_x64;
    }

    info.liquidity_gross = gross_after;
    info.liquidity_net = if upper {
        info.liquidity_net.checked_sub(liquidity_delta)
    } else {
        info.liquidity_net.checked_add(liquidity_delta)
    }
    .ok_or(EngineError::TickLiquidityOverflow(tick))?;
    Ok(info)
}

fn write_tick(pool: &mut PoolState, tick: i32, info: TickInfo) {
    if info.liquidity_gross == 0 {
        pool.ticks.remove(&tick);
    } else {
        pool.ticks.insert(tick, info);
    }
}

/// The open window with both shadow cursors seeing the new position. Tick
/// nets are read from the pool itself, so only the cursors' active liquidity
/// needs adjusting.
fn shadow_after_liquidity_change(
    mut window: WindowState,
    params: &ModifyLiquidityParams,
) -> EngineResult<WindowState> {
    let shadow = &mut window.shadow;
    for cursor in [&mut shadow.bid, &mut shadow.offer] {
        if cursor.tick >= params.tick_lower && cursor.tick < params.tick_upper {
            cursor.liquidity = add_liquidity_delta(cursor.liquidity, params.liquidity_delta)?;
        }
    }
    Ok(window)
}

/// Principal owed (adding) or returned (removing) at the current price
fn principal_delta(pool: &PoolState, params: &ModifyLiquidityParams) -> EngineResult<BalanceDelta> {
    if params.liquidity_delta == 0 {
        return Ok(BalanceDelta::ZERO);
    }
    let adding = params.liquidity_delta > 0;
    let (amount0, amount1) = amounts_from_liquidity(
        pool.slot0.sqrt_price_x64,
        sqrt_price_at_tick(params.tick_lower)?,
        sqrt_price_at_tick(params.tick_upper)?,
        params.liquidity_delta.unsigned_abs(),
        adding,
    )?;
    let (amount0, amount1) = (amount0 as i128, amount1 as i128);
    Ok(if adding {
        BalanceDelta::new(-amount0, -amount1)
    } else {
        BalanceDelta::new(amount0, amount1)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::constants::Q64;
    use crate::state::Currency;
    use crate::test_utils::TestHost;

    fn key() -> PoolKey {
        PoolKey {
            currency0: Currency(Address::with_low_bits(0x01, 0)),
            currency1: Currency(Address::with_low_bits(0x02, 0)),
            fee: 3000,
            tick_spacing: 10,
            hooks: Address::ZERO,
        }
    }

    fn params(tick_lower: i32, tick_upper: i32, liquidity_delta: i128) -> ModifyLiquidityParams {
        ModifyLiquidityParams {
            tick_lower,
            tick_upper,
            liquidity_delta,
            salt: [0u8; 32],
        }
    }

    fn manager() -> PoolManager<TestHost> {
        let mut manager =
            PoolManager::new(TestHost::default(), EngineConfig::default(), Address::ZERO).unwrap();
        manager.initialize(Address::ZERO, key(), Q64).unwrap();
        manager
    }

    #[test]
    fn test_add_liquidity_in_range_owes_both_tokens() {
        let mut manager = manager();
        let lp = Address::with_low_bits(0x0b, 0);
        let _ = manager.unlock(lp, &[], |m, _| {
            let (delta, fees) = m.modify_liquidity(lp, key(), params(-60, 60, 1_000_000))?;
            assert!(delta.amount0 < 0 && delta.amount1 < 0);
            assert!(fees.is_zero());
            assert_eq!(m.liquidity(&key().to_id()), Some(1_000_000));

            // Removing it all returns no more than was paid
            let (back, _) = m.modify_liquidity(lp, key(), params(-60, 60, -1_000_000))?;
            assert!(back.amount0 <= -delta.amount0 && back.amount1 <= -delta.amount1);
            assert!(m.tick_info(&key().to_id(), -60).is_none());
            assert_eq!(m.liquidity(&key().to_id()), Some(0));
            Ok(vec![])
        });
    }

    #[test]
    fn test_out_of_range_position_is_single_sided() {
        let mut manager = manager();
        let lp = Address::with_low_bits(0x0b, 0);
        let _ = manager.unlock(lp, &[], |m, _| {
            let (delta, _) = m.modify_liquidity(lp, key(), params(100, 200, 1_000_000))?;
            assert!(delta.amount0 < 0);
            assert_eq!(delta.amount1, 0);
            assert_eq!(m.liquidity(&key().to_id()), Some(0));
            Ok(vec![])
        });
    }

    #[test]
    fn test_tick_validation() {
        let mut manager = manager();
        let lp = Address::with_low_bits(0x0b, 0);
        let _ = manager.unlock(lp, &[], |m, _| {
            assert_eq!(
                m.modify_liquidity(lp, key(), params(60, -60, 1)),
                Err(EngineError::TicksMisordered(60, -60))
            );
            assert_eq!(
                m.modify_liquidity(lp, key(), params(MIN_TICK - 10, 0, 1)),
                Err(EngineError::TickLowerOutOfBounds(MIN_TICK - 10))
            );
            assert_eq!(
                m.modify_liquidity(lp, key(), params(0, MAX_TICK + 10, 1)),
                Err(EngineError::TickUpperOutOfBounds(MAX_TICK + 10))
            );
            assert_eq!(
                m.modify_liquidity(lp, key(), params(-15, 60, 1)),
                Err(EngineError::TickMisaligned(-15, 10))
            );
            Ok(vec![])
        });
    }

    #[test]
    fn test_position_errors_leave_state_untouched() {
        let mut manager = manager();
        let lp = Address::with_low_bits(0x0b, 0);
        let _ = manager.unlock(lp, &[], |m, _| {
            assert_eq!(
                m.modify_liquidity(lp, key(), params(-60, 60, 0)),
                Err(EngineError::CannotUpdateEmptyPosition)
            );
            assert_eq!(
                m.modify_liquidity(lp, key(), params(-60, 60, -1)),
                Err(EngineError::PositionLiquidityUnderflow)
            );
            assert_eq!(m.nonzero_delta_count(), 0);
            assert!(m.tick_info(&key().to_id(), -60).is_none());
            Ok(vec![])
        });
    }

    #[test]
    fn test_requires_initialized_pool_and_open_scope() {
        let mut manager = manager();
        let lp = Address::with_low_bits(0x0b, 0);
        assert_eq!(
            manager.modify_liquidity(lp, key(), params(-60, 60, 1)),
            Err(EngineError::ScopeNotOpen)
        );

        let mut missing = key();
        missing.fee = 500;
        let result = manager.unlock(lp, &[], |m, _| {
            m.modify_liquidity(lp, missing, params(-60, 60, 1))?;
            Ok(vec![])
        });
        assert_eq!(result, Err(EngineError::PoolNotInitialized));
    }
}
