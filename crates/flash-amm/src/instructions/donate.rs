use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::host::Host;
use crate::logic::event::{Donate, EngineEvent};
use crate::manager::PoolManager;
use crate::state::{Address, BalanceDelta, PoolKey};

impl<H: Host> PoolManager<H> {
    /// Distribute `amount0` and `amount1` to in-range liquidity through fee
    /// growth. The sender owes both amounts.
    pub fn donate(
        &mut self,
        sender: Address,
        key: PoolKey,
        amount0: u128,
        amount1: u128,
    ) -> EngineResult<BalanceDelta> {
        self.state.lock.ensure_open()?;
        let (id, pool) = self.pool(&key)?;
        if pool.liquidity == 0 {
            return Err(EngineError::NoLiquidityToDonate);
        }

        let growth0 = growth_per_liquidity(amount0, pool.liquidity)?;
        let growth1 = growth_per_liquidity(amount1, pool.liquidity)?;
        let delta = BalanceDelta::new(-to_signed(amount0)?, -to_signed(amount1)?);

        self.state
            .ledger
            .apply_pair(key.currency0, key.currency1, delta, sender)?;

        let pool = self.pool_mut(&id)?;
        pool.fee_growth_global_0_x64 = pool.fee_growth_global_0_x64.wrapping_add(growth0);
        pool.fee_growth_global_1_x64 = pool.fee_growth_global_1_x64.wrapping_add(growth1);

        self.state.events.push(EngineEvent::Donate(Donate {
            id,
            sender,
            amount0,
            amount1,
        }));
        debug!(pool = %id, sender = %sender, amount0, amount1, "donated");
        Ok(delta)
    }
}

pub(crate) fn growth_per_liquidity(amount: u128, liquidity: u128) -> EngineResult<u128> {
    if amount >> 64 != 0 {
        return Err(EngineError::MathOverflow);
    }
    Ok((amount << 64) / liquidity)
}

fn to_signed(amount: u128) -> EngineResult<i128> {
    i128::try_from(amount).map_err(|_| EngineError::DeltaOverflow)
}
