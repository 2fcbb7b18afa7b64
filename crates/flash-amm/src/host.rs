//! External collaborators of the pool manager.

use crate::error::EngineResult;
use crate::logic::hook;
use crate::state::{Address, BalanceDelta, Currency, ModifyLiquidityParams, PoolKey};

/// Everything the manager needs from its environment: token custody, the
/// protocol fee source, the window clock and hook dispatch.
///
/// Callbacks are only invoked when the pool's hook address grants the
/// matching permission bit.
pub trait Host {
    /// Packed per-direction protocol fee for a new pool
    fn protocol_fee(&self, key: &PoolKey) -> u32;

    /// Manager's own balance of `currency`
    fn balance_of_self(&self, currency: Currency) -> u128;

    /// Send `amount` of `currency` from the manager to `to`
    fn transfer(&mut self, currency: Currency, to: Address, amount: u128) -> EngineResult<()>;

    /// Key of the current pricing window, such as a block number
    fn current_window(&self) -> u64;

    fn is_valid_hook_address(&self, hooks: &Address, fee: u32) -> bool {
        hook::is_valid_hook_address(hooks, fee)
    }

    fn before_initialize(
        &mut self,
        _sender: Address,
        _key: &PoolKey,
        _sqrt_price_x64: u128,
    ) -> EngineResult<()> {
        Ok(())
    }

    fn after_initialize(
        &mut self,
        _sender: Address,
        _key: &PoolKey,
        _sqrt_price_x64: u128,
        _tick: i32,
    ) -> EngineResult<()> {
        Ok(())
    }

    fn after_modify_liquidity(
        &mut self,
        _sender: Address,
        _key: &PoolKey,
        _params: &ModifyLiquidityParams,
        _delta: BalanceDelta,
        _fees_accrued: BalanceDelta,
    ) -> EngineResult<()> {
        Ok(())
    }
}
