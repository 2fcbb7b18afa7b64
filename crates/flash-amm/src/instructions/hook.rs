use crate::error::{EngineError, EngineResult};
use crate::host::Host;
use crate::manager::PoolManager;
use crate::state::{Address, ModifyLiquidityParams, PoolKey};

impl<H: Host> PoolManager<H> {
    /// Add-liquidity interception for pools that use this engine as their
    /// hook. Liquidity must go through `modify_liquidity` instead.
    pub fn before_add_liquidity(
        &self,
        _sender: Address,
        _key: &PoolKey,
        _params: &ModifyLiquidityParams,
    ) -> EngineResult<()> {
        Err(EngineError::DirectDepositRequired)
    }
}
