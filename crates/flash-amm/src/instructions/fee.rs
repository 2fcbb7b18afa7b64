use tracing::info;

use crate::error::{EngineError, EngineResult};
use crate::host::Host;
use crate::logic::fee::{is_dynamic_fee, validate_lp_fee};
use crate::manager::PoolManager;
use crate::state::{Address, PoolKey};

impl<H: Host> PoolManager<H> {
    /// Overwrite the LP fee of a dynamic-fee pool. Only the pool's hook may
    /// call this; no scope is required.
    pub fn update_dynamic_lp_fee(
        &mut self,
        sender: Address,
        key: PoolKey,
        new_fee: u32,
    ) -> EngineResult<()> {
        if !is_dynamic_fee(key.fee) || sender != key.hooks {
            return Err(EngineError::UnauthorizedFeeUpdate);
        }
        validate_lp_fee(new_fee)?;

        let (id, _) = self.pool(&key)?;
        let pool = self.pool_mut(&id)?;
        let old_fee = pool.slot0.lp_fee;
        pool.slot0.lp_fee = new_fee;
        info!(pool = %id, old_fee, new_fee, "dynamic lp fee updated");
        Ok(())
    }
}
