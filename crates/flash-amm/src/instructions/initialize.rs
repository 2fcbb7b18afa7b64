use tracing::info;

use crate::error::{EngineError, EngineResult};
use crate::host::Host;
use crate::logic::event::{EngineEvent, Initialize};
use crate::logic::fee::{initial_lp_fee, sanitize_protocol_fee};
use crate::logic::tick_math::tick_at_sqrt_price;
use crate::logic::{Permissions, CAPABILITIES};
use crate::manager::PoolManager;
use crate::state::{Address, PoolKey, PoolState};

impl<H: Host> PoolManager<H> {
    /// Create a pool at `sqrt_price_x64`, returning its starting tick.
    ///
    /// Does not require an open scope: no balances move.
    pub fn initialize(
        &mut self,
        sender: Address,
        key: PoolKey,
        sqrt_price_x64: u128,
    ) -> EngineResult<i32> {
        if key.tick_spacing > self.config.max_tick_spacing {
            return Err(EngineError::TickSpacingTooLarge(key.tick_spacing));
        }
        if key.tick_spacing < self.config.min_tick_spacing {
            return Err(EngineError::TickSpacingTooSmall(key.tick_spacing));
        }
        if key.currency0 >= key.currency1 {
            return Err(EngineError::CurrenciesOutOfOrder);
        }
        if !self.host.is_valid_hook_address(&key.hooks, key.fee)
            || (!key.hooks.is_zero()
                && key.hooks == self.engine_hook
                && !CAPABILITIES.matches(&key.hooks))
        {
            return Err(EngineError::InvalidHookAddress(key.hooks.to_string()));
        }

        let lp_fee = initial_lp_fee(key.fee)?;

        let id = key.to_id();
        if self.state.pools.contains_key(&id) {
            return Err(EngineError::PoolAlreadyInitialized);
        }

        let permissions = Permissions::from_address(&key.hooks);
        if permissions.before_initialize {
            self.host.before_initialize(sender, &key, sqrt_price_x64)?;
        }

        let tick = tick_at_sqrt_price(sqrt_price_x64)?;
        let protocol_fee = sanitize_protocol_fee(self.host.protocol_fee(&key));

        self.state
            .pools
            .insert(id, PoolState::new(sqrt_price_x64, tick, protocol_fee, lp_fee));
        self.state.events.push(EngineEvent::Initialize(Initialize {
            id,
            currency0: key.currency0,
            currency1: key.currency1,
            fee: key.fee,
            tick_spacing: key.tick_spacing,
            hooks: key.hooks,
            sqrt_price_x64,
            tick,
        }));

        if permissions.after_initialize {
            if let Err(err) = self.host.after_initialize(sender, &key, sqrt_price_x64, tick) {
                self.state.pools.remove(&id);
                self.state.events.pop();
                return Err(err);
            }
        }

        info!(
            pool = %id,
            currency0 = %key.currency0,
            currency1 = %key.currency1,
            fee = key.fee,
            tick_spacing = key.tick_spacing,
            tick,
            "pool initialized"
        );
        Ok(tick)
    }
}
