//! The pool manager: registry, settlement scope and swap engine in one owned
//! value. Operations live in `instructions`; this module holds the state and
//! the read views.

use std::collections::HashMap;

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::host::Host;
use crate::logic::{EngineEvent, Permissions, SandwichResistantSwapEngine, CAPABILITIES};
use crate::state::{
    Address, Currency, DeltaLedger, LockScope, PoolId, PoolKey, PoolState, PositionInfo,
    PositionKey, ReserveSync, Slot0, TickInfo, WindowState,
};

/// All mutable engine state. Cloned at the start of `unlock` and restored
/// wholesale if the scope fails.
#[derive(Clone, Debug, Default)]
pub struct ManagerState {
    pub(crate) lock: LockScope,
    pub(crate) ledger: DeltaLedger,
    pub(crate) reserves: ReserveSync,
    pub(crate) pools: HashMap<PoolId, PoolState>,
    pub(crate) windows: HashMap<PoolId, WindowState>,
    pub(crate) protocol_fees_accrued: HashMap<Currency, u128>,
    pub(crate) events: Vec<EngineEvent>,
}

pub struct PoolManager<H: Host> {
    pub(crate) host: H,
    pub(crate) config: EngineConfig,
    /// Address under which this engine acts as a pool hook
    pub(crate) engine_hook: Address,
    pub(crate) swap_engine: SandwichResistantSwapEngine,
    pub(crate) state: ManagerState,
}

impl<H: Host> PoolManager<H> {
    pub fn new(host: H, config: EngineConfig, engine_hook: Address) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self {
            host,
            swap_engine: SandwichResistantSwapEngine::new(config.max_swap_steps),
            config,
            engine_hook,
            state: ManagerState::default(),
        })
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn engine_hook(&self) -> Address {
        self.engine_hook
    }

    /// Lifecycle callbacks this engine participates in as a hook
    pub fn capabilities(&self) -> Permissions {
        CAPABILITIES
    }

    // ========================================================================
    // Read views
    // ========================================================================

    pub fn slot0(&self, id: &PoolId) -> Option<Slot0> {
        self.state.pools.get(id).map(|pool| pool.slot0)
    }

    pub fn liquidity(&self, id: &PoolId) -> Option<u128> {
        self.state.pools.get(id).map(|pool| pool.liquidity)
    }

    /// Global fee growth per unit of liquidity for both currencies
    pub fn fee_growth_globals(&self, id: &PoolId) -> Option<(u128, u128)> {
        self.state
            .pools
            .get(id)
            .map(|pool| (pool.fee_growth_global_0_x64, pool.fee_growth_global_1_x64))
    }

    pub fn tick_info(&self, id: &PoolId, tick: i32) -> Option<TickInfo> {
        self.state
            .pools
            .get(id)
            .and_then(|pool| pool.ticks.get(&tick).copied())
    }

    pub fn position(&self, id: &PoolId, key: &PositionKey) -> Option<PositionInfo> {
        self.state
            .pools
            .get(id)
            .and_then(|pool| pool.positions.get(key).copied())
    }

    pub fn currency_delta(&self, owner: Address, currency: Currency) -> i128 {
        self.state.ledger.get(currency, owner)
    }

    pub fn nonzero_delta_count(&self) -> usize {
        self.state.ledger.nonzero_count()
    }

    pub fn protocol_fees_accrued(&self, currency: Currency) -> u128 {
        self.state
            .protocol_fees_accrued
            .get(&currency)
            .copied()
            .unwrap_or(0)
    }

    pub fn window_state(&self, id: &PoolId) -> Option<&WindowState> {
        self.state.windows.get(id)
    }

    pub fn is_unlocked(&self) -> bool {
        self.state.lock.is_open()
    }

    /// Take every event emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.state.events)
    }

    // ========================================================================
    // Internal helpers
    // ========================================================================

    pub(crate) fn pool(&self, key: &PoolKey) -> EngineResult<(PoolId, &PoolState)> {
        let id = key.to_id();
        let pool = self
            .state
            .pools
            .get(&id)
            .ok_or(EngineError::PoolNotInitialized)?;
        Ok((id, pool))
    }

    pub(crate) fn pool_mut(&mut self, id: &PoolId) -> EngineResult<&mut PoolState> {
        self.state
            .pools
            .get_mut(id)
            .ok_or(EngineError::PoolNotInitialized)
    }
}
