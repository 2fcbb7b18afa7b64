//! Event definitions emitted by the pool manager.
//!
//! Events are appended to the manager's log as operations commit and are
//! rolled back with everything else when a scope fails. Hosts drain them
//! after a successful call.

use serde::{Deserialize, Serialize};

use crate::state::{Address, Currency, PoolId};

// ============================================================================
// Core Event Infrastructure
// ============================================================================

/// Base trait for all engine events
pub trait EventBase {
    fn pool(&self) -> PoolId;
    fn actor(&self) -> Option<Address>;
}

// ============================================================================
// Event Type Definitions
// ============================================================================

/// Emitted when a pool is initialized
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Initialize {
    pub id: PoolId,
    pub currency0: Currency,
    pub currency1: Currency,
    pub fee: u32,
    pub tick_spacing: i32,
    pub hooks: Address,
    pub sqrt_price_x64: u128,
    pub tick: i32,
}

/// Emitted when a position's liquidity changes
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifyLiquidity {
    pub id: PoolId,
    pub owner: Address,
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub liquidity_delta: i128,
}

/// Emitted when a swap is executed. Amounts are the caller's deltas; price
/// fields describe the base state after the swap.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Swap {
    pub id: PoolId,
    pub sender: Address,
    pub amount0: i128,
    pub amount1: i128,
    pub sqrt_price_x64: u128,
    pub tick: i32,
    pub liquidity: u128,
    pub fee: u32,
    /// Whether the window's shadow state priced this swap
    pub shadow: bool,
}

/// Emitted when fees are donated to in-range liquidity
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Donate {
    pub id: PoolId,
    pub sender: Address,
    pub amount0: u128,
    pub amount1: u128,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineEvent {
    Initialize(Initialize),
    ModifyLiquidity(ModifyLiquidity),
    Swap(Swap),
    Donate(Donate),
}

impl EventBase for EngineEvent {
    fn pool(&self) -> PoolId {
        match self {
            EngineEvent::Initialize(e) => e.id,
            EngineEvent::ModifyLiquidity(e) => e.id,
            EngineEvent::Swap(e) => e.id,
            EngineEvent::Donate(e) => e.id,
        }
    }

    fn actor(&self) -> Option<Address> {
        match self {
            EngineEvent::Initialize(_) => None,
            EngineEvent::ModifyLiquidity(e) => Some(e.owner),
            EngineEvent::Swap(e) => Some(e.sender),
            EngineEvent::Donate(e) => Some(e.sender),
        }
    }
}
