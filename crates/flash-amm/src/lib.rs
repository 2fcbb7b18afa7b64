//! # Flash AMM - Flash-Accounting Pool Manager
//!
//! A concentrated-liquidity pool manager in which balances move only inside
//! an unlocked scope and must net to zero before it closes. Swaps run through
//! a sandwich-resistant engine that prices later swaps in a window against a
//! shadow state anchored at the window's opening price.
//!
//! - `manager`: the `PoolManager` value and its read views
//! - `instructions`: unlock, settlement, initialize, modify-liquidity, swap,
//!   donate and fee updates
//! - `logic`: curve math, the swap loop, fees, hook permissions and events
//! - `state`: addresses, pool keys, the delta ledger and pool state
//! - `host`: the environment the manager runs against

pub mod config;
pub mod constants;
pub mod error;
pub mod host;
pub mod instructions;
pub mod logic;
pub mod manager;
pub mod state;

#[cfg(test)]
pub(crate) mod test_utils;

pub use config::{init_tracing, EngineConfig};
pub use constants::*;
pub use error::{EngineError, EngineResult};
pub use host::Host;
pub use instructions::{SwapOutcome, SwapParams};
pub use logic::{
    EngineEvent, EventBase, Permissions, PricingSource, SwapDirection, CAPABILITIES,
};
pub use manager::{ManagerState, PoolManager};
pub use state::*;
