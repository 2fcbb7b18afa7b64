//! Engine operations, one file per entry point, each an `impl` block on
//! `PoolManager`.

pub mod donate;
pub mod fee;
pub mod hook;
pub mod initialize;
pub mod modify_liquidity;
pub mod settlement;
pub mod swap;
pub mod unlock;

pub use swap::{SwapOutcome, SwapParams};
