pub mod engine;
pub mod event;
pub mod fee;
pub mod hook;
pub mod liquidity_math;
pub mod position_fees;
pub mod sandwich;
pub mod swap;
pub mod tick_math;

pub use engine::{compute_swap_step, StepResult, SwapDirection};
pub use event::*;
pub use hook::{is_valid_hook_address, Permissions, CAPABILITIES};
pub use sandwich::{
    PricingSource, SandwichResistantSwapEngine, SwapAmounts, SwapPlan, SwapRequest,
};
pub use swap::{execute_curve_swap, CurveSwapResult, SwapFees, TickCrossing};
