//! # Engine Constants
//!
//! Fixed bounds shared by the curve math, the registry and the swap engine:
//! - Fixed-point scale factors
//! - Tick and sqrt price bounds
//! - Fee encoding (pips, dynamic sentinel, protocol fee packing)
//! - Hook permission bit layout

// ============================================================================
// Mathematical Constants
// ============================================================================

/// Q64 fixed-point scale factor: 2^64
pub const Q64: u128 = 1u128 << 64;

// ============================================================================
// Tick and Price Bounds
// ============================================================================

/// Minimum tick representable by the Q64.64 curve
pub const MIN_TICK: i32 = -443_636;

/// Maximum tick representable by the Q64.64 curve
pub const MAX_TICK: i32 = 443_636;

/// sqrt(1.0001^MIN_TICK) in Q64.64
pub const MIN_SQRT_PRICE_X64: u128 = 4_295_048_016;

/// sqrt(1.0001^MAX_TICK) in Q64.64
pub const MAX_SQRT_PRICE_X64: u128 = 79_226_673_515_401_279_992_447_579_055;

/// Minimum tick spacing
pub const MIN_TICK_SPACING: i32 = 1;

/// Maximum tick spacing
pub const MAX_TICK_SPACING: i32 = 32_767;

// ============================================================================
// Fee Structure Constants
// ============================================================================

/// Fee denominator, fees are expressed in pips (hundredths of a basis point)
pub const PIPS_DENOMINATOR: u32 = 1_000_000;

/// Maximum LP fee (100%)
pub const MAX_LP_FEE: u32 = 1_000_000;

/// Pool fee sentinel marking a pool whose LP fee is set by its hook
pub const DYNAMIC_FEE_FLAG: u32 = 0x80_0000;

/// Maximum protocol fee per direction (0.1%)
pub const MAX_PROTOCOL_FEE: u32 = 1_000;

// ============================================================================
// Hook Permission Bits
// ============================================================================

pub const BEFORE_INITIALIZE_FLAG: u16 = 1 << 13;
pub const AFTER_INITIALIZE_FLAG: u16 = 1 << 12;
pub const BEFORE_ADD_LIQUIDITY_FLAG: u16 = 1 << 11;
pub const AFTER_ADD_LIQUIDITY_FLAG: u16 = 1 << 10;
pub const BEFORE_REMOVE_LIQUIDITY_FLAG: u16 = 1 << 9;
pub const AFTER_REMOVE_LIQUIDITY_FLAG: u16 = 1 << 8;
pub const BEFORE_SWAP_FLAG: u16 = 1 << 7;
pub const AFTER_SWAP_FLAG: u16 = 1 << 6;
pub const BEFORE_DONATE_FLAG: u16 = 1 << 5;
pub const AFTER_DONATE_FLAG: u16 = 1 << 4;
pub const BEFORE_SWAP_RETURNS_DELTA_FLAG: u16 = 1 << 3;
pub const AFTER_SWAP_RETURNS_DELTA_FLAG: u16 = 1 << 2;
pub const AFTER_ADD_LIQUIDITY_RETURNS_DELTA_FLAG: u16 = 1 << 1;
pub const AFTER_REMOVE_LIQUIDITY_RETURNS_DELTA_FLAG: u16 = 1 << 0;

/// Mask covering every permission bit encoded in a hook address
pub const ALL_HOOK_MASK: u16 = (1 << 14) - 1;

// ============================================================================
// Swap Execution
// ============================================================================

/// Default number of curve steps a single swap execution may take
pub const DEFAULT_MAX_SWAP_STEPS: u16 = 256;
