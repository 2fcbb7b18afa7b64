//! # Engine Error Types
//!
//! Every failure aborts the enclosing top-level call. Variants are grouped by
//! where they surface: configuration at initialize, accounting at settle or
//! scope close, authorization at the call site, curve errors from the swap
//! and liquidity paths.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    #[error("Tick spacing {0} is above the maximum")]
    TickSpacingTooLarge(i32),

    #[error("Tick spacing {0} is below the minimum")]
    TickSpacingTooSmall(i32),

    #[error("Currencies out of order: currency0 must sort below currency1")]
    CurrenciesOutOfOrder,

    #[error("Hook address {0} is not valid for this pool")]
    InvalidHookAddress(String),

    #[error("Pool already initialized")]
    PoolAlreadyInitialized,

    #[error("Fee {0} exceeds the maximum LP fee")]
    FeeTooHigh(u32),

    #[error("Sqrt price {0} is outside the representable range")]
    InvalidSqrtPrice(u128),

    #[error("Invalid configuration '{field}': {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    // ========================================================================
    // Accounting Errors
    // ========================================================================
    #[error("Lock scope already open")]
    AlreadyOpen,

    #[error("Lock scope not open")]
    ScopeNotOpen,

    #[error("Scope closed with {0} unsettled balance entries")]
    UnsettledBalance(usize),

    #[error("Native value attached while settling a non-native currency")]
    UnexpectedNativeValue,

    #[error("A different currency is already synced")]
    AlreadySynced,

    #[error("Synced reserves decreased below the baseline")]
    ReserveDecreased,

    #[error("Delta overflow")]
    DeltaOverflow,

    #[error("Clear amount must match the full positive delta")]
    MustClearExactPositiveDelta,

    // ========================================================================
    // Authorization Errors
    // ========================================================================
    #[error("Only the pool hook may update a dynamic LP fee")]
    UnauthorizedFeeUpdate,

    #[error("Liquidity must be deposited directly through modify_liquidity")]
    DirectDepositRequired,

    // ========================================================================
    // Curve Errors
    // ========================================================================
    #[error("Pool not initialized")]
    PoolNotInitialized,

    #[error("Insufficient liquidity")]
    InsufficientLiquidity,

    #[error("Swap amount cannot be zero")]
    SwapAmountZero,

    #[error("Swap exceeded {0} curve steps")]
    SwapStepLimitExceeded(u16),

    #[error("Invalid fee for exact output swap")]
    InvalidFeeForExactOut,

    #[error("Tick {0} out of bounds")]
    TickOutOfBounds(i32),

    #[error("Ticks misordered: {0} >= {1}")]
    TicksMisordered(i32, i32),

    #[error("Lower tick {0} out of bounds")]
    TickLowerOutOfBounds(i32),

    #[error("Upper tick {0} out of bounds")]
    TickUpperOutOfBounds(i32),

    #[error("Tick {0} is not a multiple of tick spacing {1}")]
    TickMisaligned(i32, i32),

    #[error("Tick {0} liquidity overflow")]
    TickLiquidityOverflow(i32),

    #[error("Cannot update an empty position")]
    CannotUpdateEmptyPosition,

    #[error("Position liquidity underflow")]
    PositionLiquidityUnderflow,

    #[error("No liquidity to receive donation")]
    NoLiquidityToDonate,

    #[error("Math overflow")]
    MathOverflow,

    #[error("Token amount exceeds u64")]
    AmountOverflow,

    // ========================================================================
    // Host Errors
    // ========================================================================
    #[error("Host error: {0}")]
    Host(String),
}

/// Result type using engine errors
pub type EngineResult<T> = Result<T, EngineError>;

impl EngineError {
    /// Create a host error from any displayable cause
    pub fn host(cause: impl std::fmt::Display) -> Self {
        Self::Host(cause.to_string())
    }

    /// Create a configuration error
    pub fn invalid_config(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }

    /// Accounting errors are only ever raised at settle or scope-close boundaries
    pub fn is_accounting(&self) -> bool {
        matches!(
            self,
            Self::AlreadyOpen
                | Self::ScopeNotOpen
                | Self::UnsettledBalance(_)
                | Self::UnexpectedNativeValue
                | Self::AlreadySynced
                | Self::ReserveDecreased
                | Self::DeltaOverflow
                | Self::MustClearExactPositiveDelta
        )
    }
}
