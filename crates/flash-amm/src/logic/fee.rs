//! Fee encoding and combination rules.

use tracing::warn;

use super::engine::SwapDirection;
use crate::constants::{DYNAMIC_FEE_FLAG, MAX_LP_FEE, MAX_PROTOCOL_FEE, PIPS_DENOMINATOR};
use crate::error::{EngineError, EngineResult};

pub fn is_dynamic_fee(fee: u32) -> bool {
    fee == DYNAMIC_FEE_FLAG
}

/// LP fee a pool starts with: the static value, or zero until the hook sets one
pub fn initial_lp_fee(fee: u32) -> EngineResult<u32> {
    if is_dynamic_fee(fee) {
        return Ok(0);
    }
    validate_lp_fee(fee)?;
    Ok(fee)
}

pub fn validate_lp_fee(fee: u32) -> EngineResult<()> {
    if fee > MAX_LP_FEE {
        return Err(EngineError::FeeTooHigh(fee));
    }
    Ok(())
}

/// A packed protocol fee is valid when it fits in 24 bits and each 12-bit
/// half is at most `MAX_PROTOCOL_FEE`
pub fn is_valid_protocol_fee(protocol_fee: u32) -> bool {
    protocol_fee >> 24 == 0
        && protocol_fee & 0xfff <= MAX_PROTOCOL_FEE
        && protocol_fee >> 12 <= MAX_PROTOCOL_FEE
}

/// Protocol fee reported by the host, or zero if it is malformed
pub fn sanitize_protocol_fee(protocol_fee: u32) -> u32 {
    if is_valid_protocol_fee(protocol_fee) {
        protocol_fee
    } else {
        warn!(protocol_fee, "invalid protocol fee from host, using 0");
        0
    }
}

/// The half of a packed protocol fee that applies to `direction`
pub fn directional_protocol_fee(protocol_fee: u32, direction: SwapDirection) -> u32 {
    match direction {
        SwapDirection::ZeroForOne => protocol_fee & 0xfff,
        SwapDirection::OneForZero => protocol_fee >> 12,
    }
}

/// Total fee charged on input when the protocol takes its share first and the
/// LP fee applies to what remains
pub fn swap_fee(protocol_fee: u32, lp_fee: u32) -> u32 {
    if protocol_fee == 0 {
        return lp_fee;
    }
    let protocol = protocol_fee as u64;
    let lp = lp_fee as u64;
    (protocol + lp - protocol * lp / PIPS_DENOMINATOR as u64) as u32
}
