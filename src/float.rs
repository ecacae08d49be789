//! Float64 canonicality check (spec §3/§4.2): DAG-CBOR forbids NaN and ±Infinity, but
//! unlike stricter CBOR profiles, it does not forbid negative zero or require a single
//! canonical NaN bit pattern — both `-0.0` and any NaN payload round-trip unchanged.

use crate::ErrorCode;

const EXP_MASK: u64 = 0x7ff0_0000_0000_0000;
const MANT_MASK: u64 = 0x000f_ffff_ffff_ffff;

/// Check that the IEEE-754 binary64 bit pattern `bits` is neither NaN nor ±Infinity.
#[inline]
#[must_use]
pub const fn is_disallowed(bits: u64) -> bool {
    (bits & EXP_MASK) == EXP_MASK
}

/// Validate a float64 bit pattern, rejecting NaN and ±Infinity.
#[inline]
pub const fn validate_f64_bits(bits: u64) -> Result<(), ErrorCode> {
    if is_disallowed(bits) {
        return Err(ErrorCode::DisallowedFloat);
    }
    let _ = MANT_MASK;
    Ok(())
}
