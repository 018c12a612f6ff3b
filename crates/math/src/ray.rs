//! Ray (27-decimal) fixed-point helpers.
//!
//! Rounding follows the pool contracts: `ray_mul` rounds half-up, every other
//! division floors.

use alloy::primitives::U256;

use lendview_common::error::ReserveError;

/// Number of decimals in a ray.
pub const RAY_DECIMALS: u32 = 27;

/// 10^27
pub const RAY: U256 = U256::from_limbs([0x9fd0803ce8000000, 0x33b2e3c, 0, 0]);

/// 10^27 / 2
pub const HALF_RAY: U256 = U256::from_limbs([0x4fe8401e74000000, 0x19d971e, 0, 0]);

/// Seconds in the protocol's (non-leap) year.
pub const SECONDS_PER_YEAR: u64 = 31_536_000;

fn overflow(op: &str) -> ReserveError {
    ReserveError::Arithmetic(format!("overflow in {op}"))
}

/// `(a * b + HALF_RAY) / RAY`
pub fn ray_mul(a: U256, b: U256) -> Result<U256, ReserveError> {
    if a.is_zero() || b.is_zero() {
        return Ok(U256::ZERO);
    }
    let product = a
        .checked_mul(b)
        .and_then(|p| p.checked_add(HALF_RAY))
        .ok_or_else(|| overflow("ray_mul"))?;
    Ok(product / RAY)
}

/// `10^exp`, checked.
pub fn pow10(exp: u32) -> Result<U256, ReserveError> {
    U256::from(10u64)
        .checked_pow(U256::from(exp))
        .ok_or_else(|| overflow("pow10"))
}
