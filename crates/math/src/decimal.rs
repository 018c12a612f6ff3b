//! Exact non-negative decimal numbers backed by a U256 mantissa.

use std::fmt;

use alloy::primitives::{U256, U512};

use lendview_common::error::ReserveError;

use crate::ray::pow10;

/// A decimal value `raw / 10^scale`.
///
/// Equality is structural: `1.0` at scale 1 and `1` at scale 0 are different
/// values of this type even though they print the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixedDecimal {
    raw: U256,
    scale: u32,
}

impl FixedDecimal {
    pub const fn new(raw: U256, scale: u32) -> Self {
        Self { raw, scale }
    }

    pub const fn zero() -> Self {
        Self {
            raw: U256::ZERO,
            scale: 0,
        }
    }

    pub fn raw(&self) -> U256 {
        self.raw
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    pub fn is_zero(&self) -> bool {
        self.raw.is_zero()
    }

    /// Re-express the value with `scale` decimals.
    ///
    /// Growing the scale is exact; shrinking it rounds half-up.
    pub fn rescale(&self, scale: u32) -> Result<Self, ReserveError> {
        if scale >= self.scale {
            let factor = pow10(scale - self.scale)?;
            let raw = self
                .raw
                .checked_mul(factor)
                .ok_or_else(|| ReserveError::Arithmetic("overflow in rescale".to_string()))?;
            return Ok(Self { raw, scale });
        }

        let divisor = pow10(self.scale - scale)?;
        Ok(Self {
            raw: div_half_up(self.raw, divisor),
            scale,
        })
    }

    /// Exact sum; the result carries the larger of the two scales.
    pub fn checked_add(&self, other: &Self) -> Result<Self, ReserveError> {
        let scale = self.scale.max(other.scale);
        let lhs = self.rescale(scale)?;
        let rhs = other.rescale(scale)?;
        let raw = lhs
            .raw
            .checked_add(rhs.raw)
            .ok_or_else(|| ReserveError::Arithmetic("overflow in decimal add".to_string()))?;
        Ok(Self { raw, scale })
    }

    /// Round to at most `places` decimals, half-up. Never grows the scale.
    pub fn round_to(&self, places: u32) -> Result<Self, ReserveError> {
        if places >= self.scale {
            Ok(*self)
        } else {
            self.rescale(places)
        }
    }

    /// `self / other` with `places` decimals, rounded half-up.
    ///
    /// Both operands are aligned to a common scale, so only `10^places` is
    /// applied to the numerator. Intermediates are 512-bit; only a quotient
    /// that does not fit in 256 bits is an error.
    pub fn div_rounded(&self, other: &Self, places: u32) -> Result<Self, ReserveError> {
        if other.is_zero() {
            return Err(ReserveError::Arithmetic(
                "division by zero in decimal div".to_string(),
            ));
        }

        let scale = self.scale.max(other.scale);
        let numerator = widen(self.raw)
            .checked_mul(wide_pow10(scale - self.scale + places)?)
            .ok_or_else(div_overflow)?;
        let denominator = widen(other.raw)
            .checked_mul(wide_pow10(scale - other.scale)?)
            .ok_or_else(div_overflow)?;

        let quotient = numerator / denominator;
        let remainder = numerator % denominator;
        let rounded = if !remainder.is_zero() && remainder >= denominator - remainder {
            quotient + U512::from(1u64)
        } else {
            quotient
        };

        Ok(Self {
            raw: narrow(rounded)?,
            scale: places,
        })
    }
}

fn div_overflow() -> ReserveError {
    ReserveError::Arithmetic("overflow in decimal div".to_string())
}

fn widen(value: U256) -> U512 {
    let [a, b, c, d] = value.into_limbs();
    U512::from_limbs([a, b, c, d, 0, 0, 0, 0])
}

fn narrow(value: U512) -> Result<U256, ReserveError> {
    let limbs = value.as_limbs();
    if limbs[4..].iter().any(|&limb| limb != 0) {
        return Err(div_overflow());
    }
    Ok(U256::from_limbs([limbs[0], limbs[1], limbs[2], limbs[3]]))
}

fn wide_pow10(exp: u32) -> Result<U512, ReserveError> {
    U512::from(10u64)
        .checked_pow(U512::from(exp))
        .ok_or_else(div_overflow)
}

/// `round(numerator / denominator)` with ties away from zero. `denominator` must be non-zero.
fn div_half_up(numerator: U256, denominator: U256) -> U256 {
    let quotient = numerator / denominator;
    let remainder = numerator % denominator;
    // 2r >= d, written so it cannot overflow
    if !remainder.is_zero() && remainder >= denominator - remainder {
        quotient + U256::from(1u64)
    } else {
        quotient
    }
}

impl fmt::Display for FixedDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.raw.to_string();
        let scale = self.scale as usize;
        if scale == 0 {
            return f.write_str(&digits);
        }

        let padded = format!("{digits:0>width$}", width = scale + 1);
        let (integer, fraction) = padded.split_at(padded.len() - scale);
        let fraction = fraction.trim_end_matches('0');
        if fraction.is_empty() {
            f.write_str(integer)
        } else {
            write!(f, "{integer}.{fraction}")
        }
    }
}
