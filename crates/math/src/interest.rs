//! Interest accrual formulas used by the pool contracts.

use alloy::primitives::U256;

use lendview_common::error::ReserveError;

use crate::ray::{RAY, SECONDS_PER_YEAR, ray_mul};

fn overflow(op: &str) -> ReserveError {
    ReserveError::Arithmetic(format!("overflow in {op}"))
}

/// Linear growth factor in ray: `RAY + rate * elapsed / SECONDS_PER_YEAR`.
pub fn calculate_linear_interest(rate: U256, elapsed: u64) -> Result<U256, ReserveError> {
    let accrued = rate
        .checked_mul(U256::from(elapsed))
        .ok_or_else(|| overflow("linear interest"))?
        / U256::from(SECONDS_PER_YEAR);
    RAY.checked_add(accrued)
        .ok_or_else(|| overflow("linear interest"))
}

/// Compounded growth factor in ray, `(1 + rate / SECONDS_PER_YEAR)^elapsed`.
///
/// Uses the three-term binomial expansion the contracts use:
///
/// ```text
/// 1 + n*x + n*(n-1)/2 * x^2 + n*(n-1)*(n-2)/6 * x^3
/// ```
///
/// `x` is floored to ray precision, `x^2` and `x^3` go through `ray_mul`, and
/// the `/2` and `/6` divisions floor. It undershoots true compounding over long
/// periods.
pub fn calculate_compounded_interest(rate: U256, elapsed: u64) -> Result<U256, ReserveError> {
    if elapsed == 0 {
        return Ok(RAY);
    }

    let exp = U256::from(elapsed);
    let exp_minus_one = U256::from(elapsed - 1);
    let exp_minus_two = if elapsed > 2 {
        U256::from(elapsed - 2)
    } else {
        U256::ZERO
    };

    let rate_per_second = rate / U256::from(SECONDS_PER_YEAR);
    let base_power_two = ray_mul(rate_per_second, rate_per_second)?;
    let base_power_three = ray_mul(base_power_two, rate_per_second)?;

    let first_term = exp
        .checked_mul(rate_per_second)
        .ok_or_else(|| overflow("compounded interest"))?;
    let second_term = exp
        .checked_mul(exp_minus_one)
        .and_then(|v| v.checked_mul(base_power_two))
        .ok_or_else(|| overflow("compounded interest"))?
        / U256::from(2u64);
    let third_term = exp
        .checked_mul(exp_minus_one)
        .and_then(|v| v.checked_mul(exp_minus_two))
        .and_then(|v| v.checked_mul(base_power_three))
        .ok_or_else(|| overflow("compounded interest"))?
        / U256::from(6u64);

    RAY.checked_add(first_term)
        .and_then(|v| v.checked_add(second_term))
        .and_then(|v| v.checked_add(third_term))
        .ok_or_else(|| overflow("compounded interest"))
}

/// Annual yield in ray for a per-second compounded rate, `compounded(rate, 1y) - RAY`.
pub fn calculate_apy(rate: U256) -> Result<U256, ReserveError> {
    Ok(calculate_compounded_interest(rate, SECONDS_PER_YEAR)? - RAY)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 5% annual rate in ray.
    fn five_percent() -> U256 {
        RAY / U256::from(20u64)
    }

    #[test]
    fn test_zero_elapsed_is_identity() {
        assert_eq!(calculate_compounded_interest(five_percent(), 0).unwrap(), RAY);
        assert_eq!(calculate_linear_interest(five_percent(), 0).unwrap(), RAY);
    }

    #[test]
    fn test_zero_rate_is_identity() {
        assert_eq!(calculate_compounded_interest(U256::ZERO, 86_400).unwrap(), RAY);
        assert_eq!(calculate_linear_interest(U256::ZERO, 86_400).unwrap(), RAY);
    }

    #[test]
    fn test_compounded_short_periods() {
        let rate = five_percent();
        assert_eq!(
            calculate_compounded_interest(rate, 1).unwrap().to_string(),
            "1000000001585489599188229325"
        );
        assert_eq!(
            calculate_compounded_interest(rate, 2).unwrap().to_string(),
            "1000000003170979200890235919"
        );
        assert_eq!(
            calculate_compounded_interest(rate, 3).unwrap().to_string(),
            "1000000004756468805106019786"
        );
    }

    #[test]
    fn test_compounded_one_year() {
        assert_eq!(
            calculate_compounded_interest(five_percent(), SECONDS_PER_YEAR)
                .unwrap()
                .to_string(),
            "1051270908731986166777656000"
        );
    }

    #[test]
    fn test_linear() {
        let rate = five_percent();
        assert_eq!(
            calculate_linear_interest(rate, SECONDS_PER_YEAR).unwrap().to_string(),
            "1050000000000000000000000000"
        );
        assert_eq!(
            calculate_linear_interest(rate, 86_400).unwrap().to_string(),
            "1000136986301369863013698630"
        );
    }

    #[test]
    fn test_compounding_beats_linear_over_a_year() {
        let rate = five_percent();
        let compounded = calculate_compounded_interest(rate, SECONDS_PER_YEAR).unwrap();
        let linear = calculate_linear_interest(rate, SECONDS_PER_YEAR).unwrap();
        assert!(compounded > linear);
    }

    #[test]
    fn test_compounded_is_monotonic_in_time() {
        let rate = five_percent();
        let mut previous = RAY;
        for elapsed in [1u64, 2, 3, 60, 3_600, 86_400, SECONDS_PER_YEAR] {
            let factor = calculate_compounded_interest(rate, elapsed).unwrap();
            assert!(factor >= previous, "factor decreased at {elapsed}s");
            previous = factor;
        }
    }

    #[test]
    fn test_apy() {
        assert_eq!(
            calculate_apy(five_percent()).unwrap().to_string(),
            "51270908731986166777656000"
        );
        assert_eq!(calculate_apy(U256::ZERO).unwrap(), U256::ZERO);
    }
}
