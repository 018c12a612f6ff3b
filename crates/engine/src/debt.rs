//! Debt accrual: replays the pool's interest formulas from the snapshot to an evaluation instant.
//!
//! Variable debt compounds off `lastUpdateTimestamp`; stable debt grows
//! linearly off its own `stableDebtLastUpdateTimestamp`.

use alloy::primitives::U256;

use lendview_common::error::ReserveError;
use lendview_math::FixedDecimal;
use lendview_math::interest::{calculate_compounded_interest, calculate_linear_interest};
use lendview_math::ray::ray_mul;

use crate::snapshot::ReserveSnapshot;

/// Accrued reserve debt in human units (scale = token decimals).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReserveDebt {
    pub total_debt: FixedDecimal,
    pub total_variable_debt: FixedDecimal,
    pub total_stable_debt: FixedDecimal,
}

/// Strategy used by the formatter to obtain accrued debt.
pub trait DebtCalculator: Send + Sync {
    fn calculate(
        &self,
        snapshot: &ReserveSnapshot,
        current_timestamp: u64,
    ) -> Result<ReserveDebt, ReserveError>;
}

/// The pool's own accrual rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProtocolDebtCalculator;

impl DebtCalculator for ProtocolDebtCalculator {
    fn calculate(
        &self,
        snapshot: &ReserveSnapshot,
        current_timestamp: u64,
    ) -> Result<ReserveDebt, ReserveError> {
        calculate_reserve_debt(snapshot, current_timestamp)
    }
}

impl<F> DebtCalculator for F
where
    F: Fn(&ReserveSnapshot, u64) -> Result<ReserveDebt, ReserveError> + Send + Sync,
{
    fn calculate(
        &self,
        snapshot: &ReserveSnapshot,
        current_timestamp: u64,
    ) -> Result<ReserveDebt, ReserveError> {
        self(snapshot, current_timestamp)
    }
}

/// Seconds between `last_update` and `current_timestamp`.
///
/// Fails with `InvalidTimestamp` when the evaluation instant precedes the update.
pub fn elapsed_seconds(
    current_timestamp: u64,
    last_update: u64,
    label: &str,
) -> Result<u64, ReserveError> {
    current_timestamp.checked_sub(last_update).ok_or_else(|| {
        ReserveError::InvalidTimestamp(format!(
            "current timestamp {current_timestamp} precedes {label} {last_update}"
        ))
    })
}

/// Variable borrow index compounded forward by `elapsed` seconds (ray).
pub fn current_variable_borrow_index(
    snapshot: &ReserveSnapshot,
    elapsed: u64,
) -> Result<U256, ReserveError> {
    let factor = calculate_compounded_interest(snapshot.variable_borrow_rate, elapsed)?;
    ray_mul(snapshot.variable_borrow_index, factor)
}

/// Liquidity index grown linearly by `elapsed` seconds (ray).
pub fn current_liquidity_index(
    snapshot: &ReserveSnapshot,
    elapsed: u64,
) -> Result<U256, ReserveError> {
    let factor = calculate_linear_interest(snapshot.liquidity_rate, elapsed)?;
    ray_mul(factor, snapshot.liquidity_index)
}

/// Total, variable and stable debt of the reserve at `current_timestamp`.
pub fn calculate_reserve_debt(
    snapshot: &ReserveSnapshot,
    current_timestamp: u64,
) -> Result<ReserveDebt, ReserveError> {
    // Both legs are checked before any arithmetic
    let variable_elapsed = elapsed_seconds(
        current_timestamp,
        snapshot.last_update_timestamp,
        "lastUpdateTimestamp",
    )?;
    let stable_elapsed = elapsed_seconds(
        current_timestamp,
        snapshot.stable_debt_last_update_timestamp,
        "stableDebtLastUpdateTimestamp",
    )?;

    let variable_index = current_variable_borrow_index(snapshot, variable_elapsed)?;
    let variable = ray_mul(snapshot.total_scaled_variable_debt, variable_index)?;

    let stable_factor = calculate_linear_interest(snapshot.average_stable_rate, stable_elapsed)?;
    let stable = ray_mul(snapshot.total_principal_stable_debt, stable_factor)?;

    let total = variable
        .checked_add(stable)
        .ok_or_else(|| ReserveError::Arithmetic("overflow in total debt".to_string()))?;

    Ok(ReserveDebt {
        total_debt: FixedDecimal::new(total, snapshot.decimals),
        total_variable_debt: FixedDecimal::new(variable, snapshot.decimals),
        total_stable_debt: FixedDecimal::new(stable, snapshot.decimals),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lendview_math::ray::{RAY, SECONDS_PER_YEAR};

    const T0: u64 = 1_700_000_000;

    /// 1000.000000 scaled variable debt at index 1.0 and 10% variable APR;
    /// 500.000000 stable principal at 12% average rate.
    fn make_snapshot() -> ReserveSnapshot {
        ReserveSnapshot {
            decimals: 6,
            base_ltv_as_collateral: U256::from(8_000u64),
            reserve_liquidation_threshold: U256::from(8_500u64),
            reserve_liquidation_bonus: U256::from(10_500u64),
            reserve_factor: U256::from(1_000u64),
            liquidity_index: RAY,
            variable_borrow_index: RAY,
            liquidity_rate: RAY / U256::from(50u64),
            variable_borrow_rate: RAY / U256::from(10u64),
            stable_borrow_rate: RAY * U256::from(3u64) / U256::from(20u64),
            available_liquidity: U256::from(2_000_000_000u64),
            total_scaled_variable_debt: U256::from(1_000_000_000u64),
            total_principal_stable_debt: U256::from(500_000_000u64),
            average_stable_rate: RAY * U256::from(3u64) / U256::from(25u64),
            last_update_timestamp: T0,
            stable_debt_last_update_timestamp: T0,
        }
    }

    #[test]
    fn test_zero_elapsed_returns_principals() {
        let debt = calculate_reserve_debt(&make_snapshot(), T0).unwrap();
        assert_eq!(debt.total_variable_debt.to_string(), "1000");
        assert_eq!(debt.total_stable_debt.to_string(), "500");
        assert_eq!(debt.total_debt.to_string(), "1500");
    }

    #[test]
    fn test_one_year_accrual() {
        let debt = calculate_reserve_debt(&make_snapshot(), T0 + SECONDS_PER_YEAR).unwrap();
        // 500 * (1 + 0.12)
        assert_eq!(debt.total_stable_debt.to_string(), "560");
        // binomial approximation of e^0.1 undershoots 1105.170918
        assert_eq!(debt.total_variable_debt.to_string(), "1105.16727");
        assert_eq!(debt.total_debt.to_string(), "1665.16727");
    }

    #[test]
    fn test_legs_use_their_own_timestamps() {
        let mut snapshot = make_snapshot();
        snapshot.stable_debt_last_update_timestamp = T0 - SECONDS_PER_YEAR;
        let debt = calculate_reserve_debt(&snapshot, T0).unwrap();
        assert_eq!(debt.total_variable_debt.to_string(), "1000");
        assert_eq!(debt.total_stable_debt.to_string(), "560");
    }

    #[test]
    fn test_total_is_sum_of_legs() {
        let snapshot = make_snapshot();
        for elapsed in [0u64, 1, 59, 3_600, 86_400, SECONDS_PER_YEAR] {
            let debt = calculate_reserve_debt(&snapshot, T0 + elapsed).unwrap();
            assert_eq!(
                debt.total_debt,
                debt.total_variable_debt
                    .checked_add(&debt.total_stable_debt)
                    .unwrap()
            );
        }
    }

    #[test]
    fn test_monotonic_in_time() {
        let snapshot = make_snapshot();
        let mut previous = calculate_reserve_debt(&snapshot, T0).unwrap();
        for elapsed in [1u64, 2, 3, 600, 86_400, SECONDS_PER_YEAR] {
            let debt = calculate_reserve_debt(&snapshot, T0 + elapsed).unwrap();
            assert!(debt.total_debt.raw() >= previous.total_debt.raw());
            assert!(debt.total_variable_debt.raw() >= previous.total_variable_debt.raw());
            assert!(debt.total_stable_debt.raw() >= previous.total_stable_debt.raw());
            previous = debt;
        }
    }

    #[test]
    fn test_rejects_timestamp_before_variable_update() {
        let err = calculate_reserve_debt(&make_snapshot(), T0 - 1).unwrap_err();
        assert!(matches!(err, ReserveError::InvalidTimestamp(_)));
    }

    #[test]
    fn test_rejects_timestamp_before_stable_update() {
        let mut snapshot = make_snapshot();
        snapshot.stable_debt_last_update_timestamp = T0 + 10;
        let err = calculate_reserve_debt(&snapshot, T0 + 5).unwrap_err();
        assert!(matches!(err, ReserveError::InvalidTimestamp(_)));
    }

    #[test]
    fn test_closure_calculator() {
        let stub = |_: &ReserveSnapshot, _: u64| -> Result<ReserveDebt, ReserveError> {
            Ok(ReserveDebt {
                total_debt: FixedDecimal::zero(),
                total_variable_debt: FixedDecimal::zero(),
                total_stable_debt: FixedDecimal::zero(),
            })
        };
        let debt = stub.calculate(&make_snapshot(), T0 + 100).unwrap();
        assert!(debt.total_debt.is_zero());
    }

    #[test]
    fn test_current_indices() {
        let snapshot = make_snapshot();
        assert_eq!(current_variable_borrow_index(&snapshot, 0).unwrap(), RAY);
        assert_eq!(current_liquidity_index(&snapshot, 0).unwrap(), RAY);
        assert_eq!(
            current_liquidity_index(&snapshot, SECONDS_PER_YEAR)
                .unwrap()
                .to_string(),
            "1020000000000000000000000000"
        );
    }
}
