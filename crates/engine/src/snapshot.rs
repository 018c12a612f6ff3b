//! Boundary validation: turns the raw `ReserveData` strings into typed fixed-point values.
//!
//! All input errors are raised here, before any accrual arithmetic runs.

use alloy::primitives::U256;

use lendview_common::error::ReserveError;
use lendview_common::types::ReserveData;
use lendview_math::ray::RAY;

/// Largest supported token decimals.
pub const MAX_DECIMALS: u32 = 36;

/// A validated reserve snapshot. Immutable for the duration of one calculation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReserveSnapshot {
    pub decimals: u32,
    /// Basis points
    pub base_ltv_as_collateral: U256,
    /// Basis points
    pub reserve_liquidation_threshold: U256,
    /// Basis points, including the 100% principal (`11000` = 10% bonus)
    pub reserve_liquidation_bonus: U256,
    /// Basis points
    pub reserve_factor: U256,
    /// Ray
    pub liquidity_index: U256,
    /// Ray
    pub variable_borrow_index: U256,
    /// Ray
    pub liquidity_rate: U256,
    /// Ray
    pub variable_borrow_rate: U256,
    /// Ray
    pub stable_borrow_rate: U256,
    /// Token base units
    pub available_liquidity: U256,
    /// Token base units, divided by the variable borrow index at last accrual
    pub total_scaled_variable_debt: U256,
    /// Token base units
    pub total_principal_stable_debt: U256,
    /// Ray
    pub average_stable_rate: U256,
    pub last_update_timestamp: u64,
    pub stable_debt_last_update_timestamp: u64,
}

impl TryFrom<&ReserveData> for ReserveSnapshot {
    type Error = ReserveError;

    fn try_from(data: &ReserveData) -> Result<Self, Self::Error> {
        if data.decimals > MAX_DECIMALS {
            return Err(ReserveError::invalid_field(
                "decimals",
                format!("{} exceeds the maximum of {MAX_DECIMALS}", data.decimals),
            ));
        }

        let snapshot = Self {
            decimals: data.decimals,
            base_ltv_as_collateral: parse_fixed("baseLTVasCollateral", &data.base_ltv_as_collateral)?,
            reserve_liquidation_threshold: parse_fixed(
                "reserveLiquidationThreshold",
                &data.reserve_liquidation_threshold,
            )?,
            reserve_liquidation_bonus: parse_fixed(
                "reserveLiquidationBonus",
                &data.reserve_liquidation_bonus,
            )?,
            reserve_factor: parse_fixed("reserveFactor", &data.reserve_factor)?,
            liquidity_index: parse_fixed("liquidityIndex", &data.liquidity_index)?,
            variable_borrow_index: parse_fixed("variableBorrowIndex", &data.variable_borrow_index)?,
            liquidity_rate: parse_fixed("liquidityRate", &data.liquidity_rate)?,
            variable_borrow_rate: parse_fixed("variableBorrowRate", &data.variable_borrow_rate)?,
            stable_borrow_rate: parse_fixed("stableBorrowRate", &data.stable_borrow_rate)?,
            available_liquidity: parse_fixed("availableLiquidity", &data.available_liquidity)?,
            total_scaled_variable_debt: parse_fixed(
                "totalScaledVariableDebt",
                &data.total_scaled_variable_debt,
            )?,
            total_principal_stable_debt: parse_fixed(
                "totalPrincipalStableDebt",
                &data.total_principal_stable_debt,
            )?,
            average_stable_rate: parse_fixed("averageStableRate", &data.average_stable_rate)?,
            last_update_timestamp: parse_timestamp(
                "lastUpdateTimestamp",
                data.last_update_timestamp,
            )?,
            stable_debt_last_update_timestamp: parse_timestamp(
                "stableDebtLastUpdateTimestamp",
                data.stable_debt_last_update_timestamp,
            )?,
        };

        // Indices start at 1.0 and only grow
        if snapshot.liquidity_index < RAY {
            return Err(ReserveError::invalid_field(
                "liquidityIndex",
                "must be at least 1 ray",
            ));
        }
        if snapshot.variable_borrow_index < RAY {
            return Err(ReserveError::invalid_field(
                "variableBorrowIndex",
                "must be at least 1 ray",
            ));
        }

        Ok(snapshot)
    }
}

/// Parse a non-negative fixed-point integer string.
fn parse_fixed(field: &'static str, value: &str) -> Result<U256, ReserveError> {
    if value.is_empty() {
        return Err(ReserveError::invalid_field(field, "empty value"));
    }
    if let Some(bad) = value.chars().find(|c| !c.is_ascii_digit()) {
        return Err(ReserveError::invalid_field(
            field,
            format!("unexpected character {bad:?} in {value:?}"),
        ));
    }
    U256::from_str_radix(value, 10)
        .map_err(|_| ReserveError::invalid_field(field, "value does not fit in 256 bits"))
}

fn parse_timestamp(field: &'static str, value: i64) -> Result<u64, ReserveError> {
    u64::try_from(value)
        .map_err(|_| ReserveError::invalid_field(field, format!("negative timestamp {value}")))
}
