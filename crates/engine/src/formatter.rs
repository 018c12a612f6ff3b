//! Reserve metrics formatter.
//!
//! Pipeline:
//! 1. Validate the raw reserve data into a `ReserveSnapshot`
//! 2. Accrue debt to the request's timestamp (via a `DebtCalculator`)
//! 3. Derive liquidity, utilization, current indices and APYs
//! 4. Render every figure as an exact decimal string in human units

use alloy::primitives::U256;

use lendview_common::config::FormatterConfig;
use lendview_common::error::ReserveError;
use lendview_common::types::{FormatReserveRequest, FormattedReserve};
use lendview_math::FixedDecimal;
use lendview_math::interest::calculate_apy;
use lendview_math::ray::RAY_DECIMALS;

use crate::debt::{
    DebtCalculator, ProtocolDebtCalculator, current_liquidity_index,
    current_variable_borrow_index, elapsed_seconds,
};
use crate::snapshot::ReserveSnapshot;

/// Decimals of the basis-point risk parameters (`10000` = 1.0).
const LTV_PRECISION: u32 = 4;

/// Formats reserve snapshots into display-ready metrics.
///
/// Holds no mutable state; one instance can serve any number of callers.
#[derive(Debug, Clone)]
pub struct ReserveFormatter<C = ProtocolDebtCalculator> {
    calculator: C,
    config: FormatterConfig,
}

impl ReserveFormatter<ProtocolDebtCalculator> {
    pub fn new() -> Self {
        Self::with_calculator(ProtocolDebtCalculator)
    }
}

impl Default for ReserveFormatter<ProtocolDebtCalculator> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: DebtCalculator> ReserveFormatter<C> {
    /// Use a custom debt calculator (e.g. a stub in tests).
    pub fn with_calculator(calculator: C) -> Self {
        Self {
            calculator,
            config: FormatterConfig::default(),
        }
    }

    pub fn with_config(mut self, config: FormatterConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &FormatterConfig {
        &self.config
    }

    /// Format a reserve at `request.current_timestamp`.
    pub fn format(&self, request: &FormatReserveRequest) -> Result<FormattedReserve, ReserveError> {
        let snapshot = ReserveSnapshot::try_from(&request.reserve)?;
        let current_timestamp = u64::try_from(request.current_timestamp).map_err(|_| {
            ReserveError::InvalidTimestamp(format!(
                "negative current timestamp {}",
                request.current_timestamp
            ))
        })?;
        let elapsed = elapsed_seconds(
            current_timestamp,
            snapshot.last_update_timestamp,
            "lastUpdateTimestamp",
        )?;

        let debt = self.calculator.calculate(&snapshot, current_timestamp)?;

        let decimals = snapshot.decimals;
        let available_liquidity = FixedDecimal::new(snapshot.available_liquidity, decimals);
        let total_liquidity = available_liquidity.checked_add(&debt.total_debt)?;
        let utilization_rate = if total_liquidity.is_zero() {
            FixedDecimal::zero()
        } else {
            debt.total_debt
                .div_rounded(&total_liquidity, self.config.decimal_places)?
        };

        let current_liquidity_index = current_liquidity_index(&snapshot, elapsed)?;
        let current_variable_borrow_index = current_variable_borrow_index(&snapshot, elapsed)?;

        tracing::debug!(
            elapsed,
            total_debt = %debt.total_debt,
            utilization_rate = %utilization_rate,
            "Formatted reserve"
        );

        Ok(FormattedReserve {
            available_liquidity: available_liquidity.to_string(),
            base_ltv_as_collateral: bps(snapshot.base_ltv_as_collateral),
            deposit_incentives_apy: request.deposit_incentives_apy.clone(),
            stable_debt_incentives_apy: request.stable_debt_incentives_apy.clone(),
            variable_debt_incentives_apy: request.variable_debt_incentives_apy.clone(),
            liquidity_index: self.ray(snapshot.liquidity_index)?,
            liquidity_rate: self.ray(snapshot.liquidity_rate)?,
            price: request.price.clone(),
            reserve_factor: bps(snapshot.reserve_factor),
            reserve_liquidation_bonus: bps(liquidation_bonus_premium(
                snapshot.reserve_liquidation_bonus,
            )),
            reserve_liquidation_threshold: bps(snapshot.reserve_liquidation_threshold),
            stable_borrow_rate: self.ray(snapshot.stable_borrow_rate)?,
            total_debt: debt.total_debt.to_string(),
            total_liquidity: total_liquidity.to_string(),
            total_principal_stable_debt: FixedDecimal::new(
                snapshot.total_principal_stable_debt,
                decimals,
            )
            .to_string(),
            total_scaled_variable_debt: FixedDecimal::new(
                snapshot.total_scaled_variable_debt,
                decimals,
            )
            .to_string(),
            total_stable_debt: debt.total_stable_debt.to_string(),
            total_variable_debt: debt.total_variable_debt.to_string(),
            utilization_rate: utilization_rate.to_string(),
            variable_borrow_index: self.ray(snapshot.variable_borrow_index)?,
            variable_borrow_rate: self.ray(snapshot.variable_borrow_rate)?,
            current_liquidity_index: self.ray(current_liquidity_index)?,
            current_variable_borrow_index: self.ray(current_variable_borrow_index)?,
            supply_apy: self.ray(calculate_apy(snapshot.liquidity_rate)?)?,
            variable_borrow_apy: self.ray(calculate_apy(snapshot.variable_borrow_rate)?)?,
            stable_borrow_apy: self.ray(calculate_apy(snapshot.stable_borrow_rate)?)?,
        })
    }

    /// Ray value as a decimal string rounded to the configured places.
    fn ray(&self, value: U256) -> Result<String, ReserveError> {
        Ok(FixedDecimal::new(value, RAY_DECIMALS)
            .round_to(self.config.decimal_places)?
            .to_string())
    }
}

/// Format a reserve with the protocol calculator and default precision.
pub fn format_reserve(request: &FormatReserveRequest) -> Result<FormattedReserve, ReserveError> {
    ReserveFormatter::new().format(request)
}

fn bps(value: U256) -> String {
    FixedDecimal::new(value, LTV_PRECISION).to_string()
}

/// The bonus is stored including the 100% principal; strip it, flooring at zero
/// for reserves that cannot be used as collateral.
fn liquidation_bonus_premium(bonus: U256) -> U256 {
    bonus.saturating_sub(U256::from(10u64.pow(LTV_PRECISION)))
}
