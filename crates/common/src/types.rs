use serde::{Deserialize, Serialize};

/// Reserve state as delivered by the data-fetch layer.
///
/// Fixed-point quantities arrive as decimal integer strings: token amounts in
/// base units, rates and indices in ray (27 decimals), risk parameters in
/// basis points (4 decimals). Nothing here is validated yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReserveData {
    pub decimals: u32,
    #[serde(rename = "baseLTVasCollateral")]
    pub base_ltv_as_collateral: String,
    pub reserve_liquidation_threshold: String,
    pub reserve_liquidation_bonus: String,
    pub reserve_factor: String,
    pub liquidity_index: String,
    pub variable_borrow_index: String,
    pub liquidity_rate: String,
    pub variable_borrow_rate: String,
    pub stable_borrow_rate: String,
    pub available_liquidity: String,
    pub total_scaled_variable_debt: String,
    pub total_principal_stable_debt: String,
    pub average_stable_rate: String,
    pub last_update_timestamp: i64,
    pub stable_debt_last_update_timestamp: i64,
}

/// Oracle price for the reserve's underlying asset. Forwarded untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservePrice {
    pub price_in_eth: String,
}

fn zero_apy() -> String {
    "0".to_string()
}

/// Input to the reserve formatter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatReserveRequest {
    pub reserve: ReserveData,
    /// Evaluation instant in seconds since epoch.
    pub current_timestamp: i64,
    #[serde(rename = "depositIncentivesAPY", default = "zero_apy")]
    pub deposit_incentives_apy: String,
    #[serde(rename = "variableDebtIncentivesAPY", default = "zero_apy")]
    pub variable_debt_incentives_apy: String,
    #[serde(rename = "stableDebtIncentivesAPY", default = "zero_apy")]
    pub stable_debt_incentives_apy: String,
    pub price: ReservePrice,
}

/// Human-readable reserve metrics evaluated at the request's timestamp.
///
/// All numeric fields are exact decimal strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedReserve {
    pub available_liquidity: String,
    #[serde(rename = "baseLTVasCollateral")]
    pub base_ltv_as_collateral: String,
    #[serde(rename = "depositIncentivesAPY")]
    pub deposit_incentives_apy: String,
    #[serde(rename = "stableDebtIncentivesAPY")]
    pub stable_debt_incentives_apy: String,
    #[serde(rename = "variableDebtIncentivesAPY")]
    pub variable_debt_incentives_apy: String,
    pub liquidity_index: String,
    pub liquidity_rate: String,
    pub price: ReservePrice,
    pub reserve_factor: String,
    pub reserve_liquidation_bonus: String,
    pub reserve_liquidation_threshold: String,
    pub stable_borrow_rate: String,
    pub total_debt: String,
    pub total_liquidity: String,
    pub total_principal_stable_debt: String,
    pub total_scaled_variable_debt: String,
    pub total_stable_debt: String,
    pub total_variable_debt: String,
    pub utilization_rate: String,
    pub variable_borrow_index: String,
    pub variable_borrow_rate: String,
    /// Liquidity index accrued to the evaluation instant.
    pub current_liquidity_index: String,
    /// Variable borrow index accrued to the evaluation instant.
    pub current_variable_borrow_index: String,
    #[serde(rename = "supplyAPY")]
    pub supply_apy: String,
    #[serde(rename = "variableBorrowAPY")]
    pub variable_borrow_apy: String,
    #[serde(rename = "stableBorrowAPY")]
    pub stable_borrow_apy: String,
}
