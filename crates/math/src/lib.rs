//! Fixed-point arithmetic mirroring the lending pool's on-chain math.
//!
//! Everything is integer U256 arithmetic. Binary floating point never enters
//! the accrual chain.

pub mod decimal;
pub mod interest;
pub mod ray;

pub use alloy::primitives::U256;
pub use decimal::FixedDecimal;
