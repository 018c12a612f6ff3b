pub mod debt;
pub mod formatter;
pub mod snapshot;

pub use debt::{DebtCalculator, ProtocolDebtCalculator, ReserveDebt, calculate_reserve_debt};
pub use formatter::{ReserveFormatter, format_reserve};
pub use snapshot::ReserveSnapshot;
