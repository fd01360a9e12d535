pub mod error;
pub mod types;

#[cfg(feature = "amortization")]
pub mod amortization;

pub use error::LoanCalcError;
pub use types::*;

/// Standard result type for all loan-calc operations
pub type LoanCalcResult<T> = Result<T, LoanCalcError>;
