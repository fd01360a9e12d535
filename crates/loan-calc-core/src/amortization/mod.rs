pub mod calendar;
pub mod loan;
pub mod payment;
pub mod schedule;

#[cfg(feature = "prepayment")]
pub mod prepayment;

#[cfg(feature = "series")]
pub mod series;
