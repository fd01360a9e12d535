//! Level-payment (EMI) formula and the rate/period conversions that feed it.
//!
//! All math in `rust_decimal::Decimal`. The formula is total: every input
//! combination yields a number, degenerate ones degrade to straight-line
//! division or zero.

use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Rate};

// ---------------------------------------------------------------------------
// Frequency
// ---------------------------------------------------------------------------

/// How often an installment falls due.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentFrequency {
    #[default]
    Monthly,
    #[serde(alias = "biweekly")]
    BiWeekly,
    Weekly,
}

impl PaymentFrequency {
    pub fn periods_per_year(self) -> u32 {
        match self {
            PaymentFrequency::Monthly => 12,
            PaymentFrequency::BiWeekly => 26,
            PaymentFrequency::Weekly => 52,
        }
    }
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

/// Convert an annual percentage (9.5 = 9.5%) into the per-period decimal rate.
pub fn periodic_rate(annual_rate_percent: Rate, frequency: PaymentFrequency) -> Rate {
    annual_rate_percent / dec!(100) / Decimal::from(frequency.periods_per_year())
}

/// Number of installments over the tenure.
pub fn total_periods(tenure_years: u32, frequency: PaymentFrequency) -> u32 {
    tenure_years.saturating_mul(frequency.periods_per_year())
}

// ---------------------------------------------------------------------------
// Payment formula
// ---------------------------------------------------------------------------

/// Scheduled installment `A = P·r·(1+r)^n / ((1+r)^n − 1)`.
///
/// * `principal <= 0` or `periods == 0` returns zero.
/// * A zero (or negative) rate returns `principal / periods`.
/// * If `(1+r)^n` leaves the decimal range the payment takes its limit,
///   `P·r`, which only services interest.
/// * A payment too large for the decimal range saturates at `Decimal::MAX`.
pub fn scheduled_payment(principal: Money, periodic_rate: Rate, periods: u32) -> Money {
    if principal <= Decimal::ZERO || periods == 0 {
        return Decimal::ZERO;
    }

    let n = Decimal::from(periods);
    if periodic_rate <= Decimal::ZERO {
        return principal / n;
    }

    let growth = match Decimal::ONE
        .checked_add(periodic_rate)
        .and_then(|base| base.checked_powu(u64::from(periods)))
    {
        Some(g) => g,
        None => return principal.saturating_mul(periodic_rate),
    };

    let denom = growth - Decimal::ONE;
    if denom <= Decimal::ZERO {
        // Rate too small to register after compounding.
        return principal / n;
    }

    growth
        .checked_div(denom)
        .and_then(|factor| principal.checked_mul(periodic_rate)?.checked_mul(factor))
        .unwrap_or(Decimal::MAX)
}
