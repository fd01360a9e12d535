//! Period-by-period amortization ledger.
//!
//! The ledger is built iteratively from a fixed gross payment. Principal
//! reduction stalls at zero rather than going negative when the payment does
//! not cover accrued interest, and the loop is bounded by a hard cap so that
//! non-amortizing inputs still terminate.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{round_money, Money, Rate};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Extra iterations allowed beyond the contractual term.
pub const SAFETY_CAP_EXTRA_PERIODS: u32 = 5_000;

/// Closing balances at or below this are treated as fully repaid.
pub const PAYOFF_TOLERANCE: Money = dec!(0.01);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One installment in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRow {
    /// 1-based period number.
    pub period: u32,
    pub opening_balance: Money,
    /// Gross installment (scheduled payment plus extra prepayment).
    pub payment: Money,
    pub interest: Money,
    /// Principal repaid this period. Never negative.
    pub principal: Money,
    pub closing_balance: Money,
}

impl LedgerRow {
    /// Copy with every monetary field rounded to 2 dp.
    pub fn rounded(&self) -> Self {
        LedgerRow {
            period: self.period,
            opening_balance: round_money(self.opening_balance),
            payment: round_money(self.payment),
            interest: round_money(self.interest),
            principal: round_money(self.principal),
            closing_balance: round_money(self.closing_balance),
        }
    }
}

/// Full ledger plus running totals at full precision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    pub rows: Vec<LedgerRow>,
    pub total_interest: Money,
    pub total_principal: Money,
    /// False when the loop stopped at the safety cap (or never started on an
    /// outstanding balance) without reaching zero.
    pub paid_off: bool,
}

impl AmortizationSchedule {
    pub fn payoff_periods(&self) -> u32 {
        self.rows.len() as u32
    }

    /// Closing balance of the last row, or zero for an empty ledger.
    pub fn final_balance(&self) -> Money {
        self.rows
            .last()
            .map(|r| r.closing_balance)
            .unwrap_or(Decimal::ZERO)
    }
}

/// Maximum number of rows `build_schedule` will emit for a term of `periods`.
pub fn iteration_cap(periods: u32) -> u32 {
    periods.saturating_add(SAFETY_CAP_EXTRA_PERIODS)
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Ledgerize a loan one period at a time.
///
/// Each period accrues `balance * periodic_rate`, applies
/// `min(gross_payment - interest, balance)` (floored at zero) to principal,
/// and stops once the closing balance is within [`PAYOFF_TOLERANCE`] of zero.
/// That final row absorbs the sub-cent residue so it closes at exactly zero.
///
/// Runs at most `periods + 5000` iterations. A payment that never amortizes
/// produces a full-length ledger with `paid_off == false`.
pub fn build_schedule(
    principal: Money,
    periodic_rate: Rate,
    periods: u32,
    gross_payment: Money,
) -> AmortizationSchedule {
    if principal <= Decimal::ZERO || periods == 0 {
        return AmortizationSchedule {
            rows: Vec::new(),
            total_interest: Decimal::ZERO,
            total_principal: Decimal::ZERO,
            paid_off: principal <= Decimal::ZERO,
        };
    }

    let cap = iteration_cap(periods);
    let mut rows = Vec::with_capacity(periods.min(SAFETY_CAP_EXTRA_PERIODS) as usize);
    let mut balance = principal;
    let mut total_interest = Decimal::ZERO;
    let mut total_principal = Decimal::ZERO;
    let mut paid_off = false;

    for period in 1..=cap {
        let interest = balance.saturating_mul(periodic_rate);

        let mut principal_paid = gross_payment.saturating_sub(interest).min(balance);
        if principal_paid < Decimal::ZERO {
            principal_paid = Decimal::ZERO;
        }

        let mut closing = balance - principal_paid;
        let settled = closing <= PAYOFF_TOLERANCE;
        if settled {
            principal_paid = balance;
            closing = Decimal::ZERO;
        }

        rows.push(LedgerRow {
            period,
            opening_balance: balance,
            payment: gross_payment,
            interest,
            principal: principal_paid,
            closing_balance: closing,
        });

        total_interest = total_interest.saturating_add(interest);
        total_principal = total_principal.saturating_add(principal_paid);

        if settled {
            paid_off = true;
            break;
        }
        balance = closing;
    }

    if paid_off {
        tracing::debug!(periods = rows.len(), "schedule reached zero balance");
    } else {
        tracing::warn!(
            cap,
            remaining = %balance,
            "schedule stopped at safety cap without paying off"
        );
    }

    AmortizationSchedule {
        rows,
        total_interest,
        total_principal,
        paid_off,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amortization::payment::scheduled_payment;
    use rust_decimal_macros::dec;

    #[test]
    fn test_empty_for_zero_principal() {
        let sched = build_schedule(Decimal::ZERO, dec!(0.01), 12, dec!(100));
        assert!(sched.rows.is_empty());
        assert!(sched.paid_off);
        assert_eq!(sched.total_interest, Decimal::ZERO);
        assert_eq!(sched.final_balance(), Decimal::ZERO);
    }

    #[test]
    fn test_empty_for_zero_periods() {
        let sched = build_schedule(dec!(1000), dec!(0.01), 0, dec!(100));
        assert!(sched.rows.is_empty());
        assert!(!sched.paid_off);
    }

    #[test]
    fn test_zero_rate_straight_line() {
        let sched = build_schedule(dec!(1200), Decimal::ZERO, 12, dec!(100));
        assert_eq!(sched.payoff_periods(), 12);
        assert!(sched.paid_off);
        assert_eq!(sched.total_interest, Decimal::ZERO);
        assert_eq!(sched.total_principal, dec!(1200));
        for (i, row) in sched.rows.iter().enumerate() {
            assert_eq!(row.principal, dec!(100));
            assert_eq!(row.closing_balance, dec!(1200) - dec!(100) * Decimal::from(i + 1));
        }
    }

    #[test]
    fn test_rows_chain_and_never_increase() {
        let pmt = scheduled_payment(dec!(50000), dec!(0.005), 60);
        let sched = build_schedule(dec!(50000), dec!(0.005), 60, pmt);
        assert_eq!(sched.rows[0].opening_balance, dec!(50000));
        for row in &sched.rows {
            assert_eq!(row.closing_balance, row.opening_balance - row.principal);
            assert!(row.closing_balance <= row.opening_balance);
            assert!(row.principal >= Decimal::ZERO);
        }
        for pair in sched.rows.windows(2) {
            assert_eq!(pair[1].opening_balance, pair[0].closing_balance);
            assert_eq!(pair[1].period, pair[0].period + 1);
        }
    }

    #[test]
    fn test_overpayment_pays_off_in_one_period() {
        let sched = build_schedule(dec!(1000), dec!(0.01), 12, dec!(5000));
        assert_eq!(sched.payoff_periods(), 1);
        let row = &sched.rows[0];
        assert_eq!(row.interest, dec!(10));
        assert_eq!(row.principal, dec!(1000));
        assert_eq!(row.closing_balance, Decimal::ZERO);
    }

    #[test]
    fn test_sub_cent_residue_absorbed_by_final_row() {
        // Second period leaves 0.005 unpaid, which is written into principal
        let sched = build_schedule(dec!(200.005), Decimal::ZERO, 2, dec!(100));
        assert_eq!(sched.payoff_periods(), 2);
        let last = sched.rows.last().unwrap();
        assert_eq!(last.principal, dec!(100.005));
        assert_eq!(last.closing_balance, Decimal::ZERO);
        assert_eq!(sched.total_principal, dec!(200.005));
    }

    #[test]
    fn test_insufficient_payment_runs_to_cap() {
        // Interest is 10 per period, payment only 5
        let sched = build_schedule(dec!(1000), dec!(0.01), 12, dec!(5));
        assert_eq!(sched.payoff_periods(), 12 + SAFETY_CAP_EXTRA_PERIODS);
        assert!(!sched.paid_off);
        for row in &sched.rows {
            assert_eq!(row.principal, Decimal::ZERO);
            assert_eq!(row.closing_balance, dec!(1000));
        }
        assert_eq!(sched.total_interest, dec!(10) * Decimal::from(5012));
    }

    #[test]
    fn test_huge_term_paid_early_reserves_little() {
        let sched = build_schedule(dec!(1000), dec!(0.01), u32::MAX, dec!(2000));
        assert_eq!(sched.payoff_periods(), 1);
        assert!(sched.paid_off);
        assert!(sched.rows.capacity() <= SAFETY_CAP_EXTRA_PERIODS as usize);
    }

    #[test]
    fn test_rounded_row() {
        let row = LedgerRow {
            period: 1,
            opening_balance: dec!(800000),
            payment: dec!(7457.0495026),
            interest: dec!(6333.3333333),
            principal: dec!(1123.7161693),
            closing_balance: dec!(798876.2838307),
        };
        let r = row.rounded();
        assert_eq!(r.payment, dec!(7457.05));
        assert_eq!(r.interest, dec!(6333.33));
        assert_eq!(r.principal, dec!(1123.72));
        assert_eq!(r.closing_balance, dec!(798876.28));
    }
}
