//! Side-by-side comparison of a loan with and without extra prepayment.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::loan::{compute_loan, LoanInput};
use crate::types::{round_money, with_metadata, ComputationOutput, Money, Years};
use crate::LoanCalcResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrepaymentComparison {
    pub extra_prepayment: Money,
    pub baseline_payment: Money,
    pub accelerated_payment: Money,
    pub baseline_periods: u32,
    pub accelerated_periods: u32,
    pub periods_saved: u32,
    pub years_saved: Years,
    pub baseline_interest: Money,
    pub accelerated_interest: Money,
    pub interest_saved: Money,
    pub baseline_paid_off: bool,
    pub accelerated_paid_off: bool,
}

impl PrepaymentComparison {
    pub fn rounded(&self) -> Self {
        PrepaymentComparison {
            extra_prepayment: round_money(self.extra_prepayment),
            baseline_payment: round_money(self.baseline_payment),
            accelerated_payment: round_money(self.accelerated_payment),
            years_saved: round_money(self.years_saved),
            baseline_interest: round_money(self.baseline_interest),
            accelerated_interest: round_money(self.accelerated_interest),
            interest_saved: round_money(self.interest_saved),
            ..self.clone()
        }
    }
}

/// Run the loan twice, once without the extra prepayment and once with it,
/// and report what the prepayment saves.
pub fn compare_prepayment(
    input: &LoanInput,
) -> LoanCalcResult<ComputationOutput<PrepaymentComparison>> {
    let start = Instant::now();

    let mut baseline_input = input.clone();
    baseline_input.extra_prepayment = Decimal::ZERO;
    baseline_input.start_date = None;

    let mut accelerated_input = input.clone();
    accelerated_input.start_date = None;

    let (baseline, mut warnings) = compute_loan(&baseline_input)?;
    let (accelerated, accelerated_warnings) = compute_loan(&accelerated_input)?;
    for w in accelerated_warnings {
        if !warnings.contains(&w) {
            warnings.push(w);
        }
    }

    if input.extra_prepayment.is_zero() {
        warnings.push("No extra prepayment given; both schedules are identical".into());
    }

    let periods_saved = baseline
        .payoff_periods
        .saturating_sub(accelerated.payoff_periods);
    let periods_per_year = Decimal::from(input.frequency.periods_per_year());

    let comparison = PrepaymentComparison {
        extra_prepayment: input.extra_prepayment,
        baseline_payment: baseline.gross_payment,
        accelerated_payment: accelerated.gross_payment,
        baseline_periods: baseline.payoff_periods,
        accelerated_periods: accelerated.payoff_periods,
        periods_saved,
        years_saved: Decimal::from(periods_saved) / periods_per_year,
        baseline_interest: baseline.total_interest,
        accelerated_interest: accelerated.total_interest,
        interest_saved: baseline.total_interest - accelerated.total_interest,
        baseline_paid_off: baseline.paid_off,
        accelerated_paid_off: accelerated.paid_off,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Prepayment comparison (level-payment amortization)",
        input,
        warnings,
        elapsed,
        comparison,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amortization::payment::PaymentFrequency;
    use rust_decimal_macros::dec;

    fn loan_with_extra(extra: Money) -> LoanInput {
        let mut input = LoanInput::new(dec!(800000), dec!(9.5), PaymentFrequency::Monthly, 20);
        input.extra_prepayment = extra;
        input
    }

    #[test]
    fn test_extra_payment_shortens_loan() {
        let cmp = compare_prepayment(&loan_with_extra(dec!(2000))).unwrap().result;
        assert_eq!(cmp.baseline_periods, 240);
        assert_eq!(cmp.accelerated_periods, 141);
        assert_eq!(cmp.periods_saved, 99);
        assert_eq!(cmp.years_saved, dec!(8.25));
        assert_eq!(cmp.accelerated_payment - cmp.baseline_payment, dec!(2000));
        assert!((cmp.interest_saved - dec!(461176.85)).abs() < dec!(0.01));
        assert!(cmp.baseline_paid_off && cmp.accelerated_paid_off);
    }

    #[test]
    fn test_zero_extra_is_identical() {
        let result = compare_prepayment(&loan_with_extra(Decimal::ZERO)).unwrap();
        assert_eq!(result.result.periods_saved, 0);
        assert_eq!(result.result.interest_saved, Decimal::ZERO);
        assert!(result.warnings.iter().any(|w| w.contains("identical")));
    }
}
