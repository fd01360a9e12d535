use loan_calc_core::amortization::loan::{calculate_loan, LoanInput};
use loan_calc_core::amortization::payment::{self, PaymentFrequency};
use loan_calc_core::amortization::schedule::{self, SAFETY_CAP_EXTRA_PERIODS};
use loan_calc_core::types::Currency;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn assert_close(actual: Decimal, expected: Decimal, tol: Decimal, msg: &str) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tol,
        "{}: expected ~{}, got {} (diff = {})",
        msg,
        expected,
        actual,
        diff
    );
}

// ===========================================================================
// Payment formula feeding the ledger
// ===========================================================================

#[test]
fn test_scheduled_payment_pays_off_within_term() {
    let cases = [
        (dec!(800000), dec!(9.5), PaymentFrequency::Monthly, 20),
        (dec!(250000), dec!(4.25), PaymentFrequency::BiWeekly, 30),
        (dec!(15000), dec!(24.9), PaymentFrequency::Weekly, 3),
        (dec!(1000), dec!(0.1), PaymentFrequency::Monthly, 1),
        (dec!(5000000), dec!(12), PaymentFrequency::Weekly, 40),
    ];

    for (principal, annual, freq, years) in cases {
        let r = payment::periodic_rate(annual, freq);
        let n = payment::total_periods(years, freq);
        let pmt = payment::scheduled_payment(principal, r, n);
        let sched = schedule::build_schedule(principal, r, n, pmt);

        assert!(sched.paid_off, "{principal} @ {annual}% should pay off");
        assert!(
            sched.payoff_periods() <= n,
            "{principal} @ {annual}%: {} rows for a {n}-period term",
            sched.payoff_periods()
        );
        assert!(sched.payoff_periods() + 1 >= n);
        assert_eq!(sched.final_balance(), Decimal::ZERO);
        assert_close(sched.total_principal, principal, dec!(0.01), "total principal");
    }
}

#[test]
fn test_zero_rate_payment_is_exact_division() {
    let pmt = payment::scheduled_payment(dec!(100000), Decimal::ZERO, 48);
    assert_eq!(pmt, dec!(100000) / dec!(48));

    let sched = schedule::build_schedule(dec!(100000), Decimal::ZERO, 48, pmt);
    assert!(sched.paid_off);
    assert_eq!(sched.total_interest, Decimal::ZERO);
    assert_close(sched.total_principal, dec!(100000), dec!(0.01), "principal");
}

// ===========================================================================
// Ledger invariants
// ===========================================================================

#[test]
fn test_closing_never_exceeds_opening() {
    let r = payment::periodic_rate(dec!(18), PaymentFrequency::Monthly);
    let pmt = payment::scheduled_payment(dec!(40000), r, 60) + dec!(250);
    let sched = schedule::build_schedule(dec!(40000), r, 60, pmt);
    for row in &sched.rows {
        assert!(row.closing_balance <= row.opening_balance);
        assert!(row.principal >= Decimal::ZERO);
        assert!(row.interest >= Decimal::ZERO);
        assert_eq!(row.payment, pmt);
    }
}

#[test]
fn test_sum_law_interest_plus_principal_equals_payments() {
    let r = payment::periodic_rate(dec!(7.2), PaymentFrequency::Monthly);
    let pmt = payment::scheduled_payment(dec!(300000), r, 180) + dec!(500);
    let sched = schedule::build_schedule(dec!(300000), r, 180, pmt);

    let paid: Decimal = sched.rows.iter().map(|row| row.payment).sum();
    let last = sched.rows.last().unwrap();
    let underpayment = last.payment - last.interest - last.principal;
    assert!(underpayment >= dec!(-0.01));
    assert_close(
        sched.total_interest + sched.total_principal,
        paid - underpayment,
        dec!(0.000001),
        "sum law",
    );
}

#[test]
fn test_insufficient_payment_stalls_at_cap() {
    let principal = dec!(500000);
    let r = payment::periodic_rate(dec!(12), PaymentFrequency::Monthly);
    let first_interest = principal * r;
    let sched = schedule::build_schedule(principal, r, 120, first_interest - dec!(1));

    assert_eq!(sched.payoff_periods(), 120 + SAFETY_CAP_EXTRA_PERIODS);
    assert!(!sched.paid_off);
    for row in &sched.rows {
        assert_eq!(row.principal, Decimal::ZERO);
        assert_eq!(row.opening_balance, principal);
        assert_eq!(row.closing_balance, principal);
    }
}

// ===========================================================================
// Full calculation scenarios
// ===========================================================================

#[test]
fn test_home_loan_scenario() {
    let input = LoanInput::new(dec!(800000), dec!(9.5), PaymentFrequency::Monthly, 20);
    let result = calculate_loan(&input).unwrap();
    let out = &result.result;

    assert_close(out.periodic_rate, dec!(0.0079167), dec!(0.0000001), "periodic rate");
    assert_eq!(out.periods, 240);
    assert_close(out.scheduled_payment, dec!(7457.05), dec!(0.01), "EMI");
    assert_eq!(out.gross_payment, out.scheduled_payment);

    let first = &out.schedule[0];
    assert_close(first.interest, dec!(6333.33), dec!(0.01), "first interest");
    assert_close(first.principal, dec!(1123.72), dec!(0.01), "first principal");

    let last = out.schedule.last().unwrap();
    assert_eq!(last.period, 240);
    assert_eq!(last.closing_balance, Decimal::ZERO);
    assert_close(out.total_interest, dec!(989691.88), dec!(0.01), "total interest");
    assert!(out.paid_off);
}

#[test]
fn test_zero_principal_scenario() {
    let input = LoanInput::new(Decimal::ZERO, dec!(9.5), PaymentFrequency::Monthly, 20);
    let result = calculate_loan(&input).unwrap();
    assert_eq!(result.result.scheduled_payment, Decimal::ZERO);
    assert_eq!(result.result.payoff_periods, 0);
    assert_eq!(result.result.total_interest, Decimal::ZERO);
    assert!(result.result.schedule.is_empty());
    assert!(result.warnings.iter().any(|w| w.contains("nothing to amortize")));
}

#[test]
fn test_non_amortizing_loan_reports_incomplete_payoff() {
    // 100% per month: (1+r)^n overflows and the payment only covers interest
    let input = LoanInput::new(dec!(1000), dec!(1200), PaymentFrequency::Monthly, 40);
    let result = calculate_loan(&input).unwrap();
    let out = &result.result;

    assert_eq!(out.scheduled_payment, dec!(1000));
    assert_eq!(out.payoff_periods, 480 + SAFETY_CAP_EXTRA_PERIODS);
    assert_eq!(out.schedule.len(), 5480);
    assert!(!out.paid_off);
    assert_eq!(out.total_principal, Decimal::ZERO);
    assert_eq!(out.schedule.last().unwrap().closing_balance, dec!(1000));

    let has = |needle: &str| result.warnings.iter().any(|w| w.contains(needle));
    assert!(has("does not exceed first-period interest"));
    assert!(has("safety cap"));
    assert!(has("outside the typical"));
}

#[test]
fn test_weekly_loan_payoff_years() {
    let input = LoanInput::new(dec!(52000), Decimal::ZERO, PaymentFrequency::Weekly, 2);
    let out = calculate_loan(&input).unwrap().result;
    assert_eq!(out.scheduled_payment, dec!(500));
    assert_eq!(out.payoff_periods, 104);
    assert_eq!(out.payoff_years, dec!(2));
}

#[test]
fn test_input_from_json() {
    let json = r#"{
        "purchase_price": "1000000",
        "down_payment": "200000",
        "annual_rate_percent": "9.5",
        "frequency": "monthly",
        "tenure_years": 20,
        "one_time_fee": "5000",
        "annual_charges": "3000",
        "currency": "USD"
    }"#;
    let input: LoanInput = serde_json::from_str(json).unwrap();
    assert_eq!(input.currency, Currency::USD);
    assert_eq!(input.extra_prepayment, Decimal::ZERO);

    let out = calculate_loan(&input).unwrap().result;
    assert_eq!(out.principal, dec!(800000));
    assert_close(
        out.total_paid,
        dec!(989691.88) + dec!(800000) + dec!(65000),
        dec!(0.01),
        "total paid",
    );
}
