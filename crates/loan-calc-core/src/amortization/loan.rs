//! Loan calculator entry point.
//!
//! Validates the caller's inputs, derives the per-period terms, runs the
//! amortization engine and summarises the payoff. Degenerate but valid inputs
//! (zero principal, zero rate, zero tenure, a payment that never amortizes)
//! always produce a result; only malformed inputs are rejected.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::calendar;
use crate::amortization::payment::{self, PaymentFrequency};
use crate::amortization::schedule::{self, LedgerRow};
use crate::error::LoanCalcError;
use crate::types::{round_money, with_metadata, ComputationOutput, Currency, Money, Rate, Years};
use crate::LoanCalcResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Annual rates outside this band are accepted but flagged.
const TYPICAL_RATE_FLOOR: Rate = dec!(0.1);
const TYPICAL_RATE_CEILING: Rate = dec!(25);

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// Loan parameters as entered by the user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanInput {
    /// Amount borrowed. Mutually exclusive with `purchase_price`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub principal: Option<Money>,
    /// Price of the asset; the principal becomes `price - down_payment`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_price: Option<Money>,
    #[serde(default)]
    pub down_payment: Money,
    /// Nominal annual rate as a percentage (9.5 = 9.5%).
    pub annual_rate_percent: Rate,
    #[serde(default)]
    pub frequency: PaymentFrequency,
    pub tenure_years: u32,
    /// Added to every scheduled installment.
    #[serde(default)]
    pub extra_prepayment: Money,
    /// Processing fee charged once.
    #[serde(default)]
    pub one_time_fee: Money,
    /// Insurance, taxes and other yearly charges, summed.
    #[serde(default)]
    pub annual_charges: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub currency: Currency,
}

impl LoanInput {
    /// Plain loan with no fees, prepayment or start date.
    pub fn new(
        principal: Money,
        annual_rate_percent: Rate,
        frequency: PaymentFrequency,
        tenure_years: u32,
    ) -> Self {
        LoanInput {
            principal: Some(principal),
            purchase_price: None,
            down_payment: Decimal::ZERO,
            annual_rate_percent,
            frequency,
            tenure_years,
            extra_prepayment: Decimal::ZERO,
            one_time_fee: Decimal::ZERO,
            annual_charges: Decimal::ZERO,
            start_date: None,
            currency: Currency::default(),
        }
    }

    /// Validate and derive the per-period terms.
    pub fn terms(&self) -> LoanCalcResult<LoanTerms> {
        validate_loan(self)?;
        let principal = resolve_principal(self)?;
        Ok(LoanTerms {
            principal,
            periodic_rate: payment::periodic_rate(self.annual_rate_percent, self.frequency),
            periods: payment::total_periods(self.tenure_years, self.frequency),
            periods_per_year: self.frequency.periods_per_year(),
            extra_prepayment: self.extra_prepayment,
        })
    }
}

/// Per-period terms derived from a [`LoanInput`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub principal: Money,
    pub periodic_rate: Rate,
    pub periods: u32,
    pub periods_per_year: u32,
    pub extra_prepayment: Money,
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanOutput {
    pub principal: Money,
    pub periodic_rate: Rate,
    pub periods: u32,
    pub frequency: PaymentFrequency,
    /// Installment from the annuity formula alone.
    pub scheduled_payment: Money,
    /// Scheduled payment plus extra prepayment; what every row pays.
    pub gross_payment: Money,
    pub total_interest: Money,
    pub total_principal: Money,
    /// One-time fee plus yearly charges over the full tenure.
    pub total_fees: Money,
    pub total_paid: Money,
    pub payoff_periods: u32,
    pub payoff_years: Years,
    pub paid_off: bool,
    pub currency: Currency,
    pub schedule: Vec<LedgerRow>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub payment_dates: Vec<NaiveDate>,
}

impl LoanOutput {
    /// Presentation copy: money and the payoff duration rounded to 2 dp.
    /// Rates are left at full precision.
    pub fn rounded(&self) -> Self {
        LoanOutput {
            principal: round_money(self.principal),
            scheduled_payment: round_money(self.scheduled_payment),
            gross_payment: round_money(self.gross_payment),
            total_interest: round_money(self.total_interest),
            total_principal: round_money(self.total_principal),
            total_fees: round_money(self.total_fees),
            total_paid: round_money(self.total_paid),
            payoff_years: round_money(self.payoff_years),
            schedule: self.schedule.iter().map(LedgerRow::rounded).collect(),
            ..self.clone()
        }
    }
}

/// Installment amounts without the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentQuote {
    pub principal: Money,
    pub periodic_rate: Rate,
    pub periods: u32,
    pub frequency: PaymentFrequency,
    pub scheduled_payment: Money,
    pub gross_payment: Money,
}

impl PaymentQuote {
    pub fn rounded(&self) -> Self {
        PaymentQuote {
            principal: round_money(self.principal),
            scheduled_payment: round_money(self.scheduled_payment),
            gross_payment: round_money(self.gross_payment),
            ..self.clone()
        }
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Quote the periodic installment only.
pub fn quote_payment(input: &LoanInput) -> LoanCalcResult<ComputationOutput<PaymentQuote>> {
    let start = Instant::now();
    let terms = input.terms()?;
    let scheduled = payment::scheduled_payment(terms.principal, terms.periodic_rate, terms.periods);

    let quote = PaymentQuote {
        principal: terms.principal,
        periodic_rate: terms.periodic_rate,
        periods: terms.periods,
        frequency: input.frequency,
        scheduled_payment: scheduled,
        gross_payment: scheduled.saturating_add(terms.extra_prepayment),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Level-payment formula A = P·r·(1+r)^n / ((1+r)^n - 1)",
        input,
        Vec::new(),
        elapsed,
        quote,
    ))
}

/// Compute the payment, full amortization ledger and payoff summary.
pub fn calculate_loan(input: &LoanInput) -> LoanCalcResult<ComputationOutput<LoanOutput>> {
    let start = Instant::now();
    let (output, warnings) = compute_loan(input)?;
    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Level-payment amortization (annuity formula)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

pub(crate) fn compute_loan(input: &LoanInput) -> LoanCalcResult<(LoanOutput, Vec<String>)> {
    let mut warnings: Vec<String> = Vec::new();
    let terms = input.terms()?;

    let _span = tracing::debug_span!(
        "calculate_loan",
        principal = %terms.principal,
        periods = terms.periods
    )
    .entered();

    if input.principal.is_some() && !input.down_payment.is_zero() {
        warnings.push("down_payment is ignored when principal is given directly".into());
    }
    if input.annual_rate_percent < TYPICAL_RATE_FLOOR
        || input.annual_rate_percent > TYPICAL_RATE_CEILING
    {
        warnings.push(format!(
            "Annual rate {}% is outside the typical {}%-{}% range",
            input.annual_rate_percent, TYPICAL_RATE_FLOOR, TYPICAL_RATE_CEILING
        ));
    }
    if terms.principal.is_zero() {
        warnings.push("Principal is zero; there is nothing to amortize".into());
    }
    if terms.periods == 0 {
        warnings.push("Tenure of 0 years gives no repayment periods".into());
    }

    let scheduled = payment::scheduled_payment(terms.principal, terms.periodic_rate, terms.periods);
    let gross = scheduled.saturating_add(terms.extra_prepayment);

    let first_interest = terms.principal.saturating_mul(terms.periodic_rate);
    if terms.periods > 0 && terms.principal > Decimal::ZERO && gross <= first_interest {
        warnings.push(format!(
            "Payment {} does not exceed first-period interest {}; the balance will not decrease",
            round_money(gross),
            round_money(first_interest)
        ));
    }

    let ledger = schedule::build_schedule(terms.principal, terms.periodic_rate, terms.periods, gross);

    if !ledger.paid_off && !ledger.rows.is_empty() {
        warnings.push(format!(
            "Schedule stopped at the safety cap of {} periods with {} still outstanding",
            ledger.payoff_periods(),
            round_money(ledger.final_balance())
        ));
    }

    let payment_dates = match input.start_date {
        Some(start) => calendar::payment_dates(start, input.frequency, ledger.payoff_periods())?,
        None => Vec::new(),
    };

    let total_fees = input
        .annual_charges
        .saturating_mul(Decimal::from(input.tenure_years))
        .saturating_add(input.one_time_fee);
    let total_paid = ledger
        .total_interest
        .saturating_add(ledger.total_principal)
        .saturating_add(total_fees);
    let payoff_periods = ledger.payoff_periods();
    let payoff_years = Decimal::from(payoff_periods) / Decimal::from(terms.periods_per_year);

    tracing::debug!(
        payoff_periods,
        paid_off = ledger.paid_off,
        "loan calculated"
    );

    let output = LoanOutput {
        principal: terms.principal,
        periodic_rate: terms.periodic_rate,
        periods: terms.periods,
        frequency: input.frequency,
        scheduled_payment: scheduled,
        gross_payment: gross,
        total_interest: ledger.total_interest,
        total_principal: ledger.total_principal,
        total_fees,
        total_paid,
        payoff_periods,
        payoff_years,
        paid_off: ledger.paid_off,
        currency: input.currency.clone(),
        schedule: ledger.rows,
        payment_dates,
    };

    Ok((output, warnings))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_loan(input: &LoanInput) -> LoanCalcResult<()> {
    let amounts = [
        ("principal", input.principal),
        ("purchase_price", input.purchase_price),
        ("down_payment", Some(input.down_payment)),
        ("annual_rate_percent", Some(input.annual_rate_percent)),
        ("extra_prepayment", Some(input.extra_prepayment)),
        ("one_time_fee", Some(input.one_time_fee)),
        ("annual_charges", Some(input.annual_charges)),
    ];

    for (field, value) in amounts {
        if let Some(v) = value {
            if v < Decimal::ZERO {
                return Err(LoanCalcError::InvalidInput {
                    field: field.into(),
                    reason: "Must be non-negative".into(),
                });
            }
        }
    }
    Ok(())
}

fn resolve_principal(input: &LoanInput) -> LoanCalcResult<Money> {
    match (input.principal, input.purchase_price) {
        (Some(principal), None) => Ok(principal),
        (None, Some(price)) => Ok((price - input.down_payment).max(Decimal::ZERO)),
        (Some(_), Some(_)) => Err(LoanCalcError::InvalidInput {
            field: "principal".into(),
            reason: "Provide either principal or purchase_price, not both".into(),
        }),
        (None, None) => Err(LoanCalcError::InvalidInput {
            field: "principal".into(),
            reason: "Either principal or purchase_price is required".into(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
