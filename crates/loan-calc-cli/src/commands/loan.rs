use clap::{Args, ValueEnum};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::fs::File;
use std::io;
use std::path::PathBuf;

use loan_calc_core::amortization::loan::{self, LoanInput};
use loan_calc_core::amortization::payment::PaymentFrequency;
use loan_calc_core::amortization::prepayment;
use loan_calc_core::amortization::series::{self, SeriesPoint};
use loan_calc_core::types::{with_metadata, Currency};

use crate::input;
use crate::output::csv_out;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FrequencyArg {
    Monthly,
    BiWeekly,
    Weekly,
}

impl From<FrequencyArg> for PaymentFrequency {
    fn from(arg: FrequencyArg) -> Self {
        match arg {
            FrequencyArg::Monthly => PaymentFrequency::Monthly,
            FrequencyArg::BiWeekly => PaymentFrequency::BiWeekly,
            FrequencyArg::Weekly => PaymentFrequency::Weekly,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CurrencyArg {
    Inr,
    Usd,
    Eur,
    Gbp,
}

impl From<CurrencyArg> for Currency {
    fn from(arg: CurrencyArg) -> Self {
        match arg {
            CurrencyArg::Inr => Currency::INR,
            CurrencyArg::Usd => Currency::USD,
            CurrencyArg::Eur => Currency::EUR,
            CurrencyArg::Gbp => Currency::GBP,
        }
    }
}

/// Loan parameters shared by every loan subcommand
#[derive(Args)]
pub struct LoanArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount borrowed
    #[arg(long, conflicts_with = "purchase_price")]
    pub principal: Option<Decimal>,

    /// Purchase price; principal = price - down payment
    #[arg(long)]
    pub purchase_price: Option<Decimal>,

    /// Down payment / deposit
    #[arg(long)]
    pub down_payment: Option<Decimal>,

    /// Annual interest rate in percent (e.g. 9.5)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Repayment frequency
    #[arg(long, value_enum, default_value = "monthly")]
    pub frequency: FrequencyArg,

    /// Loan tenure in years
    #[arg(long)]
    pub years: Option<u32>,

    /// Extra prepayment added to every installment
    #[arg(long)]
    pub extra: Option<Decimal>,

    /// One-time processing fee
    #[arg(long)]
    pub fee: Option<Decimal>,

    /// Annual insurance / add-on charge
    #[arg(long)]
    pub insurance: Option<Decimal>,

    /// Other yearly charges (taxes, etc.)
    #[arg(long)]
    pub taxes: Option<Decimal>,

    /// Loan start date (YYYY-MM-DD); adds a due date to each period
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    /// Display currency
    #[arg(long, value_enum)]
    pub currency: Option<CurrencyArg>,
}

/// Arguments for CSV export
#[derive(Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub loan: LoanArgs,

    /// Destination file (stdout when omitted)
    #[arg(long)]
    pub out: Option<PathBuf>,
}

/// Build the loan input from `--input`, piped stdin, or flags, in that order.
fn resolve_input(args: LoanArgs) -> Result<LoanInput, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        return input::file::read_input(path);
    }
    if let Some(piped) = input::stdin::read_stdin::<LoanInput>()? {
        return Ok(piped);
    }
    input_from_flags(args)
}

fn input_from_flags(args: LoanArgs) -> Result<LoanInput, Box<dyn std::error::Error>> {
    let rate = args.rate.ok_or("--rate is required (or provide --input)")?;
    let years = args.years.ok_or("--years is required (or provide --input)")?;
    if args.principal.is_none() && args.purchase_price.is_none() {
        return Err("--principal or --purchase-price is required (or provide --input)".into());
    }

    let annual_charges =
        args.insurance.unwrap_or(Decimal::ZERO) + args.taxes.unwrap_or(Decimal::ZERO);

    Ok(LoanInput {
        principal: args.principal,
        purchase_price: args.purchase_price,
        down_payment: args.down_payment.unwrap_or(Decimal::ZERO),
        annual_rate_percent: rate,
        frequency: args.frequency.into(),
        tenure_years: years,
        extra_prepayment: args.extra.unwrap_or(Decimal::ZERO),
        one_time_fee: args.fee.unwrap_or(Decimal::ZERO),
        annual_charges,
        start_date: args.start_date,
        currency: args.currency.map(Currency::from).unwrap_or_default(),
    })
}

pub fn run_schedule(args: LoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan_input = resolve_input(args)?;
    let mut result = loan::calculate_loan(&loan_input)?;
    result.result = result.result.rounded();
    Ok(serde_json::to_value(result)?)
}

pub fn run_payment(args: LoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan_input = resolve_input(args)?;
    let mut result = loan::quote_payment(&loan_input)?;
    result.result = result.result.rounded();
    Ok(serde_json::to_value(result)?)
}

pub fn run_prepayment(args: LoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan_input = resolve_input(args)?;
    let mut result = prepayment::compare_prepayment(&loan_input)?;
    result.result = result.result.rounded();
    Ok(serde_json::to_value(result)?)
}

pub fn run_series(args: LoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan_input = resolve_input(args)?;
    let calc = loan::calculate_loan(&loan_input)?;
    let points: Vec<SeriesPoint> = series::chart_series(&calc.result.schedule)
        .iter()
        .map(SeriesPoint::rounded)
        .collect();
    let output = with_metadata(
        "Balance and cumulative principal/interest per period",
        &loan_input,
        calc.warnings,
        calc.metadata.computation_time_us,
        points,
    );
    Ok(serde_json::to_value(output)?)
}

/// Write the schedule CSV. Returns a short summary when writing to a file,
/// `Value::Null` when the CSV itself went to stdout.
pub fn run_export(args: ExportArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan_input = resolve_input(args.loan)?;
    let calc = loan::calculate_loan(&loan_input)?;
    for w in &calc.warnings {
        tracing::warn!("{w}");
    }
    let rows = &calc.result.schedule;

    match args.out {
        Some(path) => {
            let file = File::create(&path)
                .map_err(|e| format!("Failed to create '{}': {}", path.display(), e))?;
            csv_out::write_schedule_csv(rows, file)?;
            tracing::info!(path = %path.display(), rows = rows.len(), "schedule exported");
            Ok(json!({
                "result": {
                    "path": path.display().to_string(),
                    "rows": rows.len(),
                    "paid_off": calc.result.paid_off,
                }
            }))
        }
        None => {
            csv_out::write_schedule_csv(rows, io::stdout().lock())?;
            Ok(Value::Null)
        }
    }
}
