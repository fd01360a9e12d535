mod commands;
mod input;
mod logging;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use serde_json::Value;
use std::process;

use commands::loan::{ExportArgs, LoanArgs};
use logging::LogFormat;

/// Loan amortization calculator
#[derive(Parser)]
#[command(
    name = "loancalc",
    version,
    about = "Loan amortization schedules and payoff metrics",
    long_about = "Computes the periodic installment, a period-by-period amortization \
                  ledger and payoff totals for a fixed-rate loan, with optional \
                  extra prepayment, fees and yearly charges. Decimal precision \
                  throughout; amounts are shown rounded to 2 dp."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Log line format
    #[arg(long, value_enum, default_value = "pretty", global = true)]
    log_format: LogFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Full amortization schedule with payoff summary
    Schedule(LoanArgs),
    /// Periodic installment only
    Payment(LoanArgs),
    /// Compare payoff with and without the extra prepayment
    Prepayment(LoanArgs),
    /// Balance and cumulative principal/interest series for charting
    Series(LoanArgs),
    /// Export the schedule as CSV
    Export(ExportArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();
    logging::init_logging(logging::level_for_verbosity(cli.verbose), cli.log_format);

    let result: Result<Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Schedule(args) => commands::loan::run_schedule(args),
        Commands::Payment(args) => commands::loan::run_payment(args),
        Commands::Prepayment(args) => commands::loan::run_prepayment(args),
        Commands::Series(args) => commands::loan::run_series(args),
        Commands::Export(args) => commands::loan::run_export(args),
        Commands::Version => {
            println!("loancalc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(Value::Null) => process::exit(0),
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
