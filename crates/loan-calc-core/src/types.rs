use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates. Periodic rates are fractions (0.05 = 5%); fields named `*_percent`
/// hold percentages.
pub type Rate = Decimal;

/// Year fractions or counts
pub type Years = Decimal;

/// Decimal places used when presenting monetary amounts.
pub const PRESENTATION_DP: u32 = 2;

/// Round a monetary amount for presentation (2 dp, half away from zero).
/// The result always carries exactly two decimal places, so `500` renders as
/// `500.00`.
pub fn round_money(value: Money) -> Money {
    let mut rounded =
        value.round_dp_with_strategy(PRESENTATION_DP, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(PRESENTATION_DP);
    rounded
}

/// Display currency. Amounts are never converted between currencies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    #[default]
    INR,
    USD,
    EUR,
    GBP,
    Other(String),
}

impl Currency {
    pub fn symbol(&self) -> &str {
        match self {
            Currency::INR => "₹",
            Currency::USD => "$",
            Currency::EUR => "€",
            Currency::GBP => "£",
            Currency::Other(code) => code.as_str(),
        }
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
