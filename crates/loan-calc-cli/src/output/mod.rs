pub mod csv_out;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Ledger fields in presentation order, with their display headers.
pub const SCHEDULE_COLUMNS: [(&str, &str); 6] = [
    ("period", "Period"),
    ("opening_balance", "Opening Balance"),
    ("payment", "Payment"),
    ("interest", "Interest"),
    ("principal", "Principal"),
    ("closing_balance", "Closing Balance"),
];

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Pretty-print JSON to stdout.
fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("JSON serialization error: {}", e),
    }
}

/// Column keys and headers for an array of row objects. Ledger rows keep the
/// Period..Closing Balance order; anything else uses the object's own keys.
pub fn columns_for(first: &serde_json::Map<String, Value>) -> Vec<(String, String)> {
    if SCHEDULE_COLUMNS.iter().all(|(key, _)| first.contains_key(*key)) {
        let mut cols: Vec<(String, String)> = SCHEDULE_COLUMNS
            .iter()
            .map(|(key, header)| (key.to_string(), header.to_string()))
            .collect();
        for key in first.keys() {
            if !SCHEDULE_COLUMNS.iter().any(|(k, _)| k == key) {
                cols.push((key.clone(), key.clone()));
            }
        }
        cols
    } else {
        first.keys().map(|k| (k.clone(), k.clone())).collect()
    }
}

/// Render a scalar JSON value as plain text.
pub fn format_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
