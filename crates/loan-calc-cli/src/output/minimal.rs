use serde_json::Value;

use super::format_scalar;

/// Result fields tried in order when printing a single headline value.
const PRIORITY_KEYS: [&str; 5] = [
    "gross_payment",
    "interest_saved",
    "scheduled_payment",
    "total_paid",
    "path",
];

/// Print just the key answer value from the output.
///
/// Looks for well-known result fields in priority order, then falls back to
/// the first field in the result object.
pub fn print_minimal(value: &Value) {
    println!("{}", headline(value));
}

fn headline(value: &Value) -> String {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match result_obj {
        Value::Object(map) => {
            for key in PRIORITY_KEYS {
                if let Some(val) = map.get(key) {
                    if !val.is_null() {
                        return format_scalar(val);
                    }
                }
            }
            match map.iter().next() {
                Some((key, val)) => format!("{}: {}", key, format_scalar(val)),
                None => String::new(),
            }
        }
        // Series output: the final point is the headline.
        Value::Array(arr) => arr.last().map(format_scalar).unwrap_or_default(),
        other => format_scalar(other),
    }
}
