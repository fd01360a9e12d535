use serde_json::Value;
use tabled::{builder::Builder, Table};

use loan_calc_core::types::Currency;

use super::{columns_for, format_scalar};

/// Format output as tables using the tabled crate. Scalar result fields go
/// into a Field/Value table; row arrays (the ledger, chart series) get a
/// table of their own.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result_table(result, map);
            } else {
                print_flat_object(map);
            }
        }
        Value::Array(arr) => print_array_table(arr),
        _ => println!("{}", value),
    }
}

fn print_result_table(result: &Value, envelope: &serde_json::Map<String, Value>) {
    match result {
        Value::Object(res_map) => {
            let currency = res_map
                .get("currency")
                .and_then(|c| serde_json::from_value::<Currency>(c.clone()).ok());

            let mut builder = Builder::default();
            builder.push_record(["Field", "Value"]);
            let mut row_tables: Vec<(&String, &Vec<Value>)> = Vec::new();
            for (key, val) in res_map {
                match val {
                    Value::Array(rows) if rows.iter().any(Value::is_object) => {
                        row_tables.push((key, rows));
                    }
                    _ => {
                        builder.push_record([key.as_str(), &format_value(val)]);
                    }
                }
            }
            println!("{}", Table::from(builder));
            if let Some(currency) = currency {
                println!("Amounts in {}", currency.symbol());
            }

            for (name, rows) in row_tables {
                println!("\n{}:", name);
                print_array_table(rows);
            }
        }
        Value::Array(rows) => print_array_table(rows),
        _ => print_flat_object(envelope),
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_flat_object(map: &serde_json::Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        builder.push_record([key.as_str(), &format_value(val)]);
    }
    println!("{}", Table::from(builder));
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let columns = columns_for(first);
        let mut builder = Builder::default();
        builder.push_record(columns.iter().map(|(_, header)| header.clone()));

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = columns
                    .iter()
                    .map(|(key, _)| map.get(key).map(format_value).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }

        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", format_value(item));
        }
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        _ => format_scalar(value),
    }
}
