use serde_json::Value;
use std::io;

use loan_calc_core::amortization::schedule::LedgerRow;

use super::{columns_for, format_scalar, SCHEDULE_COLUMNS};

/// Write output as CSV to stdout. A ledger inside the result is written as
/// one row per period; other results become field/value pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());
    if let Err(e) = write_value_csv(&mut wtr, value) {
        eprintln!("CSV write error: {}", e);
    }
}

fn write_value_csv<W: io::Write>(wtr: &mut csv::Writer<W>, value: &Value) -> csv::Result<()> {
    let result = value.get("result").unwrap_or(value);

    match result {
        Value::Object(map) => {
            if let Some(Value::Array(rows)) = map.get("schedule") {
                write_array_csv(wtr, rows)?;
            } else {
                wtr.write_record(["field", "value"])?;
                for (key, val) in map {
                    wtr.write_record([key.as_str(), &format_scalar(val)])?;
                }
            }
        }
        Value::Array(arr) => write_array_csv(wtr, arr)?,
        _ => wtr.write_record([&format_scalar(result)])?,
    }

    wtr.flush()?;
    Ok(())
}

fn write_array_csv<W: io::Write>(wtr: &mut csv::Writer<W>, arr: &[Value]) -> csv::Result<()> {
    let Some(Value::Object(first)) = arr.first() else {
        for item in arr {
            wtr.write_record([&format_scalar(item)])?;
        }
        return Ok(());
    };

    let columns = columns_for(first);
    wtr.write_record(columns.iter().map(|(_, header)| header.as_str()))?;

    for item in arr {
        if let Value::Object(map) = item {
            let row: Vec<String> = columns
                .iter()
                .map(|(key, _)| map.get(key).map(format_scalar).unwrap_or_default())
                .collect();
            wtr.write_record(&row)?;
        }
    }
    Ok(())
}

/// Export a ledger as UTF-8 CSV: a header row, then one row per period with
/// amounts rounded to 2 dp.
pub fn write_schedule_csv<W: io::Write>(
    rows: &[LedgerRow],
    writer: W,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(SCHEDULE_COLUMNS.iter().map(|(_, header)| *header))?;

    for row in rows.iter().map(LedgerRow::rounded) {
        wtr.write_record([
            row.period.to_string(),
            row.opening_balance.to_string(),
            row.payment.to_string(),
            row.interest.to_string(),
            row.principal.to_string(),
            row.closing_balance.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
