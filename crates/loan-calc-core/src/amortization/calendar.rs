use chrono::{Days, Months, NaiveDate};

use crate::amortization::payment::PaymentFrequency;
use crate::error::LoanCalcError;
use crate::LoanCalcResult;

/// Due date of the 1-based `period` for a loan starting on `start`.
///
/// Monthly installments land on the same day-of-month, clamped to the last
/// day of shorter months. Bi-weekly and weekly installments step by 14 and 7
/// days.
pub fn due_date(
    start: NaiveDate,
    frequency: PaymentFrequency,
    period: u32,
) -> LoanCalcResult<NaiveDate> {
    let due = match frequency {
        PaymentFrequency::Monthly => start.checked_add_months(Months::new(period)),
        PaymentFrequency::BiWeekly => start.checked_add_days(Days::new(14 * u64::from(period))),
        PaymentFrequency::Weekly => start.checked_add_days(Days::new(7 * u64::from(period))),
    };

    due.ok_or_else(|| {
        LoanCalcError::DateError(format!(
            "period {period} after {start} is outside the supported date range"
        ))
    })
}

/// Due dates for periods `1..=count`.
pub fn payment_dates(
    start: NaiveDate,
    frequency: PaymentFrequency,
    count: u32,
) -> LoanCalcResult<Vec<NaiveDate>> {
    (1..=count)
        .map(|period| due_date(start, frequency, period))
        .collect()
}
