//! Per-period data series for balance and cumulative-split charts.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::amortization::schedule::LedgerRow;
use crate::types::{round_money, Money};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub period: u32,
    pub closing_balance: Money,
    pub principal: Money,
    pub interest: Money,
    pub cumulative_principal: Money,
    pub cumulative_interest: Money,
}

impl SeriesPoint {
    pub fn rounded(&self) -> Self {
        SeriesPoint {
            period: self.period,
            closing_balance: round_money(self.closing_balance),
            principal: round_money(self.principal),
            interest: round_money(self.interest),
            cumulative_principal: round_money(self.cumulative_principal),
            cumulative_interest: round_money(self.cumulative_interest),
        }
    }
}

/// Balance, principal/interest split and running totals for each row.
pub fn chart_series(rows: &[LedgerRow]) -> Vec<SeriesPoint> {
    rows.iter()
        .scan(
            (Decimal::ZERO, Decimal::ZERO),
            |(cum_principal, cum_interest), row| {
                *cum_principal += row.principal;
                *cum_interest += row.interest;
                Some(SeriesPoint {
                    period: row.period,
                    closing_balance: row.closing_balance,
                    principal: row.principal,
                    interest: row.interest,
                    cumulative_principal: *cum_principal,
                    cumulative_interest: *cum_interest,
                })
            },
        )
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amortization::schedule::build_schedule;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_cumulative_totals_match_schedule() {
        let sched = build_schedule(dec!(1000), dec!(0.01), 3, dec!(400));
        let series = chart_series(&sched.rows);
        assert_eq!(series.len(), sched.rows.len());
        let last = series.last().unwrap();
        assert_eq!(last.cumulative_principal, sched.total_principal);
        assert_eq!(last.cumulative_interest, sched.total_interest);
        assert_eq!(last.closing_balance, Decimal::ZERO);
    }

    #[test]
    fn test_first_point() {
        let sched = build_schedule(dec!(1000), dec!(0.01), 3, dec!(400));
        let series = chart_series(&sched.rows);
        assert_eq!(
            series[0],
            SeriesPoint {
                period: 1,
                closing_balance: dec!(610),
                principal: dec!(390),
                interest: dec!(10),
                cumulative_principal: dec!(390),
                cumulative_interest: dec!(10),
            }
        );
    }

    #[test]
    fn test_empty_rows() {
        assert!(chart_series(&[]).is_empty());
    }
}
