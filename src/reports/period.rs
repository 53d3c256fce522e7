//! Time-windowed totals
//!
//! Day-by-day totals for charting and the income/expense summary of a date
//! range. Amounts are summed as-is across wallets; no currency conversion
//! takes place.

use chrono::{Duration, NaiveDate};

use crate::models::{AppData, Money, TransactionType};

/// Total of one transaction type on one day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayTotal {
    pub date: NaiveDate,
    pub total: Money,
}

/// One entry per requested day, in the order given
///
/// Days without activity are reported with a zero total.
pub fn period_totals(
    data: &AppData,
    days: &[NaiveDate],
    transaction_type: TransactionType,
) -> Vec<DayTotal> {
    days.iter()
        .map(|&date| DayTotal {
            date,
            total: data
                .transactions
                .iter()
                .filter(|t| t.transaction_type == transaction_type && t.date == date)
                .map(|t| t.amount)
                .sum(),
        })
        .collect()
}

/// The `count` days ending at `end`, oldest first
pub fn trailing_days(end: NaiveDate, count: usize) -> Vec<NaiveDate> {
    (0..count)
        .rev()
        .filter_map(|offset| end.checked_sub_signed(Duration::days(offset as i64)))
        .collect()
}

/// Income and expense totals over an inclusive date range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodSummary {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_income: Money,
    pub total_expense: Money,
    /// Income minus expense
    pub net: Money,
    pub transaction_count: usize,
}

impl PeriodSummary {
    pub fn generate(data: &AppData, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        let mut total_income = Money::zero();
        let mut total_expense = Money::zero();
        let mut transaction_count = 0;

        for txn in data
            .transactions
            .iter()
            .filter(|t| t.date >= start_date && t.date <= end_date)
        {
            match txn.transaction_type {
                TransactionType::Income => total_income += txn.amount,
                TransactionType::Expense => total_expense += txn.amount,
            }
            transaction_count += 1;
        }

        Self {
            start_date,
            end_date,
            total_income,
            total_expense,
            net: total_income - total_expense,
            transaction_count,
        }
    }
}

pub fn period_summary(data: &AppData, start_date: NaiveDate, end_date: NaiveDate) -> PeriodSummary {
    PeriodSummary::generate(data, start_date, end_date)
}
