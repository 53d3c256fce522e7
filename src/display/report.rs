//! Report tables
//!
//! Breakdowns and period totals rendered with `tabled`.

use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use crate::reports::{BreakdownEntry, DayTotal, PeriodSummary};

#[derive(Tabled)]
struct BreakdownRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Share")]
    share: String,
    #[tabled(rename = "Count")]
    count: usize,
}

#[derive(Tabled)]
struct DayRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Total")]
    total: String,
    #[tabled(rename = "")]
    bar: String,
}

const BAR_WIDTH: usize = 30;

/// Format a category or subcategory breakdown
pub fn format_breakdown<K>(title: &str, entries: &[BreakdownEntry<K>]) -> String {
    if entries.is_empty() {
        return format!("{}\n\nNo activity.\n", title);
    }

    let rows: Vec<BreakdownRow> = entries
        .iter()
        .map(|e| BreakdownRow {
            name: e.name.clone(),
            amount: e.value.to_string(),
            share: format!("{:.1}%", e.percentage),
            count: e.transaction_count,
        })
        .collect();

    let table = Table::new(rows)
        .with(Style::psql())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
        .to_string();

    format!("{}\n\n{}\n", title, table)
}

/// Format per-day totals with a proportional bar
pub fn format_period_totals(title: &str, totals: &[DayTotal]) -> String {
    let peak = totals.iter().map(|t| t.total.cents()).max().unwrap_or(0);

    let rows: Vec<DayRow> = totals
        .iter()
        .map(|t| {
            let width = if peak > 0 {
                (t.total.cents() * BAR_WIDTH as i64 / peak) as usize
            } else {
                0
            };
            DayRow {
                date: t.date.format("%a %Y-%m-%d").to_string(),
                total: t.total.to_string(),
                bar: "#".repeat(width),
            }
        })
        .collect();

    let table = Table::new(rows)
        .with(Style::psql())
        .with(Modify::new(Columns::single(1)).with(Alignment::right()))
        .to_string();

    format!("{}\n\n{}\n", title, table)
}

/// Format the income/expense summary of a date range
pub fn format_period_summary(summary: &PeriodSummary) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "Summary {} .. {}\n",
        summary.start_date, summary.end_date
    ));
    output.push_str(&format!("  Income:       {:>14}\n", summary.total_income.to_string()));
    output.push_str(&format!("  Expense:      {:>14}\n", summary.total_expense.to_string()));
    output.push_str(&format!("  Net:          {:>14}\n", summary.net.to_string()));
    output.push_str(&format!("  Transactions: {:>14}\n", summary.transaction_count));
    output
}
