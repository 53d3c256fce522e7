//! Report CLI commands

use chrono::{Datelike, NaiveDate};
use clap::Subcommand;

use crate::display::report::{format_breakdown, format_period_summary, format_period_totals};
use crate::error::LedgerResult;
use crate::reports::{category_breakdown_between, trailing_days};
use crate::tracker::Tracker;

use super::{find_category, parse_date, parse_type, today};

/// Report subcommands
#[derive(Subcommand)]
pub enum ReportCommands {
    /// Totals per category, largest first
    Categories {
        /// income or expense
        #[arg(short = 't', long = "type", default_value = "expense")]
        transaction_type: String,
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
    },
    /// Totals per subcategory of one category
    Subcategories {
        /// Category name or ID
        category: String,
    },
    /// Day-by-day totals over a trailing window
    Period {
        /// Number of days; defaults to the configured window
        #[arg(long)]
        days: Option<u32>,
        /// Last day of the window; defaults to today
        #[arg(long)]
        end: Option<String>,
        /// income or expense
        #[arg(short = 't', long = "type", default_value = "expense")]
        transaction_type: String,
    },
    /// Income, expense and net over a date range
    Summary {
        /// Start date; defaults to the first of the current month
        #[arg(long)]
        from: Option<String>,
        /// End date; defaults to today
        #[arg(long)]
        to: Option<String>,
    },
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Handle a report command
pub fn handle_report_command(tracker: &Tracker, cmd: ReportCommands) -> LedgerResult<()> {
    match cmd {
        ReportCommands::Categories {
            transaction_type,
            from,
            to,
        } => {
            let transaction_type = parse_type(&transaction_type)?;
            let title = format!("{} by category", transaction_type);

            let entries = match (from, to) {
                (None, None) => tracker.category_breakdown(transaction_type),
                (from, to) => {
                    let end = to.as_deref().map(parse_date).transpose()?.unwrap_or_else(today);
                    let start = from
                        .as_deref()
                        .map(parse_date)
                        .transpose()?
                        .unwrap_or(NaiveDate::MIN);
                    category_breakdown_between(tracker.data(), transaction_type, start, end)
                }
            };

            print!("{}", format_breakdown(&title, &entries));
        }

        ReportCommands::Subcategories { category } => {
            let found = find_category(tracker.data(), &category)?;
            let title = format!("{} by subcategory", found.name);
            let entries = tracker.subcategory_breakdown(found.id);
            print!("{}", format_breakdown(&title, &entries));
        }

        ReportCommands::Period {
            days,
            end,
            transaction_type,
        } => {
            let transaction_type = parse_type(&transaction_type)?;
            let count = days.unwrap_or(tracker.data().settings.trailing_days);
            let end = end.as_deref().map(parse_date).transpose()?.unwrap_or_else(today);

            let window = trailing_days(end, count as usize);
            let totals = tracker.period_totals(&window, transaction_type);
            let title = format!("{} over the last {} day(s)", transaction_type, count);
            print!("{}", format_period_totals(&title, &totals));
        }

        ReportCommands::Summary { from, to } => {
            let end = to.as_deref().map(parse_date).transpose()?.unwrap_or_else(today);
            let start = from
                .as_deref()
                .map(parse_date)
                .transpose()?
                .unwrap_or_else(|| first_of_month(end));

            print!("{}", format_period_summary(&tracker.period_summary(start, end)));
        }
    }

    Ok(())
}
