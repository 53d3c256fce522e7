//! Reports for Walletbook
//!
//! Read-only aggregations over the aggregate: per-day totals, category and
//! subcategory breakdowns, per-currency balances and the transaction
//! register. Every function takes `&AppData` and never fails; missing
//! references simply contribute nothing.

pub mod balances;
pub mod breakdown;
pub mod period;
pub mod register;

pub use balances::{aggregate_balance, currency_totals, net_effect, CurrencyTotal};
pub use breakdown::{
    category_breakdown, category_breakdown_between, subcategory_breakdown, BreakdownEntry,
    SubcategoryBucket,
};
pub use period::{period_summary, period_totals, trailing_days, DayTotal, PeriodSummary};
pub use register::{RegisterEntry, RegisterReport};
