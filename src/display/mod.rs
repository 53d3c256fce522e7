//! Display formatting for terminal output
//!
//! Plain-text renderings of wallets, the category tree and transactions, plus
//! `tabled` tables for reports.

pub mod category;
pub mod report;
pub mod transaction;
pub mod wallet;

pub use category::format_category_tree;
pub use report::{format_breakdown, format_period_summary, format_period_totals};
pub use transaction::{format_register, format_transaction_details};
pub use wallet::{format_currency_totals, format_wallet_details, format_wallet_list};
