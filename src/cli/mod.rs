//! CLI command handlers
//!
//! Bridges clap argument parsing with the tracker. Every mutating command
//! goes through [`Tracker`](crate::tracker::Tracker), which persists the
//! snapshot before returning.

pub mod assistant;
pub mod category;
pub mod report;
pub mod transaction;
pub mod wallet;

pub use assistant::handle_ask_command;
pub use category::{handle_category_command, CategoryCommands};
pub use report::{handle_report_command, ReportCommands};
pub use transaction::{handle_transaction_command, TransactionCommands};
pub use wallet::{handle_wallet_command, WalletCommands};

use chrono::{Local, NaiveDate};

use crate::error::{LedgerError, LedgerResult};
use crate::models::ids::matches_short_id;
use crate::models::{
    AppData, Category, ChildItem, ChildItemId, Money, Subcategory, SubcategoryId, TransactionType,
    Wallet,
};

pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub(crate) fn parse_money(input: &str) -> LedgerResult<Money> {
    Money::parse(input).map_err(|e| {
        LedgerError::Validation(format!(
            "Invalid amount '{}'. Use a format like '1500' or '12.50'. Error: {}",
            input, e
        ))
    })
}

pub(crate) fn parse_date(input: &str) -> LedgerResult<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|_| {
        LedgerError::Validation(format!("Invalid date '{}'. Use YYYY-MM-DD.", input))
    })
}

pub(crate) fn parse_type(input: &str) -> LedgerResult<TransactionType> {
    TransactionType::parse(input).ok_or_else(|| {
        LedgerError::Validation(format!(
            "Invalid type '{}'. Valid types: income, expense",
            input
        ))
    })
}

pub(crate) fn find_wallet<'a>(data: &'a AppData, identifier: &str) -> LedgerResult<&'a Wallet> {
    data.find_wallet(identifier)
        .ok_or_else(|| LedgerError::wallet_not_found(identifier))
}

pub(crate) fn find_category<'a>(
    data: &'a AppData,
    identifier: &str,
) -> LedgerResult<&'a Category> {
    data.find_category(identifier)
        .ok_or_else(|| LedgerError::category_not_found(identifier))
}

/// Subcategory of `category` by name (case-insensitive) or id
pub(crate) fn find_subcategory<'a>(
    category: &'a Category,
    identifier: &str,
) -> LedgerResult<&'a Subcategory> {
    let name = identifier.trim().to_lowercase();
    category
        .subcategories
        .iter()
        .find(|s| s.name.to_lowercase() == name)
        .or_else(|| {
            category.subcategories.iter().find(|s| {
                matches_short_id(s.id.as_uuid(), SubcategoryId::prefix(), identifier)
            })
        })
        .ok_or_else(|| LedgerError::subcategory_not_found(identifier))
}

/// Child item of `subcategory` by name (case-insensitive) or id
pub(crate) fn find_child_item<'a>(
    subcategory: &'a Subcategory,
    identifier: &str,
) -> LedgerResult<&'a ChildItem> {
    let name = identifier.trim().to_lowercase();
    subcategory
        .items
        .iter()
        .find(|i| i.name.to_lowercase() == name)
        .or_else(|| {
            subcategory
                .items
                .iter()
                .find(|i| matches_short_id(i.id.as_uuid(), ChildItemId::prefix(), identifier))
        })
        .ok_or_else(|| LedgerError::child_item_not_found(identifier))
}
