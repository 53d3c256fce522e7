//! Storage initialization
//!
//! Builds the seed aggregate used on first run and whenever a stored
//! snapshot cannot be read.

use crate::config::paths::WalletbookPaths;
use crate::config::Settings;
use crate::error::LedgerError;
use crate::models::{
    AppData, Category, CategoryTree, Currency, Subcategory, TransactionType, Wallet, WalletKind,
};

use super::file_io::write_json_atomic;

/// The documented default aggregate: three wallets and a starter taxonomy
pub fn default_app_data() -> AppData {
    let settings = Settings::default();
    let base = settings.base_currency;

    let wallets = vec![
        Wallet::new("Cash", WalletKind::Cash, base),
        Wallet::new("Card", WalletKind::Card, base),
        Wallet::new("Dollars", WalletKind::ForeignCash, Currency::Usd),
    ];

    let categories = vec![
        Category::new("Food", TransactionType::Expense)
            .with_icon("utensils")
            .with_subcategories(vec![
                Subcategory::with_items("Groceries", &["Vegetables", "Meat", "Dairy"]),
                Subcategory::new("Restaurants"),
            ]),
        Category::new("Transport", TransactionType::Expense)
            .with_icon("bus")
            .with_subcategories(vec![Subcategory::new("Taxi"), Subcategory::new("Fuel")]),
        Category::new("Housing", TransactionType::Expense)
            .with_icon("home")
            .with_subcategories(vec![
                Subcategory::new("Rent"),
                Subcategory::with_items("Utilities", &["Electricity", "Gas", "Water"]),
            ]),
        Category::new("Health", TransactionType::Expense).with_icon("heart"),
        Category::new("Entertainment", TransactionType::Expense).with_icon("film"),
        Category::new("Shopping", TransactionType::Expense).with_icon("bag"),
        Category::new("Salary", TransactionType::Income).with_icon("briefcase"),
        Category::new("Freelance", TransactionType::Income).with_icon("laptop"),
        Category::new("Gifts", TransactionType::Income).with_icon("gift"),
    ];

    AppData {
        wallets,
        transactions: Vec::new(),
        categories: CategoryTree::new(categories),
        settings,
    }
}

/// Initialize storage for a fresh installation
///
/// Writes the seed aggregate unless a snapshot already exists.
pub fn initialize_storage(paths: &WalletbookPaths) -> Result<bool, LedgerError> {
    paths.ensure_directories()?;

    if paths.snapshot_file().exists() {
        return Ok(false);
    }

    write_json_atomic(paths.snapshot_file(), &default_app_data())?;
    Ok(true)
}
