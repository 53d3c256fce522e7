//! Core data models for Walletbook
//!
//! Wallets, the category taxonomy, ledger transactions and the aggregate root
//! that ties them together.

pub mod app_data;
pub mod category;
pub mod ids;
pub mod money;
pub mod transaction;
pub mod wallet;

pub use app_data::AppData;
pub use category::{Category, CategoryTree, ChildItem, ResolvedCategory, Subcategory};
pub use ids::{CategoryId, ChildItemId, SubcategoryId, TransactionId, WalletId};
pub use money::Money;
pub use transaction::{CategoryRef, Transaction, TransactionType};
pub use wallet::{Currency, Wallet, WalletKind};
