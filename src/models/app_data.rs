//! The aggregate root
//!
//! `AppData` holds every wallet, transaction, category and the user settings.
//! It is the unit of persistence: it is loaded and saved whole, never in parts.

use serde::{Deserialize, Serialize};

use super::category::{Category, CategoryTree};
use super::ids::{CategoryId, TransactionId, WalletId};
use super::transaction::Transaction;
use super::wallet::Wallet;
use crate::config::Settings;

/// Whole-application state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppData {
    #[serde(default)]
    pub wallets: Vec<Wallet>,

    /// The ledger, in insertion order
    #[serde(default)]
    pub transactions: Vec<Transaction>,

    #[serde(default)]
    pub categories: CategoryTree,

    #[serde(default)]
    pub settings: Settings,
}

impl AppData {
    pub fn wallet(&self, id: WalletId) -> Option<&Wallet> {
        self.wallets.iter().find(|w| w.id == id)
    }

    pub fn wallet_mut(&mut self, id: WalletId) -> Option<&mut Wallet> {
        self.wallets.iter_mut().find(|w| w.id == id)
    }

    pub fn category(&self, id: CategoryId) -> Option<&Category> {
        self.categories.get(id)
    }

    pub fn transaction(&self, id: TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    pub(crate) fn transaction_index(&self, id: TransactionId) -> Option<usize> {
        self.transactions.iter().position(|t| t.id == id)
    }

    /// Find a wallet by exact name (case-insensitive) or by ID string
    pub fn find_wallet(&self, identifier: &str) -> Option<&Wallet> {
        let name = identifier.trim().to_lowercase();
        self.wallets
            .iter()
            .find(|w| w.name.to_lowercase() == name)
            .or_else(|| {
                self.wallets.iter().find(|w| {
                    super::ids::matches_short_id(w.id.as_uuid(), WalletId::prefix(), identifier)
                })
            })
    }

    /// Find a category by exact name (case-insensitive) or by ID string
    pub fn find_category(&self, identifier: &str) -> Option<&Category> {
        self.categories.find_by_name(identifier).or_else(|| {
            self.categories.iter().find(|c| {
                super::ids::matches_short_id(c.id.as_uuid(), CategoryId::prefix(), identifier)
            })
        })
    }

    /// Find a transaction by ID string (full UUID or short `txn-` form)
    pub fn find_transaction(&self, identifier: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|t| {
            super::ids::matches_short_id(t.id.as_uuid(), TransactionId::prefix(), identifier)
        })
    }

    /// Transactions referencing a wallet, in ledger order
    pub fn transactions_for_wallet(&self, wallet_id: WalletId) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter().filter(move |t| t.wallet_id == wallet_id)
    }

    /// Transactions referencing a category, in ledger order
    pub fn transactions_for_category(
        &self,
        category_id: CategoryId,
    ) -> impl Iterator<Item = &Transaction> {
        self.transactions
            .iter()
            .filter(move |t| t.category.category_id == category_id)
    }
}
