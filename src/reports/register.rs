//! Transaction register
//!
//! The filtered, newest-first transaction listing with wallet and category
//! names resolved for display.

use chrono::NaiveDate;

use crate::models::{AppData, Currency, Money, Transaction, TransactionId, TransactionType};
use crate::services::transaction::{list_transactions, TransactionFilter};

/// A single row of the register
#[derive(Debug, Clone)]
pub struct RegisterEntry {
    pub id: TransactionId,
    pub date: NaiveDate,
    pub transaction_type: TransactionType,
    pub amount: Money,
    /// Wallet name, or "?" for a dangling reference
    pub wallet: String,
    /// Wallet currency, when the wallet exists
    pub currency: Option<Currency>,
    /// "Category / Subcategory / Item"
    pub category: String,
    pub note: String,
    pub location: String,
}

impl RegisterEntry {
    fn from_transaction(data: &AppData, txn: &Transaction) -> Self {
        let wallet = data.wallet(txn.wallet_id);
        let category = match data.categories.resolve_path(&txn.category) {
            Ok(resolved) => resolved.label(),
            Err(_) => data
                .category(txn.category.category_id)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| "?".to_string()),
        };

        Self {
            id: txn.id,
            date: txn.date,
            transaction_type: txn.transaction_type,
            amount: txn.amount,
            wallet: wallet.map(|w| w.name.clone()).unwrap_or_else(|| "?".into()),
            currency: wallet.map(|w| w.currency),
            category,
            note: txn.note.clone().unwrap_or_default(),
            location: txn.location.clone().unwrap_or_default(),
        }
    }

    /// Amount with the sign of its effect
    pub fn signed_amount(&self) -> Money {
        self.transaction_type.signed(self.amount)
    }
}

/// Filtered register with totals
#[derive(Debug, Clone)]
pub struct RegisterReport {
    pub entries: Vec<RegisterEntry>,
    pub total_income: Money,
    pub total_expense: Money,
}

impl RegisterReport {
    pub fn generate(data: &AppData, filter: &TransactionFilter) -> Self {
        Self::from_transactions(data, &list_transactions(data, filter))
    }

    /// Build a register over transactions that were already selected
    pub fn from_transactions(data: &AppData, transactions: &[Transaction]) -> Self {
        let entries: Vec<RegisterEntry> = transactions
            .iter()
            .map(|txn| RegisterEntry::from_transaction(data, txn))
            .collect();

        let total_of = |kind: TransactionType| -> Money {
            entries
                .iter()
                .filter(|e| e.transaction_type == kind)
                .map(|e| e.amount)
                .sum()
        };
        let total_income = total_of(TransactionType::Income);
        let total_expense = total_of(TransactionType::Expense);

        Self {
            entries,
            total_income,
            total_expense,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, CategoryRef, Subcategory, Wallet, WalletKind};

    #[test]
    fn test_register_resolves_names_and_totals() {
        let mut data = AppData::default();
        let wallet = Wallet::new("Cash", WalletKind::Cash, Currency::Uzs);
        let food = Category::new("Food", TransactionType::Expense)
            .with_subcategories(vec![Subcategory::new("Groceries")]);
        let salary = Category::new("Salary", TransactionType::Income);

        let date = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
        data.transactions.push(
            Transaction::new(
                TransactionType::Expense,
                Money::from_units(40),
                wallet.id,
                CategoryRef::new(food.id).with_subcategory(food.subcategories[0].id),
                date,
            )
            .with_note("veg"),
        );
        data.transactions.push(Transaction::new(
            TransactionType::Income,
            Money::from_units(900),
            wallet.id,
            CategoryRef::new(salary.id),
            date.succ_opt().unwrap(),
        ));
        data.wallets.push(wallet);
        data.categories.push(food);
        data.categories.push(salary);

        let report = RegisterReport::generate(&data, &TransactionFilter::new());
        assert_eq!(report.entries.len(), 2);
        assert_eq!(report.entries[0].category, "Salary");
        assert_eq!(report.entries[1].category, "Food / Groceries");
        assert_eq!(report.entries[1].wallet, "Cash");
        assert_eq!(report.entries[1].signed_amount(), Money::from_units(-40));
        assert_eq!(report.total_income, Money::from_units(900));
        assert_eq!(report.total_expense, Money::from_units(40));
    }

    #[test]
    fn test_register_tolerates_dangling_references() {
        let mut data = AppData::default();
        data.transactions.push(Transaction::new(
            TransactionType::Expense,
            Money::from_units(1),
            crate::models::WalletId::new(),
            CategoryRef::new(crate::models::CategoryId::new()),
            NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
        ));

        let report = RegisterReport::generate(&data, &TransactionFilter::new());
        assert_eq!(report.entries[0].wallet, "?");
        assert_eq!(report.entries[0].category, "?");
        assert!(report.entries[0].currency.is_none());
    }
}
