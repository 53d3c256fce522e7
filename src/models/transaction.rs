//! Transaction model
//!
//! An income or expense event against a wallet. The amount is always
//! positive; the direction of the balance change is carried by the type.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{CategoryId, ChildItemId, SubcategoryId, TransactionId, WalletId};
use super::money::Money;

/// Direction of a transaction (and type of a category)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    /// Parse a transaction type from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" | "in" => Some(Self::Income),
            "expense" | "out" => Some(Self::Expense),
            _ => None,
        }
    }

    /// Apply the direction to a positive amount
    pub fn signed(&self, amount: Money) -> Money {
        match self {
            Self::Income => amount,
            Self::Expense => -amount,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => write!(f, "Income"),
            Self::Expense => write!(f, "Expense"),
        }
    }
}

/// Reference into the category hierarchy
///
/// Only the category is required; the lower levels are optional
/// specializations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryRef {
    pub category_id: CategoryId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_category_id: Option<SubcategoryId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_category_id: Option<ChildItemId>,
}

impl CategoryRef {
    /// Reference a category without specialization
    pub fn new(category_id: CategoryId) -> Self {
        Self {
            category_id,
            sub_category_id: None,
            child_category_id: None,
        }
    }

    /// Narrow the reference to a subcategory
    pub fn with_subcategory(mut self, sub_category_id: SubcategoryId) -> Self {
        self.sub_category_id = Some(sub_category_id);
        self
    }

    /// Narrow the reference to a child item
    pub fn with_child_item(mut self, child_category_id: ChildItemId) -> Self {
        self.child_category_id = Some(child_category_id);
        self
    }
}

/// A ledger entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier
    pub id: TransactionId,

    /// Positive amount in the wallet's currency
    pub amount: Money,

    /// Income or expense
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,

    /// Wallet the effect is applied to
    pub wallet_id: WalletId,

    /// Position in the category hierarchy
    #[serde(flatten)]
    pub category: CategoryRef,

    /// Calendar day of the transaction
    pub date: NaiveDate,

    /// Free-form note
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    /// Where the transaction happened
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// When the record was first created
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a new transaction
    pub fn new(
        transaction_type: TransactionType,
        amount: Money,
        wallet_id: WalletId,
        category: CategoryRef,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: TransactionId::new(),
            amount,
            transaction_type,
            wallet_id,
            category,
            date,
            note: None,
            location: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Signed balance delta this transaction applies to its wallet
    pub fn effect(&self) -> Money {
        self.transaction_type.signed(self.amount)
    }

    pub fn is_income(&self) -> bool {
        self.transaction_type == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.transaction_type == TransactionType::Expense
    }

    /// Validate the transaction
    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        if !self.amount.is_positive() {
            return Err(TransactionValidationError::NonPositiveAmount(self.amount));
        }

        if let Some(note) = &self.note {
            if note.len() > 500 {
                return Err(TransactionValidationError::NoteTooLong(note.len()));
            }
        }

        Ok(())
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.date.format("%Y-%m-%d"),
            self.transaction_type,
            self.amount
        )
    }
}

/// Validation errors for transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionValidationError {
    NonPositiveAmount(Money),
    NoteTooLong(usize),
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveAmount(amount) => {
                write!(f, "Transaction amount must be positive (got {})", amount)
            }
            Self::NoteTooLong(len) => write!(f, "Note too long ({} chars, max 500)", len),
        }
    }
}

impl std::error::Error for TransactionValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    fn sample(transaction_type: TransactionType, cents: i64) -> Transaction {
        Transaction::new(
            transaction_type,
            Money::from_cents(cents),
            WalletId::new(),
            CategoryRef::new(CategoryId::new()),
            test_date(),
        )
    }

    #[test]
    fn test_effect_sign() {
        assert_eq!(sample(TransactionType::Income, 500).effect().cents(), 500);
        assert_eq!(sample(TransactionType::Expense, 500).effect().cents(), -500);
    }

    #[test]
    fn test_validation() {
        assert!(sample(TransactionType::Expense, 1).validate().is_ok());
        assert_eq!(
            sample(TransactionType::Expense, 0).validate(),
            Err(TransactionValidationError::NonPositiveAmount(Money::zero()))
        );
        assert!(sample(TransactionType::Income, -100).validate().is_err());

        let long_note = sample(TransactionType::Income, 100).with_note("x".repeat(501));
        assert!(matches!(
            long_note.validate(),
            Err(TransactionValidationError::NoteTooLong(501))
        ));
    }

    #[test]
    fn test_type_parse() {
        assert_eq!(TransactionType::parse("Income"), Some(TransactionType::Income));
        assert_eq!(TransactionType::parse("expense"), Some(TransactionType::Expense));
        assert_eq!(TransactionType::parse("transfer"), None);
    }

    #[test]
    fn test_serialization_flattens_category_ref() {
        let txn = sample(TransactionType::Expense, 1500)
            .with_note("lunch")
            .with_location("Tashkent");
        let json = serde_json::to_value(&txn).unwrap();

        assert_eq!(json["type"], "expense");
        assert!(json.get("category_id").is_some());
        assert!(json.get("sub_category_id").is_none());

        let back: Transaction = serde_json::from_value(json).unwrap();
        assert_eq!(back, txn);
    }

    #[test]
    fn test_display() {
        let txn = sample(TransactionType::Expense, 1050);
        assert_eq!(txn.to_string(), "2025-03-14 Expense 10.50");
    }
}
