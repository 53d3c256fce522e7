//! Assistant intent handling
//!
//! Executes the structured intents produced by a natural-language front end.
//! Two actions exist:
//!
//! ```json
//! {"action": "add", "amount": 12000, "type": "expense", "category": "groc", "wallet": "cash"}
//! {"action": "search", "query": "taxi"}
//! ```
//!
//! Names in an `add` intent are resolved loosely: the first wallet or
//! category whose name contains the text (case-insensitive) wins, and when
//! nothing matches the first entry of the list is used instead.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{AppData, Category, CategoryRef, Money, Transaction, TransactionType, Wallet};

use super::transaction::{list_transactions, CreateTransactionInput, TransactionFilter};

/// A structured request from the assistant front end
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum AssistantIntent {
    Add {
        amount: f64,
        #[serde(rename = "type", default = "default_type")]
        transaction_type: TransactionType,
        #[serde(default)]
        category: String,
        #[serde(default)]
        wallet: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        date: Option<NaiveDate>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        note: Option<String>,
    },
    Search {
        query: String,
    },
}

fn default_type() -> TransactionType {
    TransactionType::Expense
}

impl AssistantIntent {
    /// Parse an intent from its JSON form
    pub fn from_json(json: &str) -> LedgerResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| LedgerError::Validation(format!("Invalid assistant intent: {}", e)))
    }
}

/// What an intent resolved to
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedIntent {
    Add(CreateTransactionInput),
    Search(Vec<Transaction>),
}

/// Pick the first item whose name contains the query, or the first item
pub fn fuzzy_pick<'a, T>(
    items: &[&'a T],
    query: &str,
    name: impl Fn(&T) -> &str,
) -> Option<&'a T> {
    let query = query.trim().to_lowercase();
    items
        .iter()
        .find(|item| name(item).to_lowercase().contains(&query))
        .or_else(|| items.first())
        .copied()
}

/// Resolve a loosely named category of the given type
pub fn resolve_category<'a>(
    data: &'a AppData,
    category_type: TransactionType,
    query: &str,
) -> Option<&'a Category> {
    fuzzy_pick(&data.categories.list_by_type(category_type), query, |c| {
        c.name.as_str()
    })
}

/// Resolve a loosely named wallet
pub fn resolve_wallet<'a>(data: &'a AppData, query: &str) -> Option<&'a Wallet> {
    let wallets: Vec<&Wallet> = data.wallets.iter().collect();
    fuzzy_pick(&wallets, query, |w| w.name.as_str())
}

/// Turn an intent into either a ready-to-create transaction or search results
///
/// Nothing is mutated here; an `Add` result still has to go through the
/// ledger. `today` fills in a missing date.
pub fn resolve_intent(
    data: &AppData,
    intent: &AssistantIntent,
    today: NaiveDate,
) -> LedgerResult<ResolvedIntent> {
    match intent {
        AssistantIntent::Add {
            amount,
            transaction_type,
            category,
            wallet,
            date,
            note,
        } => {
            let amount = Money::from_f64(*amount)
                .filter(|m| m.is_positive())
                .ok_or_else(|| {
                    LedgerError::Validation(format!(
                        "Amount must be a positive number in range, got {}",
                        amount
                    ))
                })?;

            let category = resolve_category(data, *transaction_type, category).ok_or_else(|| {
                LedgerError::InvalidReference(format!(
                    "no {} categories to assign",
                    transaction_type.to_string().to_lowercase()
                ))
            })?;
            let wallet = resolve_wallet(data, wallet)
                .ok_or_else(|| LedgerError::InvalidReference("no wallets to assign".into()))?;

            debug!(category = %category.name, wallet = %wallet.name, "resolved add intent");

            Ok(ResolvedIntent::Add(CreateTransactionInput {
                id: None,
                transaction_type: *transaction_type,
                amount,
                wallet_id: wallet.id,
                category: CategoryRef::new(category.id),
                date: date.unwrap_or(today),
                note: note.clone(),
                location: None,
            }))
        }
        AssistantIntent::Search { query } => Ok(ResolvedIntent::Search(list_transactions(
            data,
            &TransactionFilter::new().query(query.as_str()),
        ))),
    }
}
