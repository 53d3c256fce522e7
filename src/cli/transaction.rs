//! Transaction CLI commands

use clap::{Args, Subcommand};

use crate::display::transaction::{format_register, format_transaction_details};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{AppData, CategoryRef, Transaction, TransactionId};
use crate::reports::RegisterReport;
use crate::services::{CreateTransactionInput, TransactionFilter};
use crate::tracker::Tracker;

use super::{
    find_category, find_child_item, find_subcategory, find_wallet, parse_date, parse_money,
    parse_type, today,
};

/// Category path given on the command line
#[derive(Args, Debug, Default)]
pub struct CategoryArgs {
    /// Subcategory name or ID
    #[arg(short, long)]
    pub sub: Option<String>,
    /// Child item name or ID (requires --sub)
    #[arg(short, long)]
    pub item: Option<String>,
}

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Record a new transaction
    Add {
        /// Wallet name or ID
        wallet: String,
        /// Amount, always positive (e.g. "12000" or "12.50")
        amount: String,
        /// Category name or ID
        #[arg(short, long)]
        category: String,
        #[command(flatten)]
        path: CategoryArgs,
        /// income or expense; defaults to the category's type
        #[arg(short = 't', long = "type")]
        transaction_type: Option<String>,
        /// Date (YYYY-MM-DD); defaults to today
        #[arg(short, long)]
        date: Option<String>,
        /// Note
        #[arg(short, long)]
        note: Option<String>,
        /// Location
        #[arg(short, long)]
        location: Option<String>,
    },
    /// Edit a transaction
    Edit {
        /// Transaction ID
        id: String,
        /// New amount
        #[arg(short, long)]
        amount: Option<String>,
        /// Move to another wallet
        #[arg(short, long)]
        wallet: Option<String>,
        /// New category; clears the subcategory unless --sub is given
        #[arg(short, long)]
        category: Option<String>,
        #[command(flatten)]
        path: CategoryArgs,
        /// New type
        #[arg(short = 't', long = "type")]
        transaction_type: Option<String>,
        /// New date
        #[arg(short, long)]
        date: Option<String>,
        /// New note (empty string clears it)
        #[arg(short, long)]
        note: Option<String>,
        /// New location (empty string clears it)
        #[arg(short, long)]
        location: Option<String>,
    },
    /// Delete a transaction
    Delete {
        /// Transaction ID
        id: String,
    },
    /// Show one transaction
    Show {
        /// Transaction ID
        id: String,
    },
    /// List transactions, newest first
    List {
        /// Filter by wallet
        #[arg(short, long)]
        wallet: Option<String>,
        /// Filter by category
        #[arg(short, long)]
        category: Option<String>,
        /// Filter by subcategory (requires --category)
        #[arg(short, long)]
        sub: Option<String>,
        /// Filter by type
        #[arg(short = 't', long = "type")]
        transaction_type: Option<String>,
        /// Start date (inclusive)
        #[arg(long)]
        from: Option<String>,
        /// End date (inclusive)
        #[arg(long)]
        to: Option<String>,
        /// Free text over note, category, subcategory and amount
        #[arg(short, long)]
        query: Option<String>,
        /// Location substring
        #[arg(long)]
        location: Option<String>,
        /// Maximum number of rows
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
    },
}

fn find_transaction(data: &AppData, identifier: &str) -> LedgerResult<Transaction> {
    data.find_transaction(identifier)
        .cloned()
        .ok_or_else(|| LedgerError::transaction_not_found(identifier))
}

/// Resolve a category name plus optional sub/item names to a reference
fn resolve_category_ref(
    data: &AppData,
    category: &str,
    path: &CategoryArgs,
) -> LedgerResult<CategoryRef> {
    let category = find_category(data, category)?;
    let mut reference = CategoryRef::new(category.id);

    match (&path.sub, &path.item) {
        (Some(sub), item) => {
            let sub = find_subcategory(category, sub)?;
            reference = reference.with_subcategory(sub.id);
            if let Some(item) = item {
                reference = reference.with_child_item(find_child_item(sub, item)?.id);
            }
        }
        (None, Some(_)) => {
            return Err(LedgerError::Validation("--item requires --sub".into()));
        }
        (None, None) => {}
    }

    Ok(reference)
}

fn optional_text(value: String) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Handle a transaction command
pub fn handle_transaction_command(
    tracker: &mut Tracker,
    cmd: TransactionCommands,
) -> LedgerResult<()> {
    match cmd {
        TransactionCommands::Add {
            wallet,
            amount,
            category,
            path,
            transaction_type,
            date,
            note,
            location,
        } => {
            let data = tracker.data();
            let wallet_id = find_wallet(data, &wallet)?.id;
            let reference = resolve_category_ref(data, &category, &path)?;
            let transaction_type = match transaction_type {
                Some(t) => parse_type(&t)?,
                None => find_category(data, &category)?.category_type,
            };
            let date = match date {
                Some(d) => parse_date(&d)?,
                None => today(),
            };

            let id = TransactionId::new();
            let data = tracker.create_transaction(CreateTransactionInput {
                id: Some(id),
                transaction_type,
                amount: parse_money(&amount)?,
                wallet_id,
                category: reference,
                date,
                note,
                location,
            })?;

            if let Some(txn) = data.transaction(id) {
                println!("Recorded: {}", txn);
                println!("  ID: {}", txn.id);
                if let Some(wallet) = data.wallet(txn.wallet_id) {
                    println!(
                        "  {} balance: {}",
                        wallet.name,
                        wallet.balance.format_with_code(wallet.currency.code())
                    );
                }
            }
        }

        TransactionCommands::Edit {
            id,
            amount,
            wallet,
            category,
            path,
            transaction_type,
            date,
            note,
            location,
        } => {
            let data = tracker.data();
            let mut txn = find_transaction(data, &id)?;

            if let Some(amount) = amount {
                txn.amount = parse_money(&amount)?;
            }
            if let Some(wallet) = wallet {
                txn.wallet_id = find_wallet(data, &wallet)?.id;
            }
            match category {
                Some(category) => {
                    txn.category = resolve_category_ref(data, &category, &path)?;
                }
                None if path.sub.is_some() || path.item.is_some() => {
                    let current = data.category(txn.category.category_id).ok_or_else(|| {
                        LedgerError::category_not_found(txn.category.category_id.to_string())
                    })?;
                    txn.category = resolve_category_ref(data, &current.name, &path)?;
                }
                None => {}
            }
            if let Some(t) = transaction_type {
                txn.transaction_type = parse_type(&t)?;
            }
            if let Some(d) = date {
                txn.date = parse_date(&d)?;
            }
            if let Some(note) = note {
                txn.note = optional_text(note);
            }
            if let Some(location) = location {
                txn.location = optional_text(location);
            }

            let txn_id = txn.id;
            let data = tracker.edit_transaction(txn)?;
            if let Some(txn) = data.transaction(txn_id) {
                println!("Updated: {}", txn);
            }
        }

        TransactionCommands::Delete { id } => {
            let txn = find_transaction(tracker.data(), &id)?;
            tracker.delete_transaction(txn.id)?;
            println!("Deleted: {}", txn);
        }

        TransactionCommands::Show { id } => {
            let data = tracker.data();
            let txn = find_transaction(data, &id)?;
            print!("{}", format_transaction_details(&txn, data));
        }

        TransactionCommands::List {
            wallet,
            category,
            sub,
            transaction_type,
            from,
            to,
            query,
            location,
            limit,
        } => {
            let data = tracker.data();
            let mut filter = TransactionFilter::new().limit(limit);

            if let Some(wallet) = wallet {
                filter = filter.wallet(find_wallet(data, &wallet)?.id);
            }
            match (category, sub) {
                (Some(category), sub) => {
                    let found = find_category(data, &category)?;
                    filter = filter.category(found.id);
                    if let Some(sub) = sub {
                        filter = filter.subcategory(find_subcategory(found, &sub)?.id);
                    }
                }
                (None, Some(_)) => {
                    return Err(LedgerError::Validation("--sub requires --category".into()));
                }
                (None, None) => {}
            }
            if let Some(t) = transaction_type {
                filter = filter.transaction_type(parse_type(&t)?);
            }
            filter.start_date = from.as_deref().map(parse_date).transpose()?;
            filter.end_date = to.as_deref().map(parse_date).transpose()?;
            filter.query = query;
            filter.location = location;

            print!("{}", format_register(&RegisterReport::generate(data, &filter)));
        }
    }

    Ok(())
}
