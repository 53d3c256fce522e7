//! Transaction display formatting
//!
//! Register view and single-transaction details.

use crate::models::{AppData, Transaction, TransactionType};
use crate::reports::{RegisterEntry, RegisterReport};

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{}…", head)
    }
}

/// Format one register row
pub fn format_register_row(entry: &RegisterEntry) -> String {
    let marker = match entry.transaction_type {
        TransactionType::Income => "+",
        TransactionType::Expense => "-",
    };
    let currency = entry.currency.map(|c| c.code()).unwrap_or("");

    format!(
        "{} {:10} {:24} {:12} {:>14} {:<3} {}",
        marker,
        entry.date.format("%Y-%m-%d"),
        truncate(&entry.category, 24),
        truncate(&entry.wallet, 12),
        entry.signed_amount().to_string(),
        currency,
        truncate(&entry.note, 30),
    )
}

/// Format a register report with totals
pub fn format_register(report: &RegisterReport) -> String {
    if report.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "  {:10} {:24} {:12} {:>14} {:<3} {}\n",
        "Date", "Category", "Wallet", "Amount", "", "Note"
    ));
    output.push_str(&"-".repeat(80));
    output.push('\n');

    for entry in &report.entries {
        output.push_str(&format_register_row(entry));
        output.push('\n');
    }

    output.push_str(&"-".repeat(80));
    output.push('\n');
    output.push_str(&format!(
        "{} transaction(s), income {}, expense {}\n",
        report.entries.len(),
        report.total_income,
        report.total_expense
    ));

    output
}

/// Format a single transaction's details
pub fn format_transaction_details(txn: &Transaction, data: &AppData) -> String {
    let wallet = data
        .wallet(txn.wallet_id)
        .map(|w| format!("{} ({})", w.name, w.currency))
        .unwrap_or_else(|| "?".to_string());
    let category = data
        .categories
        .resolve_path(&txn.category)
        .map(|r| r.label())
        .unwrap_or_else(|_| "?".to_string());

    let mut output = String::new();
    output.push_str(&format!("Transaction: {}\n", txn.id));
    output.push_str(&format!("  Date:     {}\n", txn.date));
    output.push_str(&format!("  Type:     {}\n", txn.transaction_type));
    output.push_str(&format!("  Amount:   {}\n", txn.amount));
    output.push_str(&format!("  Wallet:   {}\n", wallet));
    output.push_str(&format!("  Category: {}\n", category));
    if let Some(note) = &txn.note {
        output.push_str(&format!("  Note:     {}\n", note));
    }
    if let Some(location) = &txn.location {
        output.push_str(&format!("  Location: {}\n", location));
    }
    output
}
