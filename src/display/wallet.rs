//! Wallet display formatting

use crate::models::Wallet;
use crate::reports::CurrencyTotal;

/// Format wallets as an aligned table
pub fn format_wallet_list(wallets: &[Wallet]) -> String {
    if wallets.is_empty() {
        return "No wallets found.".to_string();
    }

    let name_width = wallets
        .iter()
        .map(|w| w.name.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);
    let kind_width = wallets
        .iter()
        .map(|w| w.kind.to_string().len())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:<kind_width$}  {:<8}  {:>16}  {}\n",
        "Name",
        "Kind",
        "Currency",
        "Balance",
        "ID",
        name_width = name_width,
        kind_width = kind_width,
    ));
    output.push_str(&format!(
        "{:-<name_width$}  {:-<kind_width$}  {:-<8}  {:->16}  {:-<12}\n",
        "",
        "",
        "",
        "",
        "",
        name_width = name_width,
        kind_width = kind_width,
    ));

    for wallet in wallets {
        output.push_str(&format!(
            "{:<name_width$}  {:<kind_width$}  {:<8}  {:>16}  {}\n",
            wallet.name,
            wallet.kind,
            wallet.currency,
            wallet.balance.to_string(),
            wallet.id,
            name_width = name_width,
            kind_width = kind_width,
        ));
    }

    output
}

/// Format a single wallet's details
pub fn format_wallet_details(wallet: &Wallet, transaction_count: usize) -> String {
    let mut output = String::new();
    output.push_str(&format!("Wallet: {}\n", wallet.name));
    output.push_str(&format!("  ID:           {}\n", wallet.id));
    output.push_str(&format!("  Kind:         {}\n", wallet.kind));
    output.push_str(&format!("  Currency:     {}\n", wallet.currency));
    output.push_str(&format!(
        "  Balance:      {}\n",
        wallet.balance.format_with_code(wallet.currency.code())
    ));
    output.push_str(&format!("  Transactions: {}\n", transaction_count));
    output.push_str(&format!(
        "  Created:      {}\n",
        wallet.created_at.format("%Y-%m-%d %H:%M UTC")
    ));
    output
}

/// One line per currency, e.g. `UZS        1250000.00 (2 wallets)`
pub fn format_currency_totals(totals: &[CurrencyTotal]) -> String {
    if totals.is_empty() {
        return "No wallets found.".to_string();
    }

    totals
        .iter()
        .map(|t| {
            format!(
                "{:<4} {:>16} ({} wallet{})\n",
                t.currency.code(),
                t.total.to_string(),
                t.wallet_count,
                if t.wallet_count == 1 { "" } else { "s" }
            )
        })
        .collect()
}
