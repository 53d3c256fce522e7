//! Wallet balance rollups
//!
//! Balances in different currencies are never added together; totals are
//! reported per currency.

use crate::models::{AppData, Currency, Money, WalletId};

/// Sum of wallet balances in one currency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrencyTotal {
    pub currency: Currency,
    pub total: Money,
    pub wallet_count: usize,
}

/// One total per currency, in the order currencies first appear among wallets
pub fn currency_totals(data: &AppData) -> Vec<CurrencyTotal> {
    let mut totals: Vec<CurrencyTotal> = Vec::new();

    for wallet in &data.wallets {
        match totals.iter_mut().find(|t| t.currency == wallet.currency) {
            Some(total) => {
                total.total += wallet.balance;
                total.wallet_count += 1;
            }
            None => totals.push(CurrencyTotal {
                currency: wallet.currency,
                total: wallet.balance,
                wallet_count: 1,
            }),
        }
    }

    totals
}

/// Sum of balances of every wallet in `currency`
pub fn aggregate_balance(data: &AppData, currency: Currency) -> Money {
    data.wallets
        .iter()
        .filter(|w| w.currency == currency)
        .map(|w| w.balance)
        .sum()
}

/// Signed sum of the effects of a wallet's live transactions
///
/// For a wallet created with a zero opening balance this equals its balance.
pub fn net_effect(data: &AppData, wallet_id: WalletId) -> Money {
    data.transactions_for_wallet(wallet_id)
        .map(|t| t.effect())
        .sum()
}
