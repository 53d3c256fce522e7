//! Wallet CLI commands

use clap::Subcommand;

use crate::display::wallet::{format_currency_totals, format_wallet_details, format_wallet_list};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Currency, WalletKind};
use crate::services::NewWallet;
use crate::tracker::Tracker;

use super::{find_wallet, parse_money};

/// Wallet subcommands
#[derive(Subcommand)]
pub enum WalletCommands {
    /// List all wallets with balances
    List,
    /// Show wallet details
    Show {
        /// Wallet name or ID
        wallet: String,
    },
    /// Create a new wallet
    Create {
        /// Wallet name
        name: String,
        /// Wallet kind (cash, card, foreign-cash)
        #[arg(short, long, default_value = "cash")]
        kind: String,
        /// Currency code (UZS, USD, EUR, RUB, GBP); defaults to the base currency
        #[arg(short, long)]
        currency: Option<String>,
        /// Opening balance
        #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
        balance: String,
    },
    /// Edit a wallet
    Edit {
        /// Wallet name or ID
        wallet: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New kind
        #[arg(short, long)]
        kind: Option<String>,
        /// New currency code
        #[arg(short, long)]
        currency: Option<String>,
        /// Overwrite the balance
        #[arg(short, long, allow_hyphen_values = true)]
        balance: Option<String>,
    },
    /// Delete a wallet and all of its transactions
    Delete {
        /// Wallet name or ID
        wallet: String,
    },
    /// Balance totals per currency
    Totals,
}

fn parse_kind(input: &str) -> LedgerResult<WalletKind> {
    WalletKind::parse(input).ok_or_else(|| {
        LedgerError::Validation(format!(
            "Invalid wallet kind: '{}'. Valid kinds: cash, card, foreign-cash",
            input
        ))
    })
}

fn parse_currency(input: &str) -> LedgerResult<Currency> {
    Currency::parse(input).ok_or_else(|| {
        let valid: Vec<_> = Currency::all().iter().map(|c| c.code()).collect();
        LedgerError::Validation(format!(
            "Invalid currency: '{}'. Valid currencies: {}",
            input,
            valid.join(", ")
        ))
    })
}

/// Handle a wallet command
pub fn handle_wallet_command(tracker: &mut Tracker, cmd: WalletCommands) -> LedgerResult<()> {
    match cmd {
        WalletCommands::List => {
            print!("{}", format_wallet_list(&tracker.data().wallets));
        }

        WalletCommands::Show { wallet } => {
            let data = tracker.data();
            let found = find_wallet(data, &wallet)?;
            let count = data.transactions_for_wallet(found.id).count();
            print!("{}", format_wallet_details(found, count));
        }

        WalletCommands::Create {
            name,
            kind,
            currency,
            balance,
        } => {
            let kind = parse_kind(&kind)?;
            let currency = match currency {
                Some(code) => parse_currency(&code)?,
                None => tracker.data().settings.base_currency,
            };
            let opening = parse_money(&balance)?;

            let data = tracker.create_wallet(
                NewWallet::new(name.as_str(), kind, currency).with_opening_balance(opening),
            )?;
            let wallet = find_wallet(data, &name)?;

            println!("Created wallet: {}", wallet.name);
            println!("  Kind:     {}", wallet.kind);
            println!("  Currency: {}", wallet.currency);
            println!("  Balance:  {}", wallet.balance);
            println!("  ID:       {}", wallet.id);
        }

        WalletCommands::Edit {
            wallet,
            name,
            kind,
            currency,
            balance,
        } => {
            let mut updated = find_wallet(tracker.data(), &wallet)?.clone();

            if name.is_none() && kind.is_none() && currency.is_none() && balance.is_none() {
                println!("No changes specified.");
                return Ok(());
            }

            if let Some(name) = name {
                updated.name = name;
            }
            if let Some(kind) = kind {
                updated.kind = parse_kind(&kind)?;
            }
            if let Some(code) = currency {
                updated.currency = parse_currency(&code)?;
            }
            if let Some(balance) = balance {
                updated.balance = parse_money(&balance)?;
            }

            let id = updated.id;
            let data = tracker.update_wallet(updated)?;
            if let Some(wallet) = data.wallet(id) {
                println!("Updated wallet: {}", wallet);
            }
        }

        WalletCommands::Delete { wallet } => {
            let found = find_wallet(tracker.data(), &wallet)?;
            let (id, name) = (found.id, found.name.clone());
            let count = tracker.data().transactions_for_wallet(id).count();

            tracker.delete_wallet(id)?;
            println!(
                "Deleted wallet '{}' and {} transaction(s)",
                name, count
            );
        }

        WalletCommands::Totals => {
            print!("{}", format_currency_totals(&tracker.currency_totals()));
        }
    }

    Ok(())
}
