//! Wallet service
//!
//! Wallet registry operations: create, full-replace update, and the cascading
//! delete that drops every transaction recorded against the wallet.

use tracing::debug;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{AppData, Currency, Money, Transaction, Wallet, WalletId, WalletKind};

/// Service for wallet management
pub struct WalletService<'a> {
    data: &'a mut AppData,
}

/// Input for creating a wallet
#[derive(Debug, Clone)]
pub struct NewWallet {
    /// Caller-chosen id; a fresh one is assigned when absent
    pub id: Option<WalletId>,
    pub name: String,
    pub kind: WalletKind,
    pub currency: Currency,
    pub opening_balance: Money,
}

impl NewWallet {
    pub fn new(name: impl Into<String>, kind: WalletKind, currency: Currency) -> Self {
        Self {
            id: None,
            name: name.into(),
            kind,
            currency,
            opening_balance: Money::zero(),
        }
    }

    pub fn with_opening_balance(mut self, balance: Money) -> Self {
        self.opening_balance = balance;
        self
    }
}

/// A wallet removed together with its transactions
#[derive(Debug, Clone)]
pub struct RemovedWallet {
    pub wallet: Wallet,
    pub transactions: Vec<Transaction>,
}

impl<'a> WalletService<'a> {
    pub fn new(data: &'a mut AppData) -> Self {
        Self { data }
    }

    /// Add a wallet to the registry
    pub fn create(&mut self, input: NewWallet) -> LedgerResult<Wallet> {
        let name = input.name.trim();
        let mut wallet =
            Wallet::with_balance(name, input.kind, input.currency, input.opening_balance);
        if let Some(id) = input.id {
            if self.data.wallet(id).is_some() {
                return Err(LedgerError::Duplicate {
                    entity_type: "Wallet",
                    identifier: id.to_string(),
                });
            }
            wallet.id = id;
        }

        wallet
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;
        self.ensure_unique_name(&wallet.name, None)?;

        self.data.wallets.push(wallet.clone());
        Ok(wallet)
    }

    /// Replace a wallet wholesale, keeping its creation time
    ///
    /// Returns the `(before, after)` pair.
    pub fn update(&mut self, wallet: Wallet) -> LedgerResult<(Wallet, Wallet)> {
        let index = self
            .data
            .wallets
            .iter()
            .position(|w| w.id == wallet.id)
            .ok_or_else(|| LedgerError::wallet_not_found(wallet.id.to_string()))?;

        let mut wallet = wallet;
        wallet.name = wallet.name.trim().to_string();
        wallet
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;
        self.ensure_unique_name(&wallet.name, Some(wallet.id))?;

        let before = self.data.wallets[index].clone();
        wallet.created_at = before.created_at;
        wallet.updated_at = chrono::Utc::now();
        self.data.wallets[index] = wallet.clone();

        Ok((before, wallet))
    }

    /// Remove a wallet and every transaction that references it
    pub fn delete(&mut self, id: WalletId) -> LedgerResult<RemovedWallet> {
        let index = self
            .data
            .wallets
            .iter()
            .position(|w| w.id == id)
            .ok_or_else(|| LedgerError::wallet_not_found(id.to_string()))?;

        let wallet = self.data.wallets.remove(index);
        let (transactions, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.data.transactions)
            .into_iter()
            .partition(|t| t.wallet_id == id);
        self.data.transactions = kept;

        debug!(
            wallet = %wallet.id,
            cascaded = transactions.len(),
            "deleted wallet"
        );

        Ok(RemovedWallet {
            wallet,
            transactions,
        })
    }

    /// Sum of balances of every wallet in one currency
    pub fn aggregate_balance(&self, currency: Currency) -> Money {
        crate::reports::balances::aggregate_balance(self.data, currency)
    }

    fn ensure_unique_name(&self, name: &str, except: Option<WalletId>) -> LedgerResult<()> {
        let lowered = name.to_lowercase();
        let taken = self
            .data
            .wallets
            .iter()
            .any(|w| Some(w.id) != except && w.name.to_lowercase() == lowered);
        if taken {
            return Err(LedgerError::Duplicate {
                entity_type: "Wallet",
                identifier: name.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, CategoryRef, TransactionType};
    use crate::services::transaction::{CreateTransactionInput, TransactionService};
    use chrono::NaiveDate;

    fn expense_input(wallet_id: WalletId, category: &Category, units: i64) -> CreateTransactionInput {
        CreateTransactionInput {
            id: None,
            transaction_type: TransactionType::Expense,
            amount: Money::from_units(units),
            wallet_id,
            category: CategoryRef::new(category.id),
            date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            note: None,
            location: None,
        }
    }

    #[test]
    fn test_create_wallet() {
        let mut data = AppData::default();
        let mut service = WalletService::new(&mut data);

        let wallet = service
            .create(
                NewWallet::new("  Cash  ", WalletKind::Cash, Currency::Uzs)
                    .with_opening_balance(Money::from_units(100)),
            )
            .unwrap();

        assert_eq!(wallet.name, "Cash");
        assert_eq!(wallet.balance, Money::from_units(100));
        assert_eq!(data.wallets.len(), 1);
    }

    #[test]
    fn test_create_with_supplied_id() {
        let mut data = AppData::default();
        let mut service = WalletService::new(&mut data);
        let id = WalletId::new();

        let mut input = NewWallet::new("Cash", WalletKind::Cash, Currency::Uzs);
        input.id = Some(id);
        assert_eq!(service.create(input.clone()).unwrap().id, id);

        input.name = "Other".into();
        assert!(matches!(
            service.create(input),
            Err(LedgerError::Duplicate { .. })
        ));
    }

    #[test]
    fn test_duplicate_and_empty_names_rejected() {
        let mut data = AppData::default();
        let mut service = WalletService::new(&mut data);
        service
            .create(NewWallet::new("Cash", WalletKind::Cash, Currency::Uzs))
            .unwrap();

        assert!(matches!(
            service.create(NewWallet::new("cash", WalletKind::Card, Currency::Usd)),
            Err(LedgerError::Duplicate { .. })
        ));
        assert!(service
            .create(NewWallet::new("   ", WalletKind::Card, Currency::Usd))
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn test_update_replaces_wallet() {
        let mut data = AppData::default();
        let mut service = WalletService::new(&mut data);
        let wallet = service
            .create(NewWallet::new("Card", WalletKind::Card, Currency::Uzs))
            .unwrap();

        let mut replacement = wallet.clone();
        replacement.name = "Visa".into();
        replacement.currency = Currency::Usd;
        let (before, after) = service.update(replacement).unwrap();

        assert_eq!(before.name, "Card");
        assert_eq!(after.name, "Visa");
        assert_eq!(after.created_at, wallet.created_at);
        assert_eq!(data.wallets[0].currency, Currency::Usd);
    }

    #[test]
    fn test_update_missing_wallet_is_not_found() {
        let mut data = AppData::default();
        let mut service = WalletService::new(&mut data);
        let ghost = Wallet::new("Ghost", WalletKind::Cash, Currency::Uzs);
        assert!(service.update(ghost).unwrap_err().is_not_found());
    }

    #[test]
    fn test_delete_cascades_transactions() {
        let mut data = AppData::default();
        let food = Category::new("Food", TransactionType::Expense);
        data.categories.push(food.clone());

        let (cash, card) = {
            let mut wallets = WalletService::new(&mut data);
            let cash = wallets
                .create(NewWallet::new("Cash", WalletKind::Cash, Currency::Uzs))
                .unwrap();
            let card = wallets
                .create(NewWallet::new("Card", WalletKind::Card, Currency::Uzs))
                .unwrap();
            (cash.id, card.id)
        };

        {
            let mut ledger = TransactionService::new(&mut data);
            ledger.create(expense_input(cash, &food, 10)).unwrap();
            ledger.create(expense_input(card, &food, 20)).unwrap();
            ledger.create(expense_input(cash, &food, 30)).unwrap();
        }

        let removed = WalletService::new(&mut data).delete(cash).unwrap();

        assert_eq!(removed.wallet.id, cash);
        assert_eq!(removed.transactions.len(), 2);
        assert_eq!(data.transactions.len(), 1);
        assert!(data.transactions.iter().all(|t| t.wallet_id == card));
        assert_eq!(data.wallet(card).unwrap().balance, Money::from_units(-20));
    }

    #[test]
    fn test_aggregate_balance_by_currency() {
        let mut data = AppData::default();
        let mut service = WalletService::new(&mut data);
        for (name, currency, units) in [
            ("Cash", Currency::Uzs, 100),
            ("Dollars", Currency::Usd, 7),
            ("Card", Currency::Uzs, 50),
        ] {
            service
                .create(
                    NewWallet::new(name, WalletKind::Cash, currency)
                        .with_opening_balance(Money::from_units(units)),
                )
                .unwrap();
        }

        assert_eq!(service.aggregate_balance(Currency::Uzs), Money::from_units(150));
        assert_eq!(service.aggregate_balance(Currency::Usd), Money::from_units(7));
        assert_eq!(service.aggregate_balance(Currency::Eur), Money::zero());
    }
}
