//! Transaction service
//!
//! Owns the ledger mutation protocol. Every balance change goes through two
//! primitives: `apply` adds a transaction's effect to its wallet and `reverse`
//! takes it back out. An edit is always a reverse of the old record followed
//! by an apply of the new one, whichever fields changed, so balances stay
//! correct when the amount, type or wallet moves.
//!
//! References are checked before any wallet is touched; a rejected mutation
//! leaves the aggregate unchanged.

use chrono::NaiveDate;
use tracing::debug;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    AppData, CategoryId, CategoryRef, ChildItemId, Money, SubcategoryId, Transaction,
    TransactionId, TransactionType, WalletId,
};

/// Service for ledger mutations
pub struct TransactionService<'a> {
    data: &'a mut AppData,
}

/// Options for filtering transactions
///
/// Every present field must match; absent fields impose no constraint.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub wallet_id: Option<WalletId>,
    pub category_id: Option<CategoryId>,
    pub sub_category_id: Option<SubcategoryId>,
    pub child_category_id: Option<ChildItemId>,
    pub transaction_type: Option<TransactionType>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Case-insensitive text matched against note, category name,
    /// subcategory name and amount
    pub query: Option<String>,
    /// Case-insensitive substring of the location
    pub location: Option<String>,
    pub limit: Option<usize>,
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn wallet(mut self, wallet_id: WalletId) -> Self {
        self.wallet_id = Some(wallet_id);
        self
    }

    pub fn category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn subcategory(mut self, sub_category_id: SubcategoryId) -> Self {
        self.sub_category_id = Some(sub_category_id);
        self
    }

    pub fn child_item(mut self, child_category_id: ChildItemId) -> Self {
        self.child_category_id = Some(child_category_id);
        self
    }

    pub fn transaction_type(mut self, transaction_type: TransactionType) -> Self {
        self.transaction_type = Some(transaction_type);
        self
    }

    pub fn date_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Check a single transaction against every present field
    pub fn matches(&self, txn: &Transaction, data: &AppData) -> bool {
        if self.wallet_id.is_some_and(|id| txn.wallet_id != id) {
            return false;
        }
        if self.category_id.is_some_and(|id| txn.category.category_id != id) {
            return false;
        }
        if self
            .sub_category_id
            .is_some_and(|id| txn.category.sub_category_id != Some(id))
        {
            return false;
        }
        if self
            .child_category_id
            .is_some_and(|id| txn.category.child_category_id != Some(id))
        {
            return false;
        }
        if self
            .transaction_type
            .is_some_and(|t| txn.transaction_type != t)
        {
            return false;
        }
        if self.start_date.is_some_and(|start| txn.date < start) {
            return false;
        }
        if self.end_date.is_some_and(|end| txn.date > end) {
            return false;
        }
        if let Some(location) = non_empty(&self.location) {
            let location = location.to_lowercase();
            let hit = txn
                .location
                .as_deref()
                .is_some_and(|l| l.to_lowercase().contains(&location));
            if !hit {
                return false;
            }
        }
        if let Some(query) = non_empty(&self.query) {
            if !matches_text(txn, data, &query.to_lowercase()) {
                return false;
            }
        }
        true
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Free-text match over note, category name, subcategory name and amount
fn matches_text(txn: &Transaction, data: &AppData, query: &str) -> bool {
    if txn
        .note
        .as_deref()
        .is_some_and(|n| n.to_lowercase().contains(query))
    {
        return true;
    }

    if let Some(category) = data.category(txn.category.category_id) {
        if category.name.to_lowercase().contains(query) {
            return true;
        }
        let sub_name = txn
            .category
            .sub_category_id
            .and_then(|id| category.subcategory(id))
            .map(|s| s.name.to_lowercase());
        if sub_name.is_some_and(|n| n.contains(query)) {
            return true;
        }
    }

    txn.amount.to_plain_string().contains(query)
}

/// List transactions matching a filter, newest date first
///
/// Transactions on the same day keep their ledger (insertion) order.
pub fn list_transactions(data: &AppData, filter: &TransactionFilter) -> Vec<Transaction> {
    let mut transactions: Vec<Transaction> = data
        .transactions
        .iter()
        .filter(|t| filter.matches(t, data))
        .cloned()
        .collect();

    // Stable sort: ties stay in insertion order
    transactions.sort_by(|a, b| b.date.cmp(&a.date));

    if let Some(limit) = filter.limit {
        transactions.truncate(limit);
    }

    transactions
}

/// Input for creating a new transaction
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTransactionInput {
    /// Caller-chosen id; a fresh one is assigned when absent
    pub id: Option<TransactionId>,
    pub transaction_type: TransactionType,
    pub amount: Money,
    pub wallet_id: WalletId,
    pub category: CategoryRef,
    pub date: NaiveDate,
    pub note: Option<String>,
    pub location: Option<String>,
}

impl CreateTransactionInput {
    fn into_transaction(self) -> Transaction {
        let mut txn = Transaction::new(
            self.transaction_type,
            self.amount,
            self.wallet_id,
            self.category,
            self.date,
        );
        if let Some(id) = self.id {
            txn.id = id;
        }
        txn.note = clean_text(self.note);
        txn.location = clean_text(self.location);
        txn
    }
}

fn clean_text(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl<'a> TransactionService<'a> {
    pub fn new(data: &'a mut AppData) -> Self {
        Self { data }
    }

    pub fn get(&self, id: TransactionId) -> Option<&Transaction> {
        self.data.transaction(id)
    }

    /// Record a new transaction and apply its effect
    pub fn create(&mut self, input: CreateTransactionInput) -> LedgerResult<Transaction> {
        let txn = input.into_transaction();

        if self.data.transaction(txn.id).is_some() {
            return Err(LedgerError::Duplicate {
                entity_type: "Transaction",
                identifier: txn.id.to_string(),
            });
        }

        self.apply(txn.clone())?;
        Ok(txn)
    }

    /// Replace an existing transaction: reverse the old record, apply the new
    ///
    /// Returns the `(before, after)` pair. The entry keeps its ledger position
    /// and original creation time.
    pub fn edit(&mut self, replacement: Transaction) -> LedgerResult<(Transaction, Transaction)> {
        let index = self
            .data
            .transaction_index(replacement.id)
            .ok_or_else(|| LedgerError::transaction_not_found(replacement.id.to_string()))?;

        let mut replacement = replacement;
        replacement.note = clean_text(replacement.note);
        replacement.location = clean_text(replacement.location);
        replacement.created_at = self.data.transactions[index].created_at;

        self.check(&replacement)?;
        let old = &self.data.transactions[index];
        let balances = self.plan_balances(&[
            (old.wallet_id, -old.effect()),
            (replacement.wallet_id, replacement.effect()),
        ])?;

        let before = self.data.transactions.remove(index);
        self.set_balances(balances);
        self.data.transactions.insert(index, replacement.clone());

        debug!(
            id = %replacement.id,
            from_wallet = %before.wallet_id,
            to_wallet = %replacement.wallet_id,
            "reconciled transaction edit"
        );

        Ok((before, replacement))
    }

    /// Remove a transaction and reverse its effect
    pub fn delete(&mut self, id: TransactionId) -> LedgerResult<Transaction> {
        self.reverse(id)
    }

    /// Add a transaction to the ledger and apply its effect to the wallet
    pub fn apply(&mut self, txn: Transaction) -> LedgerResult<()> {
        self.check(&txn)?;
        let balances = self.plan_balances(&[(txn.wallet_id, txn.effect())])?;

        self.set_balances(balances);
        debug!(id = %txn.id, wallet = %txn.wallet_id, effect = %txn.effect(), "applied transaction");
        self.data.transactions.push(txn);
        Ok(())
    }

    /// Take a transaction's effect back out of its wallet and drop it
    pub fn reverse(&mut self, id: TransactionId) -> LedgerResult<Transaction> {
        let index = self
            .data
            .transaction_index(id)
            .ok_or_else(|| LedgerError::transaction_not_found(id.to_string()))?;

        let old = &self.data.transactions[index];
        let balances = self.plan_balances(&[(old.wallet_id, -old.effect())])?;

        let txn = self.data.transactions.remove(index);
        self.set_balances(balances);
        debug!(id = %txn.id, wallet = %txn.wallet_id, effect = %txn.effect(), "reversed transaction");
        Ok(txn)
    }

    /// Validate a record and its references without touching any balance
    fn check(&self, txn: &Transaction) -> LedgerResult<()> {
        txn.validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        self.check_wallet(txn.wallet_id)?;

        let category = self.data.category(txn.category.category_id).ok_or_else(|| {
            LedgerError::InvalidReference(format!(
                "category {} does not exist",
                txn.category.category_id
            ))
        })?;

        if category.category_type != txn.transaction_type {
            return Err(LedgerError::InvalidReference(format!(
                "category '{}' is {} but the transaction is {}",
                category.name,
                category.category_type.to_string().to_lowercase(),
                txn.transaction_type.to_string().to_lowercase()
            )));
        }

        self.data
            .categories
            .resolve_path(&txn.category)
            .map_err(|e| LedgerError::InvalidReference(e.to_string()))?;

        Ok(())
    }

    fn check_wallet(&self, wallet_id: WalletId) -> LedgerResult<()> {
        if self.data.wallet(wallet_id).is_none() {
            return Err(LedgerError::InvalidReference(format!(
                "wallet {} does not exist",
                wallet_id
            )));
        }
        Ok(())
    }

    /// Balances that result from applying `shifts` in order
    ///
    /// Nothing is written; a missing wallet or a balance that would leave
    /// the representable range fails the whole plan.
    fn plan_balances(&self, shifts: &[(WalletId, Money)]) -> LedgerResult<Vec<(WalletId, Money)>> {
        let mut planned: Vec<(WalletId, Money)> = Vec::with_capacity(shifts.len());

        for &(wallet_id, delta) in shifts {
            self.check_wallet(wallet_id)?;
            let next = match planned.iter().find(|(id, _)| *id == wallet_id) {
                Some(&(_, running)) => running.checked_add(delta),
                None => self
                    .data
                    .wallet(wallet_id)
                    .and_then(|w| w.balance_after(delta)),
            }
            .ok_or_else(|| {
                LedgerError::Validation(format!(
                    "balance of wallet {} would overflow",
                    wallet_id
                ))
            })?;

            match planned.iter_mut().find(|(id, _)| *id == wallet_id) {
                Some(entry) => entry.1 = next,
                None => planned.push((wallet_id, next)),
            }
        }

        Ok(planned)
    }

    fn set_balances(&mut self, balances: Vec<(WalletId, Money)>) {
        for (wallet_id, balance) in balances {
            if let Some(wallet) = self.data.wallet_mut(wallet_id) {
                wallet.set_balance(balance);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Currency, Subcategory, Wallet, WalletKind};
    use crate::reports::balances::net_effect;

    struct Fixture {
        data: AppData,
        cash: WalletId,
        card: WalletId,
        food: CategoryId,
        groceries: SubcategoryId,
        salary: CategoryId,
    }

    fn fixture() -> Fixture {
        let mut data = AppData::default();
        let cash = Wallet::new("Cash", WalletKind::Cash, Currency::Uzs);
        let card = Wallet::new("Card", WalletKind::Card, Currency::Uzs);
        let food = Category::new("Food", TransactionType::Expense)
            .with_subcategories(vec![Subcategory::with_items("Groceries", &["Milk"])]);
        let salary = Category::new("Salary", TransactionType::Income);

        let fixture = Fixture {
            cash: cash.id,
            card: card.id,
            food: food.id,
            groceries: food.subcategories[0].id,
            salary: salary.id,
            data: AppData::default(),
        };

        data.wallets.push(cash);
        data.wallets.push(card);
        data.categories.push(food);
        data.categories.push(salary);
        Fixture { data, ..fixture }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    fn expense(f: &Fixture, units: i64, date: NaiveDate) -> CreateTransactionInput {
        CreateTransactionInput {
            id: None,
            transaction_type: TransactionType::Expense,
            amount: Money::from_units(units),
            wallet_id: f.cash,
            category: CategoryRef::new(f.food),
            date,
            note: None,
            location: None,
        }
    }

    fn balance(data: &AppData, id: WalletId) -> Money {
        data.wallet(id).unwrap().balance
    }

    #[test]
    fn test_create_edit_delete_scenario() {
        let mut f = fixture();
        let input = expense(&f, 500, day(1));
        let cash = f.cash;

        let mut service = TransactionService::new(&mut f.data);
        let txn = service.create(input).unwrap();
        assert_eq!(balance(service.data, cash), Money::from_units(-500));

        let mut edited = txn.clone();
        edited.amount = Money::from_units(300);
        service.edit(edited).unwrap();
        assert_eq!(balance(service.data, cash), Money::from_units(-300));

        service.delete(txn.id).unwrap();
        assert_eq!(balance(service.data, cash), Money::zero());
        assert!(service.get(txn.id).is_none());
    }

    #[test]
    fn test_edit_back_restores_state() {
        let mut f = fixture();
        let input = expense(&f, 120, day(2));
        let (cash, card, salary) = (f.cash, f.card, f.salary);

        let mut service = TransactionService::new(&mut f.data);
        let original = service.create(input).unwrap();
        let snapshot = service.data.clone();

        let mut changed = original.clone();
        changed.wallet_id = card;
        changed.transaction_type = TransactionType::Income;
        changed.category = CategoryRef::new(salary);
        changed.amount = Money::from_units(999);
        changed.note = Some("moved".into());
        service.edit(changed).unwrap();

        assert_eq!(balance(service.data, cash), Money::zero());
        assert_eq!(balance(service.data, card), Money::from_units(999));

        service.edit(original.clone()).unwrap();
        assert_eq!(balance(service.data, cash), balance(&snapshot, cash));
        assert_eq!(balance(service.data, card), balance(&snapshot, card));
        assert_eq!(service.data.transactions, snapshot.transactions);
    }

    #[test]
    fn test_note_only_edit_keeps_balance() {
        let mut f = fixture();
        let input = expense(&f, 40, day(3));
        let cash = f.cash;

        let mut service = TransactionService::new(&mut f.data);
        let txn = service.create(input).unwrap();

        let mut edited = txn.clone();
        edited.note = Some("bread".into());
        let (before, after) = service.edit(edited).unwrap();

        assert_eq!(before.note, None);
        assert_eq!(after.note.as_deref(), Some("bread"));
        assert_eq!(after.created_at, txn.created_at);
        assert_eq!(balance(service.data, cash), Money::from_units(-40));
    }

    #[test]
    fn test_apply_then_reverse_is_identity() {
        let mut f = fixture();
        let txn = Transaction::new(
            TransactionType::Income,
            Money::from_cents(12_345),
            f.card,
            CategoryRef::new(f.salary),
            day(4),
        );
        let card = f.card;

        let mut service = TransactionService::new(&mut f.data);
        service.apply(txn.clone()).unwrap();
        assert_eq!(balance(service.data, card), Money::from_cents(12_345));

        service.reverse(txn.id).unwrap();
        assert_eq!(balance(service.data, card), Money::zero());
        assert!(service.data.transactions.is_empty());
    }

    #[test]
    fn test_balance_invariant_over_mixed_operations() {
        let mut f = fixture();
        let (cash, card, salary) = (f.cash, f.card, f.salary);
        let inputs: Vec<_> = (1..=6).map(|i| expense(&f, i * 10, day(i as u32))).collect();

        let mut service = TransactionService::new(&mut f.data);
        let mut ids = Vec::new();
        for input in inputs {
            ids.push(service.create(input).unwrap().id);
        }

        let mut moved = service.get(ids[1]).unwrap().clone();
        moved.wallet_id = card;
        service.edit(moved).unwrap();

        let mut flipped = service.get(ids[2]).unwrap().clone();
        flipped.transaction_type = TransactionType::Income;
        flipped.category = CategoryRef::new(salary);
        service.edit(flipped).unwrap();

        service.delete(ids[4]).unwrap();

        for wallet_id in [cash, card] {
            assert_eq!(
                balance(service.data, wallet_id),
                net_effect(service.data, wallet_id)
            );
        }
    }

    #[test]
    fn test_rejects_invalid_references_without_mutation() {
        let mut f = fixture();
        let mut bad_wallet = expense(&f, 10, day(5));
        bad_wallet.wallet_id = WalletId::new();

        let mut wrong_type = expense(&f, 10, day(5));
        wrong_type.category = CategoryRef::new(f.salary);

        let mut foreign_sub = expense(&f, 10, day(5));
        foreign_sub.category = CategoryRef::new(f.salary).with_subcategory(f.groceries);

        let mut unknown_category = expense(&f, 10, day(5));
        unknown_category.category = CategoryRef::new(CategoryId::new());

        let before = f.data.clone();
        let mut service = TransactionService::new(&mut f.data);
        for input in [bad_wallet, wrong_type, foreign_sub, unknown_category] {
            let err = service.create(input).unwrap_err();
            assert!(err.is_invalid_reference(), "unexpected error: {}", err);
        }
        assert_eq!(*service.data, before);
    }

    #[test]
    fn test_rejects_non_positive_amount() {
        let mut f = fixture();
        let input = expense(&f, 0, day(6));
        let mut service = TransactionService::new(&mut f.data);
        assert!(service.create(input).unwrap_err().is_validation());
    }

    #[test]
    fn test_invalid_edit_leaves_state_unchanged() {
        let mut f = fixture();
        let input = expense(&f, 75, day(7));
        let mut service = TransactionService::new(&mut f.data);
        let txn = service.create(input).unwrap();
        let before = service.data.clone();

        let mut broken = txn.clone();
        broken.wallet_id = WalletId::new();
        assert!(service.edit(broken).is_err());

        let mut negative = txn;
        negative.amount = Money::from_units(-5);
        assert!(service.edit(negative).is_err());

        assert_eq!(*service.data, before);
    }

    #[test]
    fn test_balance_overflow_is_rejected_without_mutation() {
        let mut f = fixture();
        let (cash, salary) = (f.cash, f.salary);
        let huge = Money::from_cents(i64::MAX / 2 + 1);
        let income = CreateTransactionInput {
            id: None,
            transaction_type: TransactionType::Income,
            amount: huge,
            wallet_id: cash,
            category: CategoryRef::new(salary),
            date: day(9),
            note: None,
            location: None,
        };

        let mut service = TransactionService::new(&mut f.data);
        let first = service.create(income.clone()).unwrap();
        let before = service.data.clone();

        let err = service.create(income).unwrap_err();
        assert!(err.is_validation(), "unexpected error: {}", err);
        assert_eq!(*service.data, before);

        let mut doubled = first;
        doubled.amount = Money::from_cents(i64::MAX);
        doubled.note = Some("edit".into());
        service.edit(doubled.clone()).unwrap();
        assert_eq!(balance(service.data, cash), Money::from_cents(i64::MAX));

        let mut expense_edit = doubled;
        expense_edit.amount = Money::from_cents(1);
        expense_edit.transaction_type = TransactionType::Expense;
        expense_edit.category = CategoryRef::new(f.food);
        service.edit(expense_edit).unwrap();
        assert_eq!(balance(service.data, cash), Money::from_cents(-1));
    }

    #[test]
    fn test_missing_transaction_is_not_found() {
        let mut f = fixture();
        let mut service = TransactionService::new(&mut f.data);
        assert!(service.delete(TransactionId::new()).unwrap_err().is_not_found());
    }

    #[test]
    fn test_duplicate_supplied_id_rejected() {
        let mut f = fixture();
        let mut first = expense(&f, 10, day(8));
        let id = TransactionId::new();
        first.id = Some(id);
        let mut second = first.clone();
        second.amount = Money::from_units(20);

        let mut service = TransactionService::new(&mut f.data);
        assert_eq!(service.create(first).unwrap().id, id);
        assert!(matches!(
            service.create(second),
            Err(LedgerError::Duplicate { .. })
        ));
    }

    #[test]
    fn test_list_orders_by_date_desc_with_stable_ties() {
        let mut f = fixture();
        let mut a = expense(&f, 1, day(10));
        a.note = Some("first".into());
        let mut b = expense(&f, 2, day(12));
        b.note = Some("second".into());
        let mut c = expense(&f, 3, day(10));
        c.note = Some("third".into());

        let mut service = TransactionService::new(&mut f.data);
        for input in [a, b, c] {
            service.create(input).unwrap();
        }

        let notes: Vec<_> = list_transactions(&f.data, &TransactionFilter::new())
            .into_iter()
            .map(|t| t.note.unwrap())
            .collect();
        assert_eq!(notes, vec!["second", "first", "third"]);
    }

    #[test]
    fn test_filter_fields_compose() {
        let mut f = fixture();
        let mut groceries = expense(&f, 50, day(1));
        groceries.category = CategoryRef::new(f.food).with_subcategory(f.groceries);
        groceries.location = Some("Chorsu Bazaar".into());
        let mut lunch = expense(&f, 25, day(2));
        lunch.note = Some("Lunch with team".into());
        lunch.wallet_id = f.card;
        let salary = CreateTransactionInput {
            id: None,
            transaction_type: TransactionType::Income,
            amount: Money::from_cents(100_050),
            wallet_id: f.card,
            category: CategoryRef::new(f.salary),
            date: day(3),
            note: None,
            location: None,
        };
        let (card, food, groceries_id) = (f.card, f.food, f.groceries);

        let mut service = TransactionService::new(&mut f.data);
        for input in [groceries, lunch, salary] {
            service.create(input).unwrap();
        }
        let data = &f.data;

        let count = |filter: TransactionFilter| list_transactions(data, &filter).len();

        assert_eq!(count(TransactionFilter::new()), 3);
        assert_eq!(count(TransactionFilter::new().wallet(card)), 2);
        assert_eq!(count(TransactionFilter::new().category(food)), 2);
        assert_eq!(count(TransactionFilter::new().subcategory(groceries_id)), 1);
        assert_eq!(count(TransactionFilter::new().date_range(day(2), day(3))), 2);
        assert_eq!(count(TransactionFilter::new().wallet(card).category(food)), 1);
        assert_eq!(count(TransactionFilter::new().location("bazaar")), 1);
        assert_eq!(
            count(TransactionFilter::new().transaction_type(TransactionType::Income)),
            1
        );
        assert_eq!(count(TransactionFilter::new().limit(1)), 1);

        // Free text: note, category name, subcategory name, amount
        assert_eq!(count(TransactionFilter::new().query("LUNCH")), 1);
        assert_eq!(count(TransactionFilter::new().query("food")), 2);
        assert_eq!(count(TransactionFilter::new().query("grocer")), 1);
        assert_eq!(count(TransactionFilter::new().query("1000.5")), 1);
        assert_eq!(count(TransactionFilter::new().query("nothing")), 0);
        assert_eq!(count(TransactionFilter::new().query("   ")), 3);
    }
}
