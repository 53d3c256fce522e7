//! The store object
//!
//! `Tracker` owns the aggregate and is the one place that mutates it. Each
//! mutation runs against a working copy; only when the service call succeeds
//! and the snapshot has been written is the copy swapped in and the audit
//! trail appended. A failed mutation therefore leaves both memory and disk
//! untouched.

use chrono::NaiveDate;
use tracing::warn;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    AppData, CategoryId, ChildItemId, Currency, Money, SubcategoryId, Transaction, TransactionId,
    TransactionType, Wallet, WalletId,
};
use crate::reports::{
    self, BreakdownEntry, CurrencyTotal, DayTotal, PeriodSummary, SubcategoryBucket,
};
use crate::services::{
    list_transactions, resolve_intent, AssistantIntent, CategoryService, CreateTransactionInput,
    NewWallet, ResolvedIntent, TransactionFilter, TransactionService, WalletService,
};
use crate::storage::Storage;

/// Result of executing an assistant intent
#[derive(Debug, Clone)]
pub enum AssistantOutcome {
    Added(Transaction),
    Found(Vec<Transaction>),
}

/// Owner of the aggregate, optionally backed by storage and an audit log
#[derive(Debug)]
pub struct Tracker {
    data: AppData,
    storage: Option<Storage>,
    audit: Option<AuditLogger>,
}

impl Tracker {
    /// In-memory tracker; nothing is persisted
    pub fn new(data: AppData) -> Self {
        Self {
            data,
            storage: None,
            audit: None,
        }
    }

    /// Tracker backed by storage, starting from the stored snapshot
    ///
    /// Fails when an existing snapshot cannot be read, so that the first
    /// commit never replaces it with the seed aggregate.
    pub fn open(storage: Storage) -> LedgerResult<Self> {
        let data = storage.load_snapshot()?;
        let audit = AuditLogger::new(storage.paths().audit_log());
        Ok(Self {
            data,
            storage: Some(storage),
            audit: Some(audit),
        })
    }

    pub fn data(&self) -> &AppData {
        &self.data
    }

    pub fn audit_log(&self) -> Option<&AuditLogger> {
        self.audit.as_ref()
    }

    /// Replace the in-memory state with the stored snapshot
    pub fn reload(&mut self) -> LedgerResult<&AppData> {
        if let Some(storage) = &self.storage {
            self.data = storage.load_snapshot()?;
        }
        Ok(&self.data)
    }

    /// Run a mutation on a working copy and commit it
    fn commit<F>(&mut self, mutation: F) -> LedgerResult<&AppData>
    where
        F: FnOnce(&mut AppData) -> LedgerResult<Vec<AuditEntry>>,
    {
        let mut working = self.data.clone();
        let entries = mutation(&mut working)?;

        if let Some(storage) = &self.storage {
            storage.save_snapshot(&working)?;
        }
        self.data = working;

        if let Some(audit) = &self.audit {
            if let Err(err) = audit.log_batch(&entries) {
                warn!(error = %err, "failed to append audit entries");
            }
        }

        Ok(&self.data)
    }

    // === Transactions ===

    pub fn create_transaction(&mut self, input: CreateTransactionInput) -> LedgerResult<&AppData> {
        self.commit(|data| {
            let txn = TransactionService::new(data).create(input)?;
            Ok(vec![AuditEntry::create(EntityType::Transaction, txn.id, &txn)])
        })
    }

    pub fn edit_transaction(&mut self, replacement: Transaction) -> LedgerResult<&AppData> {
        self.commit(|data| {
            let (before, after) = TransactionService::new(data).edit(replacement)?;
            Ok(vec![AuditEntry::update(
                EntityType::Transaction,
                after.id,
                &before,
                &after,
            )])
        })
    }

    pub fn delete_transaction(&mut self, id: TransactionId) -> LedgerResult<&AppData> {
        self.commit(|data| {
            let txn = TransactionService::new(data).delete(id)?;
            Ok(vec![AuditEntry::delete(EntityType::Transaction, txn.id, &txn)])
        })
    }

    // === Wallets ===

    pub fn create_wallet(&mut self, input: NewWallet) -> LedgerResult<&AppData> {
        self.commit(|data| {
            let wallet = WalletService::new(data).create(input)?;
            Ok(vec![
                AuditEntry::create(EntityType::Wallet, wallet.id, &wallet).named(&wallet.name)
            ])
        })
    }

    pub fn update_wallet(&mut self, wallet: Wallet) -> LedgerResult<&AppData> {
        self.commit(|data| {
            let (before, after) = WalletService::new(data).update(wallet)?;
            Ok(vec![AuditEntry::update(
                EntityType::Wallet,
                after.id,
                &before,
                &after,
            )
            .named(&after.name)])
        })
    }

    /// Delete a wallet together with its transactions
    pub fn delete_wallet(&mut self, id: WalletId) -> LedgerResult<&AppData> {
        self.commit(|data| {
            let removed = WalletService::new(data).delete(id)?;
            let mut entries: Vec<AuditEntry> = removed
                .transactions
                .iter()
                .map(|t| AuditEntry::delete(EntityType::Transaction, t.id, t))
                .collect();
            entries.push(
                AuditEntry::delete(EntityType::Wallet, removed.wallet.id, &removed.wallet)
                    .named(&removed.wallet.name),
            );
            Ok(entries)
        })
    }

    // === Categories ===

    pub fn add_category(
        &mut self,
        name: &str,
        category_type: TransactionType,
        icon: Option<&str>,
    ) -> LedgerResult<&AppData> {
        self.commit(|data| {
            let category = CategoryService::new(data).add_category(name, category_type, icon)?;
            Ok(vec![AuditEntry::create(EntityType::Category, category.id, &category)
                .named(&category.name)])
        })
    }

    pub fn rename_category(&mut self, id: CategoryId, name: &str) -> LedgerResult<&AppData> {
        self.commit(|data| {
            let (before, after) = CategoryService::new(data).rename_category(id, name)?;
            Ok(vec![
                AuditEntry::update(EntityType::Category, id, &before, &after).named(&after.name)
            ])
        })
    }

    pub fn add_subcategory(&mut self, category_id: CategoryId, name: &str) -> LedgerResult<&AppData> {
        self.commit(|data| {
            let sub = CategoryService::new(data).add_subcategory(category_id, name)?;
            Ok(vec![
                AuditEntry::create(EntityType::Subcategory, sub.id, &sub).named(&sub.name)
            ])
        })
    }

    pub fn add_child_item(
        &mut self,
        category_id: CategoryId,
        sub_id: SubcategoryId,
        name: &str,
    ) -> LedgerResult<&AppData> {
        self.commit(|data| {
            let item = CategoryService::new(data).add_child_item(category_id, sub_id, name)?;
            Ok(vec![
                AuditEntry::create(EntityType::ChildItem, item.id, &item).named(&item.name)
            ])
        })
    }

    /// Refused while any transaction references the category
    pub fn delete_category(&mut self, id: CategoryId) -> LedgerResult<&AppData> {
        self.commit(|data| {
            let category = CategoryService::new(data).remove_category(id)?;
            Ok(vec![AuditEntry::delete(EntityType::Category, id, &category)
                .named(&category.name)])
        })
    }

    pub fn delete_subcategory(
        &mut self,
        category_id: CategoryId,
        sub_id: SubcategoryId,
    ) -> LedgerResult<&AppData> {
        self.commit(|data| {
            let detached = CategoryService::new(data).remove_subcategory(category_id, sub_id)?;
            Ok(vec![AuditEntry::delete(
                EntityType::Subcategory,
                sub_id,
                &detached.removed,
            )
            .named(&detached.removed.name)])
        })
    }

    pub fn delete_child_item(
        &mut self,
        category_id: CategoryId,
        sub_id: SubcategoryId,
        item_id: ChildItemId,
    ) -> LedgerResult<&AppData> {
        self.commit(|data| {
            let detached =
                CategoryService::new(data).remove_child_item(category_id, sub_id, item_id)?;
            Ok(vec![AuditEntry::delete(
                EntityType::ChildItem,
                item_id,
                &detached.removed,
            )
            .named(&detached.removed.name)])
        })
    }

    // === Assistant ===

    /// Execute an assistant intent; `today` fills in a missing date
    pub fn execute_intent(
        &mut self,
        intent: &AssistantIntent,
        today: NaiveDate,
    ) -> LedgerResult<AssistantOutcome> {
        match resolve_intent(&self.data, intent, today)? {
            ResolvedIntent::Add(mut input) => {
                let id = *input.id.get_or_insert_with(TransactionId::new);
                let data = self.create_transaction(input)?;
                let txn = data
                    .transaction(id)
                    .cloned()
                    .ok_or_else(|| LedgerError::transaction_not_found(id.to_string()))?;
                Ok(AssistantOutcome::Added(txn))
            }
            ResolvedIntent::Search(found) => Ok(AssistantOutcome::Found(found)),
        }
    }

    // === Queries ===

    pub fn list_transactions(&self, filter: &TransactionFilter) -> Vec<Transaction> {
        list_transactions(&self.data, filter)
    }

    pub fn category_breakdown(
        &self,
        transaction_type: TransactionType,
    ) -> Vec<BreakdownEntry<CategoryId>> {
        reports::category_breakdown(&self.data, transaction_type)
    }

    pub fn subcategory_breakdown(
        &self,
        category_id: CategoryId,
    ) -> Vec<BreakdownEntry<SubcategoryBucket>> {
        reports::subcategory_breakdown(&self.data, category_id)
    }

    pub fn period_totals(
        &self,
        days: &[NaiveDate],
        transaction_type: TransactionType,
    ) -> Vec<DayTotal> {
        reports::period_totals(&self.data, days, transaction_type)
    }

    pub fn currency_totals(&self) -> Vec<CurrencyTotal> {
        reports::currency_totals(&self.data)
    }

    pub fn aggregate_balance(&self, currency: Currency) -> Money {
        reports::aggregate_balance(&self.data, currency)
    }

    pub fn period_summary(&self, start_date: NaiveDate, end_date: NaiveDate) -> PeriodSummary {
        reports::period_summary(&self.data, start_date, end_date)
    }
}
