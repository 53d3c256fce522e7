//! Service layer for Walletbook
//!
//! Services hold a mutable borrow of the aggregate and carry the business
//! rules: validation, reference checks, balance reconciliation and cascades.
//! They never persist anything; that is the job of [`crate::tracker::Tracker`].

pub mod assistant;
pub mod category;
pub mod transaction;
pub mod wallet;

pub use assistant::{resolve_intent, AssistantIntent, ResolvedIntent};
pub use category::{CategoryService, Detached};
pub use transaction::{
    list_transactions, CreateTransactionInput, TransactionFilter, TransactionService,
};
pub use wallet::{NewWallet, RemovedWallet, WalletService};
