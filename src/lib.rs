//! Walletbook - multi-wallet personal finance ledger
//!
//! Tracks balances across cash, card and foreign-currency wallets, records
//! income and expense transactions against a three-level category taxonomy
//! and produces category, subcategory and per-day reports.
//!
//! # Architecture
//!
//! - `models`: wallets, transactions, the category tree and the aggregate
//! - `services`: validated mutations that keep wallet balances in step
//! - `reports`: read-only aggregations over the aggregate
//! - `storage`: single-snapshot JSON persistence
//! - `audit`: append-only log of every committed change
//! - `tracker`: the owner of the aggregate that ties the above together
//! - `cli` / `display`: the command-line surface
//!
//! # Example
//!
//! ```rust,ignore
//! use walletbook::config::WalletbookPaths;
//! use walletbook::storage::Storage;
//! use walletbook::Tracker;
//!
//! let storage = Storage::new(WalletbookPaths::new()?)?;
//! let tracker = Tracker::open(storage)?;
//! println!("{} wallets", tracker.data().wallets.len());
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;
pub mod tracker;

pub use error::{LedgerError, LedgerResult};
pub use tracker::Tracker;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install the global tracing subscriber
///
/// Logs go to stderr. `RUST_LOG` overrides the `walletbook=info` default.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("walletbook=info"));

        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    });
}
