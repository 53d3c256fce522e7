//! Configuration module for Walletbook
//!
//! - Path resolution (environment override, platform config directory)
//! - User settings carried inside the persisted aggregate

pub mod paths;
pub mod settings;

pub use paths::WalletbookPaths;
pub use settings::Settings;
