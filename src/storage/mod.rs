//! Persistence gateway for Walletbook
//!
//! The whole aggregate is stored as one JSON snapshot with atomic writes.
//! A missing snapshot or one that does not parse yields the seed aggregate,
//! and the unparsable file is preserved for inspection. A snapshot that
//! exists but cannot be read is an error, so it is never overwritten.

pub mod file_io;
pub mod init;

pub use file_io::{read_json, write_json_atomic};
pub use init::{default_app_data, initialize_storage};

use chrono::Utc;
use tracing::{info, warn};

use crate::config::paths::WalletbookPaths;
use crate::error::{LedgerError, LedgerResult};
use crate::models::AppData;

/// Snapshot storage rooted at a set of paths
#[derive(Debug, Clone)]
pub struct Storage {
    paths: WalletbookPaths,
}

impl Storage {
    /// Create a new Storage instance, ensuring directories exist
    pub fn new(paths: WalletbookPaths) -> LedgerResult<Self> {
        paths.ensure_directories()?;
        Ok(Self { paths })
    }

    pub fn paths(&self) -> &WalletbookPaths {
        &self.paths
    }

    /// Read the stored snapshot as-is
    ///
    /// Returns `Ok(None)` when no snapshot exists and `SnapshotCorrupt` when
    /// it cannot be parsed.
    pub fn read_snapshot(&self) -> LedgerResult<Option<AppData>> {
        read_json(self.paths.snapshot_file())
    }

    /// Load the aggregate, falling back to the seed aggregate
    ///
    /// # Errors
    ///
    /// I/O failures other than a missing file are returned unchanged.
    pub fn load_snapshot(&self) -> LedgerResult<AppData> {
        match self.read_snapshot() {
            Ok(Some(data)) => {
                info!(
                    wallets = data.wallets.len(),
                    transactions = data.transactions.len(),
                    "loaded snapshot"
                );
                Ok(data)
            }
            Ok(None) => {
                info!("no snapshot found, starting from defaults");
                Ok(default_app_data())
            }
            Err(LedgerError::SnapshotCorrupt(reason)) => {
                warn!(error = %reason, "snapshot corrupt, falling back to defaults");
                if let Err(preserve_err) = self.preserve_corrupt_snapshot() {
                    warn!(error = %preserve_err, "could not preserve corrupt snapshot");
                }
                Ok(default_app_data())
            }
            Err(err) => Err(err),
        }
    }

    /// Persist the entire aggregate
    pub fn save_snapshot(&self, data: &AppData) -> LedgerResult<()> {
        write_json_atomic(self.paths.snapshot_file(), data)?;
        info!(
            wallets = data.wallets.len(),
            transactions = data.transactions.len(),
            "saved snapshot"
        );
        Ok(())
    }

    /// Copy an unreadable snapshot into the backup directory
    fn preserve_corrupt_snapshot(&self) -> LedgerResult<()> {
        let source = self.paths.snapshot_file();
        if !source.exists() {
            return Ok(());
        }
        let target = self.paths.backup_dir().join(format!(
            "snapshot-corrupt-{}.json",
            Utc::now().format("%Y%m%dT%H%M%S%.3f")
        ));
        std::fs::copy(&source, &target).map_err(|e| {
            LedgerError::Storage(format!(
                "Failed to copy {} to {}: {}",
                source.display(),
                target.display(),
                e
            ))
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, WalletKind};
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = WalletbookPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_storage_creation() {
        let (temp_dir, storage) = create_test_storage();
        assert!(temp_dir.path().join("data").exists());
        assert!(temp_dir.path().join("backups").exists());
        assert!(!storage.paths().is_initialized());
    }

    #[test]
    fn test_missing_snapshot_loads_defaults() {
        let (_temp_dir, storage) = create_test_storage();
        let data = storage.load_snapshot().unwrap();
        assert_eq!(data.wallets.len(), 3);
    }

    #[test]
    fn test_save_and_reload() {
        let (_temp_dir, storage) = create_test_storage();
        let mut data = default_app_data();
        data.wallets[0].balance = Money::from_units(250);
        data.wallets[0].kind = WalletKind::Card;

        storage.save_snapshot(&data).unwrap();
        let loaded = storage.load_snapshot().unwrap();
        assert_eq!(loaded, data);
    }

    #[test]
    fn test_corrupt_snapshot_falls_back_and_is_preserved() {
        let (_temp_dir, storage) = create_test_storage();
        std::fs::write(storage.paths().snapshot_file(), "{ not valid").unwrap();

        assert!(matches!(
            storage.read_snapshot(),
            Err(LedgerError::SnapshotCorrupt(_))
        ));

        let data = storage.load_snapshot().unwrap();
        assert_eq!(data.wallets.len(), 3);

        let preserved: Vec<_> = std::fs::read_dir(storage.paths().backup_dir())
            .unwrap()
            .filter_map(|e| e.ok())
            .collect();
        assert_eq!(preserved.len(), 1);
    }

    #[test]
    fn test_unreadable_snapshot_is_an_error() {
        let (_temp_dir, storage) = create_test_storage();
        let snapshot = storage.paths().snapshot_file();
        std::fs::create_dir(&snapshot).unwrap();

        let err = storage.load_snapshot().unwrap_err();
        assert!(matches!(err, LedgerError::Storage(_)), "unexpected error: {}", err);

        assert!(snapshot.is_dir());
        let preserved = std::fs::read_dir(storage.paths().backup_dir()).unwrap().count();
        assert_eq!(preserved, 0);
    }
}
