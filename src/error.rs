//! Custom error types for Walletbook
//!
//! This module defines the error hierarchy for the ledger engine using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for Walletbook operations
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for data models (non-positive amount, empty name, ...)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// A transaction points at a wallet or category that does not exist,
    /// or at a category of the wrong type
    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// Deletion refused because transactions still reference the entity
    #[error("{entity_type} '{identifier}' is referenced by {count} transaction(s)")]
    Referenced {
        entity_type: &'static str,
        identifier: String,
        count: usize,
    },

    /// Stored snapshot could not be parsed
    #[error("Snapshot corrupt: {0}")]
    SnapshotCorrupt(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl LedgerError {
    /// Create a "not found" error for wallets
    pub fn wallet_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Wallet",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for categories
    pub fn category_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Category",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for subcategories
    pub fn subcategory_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Subcategory",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for child items
    pub fn child_item_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Child item",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for transactions
    pub fn transaction_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Transaction",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is an invalid-reference error
    pub fn is_invalid_reference(&self) -> bool {
        matches!(self, Self::InvalidReference(_))
    }
}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for Walletbook operations
pub type LedgerResult<T> = Result<T, LedgerError>;
