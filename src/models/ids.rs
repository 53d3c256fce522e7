//! Strongly-typed ID wrappers for all entity types
//!
//! Newtype wrappers keep wallet, category and transaction ids from being
//! mixed up at compile time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! define_id {
    ($name:ident, $display_prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Create a new random ID
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Create an ID from an existing UUID
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Get the underlying UUID
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Parse an ID from a string
            pub fn parse(s: &str) -> Result<Self, uuid::Error> {
                Ok(Self(Uuid::parse_str(s)?))
            }

            /// Short display form prefix (e.g. "wal-")
            pub fn prefix() -> &'static str {
                $display_prefix
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $display_prefix, &self.0.to_string()[..8])
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                if let Ok(uuid) = Uuid::parse_str(s) {
                    return Ok(Self(uuid));
                }
                let s = s.strip_prefix($display_prefix).unwrap_or(s);
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

define_id!(WalletId, "wal-");
define_id!(TransactionId, "txn-");
define_id!(CategoryId, "cat-");
define_id!(SubcategoryId, "sub-");
define_id!(ChildItemId, "itm-");

/// Match a user-supplied identifier against an id's full or short form
pub(crate) fn matches_short_id(full: &Uuid, prefix: &str, identifier: &str) -> bool {
    let identifier = identifier.trim().to_lowercase();
    let full = full.to_string();
    if identifier == full {
        return true;
    }
    match identifier.strip_prefix(prefix) {
        Some(short) if short.len() >= 8 => full.starts_with(short),
        _ => false,
    }
}
