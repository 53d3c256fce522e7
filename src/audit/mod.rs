//! Audit trail for Walletbook
//!
//! Every successful mutation of the aggregate appends one or more entries to
//! an append-only JSONL file, with the serialized entity before and after the
//! change and a short human-readable diff for updates.

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
