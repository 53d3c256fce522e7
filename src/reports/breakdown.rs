//! Category and subcategory breakdowns
//!
//! Both breakdowns leave out empty buckets and sort by value, largest first.
//! Equal values keep the taxonomy's declaration order.

use chrono::NaiveDate;
use std::fmt;

use crate::models::{AppData, CategoryId, Money, SubcategoryId, Transaction, TransactionType};

/// Subcategory grouping key
///
/// Transactions that name no subcategory land in `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubcategoryBucket {
    Declared(SubcategoryId),
    Other,
}

impl SubcategoryBucket {
    pub const OTHER_LABEL: &'static str = "Other";
}

impl fmt::Display for SubcategoryBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Declared(id) => write!(f, "{}", id),
            Self::Other => f.write_str(Self::OTHER_LABEL),
        }
    }
}

/// One row of a breakdown
#[derive(Debug, Clone, PartialEq)]
pub struct BreakdownEntry<K> {
    pub key: K,
    pub name: String,
    pub value: Money,
    pub transaction_count: usize,
    /// Share of the breakdown total, 0..=100
    pub percentage: f64,
}

fn finish<K>(mut entries: Vec<BreakdownEntry<K>>) -> Vec<BreakdownEntry<K>> {
    entries.retain(|e| !e.value.is_zero());

    let total: Money = entries.iter().map(|e| e.value).sum();
    if total.is_positive() {
        for entry in &mut entries {
            entry.percentage = entry.value.cents() as f64 / total.cents() as f64 * 100.0;
        }
    }

    // Stable: equal values keep declaration order
    entries.sort_by(|a, b| b.value.cmp(&a.value));
    entries
}

fn tally<'a>(txns: impl Iterator<Item = &'a Transaction>) -> (Money, usize) {
    txns.fold((Money::zero(), 0), |(sum, count), t| (sum + t.amount, count + 1))
}

fn category_breakdown_where(
    data: &AppData,
    transaction_type: TransactionType,
    in_window: impl Fn(&Transaction) -> bool,
) -> Vec<BreakdownEntry<CategoryId>> {
    let entries = data
        .categories
        .list_by_type(transaction_type)
        .into_iter()
        .map(|category| {
            let (value, transaction_count) = tally(data.transactions.iter().filter(|t| {
                t.category.category_id == category.id
                    && t.transaction_type == transaction_type
                    && in_window(t)
            }));
            BreakdownEntry {
                key: category.id,
                name: category.name.clone(),
                value,
                transaction_count,
                percentage: 0.0,
            }
        })
        .collect();

    finish(entries)
}

/// Totals per category of one type over the whole ledger
pub fn category_breakdown(
    data: &AppData,
    transaction_type: TransactionType,
) -> Vec<BreakdownEntry<CategoryId>> {
    category_breakdown_where(data, transaction_type, |_| true)
}

/// Totals per category of one type over an inclusive date range
pub fn category_breakdown_between(
    data: &AppData,
    transaction_type: TransactionType,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Vec<BreakdownEntry<CategoryId>> {
    category_breakdown_where(data, transaction_type, |t| {
        t.date >= start_date && t.date <= end_date
    })
}

/// Totals per subcategory of one category, plus the `Other` bucket
///
/// An unknown category yields an empty breakdown. A transaction whose
/// subcategory no longer exists is counted under `Other`.
pub fn subcategory_breakdown(
    data: &AppData,
    category_id: CategoryId,
) -> Vec<BreakdownEntry<SubcategoryBucket>> {
    let Some(category) = data.category(category_id) else {
        return Vec::new();
    };

    let in_category = || {
        data.transactions
            .iter()
            .filter(move |t| t.category.category_id == category_id)
    };

    let mut entries: Vec<_> = category
        .subcategories
        .iter()
        .map(|sub| {
            let (value, transaction_count) =
                tally(in_category().filter(|t| t.category.sub_category_id == Some(sub.id)));
            BreakdownEntry {
                key: SubcategoryBucket::Declared(sub.id),
                name: sub.name.clone(),
                value,
                transaction_count,
                percentage: 0.0,
            }
        })
        .collect();

    let (value, transaction_count) = tally(in_category().filter(|t| {
        t.category
            .sub_category_id
            .and_then(|id| category.subcategory(id))
            .is_none()
    }));
    entries.push(BreakdownEntry {
        key: SubcategoryBucket::Other,
        name: SubcategoryBucket::OTHER_LABEL.to_string(),
        value,
        transaction_count,
        percentage: 0.0,
    });

    finish(entries)
}
