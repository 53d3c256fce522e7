//! Category service
//!
//! Manages the three-level taxonomy. Names are unique among siblings
//! (case-insensitive). Removing a category is refused while transactions
//! still reference it; removing a subcategory or child item instead clears
//! the reference on the affected transactions, which then count as "Other".

use crate::error::{LedgerError, LedgerResult};
use crate::models::category::validate_name;
use crate::models::{
    AppData, Category, CategoryId, CategoryRef, ChildItem, ChildItemId, ResolvedCategory,
    Subcategory, SubcategoryId, TransactionType,
};

/// Service for category management
pub struct CategoryService<'a> {
    data: &'a mut AppData,
}

/// A removed subcategory or child item and how many transactions lost
/// their reference to it
#[derive(Debug, Clone)]
pub struct Detached<T> {
    pub removed: T,
    pub cleared_references: usize,
}

fn check_name(name: &str) -> LedgerResult<&str> {
    let name = name.trim();
    validate_name(name).map_err(|e| LedgerError::Validation(e.to_string()))?;
    Ok(name)
}

fn same_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

impl<'a> CategoryService<'a> {
    pub fn new(data: &'a mut AppData) -> Self {
        Self { data }
    }

    /// Categories of one type, in insertion order
    pub fn list_by_type(&self, category_type: TransactionType) -> Vec<&Category> {
        self.data.categories.list_by_type(category_type)
    }

    pub fn resolve_path(&self, reference: &CategoryRef) -> LedgerResult<ResolvedCategory<'_>> {
        self.data.categories.resolve_path(reference)
    }

    // === Categories ===

    /// Append a top-level category
    ///
    /// Top-level names are unique across both types, so a name (or id)
    /// always identifies a single category.
    pub fn add_category(
        &mut self,
        name: &str,
        category_type: TransactionType,
        icon: Option<&str>,
    ) -> LedgerResult<Category> {
        let name = check_name(name)?;

        if self.data.categories.find_by_name(name).is_some() {
            return Err(LedgerError::Duplicate {
                entity_type: "Category",
                identifier: name.to_string(),
            });
        }

        let mut category = Category::new(name, category_type);
        if let Some(icon) = icon {
            category = category.with_icon(icon.trim());
        }

        self.data.categories.push(category.clone());
        Ok(category)
    }

    /// Rename a category, returning `(before, after)`
    pub fn rename_category(
        &mut self,
        id: CategoryId,
        name: &str,
    ) -> LedgerResult<(Category, Category)> {
        let name = check_name(name)?;

        if self
            .data
            .categories
            .find_by_name(name)
            .is_some_and(|c| c.id != id)
        {
            return Err(LedgerError::Duplicate {
                entity_type: "Category",
                identifier: name.to_string(),
            });
        }

        let category = self
            .data
            .categories
            .get_mut(id)
            .ok_or_else(|| LedgerError::category_not_found(id.to_string()))?;
        let before = category.clone();
        category.name = name.to_string();

        Ok((before, category.clone()))
    }

    /// Remove a category that no transaction references
    pub fn remove_category(&mut self, id: CategoryId) -> LedgerResult<Category> {
        let category = self
            .data
            .category(id)
            .ok_or_else(|| LedgerError::category_not_found(id.to_string()))?;

        let count = self.data.transactions_for_category(id).count();
        if count > 0 {
            return Err(LedgerError::Referenced {
                entity_type: "Category",
                identifier: category.name.clone(),
                count,
            });
        }

        self.data
            .categories
            .remove(id)
            .ok_or_else(|| LedgerError::category_not_found(id.to_string()))
    }

    // === Subcategories ===

    /// Append a subcategory under a category
    pub fn add_subcategory(
        &mut self,
        category_id: CategoryId,
        name: &str,
    ) -> LedgerResult<Subcategory> {
        let name = check_name(name)?;
        let category = self
            .data
            .categories
            .get_mut(category_id)
            .ok_or_else(|| LedgerError::category_not_found(category_id.to_string()))?;

        if category.subcategories.iter().any(|s| same_name(&s.name, name)) {
            return Err(LedgerError::Duplicate {
                entity_type: "Subcategory",
                identifier: name.to_string(),
            });
        }

        let subcategory = Subcategory::new(name);
        category.subcategories.push(subcategory.clone());
        Ok(subcategory)
    }

    /// Remove a subcategory and clear it (and any child item) from
    /// transactions that referenced it
    pub fn remove_subcategory(
        &mut self,
        category_id: CategoryId,
        sub_id: SubcategoryId,
    ) -> LedgerResult<Detached<Subcategory>> {
        let category = self
            .data
            .categories
            .get_mut(category_id)
            .ok_or_else(|| LedgerError::category_not_found(category_id.to_string()))?;

        let index = category
            .subcategories
            .iter()
            .position(|s| s.id == sub_id)
            .ok_or_else(|| LedgerError::subcategory_not_found(sub_id.to_string()))?;
        let removed = category.subcategories.remove(index);

        let mut cleared_references = 0;
        for txn in self.data.transactions.iter_mut().filter(|t| {
            t.category.category_id == category_id && t.category.sub_category_id == Some(sub_id)
        }) {
            txn.category.sub_category_id = None;
            txn.category.child_category_id = None;
            cleared_references += 1;
        }

        Ok(Detached {
            removed,
            cleared_references,
        })
    }

    // === Child items ===

    /// Append a child item under a subcategory
    pub fn add_child_item(
        &mut self,
        category_id: CategoryId,
        sub_id: SubcategoryId,
        name: &str,
    ) -> LedgerResult<ChildItem> {
        let name = check_name(name)?;
        let subcategory = self.subcategory_mut(category_id, sub_id)?;

        if subcategory.items.iter().any(|i| same_name(&i.name, name)) {
            return Err(LedgerError::Duplicate {
                entity_type: "Child item",
                identifier: name.to_string(),
            });
        }

        let item = ChildItem::new(name);
        subcategory.items.push(item.clone());
        Ok(item)
    }

    /// Remove a child item and clear it from transactions that referenced it
    pub fn remove_child_item(
        &mut self,
        category_id: CategoryId,
        sub_id: SubcategoryId,
        item_id: ChildItemId,
    ) -> LedgerResult<Detached<ChildItem>> {
        let subcategory = self.subcategory_mut(category_id, sub_id)?;
        let index = subcategory
            .items
            .iter()
            .position(|i| i.id == item_id)
            .ok_or_else(|| LedgerError::child_item_not_found(item_id.to_string()))?;
        let removed = subcategory.items.remove(index);

        let mut cleared_references = 0;
        for txn in self
            .data
            .transactions
            .iter_mut()
            .filter(|t| t.category.child_category_id == Some(item_id))
        {
            txn.category.child_category_id = None;
            cleared_references += 1;
        }

        Ok(Detached {
            removed,
            cleared_references,
        })
    }

    fn subcategory_mut(
        &mut self,
        category_id: CategoryId,
        sub_id: SubcategoryId,
    ) -> LedgerResult<&mut Subcategory> {
        self.data
            .categories
            .get_mut(category_id)
            .ok_or_else(|| LedgerError::category_not_found(category_id.to_string()))?
            .subcategory_mut(sub_id)
            .ok_or_else(|| LedgerError::subcategory_not_found(sub_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Currency, Money, Transaction, Wallet, WalletKind};
    use chrono::NaiveDate;

    fn data_with_food() -> (AppData, CategoryId, SubcategoryId, ChildItemId) {
        let mut data = AppData::default();
        let food = Category::new("Food", TransactionType::Expense)
            .with_subcategories(vec![Subcategory::with_items("Groceries", &["Milk"])]);
        let ids = (
            food.id,
            food.subcategories[0].id,
            food.subcategories[0].items[0].id,
        );
        data.categories.push(food);
        (data, ids.0, ids.1, ids.2)
    }

    fn record(data: &mut AppData, reference: CategoryRef) {
        let wallet = Wallet::new("Cash", WalletKind::Cash, Currency::Uzs);
        let txn = Transaction::new(
            TransactionType::Expense,
            Money::from_units(10),
            wallet.id,
            reference,
            NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
        );
        data.wallets.push(wallet);
        data.transactions.push(txn);
    }

    #[test]
    fn test_add_category_preserves_insertion_order() {
        let mut data = AppData::default();
        let mut service = CategoryService::new(&mut data);

        service.add_category("Zoo", TransactionType::Expense, None).unwrap();
        service.add_category("Bonus", TransactionType::Income, None).unwrap();
        service
            .add_category("Apples", TransactionType::Expense, Some("apple"))
            .unwrap();

        let names: Vec<_> = service
            .list_by_type(TransactionType::Expense)
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["Zoo", "Apples"]);
    }

    #[test]
    fn test_add_category_rejects_bad_names() {
        let (mut data, ..) = data_with_food();
        let mut service = CategoryService::new(&mut data);

        assert!(matches!(
            service.add_category("FOOD", TransactionType::Expense, None),
            Err(LedgerError::Duplicate { .. })
        ));
        assert!(service
            .add_category("  ", TransactionType::Expense, None)
            .unwrap_err()
            .is_validation());
        assert!(service
            .add_category(&"x".repeat(51), TransactionType::Expense, None)
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn test_category_names_are_unique_across_types() {
        let (mut data, ..) = data_with_food();
        let mut service = CategoryService::new(&mut data);

        assert!(matches!(
            service.add_category("food", TransactionType::Income, None),
            Err(LedgerError::Duplicate { .. })
        ));

        let bonus = service
            .add_category("Bonus", TransactionType::Income, None)
            .unwrap();
        assert!(matches!(
            service.rename_category(bonus.id, "Food"),
            Err(LedgerError::Duplicate { .. })
        ));
        assert_eq!(service.list_by_type(TransactionType::Income).len(), 1);
    }

    #[test]
    fn test_add_subcategory_and_child_item() {
        let (mut data, food, groceries, _) = data_with_food();
        let mut service = CategoryService::new(&mut data);

        let snacks = service.add_subcategory(food, "Snacks").unwrap();
        let chips = service.add_child_item(food, snacks.id, "Chips").unwrap();

        let resolved = service
            .resolve_path(
                &CategoryRef::new(food)
                    .with_subcategory(snacks.id)
                    .with_child_item(chips.id),
            )
            .unwrap();
        assert_eq!(resolved.label(), "Food / Snacks / Chips");

        assert!(matches!(
            service.add_subcategory(food, "groceries"),
            Err(LedgerError::Duplicate { .. })
        ));
        assert!(matches!(
            service.add_child_item(food, groceries, "MILK"),
            Err(LedgerError::Duplicate { .. })
        ));
        assert!(service
            .add_subcategory(CategoryId::new(), "Nope")
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_remove_category_blocked_when_referenced() {
        let (mut data, food, ..) = data_with_food();
        record(&mut data, CategoryRef::new(food));

        let err = CategoryService::new(&mut data)
            .remove_category(food)
            .unwrap_err();
        assert!(matches!(err, LedgerError::Referenced { count: 1, .. }));
        assert_eq!(data.categories.len(), 1);
    }

    #[test]
    fn test_remove_unreferenced_category() {
        let (mut data, food, ..) = data_with_food();
        let removed = CategoryService::new(&mut data).remove_category(food).unwrap();
        assert_eq!(removed.name, "Food");
        assert!(data.categories.is_empty());
    }

    #[test]
    fn test_remove_subcategory_clears_references() {
        let (mut data, food, groceries, milk) = data_with_food();
        record(
            &mut data,
            CategoryRef::new(food)
                .with_subcategory(groceries)
                .with_child_item(milk),
        );
        record(&mut data, CategoryRef::new(food));

        let detached = CategoryService::new(&mut data)
            .remove_subcategory(food, groceries)
            .unwrap();

        assert_eq!(detached.removed.name, "Groceries");
        assert_eq!(detached.cleared_references, 1);
        assert!(data
            .transactions
            .iter()
            .all(|t| t.category == CategoryRef::new(food)));
    }

    #[test]
    fn test_remove_child_item_clears_references() {
        let (mut data, food, groceries, milk) = data_with_food();
        let full = CategoryRef::new(food)
            .with_subcategory(groceries)
            .with_child_item(milk);
        record(&mut data, full);

        let detached = CategoryService::new(&mut data)
            .remove_child_item(food, groceries, milk)
            .unwrap();

        assert_eq!(detached.cleared_references, 1);
        assert_eq!(
            data.transactions[0].category,
            CategoryRef::new(food).with_subcategory(groceries)
        );
    }

    #[test]
    fn test_rename_category() {
        let (mut data, food, ..) = data_with_food();
        let mut service = CategoryService::new(&mut data);
        service.add_category("Travel", TransactionType::Expense, None).unwrap();

        let (before, after) = service.rename_category(food, "Groceries & Food").unwrap();
        assert_eq!(before.name, "Food");
        assert_eq!(after.name, "Groceries & Food");

        assert!(matches!(
            service.rename_category(food, "travel"),
            Err(LedgerError::Duplicate { .. })
        ));
    }
}
