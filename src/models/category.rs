//! Category taxonomy
//!
//! Categories form a hierarchy of at most three levels:
//! category → subcategory → child item. Every category carries a type
//! (income or expense) that must match the transactions referencing it.
//! The [`CategoryTree`] keeps categories in insertion order, which is also
//! the default display order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{CategoryId, ChildItemId, SubcategoryId};
use super::transaction::{CategoryRef, TransactionType};
use crate::error::{LedgerError, LedgerResult};

const MAX_NAME_LEN: usize = 50;

/// Leaf of the taxonomy (e.g. "Milk" under Food / Groceries)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildItem {
    pub id: ChildItemId,
    pub name: String,
}

impl ChildItem {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ChildItemId::new(),
            name: name.into(),
        }
    }
}

/// Second level of the taxonomy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subcategory {
    pub id: SubcategoryId,
    pub name: String,
    #[serde(default)]
    pub items: Vec<ChildItem>,
}

impl Subcategory {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: SubcategoryId::new(),
            name: name.into(),
            items: Vec::new(),
        }
    }

    /// Create a subcategory with child items
    pub fn with_items(name: impl Into<String>, items: &[&str]) -> Self {
        let mut sub = Self::new(name);
        sub.items = items.iter().map(|n| ChildItem::new(*n)).collect();
        sub
    }

    /// Look up a child item by ID
    pub fn item(&self, id: ChildItemId) -> Option<&ChildItem> {
        self.items.iter().find(|i| i.id == id)
    }
}

/// A top-level category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier
    pub id: CategoryId,

    /// Category name
    pub name: String,

    /// Icon reference understood by the presentation layer
    #[serde(default)]
    pub icon: String,

    /// Income or expense
    #[serde(rename = "type")]
    pub category_type: TransactionType,

    /// Ordered subcategories
    #[serde(default)]
    pub subcategories: Vec<Subcategory>,

    /// When the category was created
    pub created_at: DateTime<Utc>,
}

impl Category {
    /// Create a new category without subcategories
    pub fn new(name: impl Into<String>, category_type: TransactionType) -> Self {
        Self {
            id: CategoryId::new(),
            name: name.into(),
            icon: String::new(),
            category_type,
            subcategories: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Set the icon reference
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    /// Append subcategories
    pub fn with_subcategories(mut self, subcategories: Vec<Subcategory>) -> Self {
        self.subcategories.extend(subcategories);
        self
    }

    /// Look up a subcategory by ID
    pub fn subcategory(&self, id: SubcategoryId) -> Option<&Subcategory> {
        self.subcategories.iter().find(|s| s.id == id)
    }

    /// Look up a subcategory by ID, mutably
    pub fn subcategory_mut(&mut self, id: SubcategoryId) -> Option<&mut Subcategory> {
        self.subcategories.iter_mut().find(|s| s.id == id)
    }

    /// Validate the category name
    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        validate_name(&self.name)?;
        for sub in &self.subcategories {
            validate_name(&sub.name)?;
            for item in &sub.items {
                validate_name(&item.name)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Check a category, subcategory or child item name
pub fn validate_name(name: &str) -> Result<(), CategoryValidationError> {
    if name.trim().is_empty() {
        return Err(CategoryValidationError::EmptyName);
    }
    if name.len() > MAX_NAME_LEN {
        return Err(CategoryValidationError::NameTooLong(name.len()));
    }
    Ok(())
}

/// A resolved category path, borrowed from the tree
#[derive(Debug, Clone, Copy)]
pub struct ResolvedCategory<'a> {
    pub category: &'a Category,
    pub subcategory: Option<&'a Subcategory>,
    pub child_item: Option<&'a ChildItem>,
}

impl ResolvedCategory<'_> {
    /// "Food / Groceries / Milk" style label
    pub fn label(&self) -> String {
        let mut parts = vec![self.category.name.as_str()];
        if let Some(sub) = self.subcategory {
            parts.push(sub.name.as_str());
        }
        if let Some(item) = self.child_item {
            parts.push(item.name.as_str());
        }
        parts.join(" / ")
    }
}

/// Ordered collection of categories
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryTree(Vec<Category>);

impl CategoryTree {
    pub fn new(categories: Vec<Category>) -> Self {
        Self(categories)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, id: CategoryId) -> Option<&Category> {
        self.0.iter().find(|c| c.id == id)
    }

    pub fn get_mut(&mut self, id: CategoryId) -> Option<&mut Category> {
        self.0.iter_mut().find(|c| c.id == id)
    }

    /// Find a category by name (case-insensitive, exact)
    pub fn find_by_name(&self, name: &str) -> Option<&Category> {
        let name = name.trim().to_lowercase();
        self.0.iter().find(|c| c.name.to_lowercase() == name)
    }

    /// Categories of the given type, in insertion order
    pub fn list_by_type(&self, category_type: TransactionType) -> Vec<&Category> {
        self.0
            .iter()
            .filter(|c| c.category_type == category_type)
            .collect()
    }

    /// Resolve a category reference down to the deepest level it names
    ///
    /// Fails with `NotFound` if any id does not resolve under its parent.
    pub fn resolve_path(&self, reference: &CategoryRef) -> LedgerResult<ResolvedCategory<'_>> {
        let category = self
            .get(reference.category_id)
            .ok_or_else(|| LedgerError::category_not_found(reference.category_id.to_string()))?;

        let subcategory = match reference.sub_category_id {
            Some(sub_id) => Some(
                category
                    .subcategory(sub_id)
                    .ok_or_else(|| LedgerError::subcategory_not_found(sub_id.to_string()))?,
            ),
            None => None,
        };

        let child_item = match (reference.child_category_id, subcategory) {
            (Some(item_id), Some(sub)) => Some(
                sub.item(item_id)
                    .ok_or_else(|| LedgerError::child_item_not_found(item_id.to_string()))?,
            ),
            (Some(item_id), None) => {
                return Err(LedgerError::child_item_not_found(item_id.to_string()));
            }
            (None, _) => None,
        };

        Ok(ResolvedCategory {
            category,
            subcategory,
            child_item,
        })
    }

    pub(crate) fn push(&mut self, category: Category) {
        self.0.push(category);
    }

    pub(crate) fn remove(&mut self, id: CategoryId) -> Option<Category> {
        let index = self.0.iter().position(|c| c.id == id)?;
        Some(self.0.remove(index))
    }
}

/// Validation errors for categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    EmptyName,
    NameTooLong(usize),
}

impl fmt::Display for CategoryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Category name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Category name too long ({} chars, max {})", len, MAX_NAME_LEN)
            }
        }
    }
}

impl std::error::Error for CategoryValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> CategoryTree {
        CategoryTree::new(vec![
            Category::new("Food", TransactionType::Expense).with_subcategories(vec![
                Subcategory::with_items("Groceries", &["Milk", "Bread"]),
                Subcategory::new("Restaurants"),
            ]),
            Category::new("Salary", TransactionType::Income),
            Category::new("Transport", TransactionType::Expense),
        ])
    }

    #[test]
    fn test_list_by_type_preserves_insertion_order() {
        let tree = sample_tree();
        let names: Vec<_> = tree
            .list_by_type(TransactionType::Expense)
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["Food", "Transport"]);

        let income = tree.list_by_type(TransactionType::Income);
        assert_eq!(income.len(), 1);
        assert_eq!(income[0].name, "Salary");
    }

    #[test]
    fn test_resolve_full_path() {
        let tree = sample_tree();
        let food = tree.find_by_name("food").unwrap();
        let groceries = &food.subcategories[0];
        let milk = &groceries.items[0];

        let reference = CategoryRef {
            category_id: food.id,
            sub_category_id: Some(groceries.id),
            child_category_id: Some(milk.id),
        };
        let resolved = tree.resolve_path(&reference).unwrap();
        assert_eq!(resolved.category.name, "Food");
        assert_eq!(resolved.subcategory.unwrap().name, "Groceries");
        assert_eq!(resolved.child_item.unwrap().name, "Milk");
        assert_eq!(resolved.label(), "Food / Groceries / Milk");
    }

    #[test]
    fn test_resolve_partial_path() {
        let tree = sample_tree();
        let food = tree.find_by_name("Food").unwrap();
        let resolved = tree.resolve_path(&CategoryRef::new(food.id)).unwrap();
        assert!(resolved.subcategory.is_none());
        assert!(resolved.child_item.is_none());
        assert_eq!(resolved.label(), "Food");
    }

    #[test]
    fn test_resolve_rejects_foreign_subcategory() {
        let tree = sample_tree();
        let food = tree.find_by_name("Food").unwrap();
        let transport = tree.find_by_name("Transport").unwrap();

        let reference = CategoryRef {
            category_id: transport.id,
            sub_category_id: Some(food.subcategories[0].id),
            child_category_id: None,
        };
        let err = tree.resolve_path(&reference).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_resolve_rejects_child_without_subcategory() {
        let tree = sample_tree();
        let food = tree.find_by_name("Food").unwrap();
        let reference = CategoryRef {
            category_id: food.id,
            sub_category_id: None,
            child_category_id: Some(food.subcategories[0].items[0].id),
        };
        assert!(tree.resolve_path(&reference).is_err());
    }

    #[test]
    fn test_resolve_unknown_category() {
        let tree = sample_tree();
        let err = tree
            .resolve_path(&CategoryRef::new(CategoryId::new()))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_validation() {
        let mut category = Category::new("Valid", TransactionType::Expense);
        assert!(category.validate().is_ok());

        category.name = String::new();
        assert_eq!(category.validate(), Err(CategoryValidationError::EmptyName));

        category.name = "Ok".into();
        category.subcategories.push(Subcategory::new("a".repeat(51)));
        assert!(matches!(
            category.validate(),
            Err(CategoryValidationError::NameTooLong(51))
        ));
    }

    #[test]
    fn test_serialization_uses_type_key() {
        let category = Category::new("Salary", TransactionType::Income);
        let json = serde_json::to_value(&category).unwrap();
        assert_eq!(json["type"], "income");

        let tree = sample_tree();
        let json = serde_json::to_string(&tree).unwrap();
        let back: CategoryTree = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tree);
    }
}
