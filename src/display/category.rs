//! Category display formatting
//!
//! Renders the taxonomy as a tree, one section per transaction type.

use crate::models::{Category, CategoryTree, TransactionType};

fn push_category(output: &mut String, category: &Category) {
    let icon = if category.icon.is_empty() {
        String::new()
    } else {
        format!(" [{}]", category.icon)
    };
    output.push_str(&format!("  {}{}  ({})\n", category.name, icon, category.id));

    for (i, sub) in category.subcategories.iter().enumerate() {
        let last_sub = i + 1 == category.subcategories.len();
        let (branch, stem) = if last_sub {
            ("└── ", "    ")
        } else {
            ("├── ", "│   ")
        };
        output.push_str(&format!("    {}{}  ({})\n", branch, sub.name, sub.id));

        for (j, item) in sub.items.iter().enumerate() {
            let leaf = if j + 1 == sub.items.len() {
                "└── "
            } else {
                "├── "
            };
            output.push_str(&format!("    {}{}{}  ({})\n", stem, leaf, item.name, item.id));
        }
    }
}

/// Format the whole taxonomy, or only one type
pub fn format_category_tree(tree: &CategoryTree, only: Option<TransactionType>) -> String {
    if tree.is_empty() {
        return "No categories found.\n\nRun 'walletbook init' to create default categories."
            .to_string();
    }

    let sections: Vec<TransactionType> = match only {
        Some(kind) => vec![kind],
        None => vec![TransactionType::Expense, TransactionType::Income],
    };

    let mut output = String::new();
    for (i, kind) in sections.iter().enumerate() {
        if i > 0 {
            output.push('\n');
        }
        output.push_str(&format!("{}\n", kind));

        let categories = tree.list_by_type(*kind);
        if categories.is_empty() {
            output.push_str("  (no categories)\n");
        }
        for category in categories {
            push_category(&mut output, category);
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Subcategory;

    fn tree() -> CategoryTree {
        CategoryTree::new(vec![
            Category::new("Food", TransactionType::Expense)
                .with_icon("utensils")
                .with_subcategories(vec![
                    Subcategory::with_items("Groceries", &["Milk", "Bread"]),
                    Subcategory::new("Restaurants"),
                ]),
            Category::new("Salary", TransactionType::Income),
        ])
    }

    #[test]
    fn test_tree_lists_all_levels() {
        let output = format_category_tree(&tree(), None);
        assert!(output.starts_with("Expense\n"));
        assert!(output.contains("Food [utensils]"));
        assert!(output.contains("├── Groceries"));
        assert!(output.contains("│   └── Bread"));
        assert!(output.contains("└── Restaurants"));
        assert!(output.contains("Income\n"));
        assert!(output.contains("Salary"));
    }

    #[test]
    fn test_tree_filtered_by_type() {
        let output = format_category_tree(&tree(), Some(TransactionType::Income));
        assert!(!output.contains("Food"));
        assert!(output.contains("Salary"));
    }

    #[test]
    fn test_empty_tree() {
        let output = format_category_tree(&CategoryTree::default(), None);
        assert!(output.starts_with("No categories found."));
    }
}
