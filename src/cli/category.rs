//! Category CLI commands

use clap::Subcommand;

use crate::display::category::format_category_tree;
use crate::error::LedgerResult;
use crate::models::CategoryRef;
use crate::tracker::Tracker;

use super::{find_category, find_child_item, find_subcategory, parse_type};

/// Category subcommands
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// Show the category tree
    List {
        /// Only show one type (income or expense)
        #[arg(short = 't', long = "type")]
        category_type: Option<String>,
    },
    /// Add a top-level category
    Add {
        /// Category name
        name: String,
        /// Category type (income or expense)
        #[arg(short = 't', long = "type", default_value = "expense")]
        category_type: String,
        /// Icon reference
        #[arg(short, long)]
        icon: Option<String>,
    },
    /// Add a subcategory
    AddSub {
        /// Parent category name or ID
        category: String,
        /// Subcategory name
        name: String,
    },
    /// Add a child item under a subcategory
    AddItem {
        /// Category name or ID
        category: String,
        /// Subcategory name or ID
        subcategory: String,
        /// Item name
        name: String,
    },
    /// Rename a category
    Rename {
        /// Category name or ID
        category: String,
        /// New name
        name: String,
    },
    /// Delete a category (refused while transactions use it)
    Delete {
        /// Category name or ID
        category: String,
    },
    /// Delete a subcategory; its transactions move to "Other"
    DeleteSub {
        /// Category name or ID
        category: String,
        /// Subcategory name or ID
        subcategory: String,
    },
    /// Delete a child item; its transactions keep the subcategory
    DeleteItem {
        /// Category name or ID
        category: String,
        /// Subcategory name or ID
        subcategory: String,
        /// Item name or ID
        item: String,
    },
}

/// Handle a category command
pub fn handle_category_command(tracker: &mut Tracker, cmd: CategoryCommands) -> LedgerResult<()> {
    match cmd {
        CategoryCommands::List { category_type } => {
            let only = category_type.as_deref().map(parse_type).transpose()?;
            print!(
                "{}",
                format_category_tree(&tracker.data().categories, only)
            );
        }

        CategoryCommands::Add {
            name,
            category_type,
            icon,
        } => {
            let category_type = parse_type(&category_type)?;
            let data = tracker.add_category(&name, category_type, icon.as_deref())?;
            let category = find_category(data, &name)?;
            println!(
                "Created {} category: {} ({})",
                category.category_type.to_string().to_lowercase(),
                category.name,
                category.id
            );
        }

        CategoryCommands::AddSub { category, name } => {
            let category_id = find_category(tracker.data(), &category)?.id;
            let data = tracker.add_subcategory(category_id, &name)?;
            let parent = find_category(data, &category)?;
            let sub = find_subcategory(parent, &name)?;
            println!("Created subcategory: {} / {} ({})", parent.name, sub.name, sub.id);
        }

        CategoryCommands::AddItem {
            category,
            subcategory,
            name,
        } => {
            let parent = find_category(tracker.data(), &category)?;
            let (category_id, sub_id) = (parent.id, find_subcategory(parent, &subcategory)?.id);

            let data = tracker.add_child_item(category_id, sub_id, &name)?;
            let resolved = data
                .categories
                .resolve_path(&CategoryRef::new(category_id).with_subcategory(sub_id))?;
            if let Some(sub) = resolved.subcategory {
                let item = find_child_item(sub, &name)?;
                println!("Created item: {} / {} ({})", resolved.label(), item.name, item.id);
            }
        }

        CategoryCommands::Rename { category, name } => {
            let found = find_category(tracker.data(), &category)?;
            let (id, old_name) = (found.id, found.name.clone());
            tracker.rename_category(id, &name)?;
            println!("Renamed category '{}' to '{}'", old_name, name.trim());
        }

        CategoryCommands::Delete { category } => {
            let found = find_category(tracker.data(), &category)?;
            let (id, name) = (found.id, found.name.clone());
            tracker.delete_category(id)?;
            println!("Deleted category: {}", name);
        }

        CategoryCommands::DeleteSub {
            category,
            subcategory,
        } => {
            let parent = find_category(tracker.data(), &category)?;
            let sub = find_subcategory(parent, &subcategory)?;
            let (category_id, sub_id, name) = (parent.id, sub.id, sub.name.clone());
            let affected = tracker
                .data()
                .transactions
                .iter()
                .filter(|t| t.category.sub_category_id == Some(sub_id))
                .count();

            tracker.delete_subcategory(category_id, sub_id)?;
            println!(
                "Deleted subcategory: {} ({} transaction(s) moved to Other)",
                name, affected
            );
        }

        CategoryCommands::DeleteItem {
            category,
            subcategory,
            item,
        } => {
            let parent = find_category(tracker.data(), &category)?;
            let sub = find_subcategory(parent, &subcategory)?;
            let found = find_child_item(sub, &item)?;
            let (category_id, sub_id, item_id, name) =
                (parent.id, sub.id, found.id, found.name.clone());

            tracker.delete_child_item(category_id, sub_id, item_id)?;
            println!("Deleted item: {}", name);
        }
    }

    Ok(())
}
