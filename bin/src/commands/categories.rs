//! Categories command implementation.

use tickvault_lib::prelude::*;

/// Print the category table: menu number, name and table label.
pub(crate) fn list_categories() {
    println!("{:<4} {:<12} {:<16} {:<20}", "#", "NAME", "TABLE", "DESCRIPTION");
    println!("{}", "-".repeat(55));

    for category in DataCategory::all() {
        println!(
            "{:<4} {:<12} {:<16} {:<20}",
            category.menu_number(),
            category.as_str(),
            category.table_label(),
            category.description()
        );
    }
}
