//! Interactive menu implementation.

use crate::commands::run::execute;
use crate::settings::Settings;
use anyhow::{Context, Result};
use inquire::Text;
use tickvault_lib::prelude::*;

/// Render the numbered category menu.
fn menu() -> String {
    DataCategory::all()
        .iter()
        .map(|c| format!("  {}: {}", c.menu_number(), c.description()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Prompt for a category and a ticker, then run once.
pub(crate) async fn interactive(settings: &Settings, quiet: bool) -> Result<()> {
    println!("Pick an option:");
    println!("{}", menu());

    let choice = Text::new("Option:")
        .prompt()
        .context("Option selection cancelled")?;
    let category: DataCategory = choice.trim().parse()?;

    let ticker = Text::new("For which ticker?")
        .prompt()
        .context("Ticker input cancelled")?;
    let ticker = Ticker::new(&ticker).with_context(|| format!("Invalid ticker: {ticker}"))?;

    execute(&ticker, category, settings, quiet).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_lists_all_categories_in_order() {
        let menu = menu();
        let lines: Vec<_> = menu.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "  1: All Info");
        assert_eq!(lines[4], "  5: Dividends Paid Out");
    }
}
