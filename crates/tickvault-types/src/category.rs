//! Data category definitions.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The data set requested from the provider for a ticker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataCategory {
    /// Every snapshot field the provider returns.
    Info,
    /// Balance sheet, cash flow and income statements.
    Financials,
    /// Curated subset of snapshot fields.
    #[serde(rename = "general")]
    GeneralInfo,
    /// Full-history daily price series.
    #[serde(rename = "history")]
    HistoricPrice,
    /// Dividend payment series.
    Dividends,
}

/// Shape of a raw provider record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RawShape {
    /// Field-name to value mapping.
    Snapshot,
    /// Time-indexed rows.
    Series,
    /// Period-indexed financial statements.
    Statements,
}

impl std::fmt::Display for RawShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Snapshot => "snapshot",
            Self::Series => "series",
            Self::Statements => "statements",
        };
        write!(f, "{name}")
    }
}

impl DataCategory {
    /// Returns the number shown for this category in the interactive menu.
    #[must_use]
    pub const fn menu_number(&self) -> u8 {
        match self {
            Self::Info => 1,
            Self::Financials => 2,
            Self::GeneralInfo => 3,
            Self::HistoricPrice => 4,
            Self::Dividends => 5,
        }
    }

    /// Returns the category as a command-line identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Financials => "financials",
            Self::GeneralInfo => "general",
            Self::HistoricPrice => "history",
            Self::Dividends => "dividends",
        }
    }

    /// Returns the label appended to the ticker to form the destination name.
    #[must_use]
    pub const fn table_label(&self) -> &'static str {
        match self {
            Self::Info => "Info",
            Self::Financials => "Financial Info",
            Self::GeneralInfo => "General Info",
            Self::HistoricPrice => "Historic Price",
            Self::Dividends => "Dividends",
        }
    }

    /// Returns the menu description for this category.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Info => "All Info",
            Self::Financials => "Financial Info",
            Self::GeneralInfo => "General Info",
            Self::HistoricPrice => "Historic Price",
            Self::Dividends => "Dividends Paid Out",
        }
    }

    /// Returns the raw record shape the provider yields for this category.
    #[must_use]
    pub const fn raw_shape(&self) -> RawShape {
        match self {
            Self::Info | Self::GeneralInfo => RawShape::Snapshot,
            Self::Financials => RawShape::Statements,
            Self::HistoricPrice | Self::Dividends => RawShape::Series,
        }
    }

    /// Returns all categories in menu order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Info,
            Self::Financials,
            Self::GeneralInfo,
            Self::HistoricPrice,
            Self::Dividends,
        ]
    }
}

impl std::fmt::Display for DataCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DataCategory {
    type Err = CategoryParseError;

    /// Accepts either the menu number or a category name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1" | "info" | "all" | "all-info" => Ok(Self::Info),
            "2" | "financials" | "financial" | "financial-info" => Ok(Self::Financials),
            "3" | "general" | "general-info" => Ok(Self::GeneralInfo),
            "4" | "history" | "historic-price" | "price" => Ok(Self::HistoricPrice),
            "5" | "dividends" | "dividend" => Ok(Self::Dividends),
            _ => Err(CategoryParseError(s.to_string())),
        }
    }
}

/// Error returned when parsing an invalid category selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryParseError(String);

impl std::fmt::Display for CategoryParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid category '{}', expected 1-5 or one of: info, financials, general, history, dividends",
            self.0
        )
    }
}

impl std::error::Error for CategoryParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse_menu_numbers() {
        assert_eq!("1".parse::<DataCategory>().unwrap(), DataCategory::Info);
        assert_eq!("2".parse::<DataCategory>().unwrap(), DataCategory::Financials);
        assert_eq!(" 3 ".parse::<DataCategory>().unwrap(), DataCategory::GeneralInfo);
        assert_eq!("4".parse::<DataCategory>().unwrap(), DataCategory::HistoricPrice);
        assert_eq!("5".parse::<DataCategory>().unwrap(), DataCategory::Dividends);
    }

    #[test]
    fn test_category_parse_names() {
        assert_eq!("History".parse::<DataCategory>().unwrap(), DataCategory::HistoricPrice);
        assert_eq!("general".parse::<DataCategory>().unwrap(), DataCategory::GeneralInfo);
        assert!("6".parse::<DataCategory>().is_err());
        assert!("".parse::<DataCategory>().is_err());
    }

    #[test]
    fn test_menu_numbers_roundtrip() {
        for category in DataCategory::all() {
            let parsed: DataCategory = category.menu_number().to_string().parse().unwrap();
            assert_eq!(parsed, *category);
            let by_name: DataCategory = category.as_str().parse().unwrap();
            assert_eq!(by_name, *category);
        }
    }

    #[test]
    fn test_raw_shapes() {
        assert_eq!(DataCategory::Info.raw_shape(), RawShape::Snapshot);
        assert_eq!(DataCategory::GeneralInfo.raw_shape(), RawShape::Snapshot);
        assert_eq!(DataCategory::Financials.raw_shape(), RawShape::Statements);
        assert_eq!(DataCategory::Dividends.raw_shape(), RawShape::Series);
    }
}
