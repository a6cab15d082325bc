//! The spending categories and the columns their costs can be grouped by.

use std::{fmt::Display, str::FromStr};

use serde::Serialize;

use crate::Error;

/// A category of cost records. Each category is stored in its own table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Investments in funds.
    Funds,
    /// Regular bills, e.g. rent and utilities.
    Bills,
    /// Groceries and eating out.
    Food,
    /// Everything that doesn't fit elsewhere.
    General,
    /// Travel and holidays.
    Holiday,
    /// Social spending, grouped by society.
    Social,
}

/// The categories included in a period analysis, in the order of their slots
/// in a [CostRow](crate::CostRow).
pub const ANALYSIS_CATEGORIES: [Category; 5] = [
    Category::Bills,
    Category::Food,
    Category::General,
    Category::Holiday,
    Category::Social,
];

impl Category {
    /// The name of the database table holding the category's records.
    pub fn table_name(self) -> &'static str {
        match self {
            Self::Funds => "funds",
            Self::Bills => "bills",
            Self::Food => "food",
            Self::General => "general",
            Self::Holiday => "holiday",
            Self::Social => "social",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.table_name())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "funds" => Ok(Self::Funds),
            "bills" => Ok(Self::Bills),
            "food" => Ok(Self::Food),
            "general" => Ok(Self::General),
            "holiday" => Ok(Self::Holiday),
            "social" => Ok(Self::Social),
            other => Err(Error::InvalidCategory(other.to_owned())),
        }
    }
}

/// How costs within a category are grouped in an analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupBy {
    /// Group by the category's sub-category column.
    Category,
    /// Group by the shop the purchase was made at.
    Shop,
}

impl FromStr for GroupBy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "category" => Ok(Self::Category),
            "shop" => Ok(Self::Shop),
            other => Err(Error::InvalidGrouping(other.to_owned())),
        }
    }
}

/// A text column of a category table that costs can be summed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupColumn {
    /// The item purchased.
    Item,
    /// The food/general sub-category.
    Category,
    /// The shop.
    Shop,
    /// The holiday a cost belongs to.
    Holiday,
    /// The society a social cost belongs to.
    Society,
}

impl GroupColumn {
    /// The SQL column name.
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Item => "item",
            Self::Category => "category",
            Self::Shop => "shop",
            Self::Holiday => "holiday",
            Self::Society => "society",
        }
    }
}

/// Get the column that `category` costs are grouped by for `group_by`.
///
/// Bills only have items, so they are always grouped by item.
pub fn category_column(category: Category, group_by: GroupBy) -> GroupColumn {
    match (category, group_by) {
        (Category::Bills, _) => GroupColumn::Item,
        (Category::Food | Category::General, GroupBy::Category) => GroupColumn::Category,
        (Category::Holiday, GroupBy::Category) => GroupColumn::Holiday,
        (Category::Social, GroupBy::Category) => GroupColumn::Society,
        (Category::Funds, GroupBy::Category) => GroupColumn::Item,
        (_, GroupBy::Shop) => GroupColumn::Shop,
    }
}
