//! The boundary between the analysis engine and the database.

use serde::Serialize;
use time::Date;

use crate::{Category, Error, GroupColumn, PieColumn, UserID};

/// An inclusive range of dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    /// The first day in the range.
    pub start: Date,
    /// The last day in the range.
    pub end: Date,
}

/// A single cost on a given day, in minor currency units (e.g. pence).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CostRecord {
    /// The day the cost was recorded on.
    pub date: Date,
    /// The cost in minor currency units.
    pub cost: i64,
}

/// The total cost for one label, e.g. a shop or an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelCost {
    /// The shop, item, category, etc. the cost was summed over.
    pub label: String,
    /// The summed cost.
    pub cost: i64,
}

impl LabelCost {
    /// Create a new label/cost pair.
    pub fn new(label: impl Into<String>, cost: i64) -> Self {
        Self {
            label: label.into(),
            cost,
        }
    }
}

/// The total cost of an item within a group, e.g. "Milk" within "Dairy".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeepCostRow {
    /// The item name.
    pub item: String,
    /// The value of the grouping column, e.g. the shop or sub-category.
    pub group: String,
    /// The summed cost.
    pub cost: i64,
}

/// Read access to a user's cost records.
///
/// Implementations must be safe to call from several threads at once, since
/// the analysis functions issue independent queries concurrently.
pub trait AnalysisStore: Send + Sync + 'static {
    /// Sum the positive costs of `category` per distinct value of `column`
    /// within `range`, and get the top `limit` sums ordered by cost descending.
    fn period_cost_rows(
        &self,
        user_id: UserID,
        category: Category,
        column: GroupColumn,
        range: DateRange,
        limit: u32,
    ) -> Result<Vec<LabelCost>, Error>;

    /// Sum the positive costs of `category` per item and `column` value
    /// within `range`, ordered by the `column` value.
    fn deep_cost_rows(
        &self,
        user_id: UserID,
        category: Category,
        column: GroupColumn,
        range: DateRange,
    ) -> Result<Vec<DeepCostRow>, Error>;

    /// Get every record of `category` within `range`, one per transaction.
    fn raw_records(
        &self,
        user_id: UserID,
        category: Category,
        range: DateRange,
    ) -> Result<Vec<CostRecord>, Error>;

    /// Get the total income within `range`.
    fn income(&self, user_id: UserID, range: DateRange) -> Result<i64, Error>;

    /// Get the top `limit` values of `pie_column` for `category` across all
    /// time, ordered by value descending.
    fn pie_rows(
        &self,
        user_id: UserID,
        category: Category,
        pie_column: PieColumn,
        limit: u32,
    ) -> Result<Vec<LabelCost>, Error>;
}
