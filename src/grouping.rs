//! Grouping cost records by the day they were recorded on.

use std::collections::BTreeMap;

use time::Date;

use crate::{Category, CostRecord};

/// The costs recorded on a single day, one slot per category.
///
/// Slots follow the order of [GroupedIndex::categories].
pub type CostRow = Vec<i64>;

/// The cost records of one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRecords {
    /// The category the records belong to.
    pub category: Category,
    /// The records, in any order.
    pub records: Vec<CostRecord>,
}

/// The key for a day: year, zero-based month and one-based day of the month.
type DayKey = (i32, u8, u8);

/// A sparse index of daily costs keyed by year, month and day of the month.
///
/// A day is only present if at least one category had a non-zero cost
/// recorded on it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupedIndex {
    categories: Vec<Category>,
    days: BTreeMap<DayKey, CostRow>,
}

impl GroupedIndex {
    /// The categories in slot order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Get the costs for the day `day` of the zero-based `month` in `year`.
    pub fn get(&self, year: i32, month: u8, day: u8) -> Option<&CostRow> {
        self.days.get(&(year, month, day))
    }

    /// Get the costs recorded on `date`.
    pub fn get_date(&self, date: Date) -> Option<&CostRow> {
        self.days.get(&day_key(date))
    }

    /// The number of days with recorded costs.
    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// Whether no costs were recorded on any day.
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Iterate over the days with costs in chronological order.
    pub fn iter(&self) -> impl Iterator<Item = (DayKey, &CostRow)> {
        self.days.iter().map(|(key, row)| (*key, row))
    }
}

/// Sum the costs of each category per day.
///
/// Each input's position determines its slot in the resulting rows. Multiple
/// records for the same category and day are added together, so the order of
/// the records does not matter. Records with a cost of zero are skipped.
pub fn group_costs_by_date(inputs: &[CategoryRecords]) -> GroupedIndex {
    let categories: Vec<Category> = inputs.iter().map(|input| input.category).collect();
    let slot_count = categories.len();
    let mut days: BTreeMap<DayKey, CostRow> = BTreeMap::new();

    for (slot, input) in inputs.iter().enumerate() {
        for record in input.records.iter().filter(|record| record.cost != 0) {
            let row = days
                .entry(day_key(record.date))
                .or_insert_with(|| vec![0; slot_count]);
            row[slot] += record.cost;
        }
    }

    GroupedIndex { categories, days }
}

fn day_key(date: Date) -> DayKey {
    (date.year(), u8::from(date.month()) - 1, date.day())
}
