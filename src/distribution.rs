//! Pie chart distributions, where slices that are too small to see are
//! merged into a single "Other" slice.

use serde::Serialize;

use crate::{Category, Error, GroupColumn, LabelCost};

/// The label of the slice that small slices are merged into.
pub const OTHER_LABEL: &str = "Other";

/// What the values of a pie chart measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    /// The sum of the costs per label.
    Cost,
    /// The number of distinct days with a record per label.
    Int,
}

/// A column of a category table that is shown as a pie chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieColumn {
    /// The column whose values label the slices.
    pub column: GroupColumn,
    /// What the slice sizes measure.
    pub kind: SegmentKind,
    /// The chart title.
    pub title: &'static str,
}

const fn pie_column(column: GroupColumn, kind: SegmentKind, title: &'static str) -> PieColumn {
    PieColumn {
        column,
        kind,
        title,
    }
}

static FUNDS_COLUMNS: [PieColumn; 1] = [pie_column(GroupColumn::Item, SegmentKind::Cost, "Total")];

static SHOP_AND_CATEGORY_COLUMNS: [PieColumn; 2] = [
    pie_column(GroupColumn::Shop, SegmentKind::Cost, "Shop cost"),
    pie_column(GroupColumn::Category, SegmentKind::Cost, "Category cost"),
];

static HOLIDAY_COLUMNS: [PieColumn; 2] = [
    pie_column(GroupColumn::Holiday, SegmentKind::Cost, "Holiday cost"),
    pie_column(GroupColumn::Holiday, SegmentKind::Int, "Holiday number"),
];

static SOCIAL_COLUMNS: [PieColumn; 2] = [
    pie_column(GroupColumn::Shop, SegmentKind::Cost, "Shop cost"),
    pie_column(GroupColumn::Society, SegmentKind::Cost, "Society cost"),
];

/// Get the columns to draw pie charts of for `category`, in display order.
///
/// # Errors
/// Returns [Error::InvalidCategory] for bills, which have no pie charts.
pub fn pie_columns(category: Category) -> Result<&'static [PieColumn], Error> {
    match category {
        Category::Funds => Ok(&FUNDS_COLUMNS),
        Category::Food | Category::General => Ok(&SHOP_AND_CATEGORY_COLUMNS),
        Category::Holiday => Ok(&HOLIDAY_COLUMNS),
        Category::Social => Ok(&SOCIAL_COLUMNS),
        Category::Bills => Err(Error::InvalidCategory(category.to_string())),
    }
}

/// One pie chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionSegment {
    /// The chart title, e.g. "Shop cost".
    pub title: String,
    /// What the slice sizes measure.
    #[serde(rename = "type")]
    pub kind: SegmentKind,
    /// The slices, largest first.
    pub data: Vec<LabelCost>,
    /// The sum of the slices before any were merged.
    pub total: i64,
}

impl DistributionSegment {
    /// Create the pie chart for `pie_column` from the per-label `slices`.
    ///
    /// See [merge_small_slices] for how `threshold` is applied.
    pub fn new(pie_column: &PieColumn, slices: Vec<LabelCost>, threshold: f64) -> Self {
        let (data, total) = merge_small_slices(slices, threshold);

        Self {
            title: pie_column.title.to_owned(),
            kind: pie_column.kind,
            data,
            total,
        }
    }
}

/// Merge the slices smaller than `threshold` (a fraction of the total) into
/// a single "Other" slice and sort the result largest first.
///
/// Returns the slices and the total of the original slices. If the total is
/// not positive the slices are returned unchanged. Slices of equal size may
/// appear in either order.
pub fn merge_small_slices(slices: Vec<LabelCost>, threshold: f64) -> (Vec<LabelCost>, i64) {
    let total: i64 = slices.iter().map(|slice| slice.cost).sum();

    if total <= 0 {
        return (slices, total);
    }

    let min_cost = threshold * total as f64;

    let (small, mut large): (Vec<LabelCost>, Vec<LabelCost>) = slices
        .into_iter()
        .partition(|slice| (slice.cost as f64) < min_cost);

    let other: i64 = small.iter().map(|slice| slice.cost).sum();

    if other > 0 {
        large.push(LabelCost::new(OTHER_LABEL, other));
    }

    large.sort_by(|a, b| b.cost.cmp(&a.cost));

    (large, total)
}

#[cfg(test)]
mod tests {
    use crate::{
        Category, Error, GroupColumn, LabelCost,
        distribution::{
            DistributionSegment, OTHER_LABEL, SegmentKind, merge_small_slices, pie_columns,
        },
    };

    fn shops() -> Vec<LabelCost> {
        vec![
            LabelCost::new("Tesco", 41739),
            LabelCost::new("Sainsburys", 20490),
            LabelCost::new("Subway", 15647),
            LabelCost::new("Wetherspoons", 6982),
            LabelCost::new("Waitrose", 120),
            LabelCost::new("Boots", 99),
        ]
    }

    #[test]
    fn merges_small_slices_into_other() {
        let (data, total) = merge_small_slices(shops(), 0.05);

        assert_eq!(total, 85077);
        assert_eq!(
            data,
            vec![
                LabelCost::new("Tesco", 41739),
                LabelCost::new("Sainsburys", 20490),
                LabelCost::new("Subway", 15647),
                LabelCost::new("Wetherspoons", 6982),
                LabelCost::new(OTHER_LABEL, 219),
            ]
        );
    }

    #[test]
    fn other_slice_is_sorted_with_the_rest() {
        let slices = vec![
            LabelCost::new("a", 5),
            LabelCost::new("b", 5),
            LabelCost::new("c", 5),
            LabelCost::new("big", 100),
            LabelCost::new("medium", 10),
        ];

        let (data, total) = merge_small_slices(slices, 0.07);

        assert_eq!(total, 125);
        assert_eq!(
            data,
            vec![
                LabelCost::new("big", 100),
                LabelCost::new(OTHER_LABEL, 15),
                LabelCost::new("medium", 10),
            ]
        );
    }

    #[test]
    fn sorts_unordered_input_descending() {
        let slices = vec![
            LabelCost::new("small", 30),
            LabelCost::new("large", 50),
            LabelCost::new("medium", 40),
        ];

        let (data, _) = merge_small_slices(slices, 0.01);

        let costs: Vec<i64> = data.iter().map(|slice| slice.cost).collect();
        assert_eq!(costs, vec![50, 40, 30]);
    }

    #[test]
    fn no_other_slice_when_nothing_is_small() {
        let slices = vec![LabelCost::new("a", 50), LabelCost::new("b", 50)];

        let (data, total) = merge_small_slices(slices, 0.1);

        assert_eq!(total, 100);
        assert!(data.iter().all(|slice| slice.label != OTHER_LABEL));
        assert_eq!(data.len(), 2);
    }

    #[test]
    fn equal_slices_keep_both_labels() {
        let slices = vec![LabelCost::new("a", 50), LabelCost::new("b", 50)];

        let (data, _) = merge_small_slices(slices, 0.1);

        let mut labels: Vec<&str> = data.iter().map(|slice| slice.label.as_str()).collect();
        labels.sort();
        assert_eq!(labels, vec!["a", "b"]);
    }

    #[test]
    fn zero_total_returns_slices_unchanged() {
        let slices = vec![
            LabelCost::new("b", 0),
            LabelCost::new("a", 0),
            LabelCost::new("c", 0),
        ];

        let (data, total) = merge_small_slices(slices.clone(), 0.05);

        assert_eq!(total, 0);
        assert_eq!(data, slices);
    }

    #[test]
    fn empty_slices_give_zero_total() {
        let (data, total) = merge_small_slices(Vec::new(), 0.05);

        assert_eq!(total, 0);
        assert!(data.is_empty());
    }

    #[test]
    fn merging_twice_gives_same_result() {
        assert_eq!(
            merge_small_slices(shops(), 0.05),
            merge_small_slices(shops(), 0.05)
        );
    }

    #[test]
    fn segment_has_title_type_and_total() {
        let column = pie_columns(Category::Food).unwrap()[0];

        let segment = DistributionSegment::new(&column, shops(), 0.05);

        assert_eq!(segment.title, "Shop cost");
        assert_eq!(segment.kind, SegmentKind::Cost);
        assert_eq!(segment.total, 85077);
        assert_eq!(segment.data.len(), 5);

        let json = serde_json::to_value(&segment).unwrap();
        assert_eq!(json["type"], "cost");
        assert_eq!(json["data"][4]["label"], OTHER_LABEL);
    }

    #[test]
    fn pie_columns_for_each_category() {
        let columns = |category| {
            pie_columns(category)
                .unwrap()
                .iter()
                .map(|column| (column.column, column.kind, column.title))
                .collect::<Vec<_>>()
        };

        assert_eq!(
            columns(Category::Funds),
            vec![(GroupColumn::Item, SegmentKind::Cost, "Total")]
        );
        assert_eq!(
            columns(Category::Food),
            vec![
                (GroupColumn::Shop, SegmentKind::Cost, "Shop cost"),
                (GroupColumn::Category, SegmentKind::Cost, "Category cost"),
            ]
        );
        assert_eq!(columns(Category::General), columns(Category::Food));
        assert_eq!(
            columns(Category::Holiday),
            vec![
                (GroupColumn::Holiday, SegmentKind::Cost, "Holiday cost"),
                (GroupColumn::Holiday, SegmentKind::Int, "Holiday number"),
            ]
        );
        assert_eq!(
            columns(Category::Social),
            vec![
                (GroupColumn::Shop, SegmentKind::Cost, "Shop cost"),
                (GroupColumn::Society, SegmentKind::Cost, "Society cost"),
            ]
        );
    }

    #[test]
    fn pie_columns_rejects_bills() {
        let result = pie_columns(Category::Bills);

        assert!(matches!(result, Err(Error::InvalidCategory(name)) if name == "bills"));
    }
}
