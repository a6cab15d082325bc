//! Assembles period reports and pie charts from the store's query results.
//!
//! Independent queries are run concurrently on blocking threads, and the first
//! failed query fails the whole report.

use std::sync::Arc;

use serde::{Serialize, Serializer};
use time::Date;
use tokio::task::JoinSet;

use crate::{
    ANALYSIS_CATEGORIES, AnalysisConfig, AnalysisStore, Category, DateRange, DistributionSegment,
    Error, GroupBy, LabelCost, UserID,
    category::category_column,
    distribution::pie_columns,
    grouping::{CategoryRecords, group_costs_by_date},
    period::{Granularity, resolve_period},
    timeline::{Timeline, build_timeline},
};

/// The costs of one category in a period, grouped by label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCost {
    /// The category.
    pub category: Category,
    /// The total cost per label, largest first.
    pub items: Vec<LabelCost>,
}

/// A summary of spending over one period.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodCostReport {
    /// Daily costs per category, for monthly and yearly periods.
    pub timeline: Option<Timeline>,
    /// The costs of each analysis category.
    pub cost: Vec<CategoryCost>,
    /// Income minus spending, or zero if more was spent than earned.
    pub saved: i64,
    /// The human readable name of the period.
    pub description: String,
    /// The first day of the period.
    #[serde(serialize_with = "serialize_date")]
    pub start_date: Date,
    /// The last day of the period.
    #[serde(serialize_with = "serialize_date")]
    pub end_date: Date,
}

/// The items within one group of a category, e.g. everything bought at one shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeepCostGroup {
    /// The group label.
    pub item: String,
    /// The total cost per item in the group.
    pub tree: Vec<LabelCost>,
}

/// The pie charts for a category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieReport {
    /// One chart per pie column of the category.
    pub list: Vec<DistributionSegment>,
}

fn serialize_date<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(date)
}

/// Get the spending report for the period of length `granularity` that is
/// `page` periods before the one containing `now`.
///
/// Each category lists at most `config.pie_detail_limit` labels.
///
/// # Errors
/// Returns the first error from the store, if any query fails.
pub async fn get_period_cost<S: AnalysisStore>(
    store: Arc<S>,
    user_id: UserID,
    now: Date,
    granularity: Granularity,
    group_by: GroupBy,
    page: u32,
    config: &AnalysisConfig,
) -> Result<PeriodCostReport, Error> {
    let period = resolve_period(now, granularity, page);
    let range = DateRange {
        start: period.start_time,
        end: period.end_time,
    };
    let limit = config.pie_detail_limit;

    let cost_tasks = ANALYSIS_CATEGORIES.map(|category| {
        let store = store.clone();
        let column = category_column(category, group_by);
        move || store.period_cost_rows(user_id, category, column, range, limit)
    });

    let record_tasks = ANALYSIS_CATEGORIES.map(|category| {
        let store = store.clone();
        move || store.raw_records(user_id, category, range)
    });

    let income_store = store.clone();
    let income_task = move || income_store.income(user_id, range);

    let (costs, records, income) = tokio::try_join!(
        fetch_all(cost_tasks),
        fetch_all(record_tasks),
        fetch_one(income_task),
    )?;

    // Cost rows stop at the detail limit, the records do not.
    let total_cost: i64 = records
        .iter()
        .flatten()
        .map(|record| record.cost)
        .filter(|&cost| cost > 0)
        .sum();
    let saved = (income - total_cost).max(0);

    let category_records: Vec<CategoryRecords> = ANALYSIS_CATEGORIES
        .into_iter()
        .zip(records)
        .map(|(category, records)| CategoryRecords { category, records })
        .collect();
    let index = group_costs_by_date(&category_records);
    let timeline = build_timeline(&index, granularity, period.start_time);

    let cost = ANALYSIS_CATEGORIES
        .into_iter()
        .zip(costs)
        .map(|(category, items)| CategoryCost { category, items })
        .collect();

    tracing::debug!(
        "built report for {} with {} days of costs",
        period.description,
        index.len()
    );

    Ok(PeriodCostReport {
        timeline,
        cost,
        saved,
        description: period.description,
        start_date: period.start_time,
        end_date: period.end_time,
    })
}

/// Get the costs of each item in `category`, grouped by the column chosen
/// by `group_by`, for the period `page` periods before the one containing `now`.
///
/// # Errors
/// Returns an error if:
/// - `category` is not an analysis category,
/// - `category` is bills, which have no groups,
/// - the store query fails.
pub async fn get_period_cost_deep<S: AnalysisStore>(
    store: Arc<S>,
    user_id: UserID,
    now: Date,
    category: Category,
    granularity: Granularity,
    group_by: GroupBy,
    page: u32,
) -> Result<Vec<DeepCostGroup>, Error> {
    if !ANALYSIS_CATEGORIES.contains(&category) {
        return Err(Error::InvalidCategory(category.to_string()));
    }

    if category == Category::Bills {
        return Err(Error::NotCategorised(category));
    }

    let period = resolve_period(now, granularity, page);
    let range = DateRange {
        start: period.start_time,
        end: period.end_time,
    };
    let column = category_column(category, group_by);

    let rows =
        fetch_one(move || store.deep_cost_rows(user_id, category, column, range)).await?;

    let mut groups: Vec<DeepCostGroup> = Vec::new();

    for row in rows {
        let item = LabelCost::new(row.item, row.cost);

        match groups.last_mut() {
            Some(group) if group.item == row.group => group.tree.push(item),
            _ => groups.push(DeepCostGroup {
                item: row.group,
                tree: vec![item],
            }),
        }
    }

    Ok(groups)
}

/// Get the pie charts for `category`, with slices below the configured
/// threshold merged into "Other".
///
/// # Errors
/// Returns [Error::InvalidCategory] before querying the store if `category`
/// has no pie charts, otherwise the first error from the store.
pub async fn get_pie_distribution<S: AnalysisStore>(
    store: Arc<S>,
    user_id: UserID,
    category: Category,
    config: &AnalysisConfig,
) -> Result<PieReport, Error> {
    let columns = pie_columns(category)?;
    let limit = config.pie_detail_limit;
    let threshold = config.pie_threshold();

    let tasks: Vec<_> = columns
        .iter()
        .map(|&pie_column| {
            let store = store.clone();
            move || store.pie_rows(user_id, category, pie_column, limit)
        })
        .collect();

    let results = fetch_all(tasks).await?;

    let list = columns
        .iter()
        .zip(results)
        .map(|(pie_column, rows)| DistributionSegment::new(pie_column, rows, threshold))
        .collect();

    Ok(PieReport { list })
}

/// Run `tasks` concurrently on the blocking thread pool and collect their
/// results in the order of `tasks`.
///
/// Returns as soon as any task fails. The remaining tasks are aborted and
/// their results discarded.
async fn fetch_all<T, F>(tasks: impl IntoIterator<Item = F>) -> Result<Vec<T>, Error>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, Error> + Send + 'static,
{
    let mut join_set = JoinSet::new();

    for (index, task) in tasks.into_iter().enumerate() {
        join_set.spawn_blocking(move || task().map(|value| (index, value)));
    }

    let mut results: Vec<Option<T>> = (0..join_set.len()).map(|_| None).collect();

    while let Some(joined) = join_set.join_next().await {
        let (index, value) = joined.map_err(|error| {
            tracing::error!("fetch task did not finish: {error}");
            Error::TaskFailed(error.to_string())
        })??;
        results[index] = Some(value);
    }

    Ok(results.into_iter().flatten().collect())
}

async fn fetch_one<T, F>(task: F) -> Result<T, Error>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, Error> + Send + 'static,
{
    tokio::task::spawn_blocking(task).await.map_err(|error| {
        tracing::error!("fetch task did not finish: {error}");
        Error::TaskFailed(error.to_string())
    })?
}
