//! Route handlers that turn path parameters into analysis requests.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    Category, DeepCostGroup, Error, GroupBy, PeriodCostReport, PieReport, UserID,
    analysis::{get_period_cost, get_period_cost_deep, get_pie_distribution},
    app_state::{AnalysisState, PieState},
    period::Granularity,
    timezone::get_local_date,
};

/// Get the spending report for the period `page` periods before the current one.
pub async fn get_period_cost_endpoint(
    State(state): State<AnalysisState>,
    user_id: UserID,
    Path((period, group_by, page)): Path<(String, String, String)>,
) -> Result<Json<PeriodCostReport>, Error> {
    let granularity: Granularity = period.parse()?;
    let group_by: GroupBy = group_by.parse()?;
    let page = parse_page(&page)?;
    let now = get_local_date(&state.local_timezone)?;

    tracing::debug!("period cost for user {user_id}: {period} {page} by {group_by:?}");

    get_period_cost(
        state.store,
        user_id,
        now,
        granularity,
        group_by,
        page,
        &state.analysis_config,
    )
    .await
    .map(Json)
}

/// Get the per-item breakdown of one category for the period `page` periods
/// before the current one.
pub async fn get_period_cost_deep_endpoint(
    State(state): State<AnalysisState>,
    user_id: UserID,
    Path((category, period, group_by, page)): Path<(String, String, String, String)>,
) -> Result<Json<Vec<DeepCostGroup>>, Error> {
    let category: Category = category.parse()?;
    let granularity: Granularity = period.parse()?;
    let group_by: GroupBy = group_by.parse()?;
    let page = parse_page(&page)?;
    let now = get_local_date(&state.local_timezone)?;

    get_period_cost_deep(
        state.store,
        user_id,
        now,
        category,
        granularity,
        group_by,
        page,
    )
    .await
    .map(Json)
}

/// Get the pie charts of a category.
pub async fn get_pie_endpoint(
    State(state): State<PieState>,
    user_id: UserID,
    Path(category): Path<String>,
) -> Result<Json<PieReport>, Error> {
    let category: Category = category.parse()?;

    get_pie_distribution(state.store, user_id, category, &state.analysis_config)
        .await
        .map(Json)
}

fn parse_page(page: &str) -> Result<u32, Error> {
    page.parse().map_err(|_| Error::InvalidPage(page.to_owned()))
}
