//! Budget analysis is the reporting engine of a personal finance tracker.
//!
//! It turns dated cost records into period summaries, dense day-by-day
//! timelines for charting, and thresholded pie chart distributions. The
//! engine is served as a small JSON API backed by a SQLite database.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod analysis;
mod app_state;
mod category;
mod config;
mod db;
mod distribution;
pub mod endpoints;
mod grouping;
mod handlers;
mod logging;
mod period;
mod routing;
mod store;
mod timeline;
mod timezone;
mod user;

pub use analysis::{
    CategoryCost, DeepCostGroup, PeriodCostReport, PieReport, get_period_cost,
    get_period_cost_deep, get_pie_distribution,
};
pub use app_state::{AnalysisState, AppState, PieState};
pub use category::{ANALYSIS_CATEGORIES, Category, GroupBy, GroupColumn, category_column};
pub use config::AnalysisConfig;
pub use db::{
    NewRecord, SQLiteAnalysisStore, initialize as initialize_db, insert_income, insert_record,
};
pub use distribution::{
    DistributionSegment, OTHER_LABEL, PieColumn, SegmentKind, merge_small_slices, pie_columns,
};
pub use grouping::{CategoryRecords, CostRow, GroupedIndex, group_costs_by_date};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use period::{Granularity, Period, parse_short_period, resolve_period};
pub use routing::build_router;
pub use store::{AnalysisStore, CostRecord, DateRange, DeepCostRow, LabelCost};
pub use timeline::{Timeline, build_timeline};
pub use timezone::get_local_date;
pub use user::{USER_ID_HEADER, UserID};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested category is not one of the known categories for the
    /// operation, e.g. asking for a pie chart of bills.
    #[error("invalid category \"{0}\"")]
    InvalidCategory(String),

    /// The category has no sub-category column to break its costs down by.
    #[error("{0} aren't categorised")]
    NotCategorised(Category),

    /// The period granularity was not one of `week`, `month` or `year`.
    #[error("invalid period \"{0}\"")]
    InvalidPeriod(String),

    /// The page was not a non-negative whole number.
    #[error("invalid page \"{0}\"")]
    InvalidPage(String),

    /// The grouping was not one of `category` or `shop`.
    #[error("invalid grouping \"{0}\"")]
    InvalidGrouping(String),

    /// The request did not carry a valid user ID.
    #[error("missing or malformed user ID")]
    Unauthorized,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// A background fetch task panicked or was cancelled before finishing.
    #[error("a fetch task failed: {0}")]
    TaskFailed(String),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        tracing::error!("an unhandled SQL error occurred: {}", value);
        Error::SqlError(value)
    }
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidCategory(_)
            | Error::NotCategorised(_)
            | Error::InvalidPeriod(_)
            | Error::InvalidPage(_)
            | Error::InvalidGrouping(_) => StatusCode::BAD_REQUEST,
            Error::Unauthorized => StatusCode::UNAUTHORIZED,
            Error::SqlError(_)
            | Error::DatabaseLockError
            | Error::TaskFailed(_)
            | Error::InvalidTimezoneError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = if status.is_server_error() {
            // Internal errors are not intended to be shown to the client.
            tracing::error!("An unexpected error occurred: {}", self);
            "An unexpected error occurred, check the server logs for more details.".to_owned()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
