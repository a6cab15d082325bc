//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::{AnalysisConfig, Error, SQLiteAnalysisStore, db::initialize};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,

    /// The config that controls how pie charts are built.
    pub analysis_config: AnalysisConfig,

    /// The store for reading cost records.
    pub store: Arc<SQLiteAnalysisStore>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the cost records.
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "Pacific/Auckland".
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(
        db_connection: Connection,
        local_timezone: &str,
        analysis_config: AnalysisConfig,
    ) -> Result<Self, Error> {
        initialize(&db_connection)?;

        let connection = Arc::new(Mutex::new(db_connection));

        Ok(Self {
            local_timezone: local_timezone.to_owned(),
            analysis_config,
            store: Arc::new(SQLiteAnalysisStore::new(connection)),
        })
    }
}

/// The state needed for the period analysis endpoints.
#[derive(Debug, Clone)]
pub struct AnalysisState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// The detail limit and pie chart settings.
    pub analysis_config: AnalysisConfig,
    /// The store for reading cost records.
    pub store: Arc<SQLiteAnalysisStore>,
}

impl FromRef<AppState> for AnalysisState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            analysis_config: state.analysis_config,
            store: state.store.clone(),
        }
    }
}

/// The state needed for the pie chart endpoint.
#[derive(Debug, Clone)]
pub struct PieState {
    /// The pie chart settings.
    pub analysis_config: AnalysisConfig,
    /// The store for reading cost records.
    pub store: Arc<SQLiteAnalysisStore>,
}

impl FromRef<AppState> for PieState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            analysis_config: state.analysis_config,
            store: state.store.clone(),
        }
    }
}
