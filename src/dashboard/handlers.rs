//! Dashboard HTTP handler.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State},
};
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error,
    dashboard::aggregation::{DashboardSummary, summarize},
    timezone::get_local_date,
    transaction::load_snapshot,
};

/// The state needed for the dashboard.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The query parameters for the dashboard.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    /// The date to anchor the periods to, defaults to today in the local timezone.
    pub date: Option<Date>,
}

/// Get the dashboard figures for the requested date.
pub async fn get_dashboard(
    State(state): State<DashboardState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<DashboardSummary>, Error> {
    let reference_date = match query.date {
        Some(date) => date,
        None => get_local_date(&state.local_timezone)?,
    };

    let transactions = load_snapshot(&state.db_connection)?;

    Ok(Json(summarize(&transactions, reference_date)))
}
