//! Application settings, currently just the default currency for new transactions.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{AppState, Error, currency::Currency};

/// The owner's preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Settings {
    /// The currency used for new transactions that do not name one.
    pub default_currency: Currency,
}

/// Get the stored settings, or the defaults if none have been saved.
pub fn get_settings(connection: &Connection) -> Result<Settings, Error> {
    match connection.query_row(
        "SELECT default_currency FROM settings WHERE id = 1",
        [],
        |row| row.get(0),
    ) {
        Ok(default_currency) => Ok(Settings { default_currency }),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(Settings::default()),
        Err(error) => Err(error.into()),
    }
}

/// Save `settings`, replacing the stored settings.
pub fn update_settings(settings: Settings, connection: &Connection) -> Result<(), Error> {
    connection.execute(
        "INSERT INTO settings (id, default_currency) VALUES (1, ?1)
         ON CONFLICT(id) DO UPDATE SET default_currency = excluded.default_currency",
        (settings.default_currency,),
    )?;

    Ok(())
}

/// Create the single-row settings table.
pub fn create_settings_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS settings (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            default_currency TEXT NOT NULL
        );",
    )?;

    Ok(())
}

/// The state needed for the settings endpoints.
#[derive(Debug, Clone)]
pub struct SettingsState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SettingsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Get the current settings.
pub async fn get_settings_endpoint(
    State(state): State<SettingsState>,
) -> Result<Json<Settings>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_settings(&connection).map(Json)
}

/// Replace the settings and return the stored settings.
pub async fn update_settings_endpoint(
    State(state): State<SettingsState>,
    Json(settings): Json<Settings>,
) -> Result<Json<Settings>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    update_settings(settings, &connection)?;
    tracing::info!("default currency set to {}", settings.default_currency);

    get_settings(&connection).map(Json)
}
