//! The registry of payment methods that expenses can be paid with.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
    http::StatusCode,
};
use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{AppState, Error, database_id::PaymentMethodId};

/// The payment methods a new database starts with.
pub const DEFAULT_PAYMENT_METHODS: [&str; 6] = [
    "Cash",
    "Credit Card",
    "Debit Card",
    "Bank Transfer",
    "Digital Wallet",
    "Check",
];

/// A way of paying for an expense, e.g. 'Cash'.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct PaymentMethod {
    /// The ID of the payment method.
    pub id: PaymentMethodId,
    /// The trimmed, non-empty name that transactions refer to.
    pub name: String,
}

/// The request body for registering a payment method.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPaymentMethod {
    pub name: String,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Register a payment method and return it with its generated ID.
///
/// # Errors
/// This function will return a:
/// - [Error::EmptyLabel] if `name` is empty or only whitespace,
/// - or [Error::DuplicatePaymentMethod] if `name` is already registered,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_payment_method(name: &str, connection: &Connection) -> Result<PaymentMethod, Error> {
    let name = name.trim();

    if name.is_empty() {
        return Err(Error::EmptyLabel);
    }

    connection
        .execute("INSERT INTO payment_method (name) VALUES (?1);", (name,))
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                _,
            ) => Error::DuplicatePaymentMethod(name.to_owned()),
            error => error.into(),
        })?;

    Ok(PaymentMethod {
        id: connection.last_insert_rowid(),
        name: name.to_owned(),
    })
}

/// Retrieve all payment methods in the order they were registered.
pub fn get_payment_methods(connection: &Connection) -> Result<Vec<PaymentMethod>, Error> {
    connection
        .prepare("SELECT id, name FROM payment_method ORDER BY id ASC;")?
        .query_map([], map_row)?
        .map(|maybe_payment_method| maybe_payment_method.map_err(|error| error.into()))
        .collect()
}

/// Check whether `name` is a registered payment method.
pub fn payment_method_exists(name: &str, connection: &Connection) -> Result<bool, Error> {
    connection
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM payment_method WHERE name = ?1);",
            (name,),
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

/// Delete a payment method by ID.
///
/// # Errors
/// Returns [Error::DeleteMissingPaymentMethod] if there is no payment method with `id`.
pub fn delete_payment_method(id: PaymentMethodId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM payment_method WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingPaymentMethod);
    }

    Ok(())
}

/// Register the default payment methods, skipping those that already exist.
pub fn insert_default_payment_methods(connection: &Connection) -> Result<(), rusqlite::Error> {
    let mut statement =
        connection.prepare("INSERT OR IGNORE INTO payment_method (name) VALUES (?1);")?;

    for name in DEFAULT_PAYMENT_METHODS {
        statement.execute((name,))?;
    }

    Ok(())
}

/// Initialize the payment method table.
pub fn create_payment_method_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS payment_method (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE
        );",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<PaymentMethod, rusqlite::Error> {
    Ok(PaymentMethod {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}

// ============================================================================
// ENDPOINTS
// ============================================================================

/// The state needed for the payment method endpoints.
#[derive(Debug, Clone)]
pub struct PaymentMethodState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for PaymentMethodState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// List the registered payment methods.
pub async fn get_payment_methods_endpoint(
    State(state): State<PaymentMethodState>,
) -> Result<Json<Vec<PaymentMethod>>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_payment_methods(&connection).map(Json)
}

/// Register a new payment method.
pub async fn create_payment_method_endpoint(
    State(state): State<PaymentMethodState>,
    Json(new_payment_method): Json<NewPaymentMethod>,
) -> Result<(StatusCode, Json<PaymentMethod>), Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let payment_method = create_payment_method(&new_payment_method.name, &connection)
        .inspect_err(|error| tracing::warn!("could not create payment method: {error}"))?;

    Ok((StatusCode::CREATED, Json(payment_method)))
}

/// Remove a payment method from the registry.
///
/// Transactions that used the payment method keep their label.
pub async fn delete_payment_method_endpoint(
    Path(payment_method_id): Path<PaymentMethodId>,
    State(state): State<PaymentMethodState>,
) -> Result<StatusCode, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    delete_payment_method(payment_method_id, &connection)?;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// TESTS
// ============================================================================
