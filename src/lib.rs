//! An expense and income tracker for a single owner.
//!
//! The library exposes a JSON API for recording transactions, managing the
//! categories and payment methods used to label them, and viewing aggregated
//! summaries of spending. The aggregation and filtering logic lives in pure
//! functions ([dashboard::summarize] and [filter_transactions]) that work on a
//! snapshot of transactions read from the SQLite store.

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

mod app_state;
mod auth;
mod category;
mod currency;
pub mod dashboard;
mod database_id;
mod db;
mod endpoints;
mod filters;
mod logging;
mod payment_method;
mod routing;
mod settings;
mod timezone;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use auth::{AccessKeyHash, ValidatedAccessKey, set_access_key};
pub use category::{Category, CategoryName, create_category};
pub use currency::Currency;
pub use database_id::{DatabaseId, TransactionId};
pub use db::initialize as initialize_db;
pub use filters::{LabelFilter, TransactionFilter, TypeFilter, filter_transactions};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use payment_method::{PaymentMethod, create_payment_method};
pub use routing::build_router;
pub use timezone::get_local_offset;
pub use transaction::{Amount, NewTransaction, Transaction, TransactionType, create_transaction};

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
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The access key provided at log-in did not match the stored access key.
    #[error("invalid access key")]
    InvalidCredentials,

    /// No access key has been stored yet, so nobody can log in.
    ///
    /// The owner should run the `set_access_key` binary against the database.
    #[error("the access key has not been set")]
    AccessKeyNotSet,

    /// The owner chose an access key that is too easy to guess.
    #[error("access key is too weak: {0}")]
    TooWeak(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// A transaction amount was negative, NaN or infinite.
    ///
    /// The sign of a transaction is carried by its type, so stored amounts
    /// must be non-negative.
    #[error("{0} is not a valid amount, amounts must be finite and zero or greater")]
    InvalidAmount(f64),

    /// An empty string was used for a category or payment method name.
    #[error("name cannot be empty")]
    EmptyLabel,

    /// The category of a new transaction is not registered for its type.
    #[error("\"{0}\" is not a registered category for this transaction type")]
    InvalidCategory(String),

    /// The payment method of a new expense is not registered.
    #[error("\"{0}\" is not a registered payment method")]
    InvalidPaymentMethod(String),

    /// A category with the same name and type already exists.
    #[error("the category \"{0}\" already exists")]
    DuplicateCategory(String),

    /// A payment method with the same name already exists.
    #[error("the payment method \"{0}\" already exists")]
    DuplicatePaymentMethod(String),

    /// A string could not be parsed as a currency code.
    #[error("\"{0}\" is not a supported currency")]
    InvalidCurrency(String),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to delete a transaction that does not exist.
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,

    /// Tried to delete a category that does not exist.
    #[error("tried to delete a category that is not in the database")]
    DeleteMissingCategory,

    /// Tried to delete a payment method that does not exist.
    #[error("tried to delete a payment method that is not in the database")]
    DeleteMissingPaymentMethod,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// The transactions could not be written as CSV.
    #[error("could not write CSV: {0}")]
    CsvError(String),

    /// The auth cookie could not be created.
    #[error("could not create the auth cookie: {0}")]
    CookieError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidAmount(_)
            | Error::EmptyLabel
            | Error::InvalidCategory(_)
            | Error::InvalidPaymentMethod(_)
            | Error::InvalidCurrency(_)
            | Error::TooWeak(_) => StatusCode::BAD_REQUEST,
            Error::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Error::NotFound
            | Error::DeleteMissingTransaction
            | Error::DeleteMissingCategory
            | Error::DeleteMissingPaymentMethod => StatusCode::NOT_FOUND,
            Error::DuplicateCategory(_) | Error::DuplicatePaymentMethod(_) => StatusCode::CONFLICT,
            Error::AccessKeyNotSet => StatusCode::SERVICE_UNAVAILABLE,
            Error::HashingError(_)
            | Error::SqlError(_)
            | Error::InvalidTimezoneError(_)
            | Error::DatabaseLockError
            | Error::CsvError(_)
            | Error::CookieError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            // Internal errors are not intended to be shown to the client.
            tracing::error!("An unexpected error occurred: {}", self);
            "An unexpected error occurred, check the server logs for more details.".to_owned()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
