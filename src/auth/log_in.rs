//! Log-in route handler that checks the access key and sets the auth cookie.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Duration;

use crate::{
    AppState, Error,
    auth::{Token, cookie::get_token_from_cookies, get_access_key_hash, set_auth_cookie},
};

/// How long the auth cookie lasts if the owner selects "remember me" at log-in.
pub(crate) const REMEMBER_ME_COOKIE_DURATION: Duration = Duration::days(7);

/// The state needed to perform a log-in.
#[derive(Debug, Clone)]
pub struct LogInState {
    /// The key used for encrypting private cookies.
    pub cookie_key: Key,
    /// How long the auth cookie lasts without "remember me".
    pub cookie_duration: Duration,
    /// The database connection holding the access key hash.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LogInState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            db_connection: state.db_connection.clone(),
        }
    }
}

impl FromRef<LogInState> for Key {
    fn from_ref(state: &LogInState) -> Self {
        state.cookie_key.clone()
    }
}

/// The body of a log-in request.
///
/// The access key is a plain string. It is only compared against the stored hash.
#[derive(Clone, Serialize, Deserialize)]
pub struct LogInData {
    /// The access key entered by the owner.
    pub access_key: String,

    /// Whether the session should last for a week instead of a few minutes.
    #[serde(default)]
    pub remember_me: bool,
}

/// Handler for log-in requests.
///
/// On success the auth cookie is set and the response body holds the new [Token].
///
/// # Errors
///
/// - [Error::AccessKeyNotSet] if no access key has been stored.
/// - [Error::InvalidCredentials] if the access key is wrong.
/// - [Error::HashingError] if the key could not be checked against the stored hash.
pub async fn post_log_in(
    State(state): State<LogInState>,
    jar: PrivateCookieJar,
    Json(log_in_data): Json<LogInData>,
) -> Result<(PrivateCookieJar, Json<Token>), Error> {
    let access_key_hash = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_access_key_hash(&connection).inspect_err(|error| {
            if *error == Error::AccessKeyNotSet {
                tracing::warn!("log-in attempted before the access key was set");
            }
        })?
    };

    let is_access_key_valid = access_key_hash
        .verify(&log_in_data.access_key)
        .map_err(|error| {
            tracing::error!("Unhandled error while verifying credentials: {error}");
            Error::HashingError(error.to_string())
        })?;

    if !is_access_key_valid {
        tracing::warn!("log-in attempted with an invalid access key");
        return Err(Error::InvalidCredentials);
    }

    let cookie_duration = if log_in_data.remember_me {
        REMEMBER_ME_COOKIE_DURATION
    } else {
        state.cookie_duration
    };

    let jar = set_auth_cookie(jar, cookie_duration)
        .inspect_err(|error| tracing::error!("Error setting auth cookie: {error}"))?;
    let token = get_token_from_cookies(&jar)?;
    tracing::info!("owner logged in until {}", token.expires_at);

    Ok((jar, Json(token)))
}
