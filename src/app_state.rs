//! The state shared by every request handler.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use rusqlite::Connection;
use sha2::{Digest, Sha512};
use time::Duration;

use crate::{Error, auth::DEFAULT_COOKIE_DURATION, db::initialize};

/// The state of the JSON API server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The key used for encrypting the private auth cookie.
    pub cookie_key: Key,

    /// How long a session stays valid without activity.
    pub cookie_duration: Duration,

    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    ///
    /// Decides which date counts as "today" for the dashboard.
    pub local_timezone: String,

    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// The database is initialized with the tables and default registry entries
    /// if they do not already exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(
        db_connection: Connection,
        cookie_secret: &str,
        local_timezone: &str,
    ) -> Result<Self, Error> {
        initialize(&db_connection)?;

        Ok(Self {
            cookie_key: create_cookie_key(cookie_secret),
            cookie_duration: DEFAULT_COOKIE_DURATION,
            local_timezone: local_timezone.to_owned(),
            db_connection: Arc::new(Mutex::new(db_connection)),
        })
    }
}

// `PrivateCookieJar` reads the key from the state.
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

/// Derive the cookie encryption key from `secret`.
pub fn create_cookie_key(secret: &str) -> Key {
    Key::from(&Sha512::digest(secret))
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use crate::{
        auth::DEFAULT_COOKIE_DURATION, category::get_categories, transaction::TransactionType,
    };

    use super::{AppState, create_cookie_key};

    #[test]
    fn new_initializes_database() {
        let connection = Connection::open_in_memory().unwrap();

        let state = AppState::new(connection, "foobar", "Etc/UTC").unwrap();

        let connection = state.db_connection.lock().unwrap();
        assert!(!get_categories(TransactionType::Expense, &connection).unwrap().is_empty());
        assert_eq!(state.cookie_duration, DEFAULT_COOKIE_DURATION);
    }

    #[test]
    fn cookie_key_depends_on_secret() {
        assert_eq!(
            create_cookie_key("foo").master(),
            create_cookie_key("foo").master()
        );
        assert_ne!(
            create_cookie_key("foo").master(),
            create_cookie_key("bar").master()
        );
    }
}
