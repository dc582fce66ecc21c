//! Validating, hashing and storing the owner's access key.
//!
//! `ValidatedAccessKey` wraps a string and ensures it is hard to guess.
//! `AccessKeyHash` is the salted bcrypt hash kept in the database.

use std::fmt::Display;

use bcrypt::{BcryptError, hash, verify};
use rusqlite::{
    Connection, ToSql,
    types::{FromSql, FromSqlResult, ToSqlOutput, ValueRef},
};
use zxcvbn::{Score, feedback::Feedback, zxcvbn};

use crate::Error;

/// An access key that has been checked for strength, but not yet hashed.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedAccessKey(String);

impl ValidatedAccessKey {
    /// Create and validate an access key from a string.
    ///
    /// # Errors
    ///
    /// Returns [Error::TooWeak] if the key is easy to guess. The message
    /// suggests how to make it stronger.
    pub fn new(raw_access_key: &str) -> Result<Self, Error> {
        let analysis = zxcvbn(raw_access_key, &[]);

        match analysis.score() {
            Score::Three | Score::Four => Ok(Self(raw_access_key.to_owned())),
            _ => Err(Error::TooWeak(
                analysis
                    .feedback()
                    .unwrap_or(&Feedback::default())
                    .to_string(),
            )),
        }
    }

    /// Create an access key without checking its strength.
    ///
    /// Intended for test databases.
    pub fn new_unchecked(raw_access_key: &str) -> Self {
        Self(raw_access_key.to_owned())
    }
}

impl Display for ValidatedAccessKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", str::repeat("*", 8))
    }
}

/// A salted and hashed access key.
#[derive(Debug, Clone, PartialEq)]
pub struct AccessKeyHash(String);

impl AccessKeyHash {
    /// The recommended bcrypt cost.
    pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

    /// Hash `access_key` with the bcrypt `cost`.
    ///
    /// # Errors
    ///
    /// Returns [Error::HashingError] if bcrypt fails, e.g. because `cost` is out of range.
    pub fn new(access_key: ValidatedAccessKey, cost: u32) -> Result<Self, Error> {
        hash(&access_key.0, cost)
            .map(Self)
            .map_err(|error| Error::HashingError(error.to_string()))
    }

    /// Wrap an existing bcrypt hash string.
    pub fn new_unchecked(raw_hash: &str) -> Self {
        Self(raw_hash.to_owned())
    }

    /// Validate and hash a raw access key in one step.
    pub fn from_raw_access_key(raw_access_key: &str, cost: u32) -> Result<Self, Error> {
        Self::new(ValidatedAccessKey::new(raw_access_key)?, cost)
    }

    /// Check whether `raw_access_key` hashes to this hash.
    pub fn verify(&self, raw_access_key: &str) -> Result<bool, BcryptError> {
        verify(raw_access_key, &self.0)
    }
}

impl ToSql for AccessKeyHash {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0.as_str()))
    }
}

impl FromSql for AccessKeyHash {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value.as_str().map(Self::new_unchecked)
    }
}

/// Create the single-row table that holds the access key hash.
pub fn create_access_key_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS access_key (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            hash TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

/// Get the stored access key hash.
///
/// # Errors
///
/// Returns [Error::AccessKeyNotSet] if no access key has been stored.
pub fn get_access_key_hash(connection: &Connection) -> Result<AccessKeyHash, Error> {
    connection
        .query_row("SELECT hash FROM access_key WHERE id = 1", [], |row| {
            row.get(0)
        })
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::AccessKeyNotSet,
            error => error.into(),
        })
}

/// Store `access_key_hash`, replacing any existing access key.
pub fn set_access_key(
    access_key_hash: &AccessKeyHash,
    connection: &Connection,
) -> Result<(), Error> {
    connection.execute(
        "INSERT INTO access_key (id, hash) VALUES (1, ?1)
        ON CONFLICT(id) DO UPDATE SET hash = excluded.hash",
        (access_key_hash,),
    )?;

    Ok(())
}
