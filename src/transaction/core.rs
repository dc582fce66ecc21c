//! Defines the core data models and database queries for transactions.

use std::{fmt::Display, str::FromStr, sync::Mutex};

use rusqlite::{
    Connection, Row, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    category::category_exists,
    currency::Currency,
    database_id::TransactionId,
    payment_method::payment_method_exists,
    settings::get_settings,
};

// ============================================================================
// MODELS
// ============================================================================

/// Whether money was earned or spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money earned, e.g. a salary payment.
    Income,
    /// Money spent, e.g. groceries.
    Expense,
}

impl TransactionType {
    /// The lowercase name used in JSON, CSV and the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(format!("unknown transaction type \"{other}\"")),
        }
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: String| FromSqlError::Other(error.into()))
    }
}

/// A non-negative, finite amount of money.
///
/// Whether the money was earned or spent is carried by [TransactionType], so
/// an amount is never negative.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Amount(f64);

impl Amount {
    /// Create an amount.
    ///
    /// # Errors
    ///
    /// Returns an [Error::InvalidAmount] if `value` is negative, NaN or infinite.
    pub fn new(value: f64) -> Result<Self, Error> {
        if value.is_finite() && value >= 0.0 {
            // Normalise -0.0 so that it displays as "0".
            Ok(Self(value.abs()))
        } else {
            Err(Error::InvalidAmount(value))
        }
    }

    /// The amount as a plain number.
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Amount {
    type Error = Error;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Amount::new(value)
    }
}

impl From<Amount> for f64 {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl ToSql for Amount {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        self.0.to_sql()
    }
}

impl FromSql for Amount {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let value = f64::column_result(value)?;

        Amount::new(value).map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// Transactions are immutable once stored. To record a new one, use
/// [NewTransaction::build] and [create_transaction].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// When the transaction happened.
    pub date: Date,
    /// Whether the money was earned or spent.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// How much money was earned or spent.
    pub amount: Amount,
    /// The currency `amount` is in.
    pub currency: Currency,
    /// The category of an expense or the source of an income, e.g. "Shopping" or "Salary".
    pub category: String,
    /// A text description of what the transaction was for.
    pub description: Option<String>,
    /// How an expense was paid for, or the income source for income.
    pub payment_method: Option<String>,
}

/// The data needed to record a transaction.
///
/// When `currency` is `None` the configured default currency is used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    /// When the transaction happened.
    pub date: Date,
    /// Whether the money was earned or spent.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// How much money was earned or spent.
    pub amount: Amount,
    /// The currency `amount` is in.
    #[serde(default)]
    pub currency: Option<Currency>,
    /// A registered category for `kind`.
    pub category: String,
    /// A text description of what the transaction was for.
    #[serde(default)]
    pub description: Option<String>,
    /// A registered payment method for expenses.
    ///
    /// Income without a payment method uses its category.
    #[serde(default)]
    pub payment_method: Option<String>,
}

impl NewTransaction {
    /// Start building a new transaction with the required fields.
    pub fn build(kind: TransactionType, amount: Amount, date: Date, category: &str) -> Self {
        Self {
            date,
            kind,
            amount,
            currency: None,
            category: category.to_owned(),
            description: None,
            payment_method: None,
        }
    }

    /// Set the currency for the transaction.
    pub fn currency(mut self, currency: Currency) -> Self {
        self.currency = Some(currency);
        self
    }

    /// Set the description for the transaction.
    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_owned());
        self
    }

    /// Set the payment method for the transaction.
    pub fn payment_method(mut self, payment_method: &str) -> Self {
        self.payment_method = Some(payment_method.to_owned());
        self
    }
}

fn non_empty(text: Option<String>) -> Option<String> {
    text.map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new transaction in the database.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidCategory] if the category is not registered for the transaction type,
/// - or [Error::InvalidPaymentMethod] if an expense names an unregistered payment method,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    new_transaction: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let category = new_transaction.category.trim().to_owned();

    if !category_exists(&category, new_transaction.kind, connection)? {
        return Err(Error::InvalidCategory(category));
    }

    let payment_method = match (
        new_transaction.kind,
        non_empty(new_transaction.payment_method),
    ) {
        (TransactionType::Expense, Some(payment_method)) => {
            if !payment_method_exists(&payment_method, connection)? {
                return Err(Error::InvalidPaymentMethod(payment_method));
            }

            Some(payment_method)
        }
        (TransactionType::Expense, None) => None,
        (TransactionType::Income, Some(source)) => Some(source),
        (TransactionType::Income, None) => Some(category.clone()),
    };

    let currency = match new_transaction.currency {
        Some(currency) => currency,
        None => get_settings(connection)?.default_currency,
    };

    let transaction = connection
        .prepare(
            "INSERT INTO \"transaction\" (date, type, amount, currency, category, description, payment_method)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             RETURNING id, date, type, amount, currency, category, description, payment_method",
        )?
        .query_row(
            (
                new_transaction.date,
                new_transaction.kind,
                new_transaction.amount,
                currency,
                category,
                non_empty(new_transaction.description),
                payment_method,
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "SELECT id, date, type, amount, currency, category, description, payment_method
             FROM \"transaction\" WHERE id = :id",
        )?
        .query_one(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Get a snapshot of every transaction, newest first.
///
/// Transactions on the same date are ordered by descending ID, i.e. the most
/// recently recorded first.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error or
/// if a stored row is invalid, e.g. has a negative amount.
pub fn get_all_transactions(connection: &Connection) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, date, type, amount, currency, category, description, payment_method
             FROM \"transaction\" ORDER BY date DESC, id DESC",
        )?
        .query_map([], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
        .collect()
}

/// Lock the shared connection and read every transaction, newest first.
///
/// The lock is released before returning.
///
/// # Errors
/// This function will return a:
/// - [Error::DatabaseLockError] if the lock is poisoned,
/// - or any error from [get_all_transactions].
pub fn load_snapshot(db_connection: &Mutex<Connection>) -> Result<Vec<Transaction>, Error> {
    let connection = db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_all_transactions(&connection)
        .inspect_err(|error| tracing::error!("could not read transactions: {error}"))
}

/// Delete the transaction with `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingTransaction] if `id` does not refer to a stored transaction,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_transaction(id: TransactionId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM \"transaction\" WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingTransaction);
    }

    Ok(())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                date TEXT NOT NULL,
                type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
                amount REAL NOT NULL CHECK (amount >= 0),
                currency TEXT NOT NULL,
                category TEXT NOT NULL,
                description TEXT,
                payment_method TEXT
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_date ON \"transaction\"(date);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let date = row.get(1)?;
    let kind = row.get(2)?;
    let amount = row.get(3)?;
    let currency = row.get(4)?;
    let category = row.get(5)?;
    let description = row.get(6)?;
    let payment_method = row.get(7)?;

    Ok(Transaction {
        id,
        date,
        kind,
        amount,
        currency,
        category,
        description,
        payment_method,
    })
}

// ============================================================================
// TESTS
// ============================================================================



#[cfg(test)]
mod load_snapshot_tests {
    use std::{sync::Mutex, thread};

    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        db::initialize,
        transaction::{Amount, NewTransaction, TransactionType, create_transaction},
    };

    use super::load_snapshot;

    #[test]
    fn reads_newest_first() {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        for day in [date!(2024 - 05 - 30), date!(2024 - 06 - 01)] {
            create_transaction(
                NewTransaction::build(
                    TransactionType::Expense,
                    Amount::new(1.0).unwrap(),
                    day,
                    "Food & Dining",
                ),
                &connection,
            )
            .unwrap();
        }

        let snapshot = load_snapshot(&Mutex::new(connection)).unwrap();

        let dates: Vec<_> = snapshot.iter().map(|transaction| transaction.date).collect();
        assert_eq!(dates, vec![date!(2024 - 06 - 01), date!(2024 - 05 - 30)]);
    }

    #[test]
    fn poisoned_lock_is_an_error() {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let db_connection = Mutex::new(connection);

        thread::scope(|scope| {
            let _ = scope
                .spawn(|| {
                    let _guard = db_connection.lock().unwrap();
                    panic!("poison the lock");
                })
                .join();
        });

        assert_eq!(load_snapshot(&db_connection), Err(Error::DatabaseLockError));
    }
}
