//! Database operations for categories.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    category::{Category, CategoryName, DEFAULT_EXPENSE_CATEGORIES, DEFAULT_INCOME_SOURCES},
    database_id::CategoryId,
    transaction::TransactionType,
};

/// Register a category and return it with its generated ID.
///
/// # Errors
/// This function will return a:
/// - [Error::DuplicateCategory] if `name` is already registered for `kind`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_category(
    name: CategoryName,
    kind: TransactionType,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .execute(
            "INSERT INTO category (name, kind) VALUES (?1, ?2);",
            (name.as_ref(), kind),
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                _,
            ) => Error::DuplicateCategory(name.to_string()),
            error => error.into(),
        })?;

    let id = connection.last_insert_rowid();

    Ok(Category { id, name, kind })
}

/// Retrieve the categories registered for `kind` in the order they were registered.
pub fn get_categories(
    kind: TransactionType,
    connection: &Connection,
) -> Result<Vec<Category>, Error> {
    connection
        .prepare("SELECT id, name, kind FROM category WHERE kind = :kind ORDER BY id ASC;")?
        .query_map(&[(":kind", &kind)], map_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Check whether `name` is registered as a category for `kind`.
pub fn category_exists(
    name: &str,
    kind: TransactionType,
    connection: &Connection,
) -> Result<bool, Error> {
    connection
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM category WHERE name = ?1 AND kind = ?2);",
            (name, kind),
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

/// Delete a category by ID. Returns an error if the category doesn't exist.
///
/// Transactions that use the category keep their label.
pub fn delete_category(category_id: CategoryId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM category WHERE id = ?1", [category_id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingCategory);
    }

    Ok(())
}

/// Register the default expense categories and income sources.
///
/// Categories that already exist are left as they are.
pub fn insert_default_categories(connection: &Connection) -> Result<(), rusqlite::Error> {
    let mut statement =
        connection.prepare("INSERT OR IGNORE INTO category (name, kind) VALUES (?1, ?2);")?;

    for name in DEFAULT_EXPENSE_CATEGORIES {
        statement.execute((name, TransactionType::Expense))?;
    }

    for name in DEFAULT_INCOME_SOURCES {
        statement.execute((name, TransactionType::Income))?;
    }

    Ok(())
}

/// Initialize the category table.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            kind TEXT NOT NULL CHECK (kind IN ('income', 'expense')),
            UNIQUE(name, kind)
        );",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;
    let name = CategoryName::new_unchecked(&raw_name);
    let kind = row.get(2)?;

    Ok(Category { id, name, kind })
}
