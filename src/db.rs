//! Creates the database tables and seeds a new database with the default registry.

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{
    Error,
    auth::create_access_key_table,
    category::{create_category_table, insert_default_categories},
    payment_method::{create_payment_method_table, insert_default_payment_methods},
    settings::create_settings_table,
    transaction::create_transaction_table,
};

/// Create the tables for the domain models if they do not exist.
///
/// The default categories and payment methods are only added when their
/// tables are first created, so registry entries the owner removed stay removed.
///
/// # Errors
/// Returns an error if a table cannot be created or if there is some other SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    let is_new_category_table = !table_exists("category", &transaction)?;
    let is_new_payment_method_table = !table_exists("payment_method", &transaction)?;

    create_access_key_table(&transaction)?;
    create_settings_table(&transaction)?;
    create_category_table(&transaction)?;
    create_payment_method_table(&transaction)?;
    create_transaction_table(&transaction)?;

    if is_new_category_table {
        tracing::info!("adding the default categories");
        insert_default_categories(&transaction)?;
    }

    if is_new_payment_method_table {
        tracing::info!("adding the default payment methods");
        insert_default_payment_methods(&transaction)?;
    }

    transaction.commit()?;

    Ok(())
}

fn table_exists(name: &str, connection: &Connection) -> Result<bool, rusqlite::Error> {
    connection.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1)",
        (name,),
        |row| row.get(0),
    )
}
