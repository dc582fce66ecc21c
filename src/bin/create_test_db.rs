use std::{error::Error, path::Path, process::exit};

use clap::Parser;
use rusqlite::Connection;
use time::macros::date;

use expense_tracker::{
    AccessKeyHash, Amount, Currency, NewTransaction, TransactionType, ValidatedAccessKey,
    create_transaction, initialize_db, set_access_key,
};

/// A utility for creating a test database for the expense tracker.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        Some(extension) if !extension.is_empty() => {}
        _ => {
            eprintln!("Output path must include a file extension (e.g., 'expenses.db').");
            exit(1);
        }
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let connection = Connection::open(output_path)?;

    initialize_db(&connection)?;

    println!("Setting the access key to \"test\"...");
    let access_key_hash = AccessKeyHash::new(
        ValidatedAccessKey::new_unchecked("test"),
        AccessKeyHash::DEFAULT_COST,
    )?;
    set_access_key(&access_key_hash, &connection)?;

    println!("Adding sample transactions...");
    for new_transaction in sample_transactions()? {
        create_transaction(new_transaction, &connection)?;
    }

    println!("Success!");

    Ok(())
}

fn sample_transactions() -> Result<Vec<NewTransaction>, Box<dyn Error>> {
    use TransactionType::{Expense, Income};

    Ok(vec![
        NewTransaction::build(Income, Amount::new(3000.0)?, date!(2024 - 05 - 31), "Salary")
            .description("Monthly salary"),
        NewTransaction::build(Income, Amount::new(500.0)?, date!(2024 - 05 - 29), "Freelance")
            .description("Website project"),
        NewTransaction::build(
            Expense,
            Amount::new(25.99)?,
            date!(2024 - 05 - 27),
            "Entertainment",
        )
        .description("Movie tickets")
        .payment_method("Cash"),
        NewTransaction::build(Expense, Amount::new(120.0)?, date!(2024 - 05 - 28), "Shopping")
            .description("New shoes")
            .payment_method("Credit Card"),
        NewTransaction::build(
            Expense,
            Amount::new(89.5)?,
            date!(2024 - 05 - 30),
            "Transportation",
        )
        .description("Gas station fill-up")
        .payment_method("Debit Card"),
        NewTransaction::build(
            Expense,
            Amount::new(45.99)?,
            date!(2024 - 06 - 01),
            "Food & Dining",
        )
        .currency(Currency::Usd)
        .description("Lunch at Italian restaurant")
        .payment_method("Credit Card"),
    ])
}
