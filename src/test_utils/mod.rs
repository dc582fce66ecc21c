#![allow(missing_docs)]

pub(crate) mod http;

use rusqlite::Connection;
use time::{Date, macros::date};

use crate::{
    AppState,
    currency::Currency,
    transaction::{Amount, Transaction, TransactionType},
};

pub(crate) use http::assert_content_type;

/// Create a transaction without touching the database.
///
/// Income uses its category as the payment method, as the store does.
#[track_caller]
pub(crate) fn create_test_transaction(
    id: i64,
    kind: TransactionType,
    amount: f64,
    date: Date,
    category: &str,
) -> Transaction {
    Transaction {
        id,
        date,
        kind,
        amount: Amount::new(amount).expect("test amounts must be valid"),
        currency: Currency::Inr,
        category: category.to_owned(),
        description: None,
        payment_method: match kind {
            TransactionType::Income => Some(category.to_owned()),
            TransactionType::Expense => None,
        },
    }
}

impl Transaction {
    pub(crate) fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_owned());
        self
    }

    pub(crate) fn with_payment_method(mut self, payment_method: &str) -> Self {
        self.payment_method = Some(payment_method.to_owned());
        self
    }
}

/// A small snapshot spanning late May and early June 2024, newest first.
pub(crate) fn sample_transactions() -> Vec<Transaction> {
    use TransactionType::{Expense, Income};

    vec![
        create_test_transaction(1, Expense, 45.99, date!(2024 - 06 - 01), "Food & Dining")
            .with_description("Lunch at Italian restaurant")
            .with_payment_method("Credit Card"),
        create_test_transaction(2, Income, 3000.0, date!(2024 - 06 - 01), "Salary")
            .with_description("Monthly salary"),
        create_test_transaction(3, Expense, 89.5, date!(2024 - 05 - 30), "Transportation")
            .with_description("Gas station fill-up")
            .with_payment_method("Debit Card"),
        create_test_transaction(4, Expense, 250.0, date!(2024 - 05 - 29), "Shopping")
            .with_description("Grocery shopping")
            .with_payment_method("Credit Card"),
        create_test_transaction(5, Income, 500.0, date!(2024 - 05 - 28), "Freelance")
            .with_description("Web design project"),
        create_test_transaction(6, Expense, 25.99, date!(2024 - 05 - 27), "Entertainment")
            .with_description("Movie tickets")
            .with_payment_method("Cash"),
    ]
}

/// An [AppState] backed by a fresh in-memory database.
pub(crate) fn get_test_app_state() -> AppState {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory SQLite database");

    AppState::new(connection, "a very secret secret", "Etc/UTC")
        .expect("Could not create app state")
}
