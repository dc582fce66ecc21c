//! Defines the endpoint for listing transactions.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    filters::{TransactionFilter, filter_transactions},
    transaction::{Transaction, load_snapshot},
};

/// The state needed to list or export transactions.
#[derive(Debug, Clone)]
pub struct TransactionsState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The transactions that matched a filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionList {
    /// Matching transactions, newest first.
    pub transactions: Vec<Transaction>,
    /// The number of transactions stored before filtering.
    pub total_count: usize,
}

/// Read every transaction and keep those matching `filter`.
///
/// Returns the matching transactions and the number of transactions read.
pub(super) fn load_filtered_transactions(
    state: &TransactionsState,
    filter: &TransactionFilter,
) -> Result<(Vec<Transaction>, usize), Error> {
    let transactions = load_snapshot(&state.db_connection)?;

    let matching = filter_transactions(&transactions, filter)
        .into_iter()
        .cloned()
        .collect();

    Ok((matching, transactions.len()))
}

/// A route handler for listing the transactions that match the query string filter.
pub async fn get_transactions_endpoint(
    State(state): State<TransactionsState>,
    Query(filter): Query<TransactionFilter>,
) -> Result<Json<TransactionList>, Error> {
    let (transactions, total_count) = load_filtered_transactions(&state, &filter)?;

    Ok(Json(TransactionList {
        transactions,
        total_count,
    }))
}

#[cfg(test)]
mod get_transactions_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Router, routing::get};
    use axum_test::TestServer;
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        db::initialize,
        endpoints,
        transaction::{Amount, NewTransaction, TransactionType, create_transaction},
    };

    use super::{TransactionList, TransactionsState, get_transactions_endpoint};

    fn get_test_server() -> TestServer {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        let day = date!(2024 - 05 - 30);
        for new_transaction in [
            NewTransaction::build(
                TransactionType::Expense,
                Amount::new(89.5).unwrap(),
                day,
                "Transportation",
            )
            .description("Gas station fill-up")
            .payment_method("Debit Card"),
            NewTransaction::build(
                TransactionType::Expense,
                Amount::new(12.0).unwrap(),
                date!(2024 - 05 - 31),
                "Food & Dining",
            )
            .payment_method("Cash"),
            NewTransaction::build(
                TransactionType::Income,
                Amount::new(500.0).unwrap(),
                day,
                "Freelance",
            ),
        ] {
            create_transaction(new_transaction, &connection).unwrap();
        }

        let state = TransactionsState {
            db_connection: Arc::new(Mutex::new(connection)),
        };
        let app = Router::new()
            .route(endpoints::TRANSACTIONS, get(get_transactions_endpoint))
            .with_state(state);

        TestServer::try_new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn lists_all_transactions_newest_first() {
        let server = get_test_server();

        let response = server.get(endpoints::TRANSACTIONS).await;

        response.assert_status_ok();
        let list = response.json::<TransactionList>();
        assert_eq!(list.total_count, 3);
        let dates: Vec<_> = list.transactions.iter().map(|t| t.date).collect();
        assert_eq!(
            dates,
            vec![
                date!(2024 - 05 - 31),
                date!(2024 - 05 - 30),
                date!(2024 - 05 - 30)
            ]
        );
        // Same day, so the later insert comes first.
        assert_eq!(list.transactions[1].category, "Freelance");
    }

    #[tokio::test]
    async fn applies_query_filter() {
        let server = get_test_server();

        let response = server
            .get(endpoints::TRANSACTIONS)
            .add_query_param("search", "GAS")
            .add_query_param("type", "expense")
            .await;

        response.assert_status_ok();
        let list = response.json::<TransactionList>();
        assert_eq!(list.total_count, 3);
        assert_eq!(list.transactions.len(), 1);
        assert_eq!(list.transactions[0].category, "Transportation");
    }

    #[tokio::test]
    async fn filters_by_date_range() {
        let server = get_test_server();

        let response = server
            .get(endpoints::TRANSACTIONS)
            .add_query_param("from", "2024-05-31")
            .add_query_param("to", "2024-06-30")
            .await;

        response.assert_status_ok();
        let list = response.json::<TransactionList>();
        assert_eq!(list.total_count, 3);
        assert_eq!(list.transactions.len(), 1);
        assert_eq!(list.transactions[0].category, "Food & Dining");
    }

    #[tokio::test]
    async fn invalid_date_is_rejected() {
        let server = get_test_server();

        let response = server
            .get(endpoints::TRANSACTIONS)
            .add_query_param("from", "31/05/2024")
            .await;

        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn filters_by_income_source() {
        let server = get_test_server();

        let response = server
            .get(endpoints::TRANSACTIONS)
            .add_query_param("payment_method", "Freelance")
            .await;

        let list = response.json::<TransactionList>();
        assert_eq!(list.transactions.len(), 1);
        assert_eq!(list.transactions[0].kind, TransactionType::Income);
    }
}
