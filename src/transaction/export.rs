//! Exporting transactions as CSV.

use axum::{
    extract::{Query, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use csv::WriterBuilder;
use serde::Serialize;

use crate::{
    Error,
    filters::TransactionFilter,
    transaction::{
        Transaction,
        list_endpoint::{TransactionsState, load_filtered_transactions},
    },
};

const CSV_HEADER: [&str; 8] = [
    "id",
    "date",
    "type",
    "amount",
    "currency",
    "category",
    "description",
    "payment_method",
];

#[derive(Serialize)]
struct CsvRow<'a> {
    id: i64,
    date: String,
    kind: &'a str,
    amount: f64,
    currency: &'a str,
    category: &'a str,
    description: Option<&'a str>,
    payment_method: Option<&'a str>,
}

impl<'a> From<&'a Transaction> for CsvRow<'a> {
    fn from(transaction: &'a Transaction) -> Self {
        Self {
            id: transaction.id,
            date: transaction.date.to_string(),
            kind: transaction.kind.as_str(),
            amount: transaction.amount.value(),
            currency: transaction.currency.code(),
            category: &transaction.category,
            description: transaction.description.as_deref(),
            payment_method: transaction.payment_method.as_deref(),
        }
    }
}

/// Write `transactions` as CSV, header first, keeping the order of `transactions`.
///
/// Missing descriptions and payment methods are written as empty fields.
pub(super) fn write_transactions_csv(transactions: &[Transaction]) -> Result<Vec<u8>, Error> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer
        .write_record(CSV_HEADER)
        .map_err(|error| Error::CsvError(error.to_string()))?;

    for transaction in transactions {
        writer
            .serialize(CsvRow::from(transaction))
            .map_err(|error| Error::CsvError(error.to_string()))?;
    }

    writer
        .into_inner()
        .map_err(|error| Error::CsvError(error.to_string()))
}

/// A route handler that downloads the transactions matching the query string filter as CSV.
pub async fn export_transactions_endpoint(
    State(state): State<TransactionsState>,
    Query(filter): Query<TransactionFilter>,
) -> Result<Response, Error> {
    let (transactions, _) = load_filtered_transactions(&state, &filter)?;
    let body = write_transactions_csv(&transactions)
        .inspect_err(|error| tracing::error!("could not export transactions: {error}"))?;

    tracing::debug!("exported {} transactions", transactions.len());

    Ok((
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                CONTENT_DISPOSITION,
                "attachment; filename=\"transactions.csv\"",
            ),
        ],
        body,
    )
        .into_response())
}
