//! The API endpoints URIs.
//!
//! Endpoints that take a parameter, e.g., '/api/categories/{category_id}', use axum's path syntax.

/// The route for logging in with the access key.
pub const LOG_IN: &str = "/api/log_in";
/// The route for the client to log out.
pub const LOG_OUT: &str = "/api/log_out";
/// The route for the aggregated dashboard figures.
pub const DASHBOARD: &str = "/api/dashboard";
/// The route to list and record transactions.
pub const TRANSACTIONS: &str = "/api/transactions";
/// The route to access a single transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route to download transactions as a CSV file.
pub const EXPORT_TRANSACTIONS: &str = "/api/transactions/export";
/// The route to list and register categories.
pub const CATEGORIES: &str = "/api/categories";
/// The route to access a single category.
pub const CATEGORY: &str = "/api/categories/{category_id}";
/// The route to list and register payment methods.
pub const PAYMENT_METHODS: &str = "/api/payment_methods";
/// The route to access a single payment method.
pub const PAYMENT_METHOD: &str = "/api/payment_methods/{payment_method_id}";
/// The route to read and change the settings.
pub const SETTINGS: &str = "/api/settings";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is the text between a left brace and the next right brace,
/// e.g. '{category_id}' in '/api/categories/{category_id}'.
/// Only the first parameter is replaced.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
#[cfg(test)]
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|offset| param_start + offset + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{id}{}",
        &endpoint_path[..param_start],
        &endpoint_path[param_end..]
    )
}
