//! Endpoints for listing, registering and removing categories.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
    http::StatusCode,
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    category::{Category, CategoryName, NewCategory, create_category, delete_category, get_categories},
    database_id::CategoryId,
    transaction::TransactionType,
};

/// The state needed for the category endpoints.
#[derive(Debug, Clone)]
pub struct CategoryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The registered categories grouped by transaction type.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoryList {
    pub expense: Vec<Category>,
    pub income: Vec<Category>,
}

/// List the expense categories and income sources.
pub async fn get_categories_endpoint(
    State(state): State<CategoryState>,
) -> Result<Json<CategoryList>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    Ok(Json(CategoryList {
        expense: get_categories(TransactionType::Expense, &connection)?,
        income: get_categories(TransactionType::Income, &connection)?,
    }))
}

/// Register a new category.
pub async fn create_category_endpoint(
    State(state): State<CategoryState>,
    Json(new_category): Json<NewCategory>,
) -> Result<(StatusCode, Json<Category>), Error> {
    let name = CategoryName::new(&new_category.name)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let category = create_category(name, new_category.kind, &connection)
        .inspect_err(|error| tracing::warn!("could not create category: {error}"))?;

    Ok((StatusCode::CREATED, Json(category)))
}

/// Remove a category from the registry.
pub async fn delete_category_endpoint(
    Path(category_id): Path<CategoryId>,
    State(state): State<CategoryState>,
) -> Result<StatusCode, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    delete_category(category_id, &connection)?;

    Ok(StatusCode::NO_CONTENT)
}
