//! The registry of expense categories and income sources.

mod db;
mod domain;
mod endpoints;

pub use db::{
    category_exists, create_category, create_category_table, delete_category, get_categories,
    insert_default_categories,
};
pub use domain::{
    Category, CategoryName, DEFAULT_EXPENSE_CATEGORIES, DEFAULT_INCOME_SOURCES, NewCategory,
};
pub use endpoints::{create_category_endpoint, delete_category_endpoint, get_categories_endpoint};
