//! Aliases for the integer IDs assigned by the database.

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseId = i64;

/// The ID of a transaction, assigned by the store and never reused.
pub type TransactionId = DatabaseId;

/// The ID of a category in the registry.
pub type CategoryId = DatabaseId;

/// The ID of a payment method in the registry.
pub type PaymentMethodId = DatabaseId;
