//! Narrowing a snapshot of transactions down to those matching a set of predicates.
//!
//! All predicates are combined with AND. A predicate set to "all" (or an empty
//! search string, or an unset date bound) always holds, so the default
//! [TransactionFilter] keeps every transaction.

use serde::{Deserialize, Serialize};
use time::Date;

use crate::transaction::{Transaction, TransactionType};

/// Restricts transactions to one type, or none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeFilter {
    /// Keep both income and expenses.
    #[default]
    All,
    /// Keep only income.
    Income,
    /// Keep only expenses.
    Expense,
}

impl TypeFilter {
    fn matches(&self, kind: TransactionType) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Income => kind == TransactionType::Income,
            TypeFilter::Expense => kind == TransactionType::Expense,
        }
    }
}

/// Restricts a label, such as the category, to one exact value.
///
/// In query strings the value "all" selects [LabelFilter::All] and any other
/// value is an exact match, so a label literally named "all" cannot be
/// selected on its own.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LabelFilter {
    /// Keep every label.
    #[default]
    All,
    /// Keep only this exact, case-sensitive label.
    Exact(String),
}

impl LabelFilter {
    const ALL: &'static str = "all";

    fn matches(&self, label: Option<&str>) -> bool {
        match self {
            LabelFilter::All => true,
            LabelFilter::Exact(wanted) => label == Some(wanted.as_str()),
        }
    }
}

impl From<String> for LabelFilter {
    fn from(value: String) -> Self {
        if value == LabelFilter::ALL {
            LabelFilter::All
        } else {
            LabelFilter::Exact(value)
        }
    }
}

impl From<LabelFilter> for String {
    fn from(filter: LabelFilter) -> Self {
        match filter {
            LabelFilter::All => LabelFilter::ALL.to_owned(),
            LabelFilter::Exact(label) => label,
        }
    }
}

/// The predicates to apply to a snapshot of transactions.
///
/// Every field is optional when deserializing, e.g. from the query string
/// `?search=gas&type=expense&from=2024-06-01`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionFilter {
    /// Case-insensitive text to look for in the description and category.
    pub search: String,
    /// The transaction type to keep.
    #[serde(rename = "type")]
    pub kind: TypeFilter,
    /// The category to keep.
    pub category: LabelFilter,
    /// The payment method (or income source) to keep.
    pub payment_method: LabelFilter,
    /// The earliest date to keep, inclusive.
    pub from: Option<Date>,
    /// The latest date to keep, inclusive.
    pub to: Option<Date>,
}

/// Get the transactions in `transactions` that satisfy every predicate in `filter`.
///
/// The result keeps the relative order of `transactions`.
pub fn filter_transactions<'a>(
    transactions: &'a [Transaction],
    filter: &TransactionFilter,
) -> Vec<&'a Transaction> {
    let search = filter.search.to_lowercase();

    transactions
        .iter()
        .filter(|transaction| {
            matches_search(transaction, &search)
                && filter.kind.matches(transaction.kind)
                && filter.category.matches(Some(&transaction.category))
                && filter
                    .payment_method
                    .matches(transaction.payment_method.as_deref())
                && matches_date_range(transaction.date, filter.from, filter.to)
        })
        .collect()
}

/// A range with `from` after `to` holds for no date.
fn matches_date_range(date: Date, from: Option<Date>, to: Option<Date>) -> bool {
    from.is_none_or(|from| date >= from) && to.is_none_or(|to| date <= to)
}

/// `search` must already be lowercase.
fn matches_search(transaction: &Transaction, search: &str) -> bool {
    if search.is_empty() {
        return true;
    }

    let in_description = transaction
        .description
        .as_ref()
        .is_some_and(|description| description.to_lowercase().contains(search));

    in_description || transaction.category.to_lowercase().contains(search)
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        test_utils::{create_test_transaction, sample_transactions},
        transaction::{Transaction, TransactionType},
    };

    use super::{LabelFilter, TransactionFilter, TypeFilter, filter_transactions};

    fn ids(transactions: &[&Transaction]) -> Vec<i64> {
        transactions
            .iter()
            .map(|transaction| transaction.id)
            .collect()
    }

    #[test]
    fn search_matches_description() {
        let transactions = sample_transactions();
        let filter = TransactionFilter {
            search: "gas".to_owned(),
            ..Default::default()
        };

        let got = filter_transactions(&transactions, &filter);

        assert_eq!(got.len(), 1);
        assert_eq!(got[0].description.as_deref(), Some("Gas station fill-up"));
    }

    #[test]
    fn search_matches_category_case_insensitively() {
        let transactions = sample_transactions();
        let filter = TransactionFilter {
            search: "FREELANCE".to_owned(),
            ..Default::default()
        };

        let got = filter_transactions(&transactions, &filter);

        assert_eq!(got.len(), 1);
        assert_eq!(got[0].category, "Freelance");
    }

    #[test]
    fn type_filter_keeps_order() {
        let transactions = sample_transactions();
        let filter = TransactionFilter {
            kind: TypeFilter::Income,
            ..Default::default()
        };

        let got = filter_transactions(&transactions, &filter);

        let want: Vec<i64> = transactions
            .iter()
            .filter(|transaction| transaction.kind == TransactionType::Income)
            .map(|transaction| transaction.id)
            .collect();
        assert_eq!(ids(&got), want);
        assert!(!want.is_empty());
    }

    #[test]
    fn default_filter_returns_everything_in_order() {
        let transactions = sample_transactions();

        let got = filter_transactions(&transactions, &TransactionFilter::default());

        let want: Vec<i64> = transactions.iter().map(|transaction| transaction.id).collect();
        assert_eq!(ids(&got), want);
    }

    #[test]
    fn unknown_category_matches_nothing() {
        let transactions = sample_transactions();
        let filter = TransactionFilter {
            category: LabelFilter::Exact("Not a category".to_owned()),
            ..Default::default()
        };

        assert!(filter_transactions(&transactions, &filter).is_empty());
    }

    #[test]
    fn payment_method_filter_is_exact() {
        let day = date!(2024 - 06 - 01);
        let transactions = vec![
            create_test_transaction(1, TransactionType::Expense, 10.0, day, "Shopping")
                .with_payment_method("Cash"),
            create_test_transaction(2, TransactionType::Expense, 10.0, day, "Shopping")
                .with_payment_method("Cashback Card"),
            create_test_transaction(3, TransactionType::Expense, 10.0, day, "Shopping"),
        ];
        let filter = TransactionFilter {
            payment_method: LabelFilter::Exact("Cash".to_owned()),
            ..Default::default()
        };

        let got = filter_transactions(&transactions, &filter);

        assert_eq!(ids(&got), vec![1]);
    }

    #[test]
    fn predicates_are_combined() {
        let transactions = sample_transactions();
        let filter = TransactionFilter {
            search: "o".to_owned(),
            kind: TypeFilter::Expense,
            category: LabelFilter::Exact("Shopping".to_owned()),
            payment_method: LabelFilter::All,
            from: Some(date!(2024 - 05 - 01)),
            to: None,
        };

        let got = filter_transactions(&transactions, &filter);

        assert!(!got.is_empty());
        assert!(got.iter().all(|transaction| {
            transaction.kind == TransactionType::Expense && transaction.category == "Shopping"
        }));
    }

    #[test]
    fn filtering_is_idempotent() {
        let transactions = sample_transactions();
        let filter = TransactionFilter {
            search: "a".to_owned(),
            kind: TypeFilter::Expense,
            ..Default::default()
        };

        let once: Vec<Transaction> = filter_transactions(&transactions, &filter)
            .into_iter()
            .cloned()
            .collect();
        let twice = filter_transactions(&once, &filter);

        assert_eq!(ids(&twice), once.iter().map(|t| t.id).collect::<Vec<_>>());
    }

    #[test]
    fn deserializes_from_query_string() {
        let filter: TransactionFilter =
            serde_urlencoded::from_str("search=gas&type=expense&category=all&payment_method=Cash")
                .unwrap();

        assert_eq!(
            filter,
            TransactionFilter {
                search: "gas".to_owned(),
                kind: TypeFilter::Expense,
                category: LabelFilter::All,
                payment_method: LabelFilter::Exact("Cash".to_owned()),
                from: None,
                to: None,
            }
        );
    }

    #[test]
    fn date_range_bounds_are_inclusive() {
        let transactions = sample_transactions();
        let filter = TransactionFilter {
            from: Some(date!(2024 - 06 - 01)),
            to: Some(date!(2024 - 06 - 01)),
            ..Default::default()
        };

        let got = filter_transactions(&transactions, &filter);

        let want: Vec<i64> = transactions
            .iter()
            .filter(|transaction| transaction.date == date!(2024 - 06 - 01))
            .map(|transaction| transaction.id)
            .collect();
        assert!(!want.is_empty());
        assert_eq!(ids(&got), want);
    }

    #[test]
    fn date_range_can_be_open_ended() {
        let day = date!(2024 - 06 - 15);
        let transactions = vec![
            create_test_transaction(1, TransactionType::Expense, 1.0, date!(2024 - 06 - 16), "Food"),
            create_test_transaction(2, TransactionType::Expense, 1.0, day, "Food"),
            create_test_transaction(3, TransactionType::Expense, 1.0, date!(2024 - 06 - 14), "Food"),
        ];

        let only_from = TransactionFilter {
            from: Some(day),
            ..Default::default()
        };
        let only_to = TransactionFilter {
            to: Some(day),
            ..Default::default()
        };

        assert_eq!(ids(&filter_transactions(&transactions, &only_from)), vec![1, 2]);
        assert_eq!(ids(&filter_transactions(&transactions, &only_to)), vec![2, 3]);
    }

    #[test]
    fn reversed_date_range_matches_nothing() {
        let transactions = sample_transactions();
        let filter = TransactionFilter {
            from: Some(date!(2024 - 06 - 01)),
            to: Some(date!(2024 - 05 - 01)),
            ..Default::default()
        };

        assert!(filter_transactions(&transactions, &filter).is_empty());
    }

    #[test]
    fn date_range_deserializes_from_query_string() {
        let transactions = sample_transactions();
        let filter: TransactionFilter =
            serde_urlencoded::from_str("from=2024-06-01&to=2024-06-30").unwrap();

        let got = filter_transactions(&transactions, &filter);

        assert_eq!(filter.from, Some(date!(2024 - 06 - 01)));
        assert_eq!(filter.to, Some(date!(2024 - 06 - 30)));
        assert_eq!(ids(&got), vec![1, 2]);
    }

    #[test]
    fn empty_query_string_is_default() {
        let filter: TransactionFilter = serde_urlencoded::from_str("").unwrap();

        assert_eq!(filter, TransactionFilter::default());
    }
}
