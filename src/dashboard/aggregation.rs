//! Aggregation of a transaction snapshot into the figures shown on the dashboard.
//!
//! Every function here is a pure function of the snapshot and, where relevant,
//! a reference date. Periods such as "the last six months" are anchored to the
//! reference date and generated up front, so periods without transactions still
//! appear with zero totals.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use time::{Date, Duration, Month, Weekday};

use crate::transaction::{Transaction, TransactionType};

/// How many categories [top_expense_categories] returns at most.
pub const TOP_CATEGORY_COUNT: usize = 5;
/// How many months [monthly_trend] covers, including the reference month.
pub const TREND_MONTH_COUNT: usize = 6;
/// How many days [daily_expense_pattern] covers, including the reference date.
pub const PATTERN_DAY_COUNT: usize = 7;

/// Income and expense totals for the month containing the reference date.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PeriodTotals {
    /// The sum of income amounts.
    pub total_income: f64,
    /// The sum of expense amounts.
    pub total_expenses: f64,
    /// `total_income - total_expenses`.
    pub balance: f64,
    /// How many transactions fall in the period.
    pub transaction_count: usize,
}

/// The total spent on one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    /// The expense category.
    pub category: String,
    /// The summed amount of the category's expenses.
    pub amount: f64,
    /// Share of the period's total expenses, from 0 to 100.
    pub percentage: f64,
}

/// Income and expenses for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTotals {
    /// The calendar year.
    pub year: i32,
    /// The month number, 1 for January through 12 for December.
    pub month: u8,
    /// Three-letter month name, e.g. "Jan".
    pub label: String,
    /// The sum of income amounts.
    pub income: f64,
    /// The sum of expense amounts.
    pub expenses: f64,
    /// `income - expenses`.
    pub net: f64,
}

/// Expenses on a single day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyExpenses {
    /// The calendar date.
    pub date: Date,
    /// Three-letter weekday name, e.g. "Mon".
    pub label: String,
    /// The sum of expense amounts on `date`.
    pub expenses: f64,
}

/// The total amount recorded against one payment method or income source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMethodTotal {
    /// The payment method or income source.
    pub payment_method: String,
    /// The summed amount, income and expenses alike.
    pub amount: f64,
}

/// Everything the dashboard shows, computed for one reference date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    /// The date the periods are anchored to.
    pub reference_date: Date,
    /// Totals for the month containing `reference_date`.
    pub current_period: PeriodTotals,
    /// The largest expense categories of the current period, largest first.
    pub top_expense_categories: Vec<CategoryTotal>,
    /// The months ending at the reference month, oldest first.
    pub monthly_trend: Vec<MonthlyTotals>,
    /// The days ending at the reference date, oldest first.
    pub daily_expenses: Vec<DailyExpenses>,
    /// Totals per payment method in the order they first appear in the snapshot.
    pub payment_methods: Vec<PaymentMethodTotal>,
}

/// Compute every dashboard figure for `reference_date`.
pub fn summarize(transactions: &[Transaction], reference_date: Date) -> DashboardSummary {
    DashboardSummary {
        reference_date,
        current_period: current_period_totals(transactions, reference_date),
        top_expense_categories: top_expense_categories(transactions, reference_date),
        monthly_trend: monthly_trend(transactions, reference_date),
        daily_expenses: daily_expense_pattern(transactions, reference_date),
        payment_methods: payment_method_totals(transactions),
    }
}

fn is_same_month(date: Date, other: Date) -> bool {
    date.year() == other.year() && date.month() == other.month()
}

/// Sum the income and expenses in the calendar month of `reference_date`.
pub fn current_period_totals(transactions: &[Transaction], reference_date: Date) -> PeriodTotals {
    let mut totals = PeriodTotals::default();

    for transaction in transactions
        .iter()
        .filter(|transaction| is_same_month(transaction.date, reference_date))
    {
        match transaction.kind {
            TransactionType::Income => totals.total_income += transaction.amount.value(),
            TransactionType::Expense => totals.total_expenses += transaction.amount.value(),
        }

        totals.transaction_count += 1;
    }

    totals.balance = totals.total_income - totals.total_expenses;

    totals
}

/// Sums `amount` per key, keeping keys in the order they are first seen.
fn sum_by_key<'a>(entries: impl IntoIterator<Item = (&'a str, f64)>) -> Vec<(&'a str, f64)> {
    let mut totals: Vec<(&str, f64)> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for (key, amount) in entries {
        let index = *positions.entry(key).or_insert_with(|| {
            totals.push((key, 0.0));
            totals.len() - 1
        });

        totals[index].1 += amount;
    }

    totals
}

/// Get the largest expense categories in the month of `reference_date`.
///
/// Categories are sorted by their summed amount, largest first. Categories
/// with equal sums keep the order they first appear in `transactions`.
/// At most [TOP_CATEGORY_COUNT] categories are returned.
pub fn top_expense_categories(
    transactions: &[Transaction],
    reference_date: Date,
) -> Vec<CategoryTotal> {
    let expenses = transactions.iter().filter(|transaction| {
        transaction.kind == TransactionType::Expense
            && is_same_month(transaction.date, reference_date)
    });

    let mut totals = sum_by_key(
        expenses.map(|transaction| (transaction.category.as_str(), transaction.amount.value())),
    );
    let total_expenses: f64 = totals.iter().map(|(_, amount)| amount).sum();

    // `sort_by` is stable, which keeps ties in first-seen order.
    totals.sort_by(|(_, left), (_, right)| right.total_cmp(left));
    totals.truncate(TOP_CATEGORY_COUNT);

    totals
        .into_iter()
        .map(|(category, amount)| CategoryTotal {
            category: category.to_owned(),
            amount,
            percentage: if total_expenses == 0.0 {
                0.0
            } else {
                amount / total_expenses * 100.0
            },
        })
        .collect()
}

/// The `count` calendar months ending at the month of `reference_date`, oldest first.
fn months_ending_at(reference_date: Date, count: usize) -> Vec<(i32, Month)> {
    let mut months = Vec::with_capacity(count);
    let mut year = reference_date.year();
    let mut month = reference_date.month();

    for _ in 0..count {
        months.push((year, month));

        if month == Month::January {
            year -= 1;
        }
        month = month.previous();
    }

    months.reverse();
    months
}

/// Get the income, expenses and net amount for each of the
/// [TREND_MONTH_COUNT] months ending at the month of `reference_date`.
///
/// Always returns [TREND_MONTH_COUNT] entries, oldest first.
pub fn monthly_trend(transactions: &[Transaction], reference_date: Date) -> Vec<MonthlyTotals> {
    let months = months_ending_at(reference_date, TREND_MONTH_COUNT);
    let mut totals: HashMap<(i32, Month), (f64, f64)> =
        months.iter().map(|&month| (month, (0.0, 0.0))).collect();

    for transaction in transactions {
        let key = (transaction.date.year(), transaction.date.month());

        if let Some((income, expenses)) = totals.get_mut(&key) {
            match transaction.kind {
                TransactionType::Income => *income += transaction.amount.value(),
                TransactionType::Expense => *expenses += transaction.amount.value(),
            }
        }
    }

    months
        .into_iter()
        .map(|(year, month)| {
            let (income, expenses) = totals[&(year, month)];

            MonthlyTotals {
                year,
                month: month.into(),
                label: month_label(month).to_owned(),
                income,
                expenses,
                net: income - expenses,
            }
        })
        .collect()
}

/// Get the expenses on each of the [PATTERN_DAY_COUNT] days ending at `reference_date`.
///
/// Always returns [PATTERN_DAY_COUNT] entries, oldest first.
pub fn daily_expense_pattern(
    transactions: &[Transaction],
    reference_date: Date,
) -> Vec<DailyExpenses> {
    let days: Vec<Date> = (0..PATTERN_DAY_COUNT as i64)
        .rev()
        .map(|offset| reference_date.saturating_sub(Duration::days(offset)))
        .collect();
    let mut totals: HashMap<Date, f64> = days.iter().map(|&day| (day, 0.0)).collect();

    for transaction in transactions
        .iter()
        .filter(|transaction| transaction.kind == TransactionType::Expense)
    {
        if let Some(total) = totals.get_mut(&transaction.date) {
            *total += transaction.amount.value();
        }
    }

    days.into_iter()
        .map(|date| DailyExpenses {
            date,
            label: weekday_label(date.weekday()).to_owned(),
            expenses: totals[&date],
        })
        .collect()
}

/// Sum the amounts of all transactions per payment method.
///
/// Transactions without a payment method are skipped. The result lists
/// payment methods in the order they first appear in `transactions`.
pub fn payment_method_totals(transactions: &[Transaction]) -> Vec<PaymentMethodTotal> {
    let entries = transactions.iter().filter_map(|transaction| {
        transaction
            .payment_method
            .as_deref()
            .filter(|payment_method| !payment_method.is_empty())
            .map(|payment_method| (payment_method, transaction.amount.value()))
    });

    sum_by_key(entries)
        .into_iter()
        .map(|(payment_method, amount)| PaymentMethodTotal {
            payment_method: payment_method.to_owned(),
            amount,
        })
        .collect()
}

fn month_label(month: Month) -> &'static str {
    match month {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    }
}

fn weekday_label(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Monday => "Mon",
        Weekday::Tuesday => "Tue",
        Weekday::Wednesday => "Wed",
        Weekday::Thursday => "Thu",
        Weekday::Friday => "Fri",
        Weekday::Saturday => "Sat",
        Weekday::Sunday => "Sun",
    }
}

#[cfg(test)]
mod current_period_tests {
    use time::macros::date;

    use crate::{
        dashboard::aggregation::{PeriodTotals, current_period_totals},
        test_utils::{create_test_transaction, sample_transactions},
        transaction::TransactionType::{Expense, Income},
    };

    #[test]
    fn sums_income_and_expenses_in_month() {
        let transactions = vec![
            create_test_transaction(1, Income, 3000.0, date!(2024 - 06 - 01), "Salary"),
            create_test_transaction(2, Expense, 45.99, date!(2024 - 06 - 01), "Food"),
        ];

        let totals = current_period_totals(&transactions, date!(2024 - 06 - 01));

        assert_eq!(totals.total_income, 3000.0);
        assert_eq!(totals.total_expenses, 45.99);
        assert_eq!(totals.balance, 3000.0 - 45.99);
        assert_eq!(totals.transaction_count, 2);
    }

    #[test]
    fn ignores_other_months_and_years() {
        let transactions = vec![
            create_test_transaction(1, Income, 100.0, date!(2024 - 05 - 31), "Salary"),
            create_test_transaction(2, Expense, 10.0, date!(2023 - 06 - 15), "Food"),
            create_test_transaction(3, Expense, 20.0, date!(2024 - 06 - 30), "Food"),
        ];

        let totals = current_period_totals(&transactions, date!(2024 - 06 - 01));

        assert_eq!(
            totals,
            PeriodTotals {
                total_income: 0.0,
                total_expenses: 20.0,
                balance: -20.0,
                transaction_count: 1,
            }
        );
    }

    #[test]
    fn empty_snapshot_gives_zero_totals() {
        let totals = current_period_totals(&[], date!(2024 - 06 - 01));

        assert_eq!(totals, PeriodTotals::default());
    }

    #[test]
    fn balance_is_income_minus_expenses() {
        let transactions = sample_transactions();

        for reference_date in [date!(2024 - 05 - 15), date!(2024 - 06 - 15)] {
            let totals = current_period_totals(&transactions, reference_date);

            assert_eq!(totals.balance, totals.total_income - totals.total_expenses);
        }
    }
}

#[cfg(test)]
mod top_category_tests {
    use time::macros::date;

    use crate::{
        dashboard::aggregation::{CategoryTotal, TOP_CATEGORY_COUNT, top_expense_categories},
        test_utils::create_test_transaction,
        transaction::TransactionType::{Expense, Income},
    };

    #[test]
    fn groups_and_sorts_categories() {
        let june = date!(2024 - 06 - 10);
        let transactions = vec![
            create_test_transaction(1, Expense, 100.0, june, "Food"),
            create_test_transaction(2, Expense, 50.0, june, "Transport"),
            create_test_transaction(3, Expense, 50.0, june, "Food"),
        ];

        let got = top_expense_categories(&transactions, date!(2024 - 06 - 01));

        assert_eq!(
            got,
            vec![
                CategoryTotal {
                    category: "Food".to_owned(),
                    amount: 150.0,
                    percentage: 75.0,
                },
                CategoryTotal {
                    category: "Transport".to_owned(),
                    amount: 50.0,
                    percentage: 25.0,
                },
            ]
        );
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let june = date!(2024 - 06 - 10);
        let transactions = vec![
            create_test_transaction(1, Expense, 20.0, june, "Travel"),
            create_test_transaction(2, Expense, 20.0, june, "Books"),
            create_test_transaction(3, Expense, 30.0, june, "Rent"),
        ];

        let got: Vec<String> = top_expense_categories(&transactions, june)
            .into_iter()
            .map(|total| total.category)
            .collect();

        assert_eq!(got, vec!["Rent", "Travel", "Books"]);
    }

    #[test]
    fn keeps_only_top_five() {
        let june = date!(2024 - 06 - 10);
        let transactions: Vec<_> = (1..=7)
            .map(|i| create_test_transaction(i, Expense, i as f64, june, &format!("C{i}")))
            .collect();

        let got = top_expense_categories(&transactions, june);

        assert_eq!(got.len(), TOP_CATEGORY_COUNT);
        assert_eq!(got[0].category, "C7");
        assert_eq!(got[4].category, "C3");
        let percentage_sum: f64 = got.iter().map(|total| total.percentage).sum();
        assert!(percentage_sum < 100.0);
    }

    #[test]
    fn percentages_sum_to_one_hundred_when_all_categories_shown() {
        let june = date!(2024 - 06 - 10);
        let transactions = vec![
            create_test_transaction(1, Expense, 33.0, june, "A"),
            create_test_transaction(2, Expense, 12.5, june, "B"),
            create_test_transaction(3, Expense, 7.25, june, "C"),
        ];

        let got = top_expense_categories(&transactions, june);

        let percentage_sum: f64 = got.iter().map(|total| total.percentage).sum();
        assert!((percentage_sum - 100.0).abs() < 1e-9);
    }

    #[test]
    fn zero_total_gives_zero_percentage() {
        let june = date!(2024 - 06 - 10);
        let transactions = vec![create_test_transaction(1, Expense, 0.0, june, "Free")];

        let got = top_expense_categories(&transactions, june);

        assert_eq!(got.len(), 1);
        assert_eq!(got[0].percentage, 0.0);
    }

    #[test]
    fn ignores_income_and_other_months() {
        let transactions = vec![
            create_test_transaction(1, Income, 500.0, date!(2024 - 06 - 10), "Salary"),
            create_test_transaction(2, Expense, 10.0, date!(2024 - 05 - 10), "Food"),
        ];

        let got = top_expense_categories(&transactions, date!(2024 - 06 - 10));

        assert!(got.is_empty());
    }
}
