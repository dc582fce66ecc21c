//! Dashboard module
//!
//! Aggregates a snapshot of transactions into period totals, the largest
//! expense categories, a monthly trend, a daily expense pattern and totals per
//! payment method.

mod aggregation;
mod handlers;

pub use aggregation::{
    CategoryTotal, DailyExpenses, DashboardSummary, MonthlyTotals, PATTERN_DAY_COUNT,
    PaymentMethodTotal, PeriodTotals, TOP_CATEGORY_COUNT, TREND_MONTH_COUNT,
    current_period_totals, daily_expense_pattern, monthly_trend, payment_method_totals,
    summarize, top_expense_categories,
};
pub(crate) use handlers::get_dashboard;
