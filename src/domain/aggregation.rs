use serde::{Deserialize, Serialize};

use super::{Category, Cents, Transaction, TransactionType, total_by_type};

/// Per-category totals derived from a set of transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: Category,
    pub total_income: Cents,
    pub total_expense: Cents,
    /// total_income - total_expense
    pub net_amount: Cents,
    /// Share of the grand total expense across all categories, 0..=100.
    /// Not rounded.
    pub percentage: f64,
    /// Income and expense transactions combined
    pub transaction_count: usize,
}

impl CategorySummary {
    fn empty(category: Category) -> Self {
        Self {
            category,
            total_income: 0,
            total_expense: 0,
            net_amount: 0,
            percentage: 0.0,
            transaction_count: 0,
        }
    }
}

/// Percentage of `total_expense` that `category_expense` represents.
/// Defined as 0 when the total is 0.
pub fn category_percentage(category_expense: Cents, total_expense: Cents) -> f64 {
    if total_expense == 0 {
        return 0.0;
    }
    (category_expense as f64 / total_expense as f64) * 100.0
}

/// Reduce transactions into one summary per category, in registry order.
/// Always returns exactly `Category::ALL.len()` summaries.
pub fn aggregate_by_category(transactions: &[Transaction]) -> Vec<CategorySummary> {
    let grand_total_expense = total_by_type(transactions, TransactionType::Expense);

    Category::ALL
        .iter()
        .map(|&category| {
            let mut summary = CategorySummary::empty(category);
            for t in transactions.iter().filter(|t| t.category == category) {
                match t.transaction_type {
                    TransactionType::Income => summary.total_income += t.amount_cents,
                    TransactionType::Expense => summary.total_expense += t.amount_cents,
                }
                summary.transaction_count += 1;
            }
            summary.net_amount = summary.total_income - summary.total_expense;
            summary.percentage = category_percentage(summary.total_expense, grand_total_expense);
            summary
        })
        .collect()
}
