use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{
    BalanceStatus, BudgetSummary, CategorySort, CategorySummary, Cents, ComparisonBar,
    DistributionSlice, TransactionType,
};

/// Headline balance as shown on the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct BalanceReport {
    pub as_of: DateTime<Utc>,
    pub transaction_count: usize,
    #[serde(flatten)]
    pub summary: BudgetSummary,
    pub status: BalanceStatus,
}

/// Category breakdown in the requested order.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryReport {
    pub sort: CategorySort,
    pub categories: Vec<CategorySummary>,
    pub total_income: Cents,
    pub total_expense: Cents,
}

#[derive(Debug, Clone, Serialize)]
pub struct DistributionReport {
    pub transaction_type: TransactionType,
    pub total: Cents,
    pub slices: Vec<DistributionSlice>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    pub transaction_type: TransactionType,
    pub sorted_by_amount: bool,
    pub bars: Vec<ComparisonBar>,
}
