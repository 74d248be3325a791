use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Category, Transaction, TransactionType};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeFilter {
    #[default]
    All,
    Income,
    Expense,
}

impl TypeFilter {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "all" => Some(TypeFilter::All),
            other => TransactionType::from_str(other).map(Self::from),
        }
    }
}

impl From<TransactionType> for TypeFilter {
    fn from(value: TransactionType) -> Self {
        match value {
            TransactionType::Income => TypeFilter::Income,
            TransactionType::Expense => TypeFilter::Expense,
        }
    }
}

/// Inclusive date bounds. Either side may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|start| date >= start) && self.end.is_none_or(|end| date <= end)
    }

    pub fn is_bounded(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }
}

/// User-controlled narrowing of the transaction list.
///
/// All predicates are combined with AND. An empty category set means no
/// category restriction. The default value matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub transaction_type: TypeFilter,
    pub categories: BTreeSet<Category>,
    pub date_range: DateRange,
    pub search_query: String,
}

impl FilterSpec {
    pub fn with_type(mut self, transaction_type: TypeFilter) -> Self {
        self.transaction_type = transaction_type;
        self
    }

    pub fn with_categories(mut self, categories: impl IntoIterator<Item = Category>) -> Self {
        self.categories = categories.into_iter().collect();
        self
    }

    pub fn with_date_range(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.date_range = DateRange::new(start, end);
        self
    }

    pub fn with_search(mut self, query: impl Into<String>) -> Self {
        self.search_query = query.into();
        self
    }

    pub fn matches_type(&self, transaction: &Transaction) -> bool {
        match self.transaction_type {
            TypeFilter::All => true,
            TypeFilter::Income => transaction.transaction_type == TransactionType::Income,
            TypeFilter::Expense => transaction.transaction_type == TransactionType::Expense,
        }
    }

    pub fn matches_category(&self, transaction: &Transaction) -> bool {
        self.categories.is_empty() || self.categories.contains(&transaction.category)
    }

    pub fn matches_date(&self, transaction: &Transaction) -> bool {
        self.date_range.contains(transaction.date)
    }

    pub fn matches_search(&self, transaction: &Transaction) -> bool {
        self.search_query.is_empty()
            || transaction
                .description
                .to_lowercase()
                .contains(&self.search_query.to_lowercase())
    }

    pub fn matches(&self, transaction: &Transaction) -> bool {
        self.matches_type(transaction)
            && self.matches_category(transaction)
            && self.matches_date(transaction)
            && self.matches_search(transaction)
    }

    /// True when any field differs from its default.
    pub fn has_active_filters(&self) -> bool {
        self.transaction_type != TypeFilter::All
            || !self.categories.is_empty()
            || self.date_range.is_bounded()
            || !self.search_query.is_empty()
    }

    /// Reset every field to its default.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Keep the transactions that pass every active predicate, in source order.
pub fn apply_filters(transactions: &[Transaction], spec: &FilterSpec) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|t| spec.matches(t))
        .cloned()
        .collect()
}
