use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Category, Cents, TransactionInput};

pub type TransactionId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" => Some(TransactionType::Income),
            "expense" => Some(TransactionType::Expense),
            _ => None,
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionType::Income => write!(f, "Income"),
            TransactionType::Expense => write!(f, "Expense"),
        }
    }
}

/// A single income or expense entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    /// Amount in cents (always positive)
    pub amount_cents: Cents,
    pub transaction_type: TransactionType,
    pub category: Category,
    /// Calendar date the money moved
    pub date: NaiveDate,
    pub description: String,
    pub created_at: DateTime<Utc>,
    /// Refreshed on every edit
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a new transaction with a fresh id and timestamps.
    /// Callers are expected to have validated the input.
    pub fn new(input: TransactionInput) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            amount_cents: input.amount_cents,
            transaction_type: input.transaction_type,
            category: input.category,
            date: input.date,
            description: input.description,
            created_at: now,
            updated_at: now,
        }
    }

    /// Return an edited copy. `id` and `created_at` are carried over and
    /// `updated_at` is bumped.
    pub fn edited(&self, input: TransactionInput) -> Self {
        Self {
            id: self.id,
            amount_cents: input.amount_cents,
            transaction_type: input.transaction_type,
            category: input.category,
            date: input.date,
            description: input.description,
            created_at: self.created_at,
            updated_at: Utc::now().max(self.updated_at),
        }
    }

    pub fn is_income(&self) -> bool {
        self.transaction_type == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.transaction_type == TransactionType::Expense
    }

    /// Amount with sign applied: positive for income, negative for expense.
    pub fn signed_amount(&self) -> Cents {
        match self.transaction_type {
            TransactionType::Income => self.amount_cents,
            TransactionType::Expense => -self.amount_cents,
        }
    }

    /// Back to the editable fields, e.g. to prefill an edit.
    pub fn to_input(&self) -> TransactionInput {
        TransactionInput {
            amount_cents: self.amount_cents,
            transaction_type: self.transaction_type,
            category: self.category,
            date: self.date,
            description: self.description.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(amount_cents: Cents) -> TransactionInput {
        TransactionInput {
            amount_cents,
            transaction_type: TransactionType::Expense,
            category: Category::Gifts,
            date: NaiveDate::from_ymd_opt(2024, 12, 1).unwrap(),
            description: "Wrapping paper".into(),
        }
    }

    #[test]
    fn test_transaction_type_roundtrip() {
        for tt in [TransactionType::Income, TransactionType::Expense] {
            assert_eq!(TransactionType::from_str(tt.as_str()), Some(tt));
        }
        assert_eq!(TransactionType::from_str("Expense"), Some(TransactionType::Expense));
        assert_eq!(TransactionType::from_str("transfer"), None);
    }

    #[test]
    fn test_new_sets_matching_timestamps() {
        let tx = Transaction::new(input(1500));
        assert_eq!(tx.created_at, tx.updated_at);
        assert_eq!(tx.amount_cents, 1500);
        assert!(tx.is_expense());
        assert_eq!(tx.signed_amount(), -1500);
    }

    #[test]
    fn test_edit_keeps_identity_and_bumps_updated_at() {
        let original = Transaction::new(input(1500));
        let mut changed = input(2500);
        changed.transaction_type = TransactionType::Income;

        let edited = original.edited(changed);

        assert_eq!(edited.id, original.id);
        assert_eq!(edited.created_at, original.created_at);
        assert!(edited.updated_at >= original.updated_at);
        assert_eq!(edited.amount_cents, 2500);
        assert!(edited.is_income());
        assert_eq!(edited.to_input().amount_cents, 2500);
    }
}
