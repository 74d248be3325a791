use serde::{Deserialize, Serialize};

use super::{Cents, Transaction, TransactionType};

/// Sum of amounts for one transaction type.
pub fn total_by_type(transactions: &[Transaction], transaction_type: TransactionType) -> Cents {
    transactions
        .iter()
        .filter(|t| t.transaction_type == transaction_type)
        .map(|t| t.amount_cents)
        .sum()
}

/// Balance = total income - total expense
pub fn balance(transactions: &[Transaction]) -> Cents {
    transactions.iter().map(Transaction::signed_amount).sum()
}

/// Headline figures. Always built from the unfiltered transaction set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetSummary {
    pub total_income: Cents,
    pub total_expense: Cents,
    pub balance: Cents,
}

impl BudgetSummary {
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let total_income = total_by_type(transactions, TransactionType::Income);
        let total_expense = total_by_type(transactions, TransactionType::Expense);
        Self {
            total_income,
            total_expense,
            balance: total_income - total_expense,
        }
    }

    pub fn status(&self) -> BalanceStatus {
        BalanceStatus::from_balance(self.balance)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BalanceStatus {
    Positive,
    Zero,
    Negative,
}

impl BalanceStatus {
    pub fn from_balance(balance: Cents) -> Self {
        match balance.signum() {
            1 => BalanceStatus::Positive,
            -1 => BalanceStatus::Negative,
            _ => BalanceStatus::Zero,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            BalanceStatus::Positive => "Ho ho ho! Budget is healthy!",
            BalanceStatus::Zero => "Budget is balanced, spend carefully!",
            BalanceStatus::Negative => "Budget overspent! Review expenses.",
        }
    }
}
