use serde::Serialize;

use super::{Category, CategorySummary, Cents, Transaction, TransactionType, aggregate_by_category};

/// One slice of the share chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistributionSlice {
    pub category: Category,
    pub name: &'static str,
    pub value: Cents,
    pub color: &'static str,
    /// Whole percent of the type's total
    pub percentage: u32,
}

/// One bar of the comparison chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonBar {
    pub category: Category,
    pub name: &'static str,
    pub amount: Cents,
    pub color: &'static str,
}

fn amount_for(summary: &CategorySummary, transaction_type: TransactionType) -> Cents {
    match transaction_type {
        TransactionType::Income => summary.total_income,
        TransactionType::Expense => summary.total_expense,
    }
}

/// Share of each category in the total for `transaction_type`.
///
/// Categories with no amount are left out, so fewer than six slices may come
/// back. An empty result means there is nothing to draw.
pub fn distribution(
    transactions: &[Transaction],
    transaction_type: TransactionType,
) -> Vec<DistributionSlice> {
    let aggregated = aggregate_by_category(transactions);
    let total: Cents = aggregated
        .iter()
        .map(|s| amount_for(s, transaction_type))
        .sum();

    if total == 0 {
        return Vec::new();
    }

    aggregated
        .iter()
        .filter_map(|summary| {
            let value = amount_for(summary, transaction_type);
            (value > 0).then(|| DistributionSlice {
                category: summary.category,
                name: summary.category.name(),
                value,
                color: summary.category.color(),
                percentage: (value as f64 / total as f64 * 100.0).round() as u32,
            })
        })
        .collect()
}

/// Amount per category for `transaction_type`. All six categories are
/// always present; zero bars are kept.
pub fn comparison(
    transactions: &[Transaction],
    transaction_type: TransactionType,
    sort_by_amount: bool,
) -> Vec<ComparisonBar> {
    let mut bars: Vec<ComparisonBar> = aggregate_by_category(transactions)
        .iter()
        .map(|summary| ComparisonBar {
            category: summary.category,
            name: summary.category.name(),
            amount: amount_for(summary, transaction_type),
            color: summary.category.color(),
        })
        .collect();

    if sort_by_amount {
        bars.sort_by(|a, b| b.amount.cmp(&a.amount));
    }

    bars
}

/// False when every bar is zero, i.e. the view should show its empty state.
pub fn has_any_amount(bars: &[ComparisonBar]) -> bool {
    bars.iter().any(|bar| bar.amount > 0)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::TransactionInput;

    fn make_transaction(
        transaction_type: TransactionType,
        category: Category,
        amount_cents: Cents,
    ) -> Transaction {
        Transaction::new(TransactionInput {
            amount_cents,
            transaction_type,
            category,
            date: NaiveDate::from_ymd_opt(2024, 12, 1).unwrap(),
            description: String::new(),
        })
    }

    #[test]
    fn test_distribution_empty() {
        assert!(distribution(&[], TransactionType::Expense).is_empty());
    }

    #[test]
    fn test_distribution_income_only_has_no_expense_slices() {
        let transactions = vec![make_transaction(TransactionType::Income, Category::Gifts, 100)];

        assert!(distribution(&transactions, TransactionType::Expense).is_empty());
        assert_eq!(distribution(&transactions, TransactionType::Income).len(), 1);
    }

    #[test]
    fn test_distribution_skips_zero_categories() {
        let transactions = vec![
            make_transaction(TransactionType::Expense, Category::Gifts, 60),
            make_transaction(TransactionType::Expense, Category::FoodAndDinner, 30),
            make_transaction(TransactionType::Expense, Category::Decorations, 10),
            make_transaction(TransactionType::Income, Category::Charity, 500),
        ];

        let slices = distribution(&transactions, TransactionType::Expense);

        let percentages: Vec<u32> = slices.iter().map(|s| s.percentage).collect();
        assert_eq!(percentages, vec![60, 30, 10]);
        assert_eq!(slices[0].name, "Gifts");
        assert_eq!(slices[0].value, 60);
        assert_eq!(slices[0].color, Category::Gifts.color());
    }

    #[test]
    fn test_distribution_rounds_to_whole_percent() {
        let transactions = vec![
            make_transaction(TransactionType::Expense, Category::Gifts, 100),
            make_transaction(TransactionType::Expense, Category::FoodAndDinner, 50),
        ];

        let slices = distribution(&transactions, TransactionType::Expense);

        assert_eq!(slices[0].percentage, 67);
        assert_eq!(slices[1].percentage, 33);
    }

    #[test]
    fn test_comparison_keeps_all_categories() {
        let transactions = vec![make_transaction(TransactionType::Expense, Category::Travel, 250)];

        let bars = comparison(&transactions, TransactionType::Expense, false);

        assert_eq!(bars.len(), 6);
        let order: Vec<Category> = bars.iter().map(|b| b.category).collect();
        assert_eq!(order, Category::ALL.to_vec());
        assert_eq!(bars[3].amount, 250);
        assert!(has_any_amount(&bars));
    }

    #[test]
    fn test_comparison_sorted_by_amount() {
        let transactions = vec![
            make_transaction(TransactionType::Expense, Category::Gifts, 100),
            make_transaction(TransactionType::Expense, Category::Charity, 300),
            make_transaction(TransactionType::Expense, Category::Travel, 200),
        ];

        let bars = comparison(&transactions, TransactionType::Expense, true);

        let order: Vec<Category> = bars.iter().map(|b| b.category).collect();
        assert_eq!(
            order,
            vec![
                Category::Charity,
                Category::Travel,
                Category::Gifts,
                Category::FoodAndDinner,
                Category::Decorations,
                Category::SantasWorkshop,
            ]
        );
    }

    #[test]
    fn test_comparison_without_data_is_empty_state() {
        let bars = comparison(&[], TransactionType::Expense, true);
        assert_eq!(bars.len(), 6);
        assert!(!has_any_amount(&bars));
    }
}
