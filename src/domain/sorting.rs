use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::{CategorySummary, Transaction, aggregate_by_category};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    Name,
    Expense,
    Percentage,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::Expense => "expense",
            SortField::Percentage => "percentage",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "name" => Some(SortField::Name),
            "expense" => Some(SortField::Expense),
            "percentage" => Some(SortField::Percentage),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Sort state for the category breakdown. Starts at expense, descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for CategorySort {
    fn default() -> Self {
        Self {
            field: SortField::Expense,
            direction: SortDirection::Desc,
        }
    }
}

impl CategorySort {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Selecting the current field flips the direction; selecting another
    /// field switches to it, descending.
    pub fn handle_sort(&mut self, field: SortField) {
        if self.field == field {
            self.direction = self.direction.toggled();
        } else {
            self.field = field;
            self.direction = SortDirection::Desc;
        }
    }

    fn compare(&self, a: &CategorySummary, b: &CategorySummary) -> Ordering {
        let ascending = match self.field {
            SortField::Name => a.category.name().cmp(b.category.name()),
            SortField::Expense => a.total_expense.cmp(&b.total_expense),
            SortField::Percentage => a.percentage.total_cmp(&b.percentage),
        };
        match self.direction {
            SortDirection::Asc => ascending,
            SortDirection::Desc => ascending.reverse(),
        }
    }

    /// Return a sorted copy. Ties keep their input order.
    pub fn sort(&self, summaries: &[CategorySummary]) -> Vec<CategorySummary> {
        let mut sorted = summaries.to_vec();
        // slice::sort_by is stable
        sorted.sort_by(|a, b| self.compare(a, b));
        sorted
    }
}

/// Category breakdown view: the latest aggregation plus the sort state that
/// survives every refresh.
#[derive(Debug, Clone)]
pub struct CategoryAggregations {
    sort: CategorySort,
    aggregated: Vec<CategorySummary>,
}

impl Default for CategoryAggregations {
    fn default() -> Self {
        Self::new(CategorySort::default())
    }
}

impl CategoryAggregations {
    pub fn new(sort: CategorySort) -> Self {
        Self {
            sort,
            aggregated: aggregate_by_category(&[]),
        }
    }

    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let mut view = Self::default();
        view.refresh(transactions);
        view
    }

    /// Recompute the aggregation from a fresh snapshot. Sort state is kept.
    pub fn refresh(&mut self, transactions: &[Transaction]) {
        self.aggregated = aggregate_by_category(transactions);
    }

    pub fn handle_sort(&mut self, field: SortField) {
        self.sort.handle_sort(field);
    }

    pub fn sort_field(&self) -> SortField {
        self.sort.field
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.sort.direction
    }

    /// Summaries ordered by the current sort state.
    pub fn categories(&self) -> Vec<CategorySummary> {
        self.sort.sort(&self.aggregated)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::{Category, Cents, TransactionInput, TransactionType};

    fn expense(category: Category, amount_cents: Cents) -> Transaction {
        Transaction::new(TransactionInput {
            amount_cents,
            transaction_type: TransactionType::Expense,
            category,
            date: NaiveDate::from_ymd_opt(2024, 12, 1).unwrap(),
            description: String::new(),
        })
    }

    fn order(summaries: &[CategorySummary]) -> Vec<Category> {
        summaries.iter().map(|s| s.category).collect()
    }

    #[test]
    fn test_default_state() {
        let sort = CategorySort::default();
        assert_eq!(sort.field, SortField::Expense);
        assert_eq!(sort.direction, SortDirection::Desc);
    }

    #[test]
    fn test_same_field_toggles_direction() {
        for field in [SortField::Name, SortField::Expense, SortField::Percentage] {
            let start = CategorySort::new(field, SortDirection::Desc);
            let mut sort = start;

            sort.handle_sort(field);
            assert_eq!(sort.direction, SortDirection::Asc);
            assert_eq!(sort.field, field);

            sort.handle_sort(field);
            assert_eq!(sort, start);
        }
    }

    #[test]
    fn test_new_field_resets_to_descending() {
        let mut sort = CategorySort::new(SortField::Expense, SortDirection::Asc);
        sort.handle_sort(SortField::Name);
        assert_eq!(sort, CategorySort::new(SortField::Name, SortDirection::Desc));
    }

    #[test]
    fn test_sort_by_expense() {
        let transactions = vec![
            expense(Category::Travel, 300),
            expense(Category::Gifts, 100),
            expense(Category::Charity, 500),
        ];
        let summaries = aggregate_by_category(&transactions);

        let desc = CategorySort::default().sort(&summaries);
        assert_eq!(
            &order(&desc)[..3],
            &[Category::Charity, Category::Travel, Category::Gifts]
        );

        let asc = CategorySort::new(SortField::Expense, SortDirection::Asc).sort(&summaries);
        assert_eq!(
            &order(&asc)[3..],
            &[Category::Gifts, Category::Travel, Category::Charity]
        );
    }

    #[test]
    fn test_sort_by_name() {
        let summaries = aggregate_by_category(&[]);

        let asc = CategorySort::new(SortField::Name, SortDirection::Asc).sort(&summaries);
        assert_eq!(
            order(&asc),
            vec![
                Category::Charity,
                Category::Decorations,
                Category::FoodAndDinner,
                Category::Gifts,
                Category::SantasWorkshop,
                Category::Travel,
            ]
        );

        let desc = CategorySort::new(SortField::Name, SortDirection::Desc).sort(&summaries);
        assert_eq!(desc.first().unwrap().category, Category::Travel);
    }

    #[test]
    fn test_sort_by_percentage() {
        let transactions = vec![expense(Category::Decorations, 10), expense(Category::Gifts, 30)];
        let summaries = aggregate_by_category(&transactions);

        let sorted = CategorySort::new(SortField::Percentage, SortDirection::Desc).sort(&summaries);
        assert_eq!(&order(&sorted)[..2], &[Category::Gifts, Category::Decorations]);
    }

    #[test]
    fn test_ties_keep_registry_order_in_both_directions() {
        let summaries = aggregate_by_category(&[]);

        for direction in [SortDirection::Asc, SortDirection::Desc] {
            let sort = CategorySort::new(SortField::Expense, direction);
            let first = sort.sort(&summaries);
            let second = sort.sort(&first);
            assert_eq!(order(&first), Category::ALL.to_vec());
            assert_eq!(order(&second), Category::ALL.to_vec());
        }
    }

    #[test]
    fn test_refresh_preserves_sort_state() {
        let mut view = CategoryAggregations::default();
        view.handle_sort(SortField::Name);
        view.handle_sort(SortField::Name);
        assert_eq!(view.sort_direction(), SortDirection::Asc);

        view.refresh(&[expense(Category::Travel, 700)]);

        assert_eq!(view.sort_field(), SortField::Name);
        assert_eq!(view.sort_direction(), SortDirection::Asc);
        assert_eq!(view.categories().len(), 6);
        assert_eq!(view.categories()[0].category, Category::Charity);
    }

    #[test]
    fn test_refresh_is_idempotent() {
        let transactions = vec![expense(Category::Gifts, 100), expense(Category::Travel, 250)];
        let mut view = CategoryAggregations::from_transactions(&transactions);
        let first = view.categories();

        view.refresh(&transactions);
        view.refresh(&transactions);

        assert_eq!(view.categories(), first);
        assert_eq!(first[0].category, Category::Travel);
    }

    #[test]
    fn test_parse_sort_field() {
        assert_eq!(SortField::from_str("Percentage"), Some(SortField::Percentage));
        assert_eq!(SortField::from_str(SortField::Name.as_str()), Some(SortField::Name));
        assert_eq!(SortField::from_str("amount"), None);
    }
}
