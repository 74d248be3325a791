use std::sync::Arc;

use tokio::sync::watch;

use crate::domain::{
    BudgetSummary, CategoryAggregations, CategorySort, FilterSpec, Transaction, apply_filters,
};

/// Shared, immutable snapshot of every stored transaction.
pub type Snapshot = Arc<Vec<Transaction>>;

/// Anything that can hand out the current transaction snapshot.
///
/// The aggregation, filter and sort code never talks to storage; it is fed
/// whatever a source returns.
pub trait TransactionSource {
    fn snapshot(&self) -> Snapshot;
}

impl TransactionSource for Snapshot {
    fn snapshot(&self) -> Snapshot {
        Arc::clone(self)
    }
}

impl TransactionSource for Vec<Transaction> {
    fn snapshot(&self) -> Snapshot {
        Arc::new(self.clone())
    }
}

/// Subscription to the full transaction set. A new snapshot is published
/// after every write; there are no deltas.
#[derive(Debug, Clone)]
pub struct LiveTransactions {
    receiver: watch::Receiver<Snapshot>,
}

impl LiveTransactions {
    pub(crate) fn new(receiver: watch::Receiver<Snapshot>) -> Self {
        Self { receiver }
    }

    /// Wait for the next published snapshot.
    /// Returns false once the publishing service is gone.
    pub async fn changed(&mut self) -> bool {
        self.receiver.changed().await.is_ok()
    }

    /// Mark the current snapshot as seen and return it.
    pub fn snapshot_and_mark_seen(&mut self) -> Snapshot {
        Arc::clone(&self.receiver.borrow_and_update())
    }
}

impl TransactionSource for LiveTransactions {
    fn snapshot(&self) -> Snapshot {
        Arc::clone(&self.receiver.borrow())
    }
}

/// Everything a budget screen shows, recomputed in full from one snapshot.
///
/// The filter and sort state belong to the view and survive refreshes.
#[derive(Debug, Clone, Default)]
pub struct BudgetView {
    filter: FilterSpec,
    aggregations: CategoryAggregations,
    summary: Option<BudgetSummary>,
    visible: Vec<Transaction>,
}

impl BudgetView {
    pub fn new(filter: FilterSpec, sort: CategorySort) -> Self {
        Self {
            filter,
            aggregations: CategoryAggregations::new(sort),
            summary: None,
            visible: Vec::new(),
        }
    }

    /// Recompute from the source's current snapshot.
    pub fn refresh(&mut self, source: &impl TransactionSource) {
        let snapshot = source.snapshot();
        // Headline totals ignore the filter.
        self.summary = Some(BudgetSummary::from_transactions(&snapshot));
        self.aggregations.refresh(&snapshot);
        self.visible = apply_filters(&snapshot, &self.filter);
    }

    pub fn summary(&self) -> BudgetSummary {
        self.summary
            .unwrap_or_else(|| BudgetSummary::from_transactions(&[]))
    }

    pub fn visible_transactions(&self) -> &[Transaction] {
        &self.visible
    }

    pub fn aggregations(&self) -> &CategoryAggregations {
        &self.aggregations
    }

    pub fn aggregations_mut(&mut self) -> &mut CategoryAggregations {
        &mut self.aggregations
    }

    pub fn filter(&self) -> &FilterSpec {
        &self.filter
    }

    /// Replace the filter. Takes effect on the next refresh.
    pub fn set_filter(&mut self, filter: FilterSpec) {
        self.filter = filter;
    }
}
