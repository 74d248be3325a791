use std::sync::Arc;

use chrono::{Local, NaiveDate, Utc};
use tokio::sync::{Mutex, watch};
use tracing::{debug, info, warn};

use crate::domain::{
    BudgetSummary, CategorySort, FilterSpec, Transaction, TransactionId, TransactionInput,
    TransactionType, aggregate_by_category, apply_filters, comparison, distribution,
};
use crate::storage::Repository;

use super::{
    AppError, BalanceReport, CategoryReport, ComparisonReport, DistributionReport,
    LiveTransactions, Snapshot, TransactionSource,
};

/// Application service providing high-level operations for the budget.
/// This is the primary interface for any client (CLI, TUI, tests).
///
/// Writes hold `write_lock` until their snapshot is published, so snapshots
/// go out in write order.
pub struct BudgetService {
    repo: Repository,
    snapshots: watch::Sender<Snapshot>,
    write_lock: Mutex<()>,
}

impl BudgetService {
    /// Wrap a repository and load the initial snapshot.
    pub async fn new(repo: Repository) -> Result<Self, AppError> {
        let transactions = repo.list_transactions().await?;
        let stored = repo.count_transactions().await?;
        if stored as usize != transactions.len() {
            warn!(stored, loaded = transactions.len(), "some stored transactions could not be read");
        }
        debug!(count = transactions.len(), "loaded transactions");
        let (snapshots, _) = watch::channel(Arc::new(transactions));
        Ok(Self {
            repo,
            snapshots,
            write_lock: Mutex::new(()),
        })
    }

    /// Initialize a new database at the given path.
    pub async fn init(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = Repository::init(&db_url).await?;
        Self::new(repo).await
    }

    /// Connect to an existing database.
    pub async fn connect(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let repo = Repository::connect(&db_url).await?;
        Self::new(repo).await
    }

    /// Subscribe to full snapshots published after each write.
    pub fn subscribe(&self) -> LiveTransactions {
        LiveTransactions::new(self.snapshots.subscribe())
    }

    /// Today's date in local time, the latest date a transaction may carry.
    pub fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    async fn publish(&self) -> Result<(), AppError> {
        let transactions = self.repo.list_transactions().await?;
        debug!(count = transactions.len(), "publishing snapshot");
        self.snapshots.send_replace(Arc::new(transactions));
        Ok(())
    }

    // ========================
    // Transaction operations
    // ========================

    /// Validate and store a new transaction.
    pub async fn create_transaction(&self, input: TransactionInput) -> Result<Transaction, AppError> {
        input.validate(Self::today())?;

        let transaction = Transaction::new(input);
        let _guard = self.write_lock.lock().await;
        self.repo.save_transaction(&transaction).await?;
        info!(id = %transaction.id, "created transaction");

        self.publish().await?;
        Ok(transaction)
    }

    /// Validate and apply an edit. `id` and `created_at` never change.
    pub async fn update_transaction(
        &self,
        id: TransactionId,
        input: TransactionInput,
    ) -> Result<Transaction, AppError> {
        input.validate(Self::today())?;

        let _guard = self.write_lock.lock().await;
        let existing = self.get_transaction(id).await?;
        let updated = existing.edited(input);
        if !self.repo.update_transaction(&updated).await? {
            return Err(AppError::TransactionNotFound(id.to_string()));
        }
        info!(id = %id, "updated transaction");

        self.publish().await?;
        Ok(updated)
    }

    /// Permanently remove a transaction.
    pub async fn delete_transaction(&self, id: TransactionId) -> Result<(), AppError> {
        let _guard = self.write_lock.lock().await;
        if !self.repo.delete_transaction(id).await? {
            return Err(AppError::TransactionNotFound(id.to_string()));
        }
        info!(id = %id, "deleted transaction");

        self.publish().await
    }

    /// Get a transaction by ID.
    pub async fn get_transaction(&self, id: TransactionId) -> Result<Transaction, AppError> {
        self.repo
            .get_transaction(id)
            .await?
            .ok_or_else(|| AppError::TransactionNotFound(id.to_string()))
    }

    /// All transactions, newest date first.
    pub fn list_transactions(&self) -> Vec<Transaction> {
        self.snapshot().as_ref().clone()
    }

    pub fn contains(&self, id: TransactionId) -> bool {
        self.snapshot().iter().any(|t| t.id == id)
    }

    /// Store already-built transactions as-is (ids and timestamps kept),
    /// publishing a single snapshot at the end. Each one is validated first.
    /// The batch is all-or-nothing: on error nothing is stored.
    pub async fn import_transactions(&self, transactions: &[Transaction]) -> Result<usize, AppError> {
        let today = Self::today();
        for transaction in transactions {
            transaction.to_input().validate(today)?;
        }

        let _guard = self.write_lock.lock().await;
        if let Err(e) = self.repo.save_transactions(transactions).await {
            warn!(count = transactions.len(), error = %e, "import rolled back");
            return Err(e.into());
        }
        info!(count = transactions.len(), "imported transactions");

        self.publish().await?;
        Ok(transactions.len())
    }

    // ========================
    // Reports
    // ========================

    /// Headline totals over every transaction, regardless of any filter.
    pub fn budget_summary(&self) -> BalanceReport {
        let snapshot = self.snapshot();
        let summary = BudgetSummary::from_transactions(&snapshot);
        BalanceReport {
            as_of: Utc::now(),
            transaction_count: snapshot.len(),
            summary,
            status: summary.status(),
        }
    }

    /// Per-category breakdown, ordered by `sort`.
    pub fn category_breakdown(&self, sort: CategorySort) -> CategoryReport {
        let snapshot = self.snapshot();
        let summary = BudgetSummary::from_transactions(&snapshot);
        CategoryReport {
            sort,
            categories: sort.sort(&aggregate_by_category(&snapshot)),
            total_income: summary.total_income,
            total_expense: summary.total_expense,
        }
    }

    /// Transactions matching `spec`, newest date first.
    pub fn filtered_transactions(&self, spec: &FilterSpec) -> Vec<Transaction> {
        apply_filters(&self.snapshot(), spec)
    }

    pub fn distribution(&self, transaction_type: TransactionType) -> DistributionReport {
        let slices = distribution(&self.snapshot(), transaction_type);
        DistributionReport {
            transaction_type,
            total: slices.iter().map(|s| s.value).sum(),
            slices,
        }
    }

    pub fn comparison(&self, transaction_type: TransactionType, sort_by_amount: bool) -> ComparisonReport {
        ComparisonReport {
            transaction_type,
            sorted_by_amount: sort_by_amount,
            bars: comparison(&self.snapshot(), transaction_type, sort_by_amount),
        }
    }
}

impl TransactionSource for BudgetService {
    fn snapshot(&self) -> Snapshot {
        Arc::clone(&self.snapshots.borrow())
    }
}
