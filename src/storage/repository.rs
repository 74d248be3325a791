use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::query::Query;
use sqlx::sqlite::SqliteArguments;
use sqlx::{Row, Sqlite, SqlitePool};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::{Category, Transaction, TransactionId, TransactionType};

use super::MIGRATION_001_INITIAL;

const DATE_FORMAT: &str = "%Y-%m-%d";

const SELECT_COLUMNS: &str = "SELECT id, amount_cents, transaction_type, category, date, description, created_at, updated_at FROM transactions";

/// Repository for persisting and querying transactions.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given URL.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        debug!(database_url, "connected to database");
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Initialize a new database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    /// Insert a new transaction.
    pub async fn save_transaction(&self, transaction: &Transaction) -> Result<()> {
        insert_query(transaction)
            .execute(&self.pool)
            .await
            .context("Failed to save transaction")?;
        Ok(())
    }

    /// Insert a batch of transactions in one SQL transaction. Either every
    /// row is stored or none is.
    pub async fn save_transactions(&self, transactions: &[Transaction]) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        for transaction in transactions {
            insert_query(transaction)
                .execute(&mut *tx)
                .await
                .with_context(|| format!("Failed to save transaction {}", transaction.id))?;
        }

        tx.commit().await.context("Failed to commit transaction")?;
        Ok(())
    }

    /// Overwrite the editable fields and `updated_at` of an existing
    /// transaction. Returns false when no row has that id.
    pub async fn update_transaction(&self, transaction: &Transaction) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE transactions
            SET amount_cents = ?, transaction_type = ?, category = ?, date = ?, description = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(transaction.amount_cents)
        .bind(transaction.transaction_type.as_str())
        .bind(transaction.category.as_str())
        .bind(transaction.date.format(DATE_FORMAT).to_string())
        .bind(&transaction.description)
        .bind(transaction.updated_at.to_rfc3339())
        .bind(transaction.id.to_string())
        .execute(&self.pool)
        .await
        .context("Failed to update transaction")?;
        Ok(result.rows_affected() > 0)
    }

    /// Hard delete. Returns false when no row has that id.
    pub async fn delete_transaction(&self, id: TransactionId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM transactions WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .context("Failed to delete transaction")?;
        Ok(result.rows_affected() > 0)
    }

    /// Get a transaction by ID.
    pub async fn get_transaction(&self, id: TransactionId) -> Result<Option<Transaction>> {
        let row = sqlx::query(&format!("{SELECT_COLUMNS} WHERE id = ?"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch transaction")?;

        row.as_ref().map(Self::row_to_transaction).transpose()
    }

    /// List every transaction, newest date first.
    ///
    /// Rows whose category or type is not recognised are skipped and logged.
    pub async fn list_transactions(&self) -> Result<Vec<Transaction>> {
        let rows = sqlx::query(&format!(
            "{SELECT_COLUMNS} ORDER BY date DESC, created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .context("Failed to list transactions")?;

        let mut transactions = Vec::with_capacity(rows.len());
        for row in &rows {
            match Self::row_to_transaction(row) {
                Ok(transaction) => transactions.push(transaction),
                Err(e) => {
                    let id: String = row.get("id");
                    warn!(id = %id, error = %e, "skipping unreadable transaction row");
                }
            }
        }
        Ok(transactions)
    }

    /// Number of stored rows, including unreadable ones.
    pub async fn count_transactions(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM transactions")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count transactions")?;
        Ok(row.get("count"))
    }

    fn row_to_transaction(row: &sqlx::sqlite::SqliteRow) -> Result<Transaction> {
        let id_str: String = row.get("id");
        let type_str: String = row.get("transaction_type");
        let category_str: String = row.get("category");
        let date_str: String = row.get("date");
        let created_at_str: String = row.get("created_at");
        let updated_at_str: String = row.get("updated_at");

        Ok(Transaction {
            id: Uuid::parse_str(&id_str).context("Invalid transaction ID")?,
            amount_cents: row.get("amount_cents"),
            transaction_type: TransactionType::from_str(&type_str)
                .ok_or_else(|| anyhow::anyhow!("Invalid transaction type: {}", type_str))?,
            category: Category::from_str(&category_str)
                .ok_or_else(|| anyhow::anyhow!("Unknown category: {}", category_str))?,
            date: NaiveDate::parse_from_str(&date_str, DATE_FORMAT).context("Invalid date")?,
            description: row.get("description"),
            created_at: DateTime::parse_from_rfc3339(&created_at_str)
                .context("Invalid created_at timestamp")?
                .with_timezone(&Utc),
            updated_at: DateTime::parse_from_rfc3339(&updated_at_str)
                .context("Invalid updated_at timestamp")?
                .with_timezone(&Utc),
        })
    }
}

fn insert_query(transaction: &Transaction) -> Query<'_, Sqlite, SqliteArguments<'_>> {
    sqlx::query(
        r#"
        INSERT INTO transactions (id, amount_cents, transaction_type, category, date, description, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(transaction.id.to_string())
    .bind(transaction.amount_cents)
    .bind(transaction.transaction_type.as_str())
    .bind(transaction.category.as_str())
    .bind(transaction.date.format(DATE_FORMAT).to_string())
    .bind(&transaction.description)
    .bind(transaction.created_at.to_rfc3339())
    .bind(transaction.updated_at.to_rfc3339())
}
