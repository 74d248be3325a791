// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use tally::application::BudgetService;
use tally::domain::{Category, Cents, Transaction, TransactionInput, TransactionType};
use tempfile::TempDir;

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(BudgetService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let service = BudgetService::init(db_path(&temp_dir).to_str().unwrap()).await?;
    Ok((service, temp_dir))
}

/// Path of the database created by `test_service`
pub fn db_path(temp_dir: &TempDir) -> PathBuf {
    temp_dir.path().join("test.db")
}

/// Write a row straight into the database, bypassing the enum checks
/// of the repository.
pub async fn insert_raw_row(
    db_path: &Path,
    id: &str,
    transaction_type: &str,
    category: &str,
    amount_cents: i64,
) -> Result<()> {
    let pool = SqlitePool::connect(&format!("sqlite:{}", db_path.display())).await?;
    let now = Utc::now().to_rfc3339();
    sqlx::query(
        "INSERT INTO transactions (id, amount_cents, transaction_type, category, date, description, created_at, updated_at)
         VALUES (?, ?, ?, ?, '2024-12-01', '', ?, ?)",
    )
    .bind(id)
    .bind(amount_cents)
    .bind(transaction_type)
    .bind(category)
    .bind(&now)
    .bind(&now)
    .execute(&pool)
    .await?;
    pool.close().await;
    Ok(())
}

/// Helper to parse a YYYY-MM-DD string
pub fn parse_date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}

pub fn input(
    transaction_type: TransactionType,
    category: Category,
    amount_cents: Cents,
    date: &str,
    description: &str,
) -> TransactionInput {
    TransactionInput {
        amount_cents,
        transaction_type,
        category,
        date: parse_date(date),
        description: description.to_string(),
    }
}

/// Test fixture: the three-transaction household used across tests
pub struct SampleBudget;

impl SampleBudget {
    /// Gifts expense 100, Gifts income 50, Food & Dinner expense 200
    pub async fn create(service: &BudgetService) -> Result<Vec<Transaction>> {
        let gifts_expense = service
            .create_transaction(input(
                TransactionType::Expense,
                Category::Gifts,
                100,
                "2024-12-01",
                "Toy trains",
            ))
            .await?;
        let gifts_income = service
            .create_transaction(input(
                TransactionType::Income,
                Category::Gifts,
                50,
                "2024-12-02",
                "Returned sweater",
            ))
            .await?;
        let food_expense = service
            .create_transaction(input(
                TransactionType::Expense,
                Category::FoodAndDinner,
                200,
                "2024-12-03",
                "Reindeer feed",
            ))
            .await?;
        Ok(vec![gifts_expense, gifts_income, food_expense])
    }
}
