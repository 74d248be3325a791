use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use std::collections::HashSet;
use std::io::Read;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::application::BudgetService;
use crate::domain::{Category, Transaction, TransactionInput, TransactionType, parse_amount};
use crate::io::export::BudgetSnapshot;

/// Result of an import operation
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    pub imported: usize,
    pub skipped: usize,
    pub errors: Vec<ImportError>,
}

/// Error that occurred during import
#[derive(Debug, Clone)]
pub struct ImportError {
    pub line: usize,
    pub field: Option<String>,
    pub error: String,
}

/// Options for import operations
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Parse and validate, but store nothing
    pub dry_run: bool,
}

/// One CSV row. `id` and the timestamps are optional so hand-written files
/// can be imported.
#[derive(Debug, Deserialize)]
struct CsvRow {
    id: Option<String>,
    date: String,
    #[serde(rename = "type")]
    transaction_type: String,
    category: String,
    amount: String,
    #[serde(default)]
    description: Option<String>,
    created_at: Option<String>,
    updated_at: Option<String>,
}

/// Importer for loading transactions into the budget
pub struct Importer<'a> {
    service: &'a BudgetService,
}

impl<'a> Importer<'a> {
    pub fn new(service: &'a BudgetService) -> Self {
        Self { service }
    }

    /// Import transactions from CSV.
    ///
    /// Rows that fail to parse or validate are reported and left out; rows
    /// whose id already exists are skipped. Valid rows are stored together.
    pub async fn import_transactions_csv<R: Read>(
        &self,
        reader: R,
        options: ImportOptions,
    ) -> Result<ImportResult> {
        let today = BudgetService::today();
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut result = ImportResult::default();
        let mut seen: HashSet<Uuid> = HashSet::new();
        let mut pending = Vec::new();

        for (line_num, row) in csv_reader.deserialize::<CsvRow>().enumerate() {
            let line = line_num + 2; // +2 for header and 0-indexing

            let row = match row {
                Ok(r) => r,
                Err(e) => {
                    result.errors.push(ImportError {
                        line,
                        field: None,
                        error: format!("CSV parse error: {}", e),
                    });
                    continue;
                }
            };

            let transaction = match parse_row(row, today) {
                Ok(t) => t,
                Err(e) => {
                    result.errors.push(ImportError { line, ..e });
                    continue;
                }
            };

            if self.service.contains(transaction.id) || !seen.insert(transaction.id) {
                debug!(line, id = %transaction.id, "skipping duplicate transaction");
                result.skipped += 1;
                continue;
            }

            pending.push(transaction);
        }

        if !result.errors.is_empty() {
            warn!(errors = result.errors.len(), "some csv rows were rejected");
        }

        result.imported = if options.dry_run {
            pending.len()
        } else {
            self.service.import_transactions(&pending).await?
        };

        Ok(result)
    }

    /// Import a JSON snapshot produced by the exporter. Transactions whose
    /// id is already stored are skipped.
    pub async fn import_full_json<R: Read>(
        &self,
        mut reader: R,
        options: ImportOptions,
    ) -> Result<ImportResult> {
        let mut json = String::new();
        reader.read_to_string(&mut json)?;
        let snapshot: BudgetSnapshot =
            serde_json::from_str(&json).context("Failed to parse JSON snapshot")?;

        let today = BudgetService::today();
        let mut result = ImportResult::default();
        let mut pending = Vec::new();

        for (index, transaction) in snapshot.transactions.into_iter().enumerate() {
            if self.service.contains(transaction.id)
                || pending.iter().any(|t: &Transaction| t.id == transaction.id)
            {
                result.skipped += 1;
                continue;
            }
            if let Err(e) = transaction.to_input().validate(today) {
                result.errors.push(ImportError {
                    line: index + 1,
                    field: None,
                    error: e.to_string(),
                });
                continue;
            }
            pending.push(transaction);
        }

        result.imported = if options.dry_run {
            pending.len()
        } else {
            self.service.import_transactions(&pending).await?
        };

        Ok(result)
    }
}

fn field_error(field: &str, error: String) -> ImportError {
    ImportError {
        line: 0,
        field: Some(field.to_string()),
        error,
    }
}

fn parse_row(row: CsvRow, today: NaiveDate) -> Result<Transaction, ImportError> {
    let amount_cents = parse_amount(&row.amount)
        .map_err(|e| field_error("amount", format!("Invalid amount: {}", e)))?;
    let transaction_type = TransactionType::from_str(&row.transaction_type).ok_or_else(|| {
        field_error("type", format!("Invalid type: {}", row.transaction_type))
    })?;
    let category = Category::from_str(&row.category)
        .ok_or_else(|| field_error("category", format!("Unknown category: {}", row.category)))?;
    let date = NaiveDate::parse_from_str(row.date.trim(), "%Y-%m-%d")
        .map_err(|e| field_error("date", format!("Invalid date: {}", e)))?;

    let input = TransactionInput {
        amount_cents,
        transaction_type,
        category,
        date,
        description: row.description.unwrap_or_default(),
    };
    input
        .validate(today)
        .map_err(|e| field_error("transaction", e.to_string()))?;

    let mut transaction = Transaction::new(input);
    if let Some(id) = row.id {
        transaction.id =
            Uuid::parse_str(id.trim()).map_err(|e| field_error("id", format!("Invalid id: {}", e)))?;
    }
    if let Some(created_at) = row.created_at {
        transaction.created_at = parse_timestamp(&created_at)
            .map_err(|e| field_error("created_at", format!("Invalid timestamp: {}", e)))?;
    }
    transaction.updated_at = match row.updated_at {
        Some(updated_at) => parse_timestamp(&updated_at)
            .map_err(|e| field_error("updated_at", format!("Invalid timestamp: {}", e)))?,
        None => transaction.created_at,
    };

    Ok(transaction)
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(s.trim())?.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(amount: &str, category: &str, date: &str) -> CsvRow {
        CsvRow {
            id: None,
            date: date.into(),
            transaction_type: "expense".into(),
            category: category.into(),
            amount: amount.into(),
            description: Some("Tinsel".into()),
            created_at: None,
            updated_at: None,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()
    }

    #[test]
    fn test_parse_row() {
        let transaction = parse_row(row("12.50", "Decorations", "2024-12-01"), today()).unwrap();

        assert_eq!(transaction.amount_cents, 1250);
        assert_eq!(transaction.category, Category::Decorations);
        assert_eq!(transaction.description, "Tinsel");
        assert_eq!(transaction.created_at, transaction.updated_at);
    }

    #[test]
    fn test_parse_row_keeps_given_id() {
        let id = Uuid::new_v4();
        let mut r = row("1", "gifts", "2024-12-01");
        r.id = Some(id.to_string());

        assert_eq!(parse_row(r, today()).unwrap().id, id);
    }

    #[test]
    fn test_parse_row_reports_bad_field() {
        let cases = [
            (row("ten", "Gifts", "2024-12-01"), "amount"),
            (row("10", "Groceries", "2024-12-01"), "category"),
            (row("10", "Gifts", "01/12/2024"), "date"),
            (row("10", "Gifts", "2025-01-01"), "transaction"),
            (row("0", "Gifts", "2024-12-01"), "transaction"),
        ];

        for (r, field) in cases {
            let err = parse_row(r, today()).unwrap_err();
            assert_eq!(err.field.as_deref(), Some(field));
        }
    }
}
