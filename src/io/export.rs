use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;
use tracing::debug;

use crate::application::BudgetService;
use crate::domain::{Transaction, format_cents};

/// Column order shared by CSV export and import.
pub const CSV_HEADER: [&str; 8] = [
    "id",
    "date",
    "type",
    "category",
    "amount",
    "description",
    "created_at",
    "updated_at",
];

/// Full JSON snapshot of the budget
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub transactions: Vec<Transaction>,
}

/// Exporter for writing budget data out
pub struct Exporter<'a> {
    service: &'a BudgetService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a BudgetService) -> Self {
        Self { service }
    }

    /// Export the given transactions to CSV, in the order given.
    pub fn write_transactions_csv<W: Write>(transactions: &[Transaction], writer: W) -> Result<usize> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(CSV_HEADER)?;

        for transaction in transactions {
            csv_writer.write_record([
                transaction.id.to_string(),
                transaction.date.format("%Y-%m-%d").to_string(),
                transaction.transaction_type.as_str().to_string(),
                transaction.category.name().to_string(),
                format_cents(transaction.amount_cents),
                transaction.description.clone(),
                transaction.created_at.to_rfc3339(),
                transaction.updated_at.to_rfc3339(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(transactions.len())
    }

    /// Export every transaction to CSV, newest first.
    pub fn export_transactions_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let transactions = self.service.list_transactions();
        let count = Self::write_transactions_csv(&transactions, writer)?;
        debug!(count, "exported transactions as csv");
        Ok(count)
    }

    /// Export every transaction as a JSON snapshot.
    pub fn export_full_json<W: Write>(&self, mut writer: W) -> Result<BudgetSnapshot> {
        let snapshot = BudgetSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            transactions: self.service.list_transactions(),
        };

        let json = serde_json::to_string_pretty(&snapshot)?;
        writer.write_all(json.as_bytes())?;
        writer.flush()?;
        debug!(count = snapshot.transactions.len(), "exported json snapshot");

        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::{Category, TransactionInput, TransactionType};

    #[test]
    fn test_write_transactions_csv() {
        let transaction = Transaction::new(TransactionInput {
            amount_cents: 123456,
            transaction_type: TransactionType::Expense,
            category: Category::FoodAndDinner,
            date: NaiveDate::from_ymd_opt(2024, 12, 20).unwrap(),
            description: "Feast, with \"extras\"".into(),
        });

        let mut buffer = Vec::new();
        let count = Exporter::write_transactions_csv(&[transaction.clone()], &mut buffer).unwrap();
        let output = String::from_utf8(buffer).unwrap();
        let mut lines = output.lines();

        assert_eq!(count, 1);
        assert_eq!(
            lines.next(),
            Some("id,date,type,category,amount,description,created_at,updated_at")
        );
        let row = lines.next().unwrap();
        assert!(row.starts_with(&format!("{},2024-12-20,expense,Food & Dinner,1234.56,", transaction.id)));
        assert!(row.contains("\"Feast, with \"\"extras\"\"\""));
    }
}
