use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use uuid::Uuid;

use crate::application::BudgetService;
use crate::domain::{
    Category, CategorySort, FilterSpec, SortDirection, SortField, Transaction, TransactionInput,
    TransactionType, TypeFilter, format_currency, has_any_amount, parse_amount,
};

/// Tally - Household Budget Tracker
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "A local-first household budget tracker with six fixed categories")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, env = "TALLY_DB", default_value = "tally.db")]
    pub database: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// Record a new income or expense
    Add {
        /// Amount (e.g., "50.00" or "50")
        amount: String,

        /// Transaction type: income, expense
        #[arg(short = 't', long = "type")]
        transaction_type: String,

        /// Category name (e.g., "Gifts", "Food & Dinner")
        #[arg(short, long)]
        category: String,

        /// Date of the transaction (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Description (max 500 characters)
        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// Edit an existing transaction; omitted fields keep their value
    Edit {
        /// Transaction ID
        id: String,

        #[arg(short, long)]
        amount: Option<String>,

        #[arg(short = 't', long = "type")]
        transaction_type: Option<String>,

        #[arg(short, long)]
        category: Option<String>,

        #[arg(long)]
        date: Option<String>,

        #[arg(short, long)]
        description: Option<String>,
    },

    /// Delete a transaction permanently
    Delete {
        /// Transaction ID
        id: String,
    },

    /// Show detailed transaction information
    Show {
        /// Transaction ID
        id: String,
    },

    /// List transactions, newest first
    List {
        /// Filter by type: all, income, expense
        #[arg(short = 't', long = "type", default_value = "all")]
        transaction_type: String,

        /// Filter by category (repeat for several)
        #[arg(short, long)]
        category: Vec<String>,

        /// Filter from date, inclusive (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Filter to date, inclusive (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Case-insensitive text to look for in descriptions
        #[arg(short, long)]
        search: Option<String>,

        /// Output format: table, json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Show total income, total expense and balance
    Balance {
        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Per-category breakdown
    Categories {
        /// Sort field: name, expense, percentage
        #[arg(long, default_value = "expense")]
        sort: String,

        /// Sort ascending instead of descending
        #[arg(long)]
        asc: bool,

        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Chart-ready data
    #[command(subcommand)]
    Chart(ChartCommands),

    /// Export data to CSV or JSON
    Export {
        /// What to export: transactions, full
        export_type: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Import data from CSV or JSON
    Import {
        /// What to import: transactions (CSV), full (JSON)
        import_type: String,

        /// Input file (stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,

        /// Preview without importing
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Subcommand)]
pub enum ChartCommands {
    /// Share of each category (non-zero categories only)
    Distribution {
        /// Transaction type: income, expense
        #[arg(short = 't', long = "type", default_value = "expense")]
        transaction_type: String,

        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Amount per category (all six categories)
    Comparison {
        /// Transaction type: income, expense
        #[arg(short = 't', long = "type", default_value = "expense")]
        transaction_type: String,

        /// Order bars by amount, largest first
        #[arg(long)]
        sort_by_amount: bool,

        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let service = match self.command {
            Commands::Init => BudgetService::init(&self.database).await?,
            _ => BudgetService::connect(&self.database).await?,
        };

        match self.command {
            Commands::Init => {
                println!("Database initialized: {}", self.database);
            }

            Commands::Add {
                amount,
                transaction_type,
                category,
                date,
                description,
            } => {
                let input = TransactionInput {
                    amount_cents: parse_amount(&amount)
                        .context("Invalid amount format. Use '50.00' or '50'")?,
                    transaction_type: parse_type(&transaction_type)?,
                    category: parse_category(&category)?,
                    date: match date {
                        Some(date_str) => parse_date(&date_str)?,
                        None => BudgetService::today(),
                    },
                    description,
                };

                let transaction = service.create_transaction(input).await?;
                println!(
                    "Recorded {}: {} in {} ({})",
                    transaction.transaction_type.as_str(),
                    format_currency(transaction.amount_cents),
                    transaction.category,
                    transaction.id
                );
            }

            Commands::Edit {
                id,
                amount,
                transaction_type,
                category,
                date,
                description,
            } => {
                let id = parse_id(&id)?;
                let mut input = service.get_transaction(id).await?.to_input();

                if let Some(amount) = amount {
                    input.amount_cents = parse_amount(&amount)
                        .context("Invalid amount format. Use '50.00' or '50'")?;
                }
                if let Some(tt) = transaction_type {
                    input.transaction_type = parse_type(&tt)?;
                }
                if let Some(category) = category {
                    input.category = parse_category(&category)?;
                }
                if let Some(date) = date {
                    input.date = parse_date(&date)?;
                }
                if let Some(description) = description {
                    input.description = description;
                }

                let transaction = service.update_transaction(id, input).await?;
                println!("Updated transaction {}", transaction.id);
            }

            Commands::Delete { id } => {
                let id = parse_id(&id)?;
                service.delete_transaction(id).await?;
                println!("Deleted transaction {}", id);
            }

            Commands::Show { id } => {
                let transaction = service.get_transaction(parse_id(&id)?).await?;
                print_transaction(&transaction);
            }

            Commands::List {
                transaction_type,
                category,
                from,
                to,
                search,
                format,
            } => {
                let spec = FilterSpec::default()
                    .with_type(
                        TypeFilter::from_str(&transaction_type).ok_or_else(|| {
                            anyhow::anyhow!(
                                "Invalid type '{}'. Valid types: all, income, expense",
                                transaction_type
                            )
                        })?,
                    )
                    .with_categories(
                        category
                            .iter()
                            .map(|c| parse_category(c))
                            .collect::<Result<Vec<_>>>()?,
                    )
                    .with_date_range(
                        from.map(|s| parse_date(&s)).transpose().context("Invalid from-date")?,
                        to.map(|s| parse_date(&s)).transpose().context("Invalid to-date")?,
                    )
                    .with_search(search.unwrap_or_default());

                run_list_command(&service, &spec, &format)?;
            }

            Commands::Balance { format } => run_balance_command(&service, &format)?,

            Commands::Categories { sort, asc, format } => {
                let field = SortField::from_str(&sort).ok_or_else(|| {
                    anyhow::anyhow!(
                        "Invalid sort field '{}'. Valid fields: name, expense, percentage",
                        sort
                    )
                })?;
                let direction = if asc {
                    SortDirection::Asc
                } else {
                    SortDirection::Desc
                };
                run_categories_command(&service, CategorySort::new(field, direction), &format)?;
            }

            Commands::Chart(chart_cmd) => run_chart_command(&service, chart_cmd)?,

            Commands::Export {
                export_type,
                output,
            } => run_export_command(&service, &export_type, output.as_deref())?,

            Commands::Import {
                import_type,
                input,
                dry_run,
            } => run_import_command(&service, &import_type, input.as_deref(), dry_run).await?,
        }

        Ok(())
    }
}

fn print_transaction(transaction: &Transaction) {
    println!("Transaction: {}", transaction.id);
    println!("  Type:        {}", transaction.transaction_type);
    println!("  Amount:      {}", format_currency(transaction.amount_cents));
    println!("  Category:    {}", transaction.category);
    println!("  Date:        {}", transaction.date.format("%Y-%m-%d"));
    if !transaction.description.is_empty() {
        println!("  Description: {}", transaction.description);
    }
    println!(
        "  Created:     {}",
        transaction.created_at.format("%Y-%m-%d %H:%M:%S")
    );
    println!(
        "  Updated:     {}",
        transaction.updated_at.format("%Y-%m-%d %H:%M:%S")
    );
}

fn run_list_command(service: &BudgetService, spec: &FilterSpec, format: &str) -> Result<()> {
    let transactions = service.filtered_transactions(spec);

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&transactions)?),
        "csv" => {
            crate::io::Exporter::write_transactions_csv(&transactions, std::io::stdout())?;
        }
        _ => {
            if transactions.is_empty() {
                println!("No transactions found.");
            } else {
                println!(
                    "{:<12} {:<8} {:>12} {:<18} DESCRIPTION",
                    "DATE", "TYPE", "AMOUNT", "CATEGORY"
                );
                println!("{}", "-".repeat(80));
                for t in &transactions {
                    let sign = if t.is_income() { "+" } else { "-" };
                    println!(
                        "{:<12} {:<8} {:>12} {:<18} {}",
                        t.date.format("%Y-%m-%d"),
                        t.transaction_type.as_str(),
                        format!("{}{}", sign, format_currency(t.amount_cents)),
                        t.category.name(),
                        truncate(&t.description, 30)
                    );
                }
            }
            if spec.has_active_filters() {
                println!(
                    "\n{} of {} transactions match the current filters",
                    transactions.len(),
                    service.list_transactions().len()
                );
            }
        }
    }
    Ok(())
}

fn run_balance_command(service: &BudgetService, format: &str) -> Result<()> {
    let report = service.budget_summary();

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        _ => {
            println!("Total Income:   {:>15}", format_currency(report.summary.total_income));
            println!("Total Expense:  {:>15}", format_currency(report.summary.total_expense));
            println!("{}", "-".repeat(31));
            println!("Balance:        {:>15}", format_currency(report.summary.balance));
            println!();
            println!("{}", report.status.message());
        }
    }
    Ok(())
}

fn run_categories_command(service: &BudgetService, sort: CategorySort, format: &str) -> Result<()> {
    let report = service.category_breakdown(sort);

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        _ => {
            println!(
                "{:<18} {:>12} {:>12} {:>12} {:>7} {:>6}",
                "CATEGORY", "INCOME", "EXPENSE", "NET", "%", "COUNT"
            );
            println!("{}", "-".repeat(72));
            for cat in &report.categories {
                println!(
                    "{:<18} {:>12} {:>12} {:>12} {:>6.1}% {:>6}",
                    cat.category.name(),
                    format_currency(cat.total_income),
                    format_currency(cat.total_expense),
                    format_currency(cat.net_amount),
                    cat.percentage,
                    cat.transaction_count
                );
            }
            println!("{}", "-".repeat(72));
            println!(
                "{:<18} {:>12} {:>12}",
                "TOTAL",
                format_currency(report.total_income),
                format_currency(report.total_expense)
            );
            println!(
                "\nSorted by {} ({})",
                report.sort.field.as_str(),
                report.sort.direction.as_str()
            );
        }
    }
    Ok(())
}

fn run_chart_command(service: &BudgetService, cmd: ChartCommands) -> Result<()> {
    match cmd {
        ChartCommands::Distribution {
            transaction_type,
            format,
        } => {
            let report = service.distribution(parse_type(&transaction_type)?);

            match format.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(&report)?),
                _ => {
                    if report.slices.is_empty() {
                        println!(
                            "No {} data available for chart.",
                            report.transaction_type.as_str()
                        );
                        return Ok(());
                    }
                    for slice in &report.slices {
                        println!(
                            "{:<18} {:>12} {:>4}%  {}",
                            slice.name,
                            format_currency(slice.value),
                            slice.percentage,
                            bar(slice.percentage as i64, 100, 40)
                        );
                    }
                }
            }
        }

        ChartCommands::Comparison {
            transaction_type,
            sort_by_amount,
            format,
        } => {
            let report = service.comparison(parse_type(&transaction_type)?, sort_by_amount);

            match format.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(&report)?),
                _ => {
                    if !has_any_amount(&report.bars) {
                        println!(
                            "No {} data available for chart.",
                            report.transaction_type.as_str()
                        );
                        return Ok(());
                    }
                    let max = report.bars.iter().map(|b| b.amount).max().unwrap_or(0);
                    for b in &report.bars {
                        println!(
                            "{:<18} {:>12}  {}",
                            b.name,
                            format_currency(b.amount),
                            bar(b.amount, max, 40)
                        );
                    }
                }
            }
        }
    }
    Ok(())
}

fn run_export_command(service: &BudgetService, export_type: &str, output: Option<&str>) -> Result<()> {
    use crate::io::Exporter;
    use std::fs::File;
    use std::io::{Write, stdout};

    let exporter = Exporter::new(service);

    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    match export_type {
        "transactions" => {
            let count = exporter.export_transactions_csv(writer)?;
            if output.is_some() {
                eprintln!("Exported {} transactions", count);
            }
        }
        "full" => {
            let snapshot = exporter.export_full_json(writer)?;
            if output.is_some() {
                eprintln!(
                    "Exported full snapshot: {} transactions",
                    snapshot.transactions.len()
                );
            }
        }
        _ => {
            anyhow::bail!(
                "Invalid export type '{}'. Valid types: transactions, full",
                export_type
            );
        }
    }

    Ok(())
}

async fn run_import_command(
    service: &BudgetService,
    import_type: &str,
    input: Option<&str>,
    dry_run: bool,
) -> Result<()> {
    use crate::io::{ImportOptions, Importer};
    use std::fs::File;
    use std::io::{Read, stdin};

    let importer = Importer::new(service);

    let reader: Box<dyn Read> = match input {
        Some(path) => {
            let file =
                File::open(path).with_context(|| format!("Failed to open input file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdin()),
    };

    let options = ImportOptions { dry_run };

    let result = match import_type {
        "transactions" => importer.import_transactions_csv(reader, options).await?,
        "full" => importer.import_full_json(reader, options).await?,
        _ => {
            anyhow::bail!(
                "Invalid import type '{}'. Valid types: transactions, full",
                import_type
            );
        }
    };

    if dry_run {
        println!("Dry run complete (nothing stored)");
    } else {
        println!("Import complete");
    }
    println!("  Imported: {}", result.imported);
    println!("  Skipped:  {}", result.skipped);
    println!("  Errors:   {}", result.errors.len());

    if !result.errors.is_empty() {
        println!("\nErrors:");
        for error in result.errors.iter().take(10) {
            println!(
                "  Line {}: {}{}",
                error.line,
                error
                    .field
                    .as_ref()
                    .map(|f| format!("{}: ", f))
                    .unwrap_or_default(),
                error.error
            );
        }
        if result.errors.len() > 10 {
            println!("  ... and {} more errors", result.errors.len() - 10);
        }
    }

    Ok(())
}

fn bar(value: i64, max: i64, width: usize) -> String {
    if max <= 0 || value <= 0 {
        return String::new();
    }
    let filled = ((value as f64 / max as f64) * width as f64).round() as usize;
    "#".repeat(filled.max(1))
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}

fn parse_id(id: &str) -> Result<Uuid> {
    Uuid::parse_str(id).context("Invalid transaction ID format (expected UUID)")
}

fn parse_type(s: &str) -> Result<TransactionType> {
    TransactionType::from_str(s)
        .ok_or_else(|| anyhow::anyhow!("Invalid type '{}'. Valid types: income, expense", s))
}

fn parse_category(s: &str) -> Result<Category> {
    Category::from_str(s).ok_or_else(|| {
        let valid: Vec<&str> = Category::ALL.iter().map(|c| c.name()).collect();
        anyhow::anyhow!("Unknown category '{}'. Valid categories: {}", s, valid.join(", "))
    })
}

fn parse_date(date_str: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .with_context(|| format!("Invalid date format '{}'. Use YYYY-MM-DD", date_str))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_is_char_safe() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("Rentier décorations", 10), "Rentier...");
        assert_eq!(truncate("ééééééééééé", 5), "éé...");
    }

    #[test]
    fn test_bar_scales_to_width() {
        assert_eq!(bar(50, 100, 10), "#####");
        assert_eq!(bar(1, 1000, 10), "#");
        assert_eq!(bar(0, 100, 10), "");
    }

    #[test]
    fn test_parse_category_error_lists_choices() {
        let err = parse_category("Groceries").unwrap_err().to_string();
        assert!(err.contains("Food & Dinner"));
        assert_eq!(parse_category("travel").unwrap(), Category::Travel);
    }

    #[test]
    fn test_cli_parses_list_filters() {
        let cli = Cli::try_parse_from([
            "tally", "list", "--type", "expense", "-c", "Gifts", "-c", "Travel", "--search", "toy",
        ])
        .unwrap();

        match cli.command {
            Commands::List {
                transaction_type,
                category,
                search,
                ..
            } => {
                assert_eq!(transaction_type, "expense");
                assert_eq!(category, vec!["Gifts", "Travel"]);
                assert_eq!(search.as_deref(), Some("toy"));
            }
            _ => panic!("expected list command"),
        }
    }
}
