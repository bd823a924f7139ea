//! Expense normalizer
//!
//! Turns either an imported table or a sheet of manual entries into a
//! [`Ledger`]: total income plus the canonical expense mapping. Both modes
//! are pure; the only failure is a table missing its required columns.

use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::import::Table;
use crate::models::{CsvRow, ExpenseEntry, ExpenseMapping, Ledger, RowKind};

/// Where expenses come from
#[derive(Debug, Clone, Copy)]
pub enum ExpenseSource<'a> {
    /// An imported table; income is summed from its `income` rows
    Table(&'a Table),
    /// A snapshot of manual entries plus the income typed by the user
    Manual {
        entries: &'a [ExpenseEntry],
        income: f64,
    },
}

/// Normalize expenses from either source into a ledger
pub fn normalize(source: ExpenseSource<'_>) -> Result<Ledger> {
    match source {
        ExpenseSource::Table(table) => Ok(import_table(table)?.ledger),
        ExpenseSource::Manual { entries, income } => Ok(aggregate_entries(entries, income)),
    }
}

/// Ledger from a table plus what was dropped along the way
#[derive(Debug, Clone, Serialize)]
pub struct TableImport {
    pub ledger: Ledger,
    pub row_count: usize,
    /// Rows whose `Type` was neither income nor expense
    pub ignored_rows: usize,
}

/// Normalize a table and report how many rows were ignored
pub fn import_table(table: &Table) -> Result<TableImport> {
    let rows = table.rows()?;
    let ignored_rows = rows
        .iter()
        .filter(|r| RowKind::parse(&r.kind).is_none())
        .count();

    Ok(TableImport {
        ledger: aggregate_rows(&rows),
        row_count: rows.len(),
        ignored_rows,
    })
}

/// Sum income rows and group expense rows by exact category
///
/// Zero and negative amounts are kept as-is. Expense rows with an empty
/// category cell have no group and are dropped; income rows count regardless.
pub fn aggregate_rows(rows: &[CsvRow]) -> Ledger {
    let mut ledger = Ledger::default();

    for row in rows {
        match RowKind::parse(&row.kind) {
            Some(RowKind::Income) => ledger.income += row.amount,
            Some(RowKind::Expense) if row.category.is_empty() => {
                debug!("Dropping expense row without a category")
            }
            Some(RowKind::Expense) => ledger.expenses.accumulate(&row.category, row.amount),
            None => debug!("Ignoring row with type '{}'", row.kind),
        }
    }

    ledger
}

/// Merge manual entries by effective label, skipping non-positive amounts
pub fn aggregate_entries(entries: &[ExpenseEntry], income: f64) -> Ledger {
    let expenses: ExpenseMapping = entries
        .iter()
        .filter(|e| e.amount > 0.0)
        .map(|e| (e.effective_label().to_string(), e.amount))
        .collect();

    Ledger { income, expenses }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::parse_table;
    use crate::models::{EntryId, ExpenseCategory};

    fn entry(id: u64, category: ExpenseCategory, label: &str, amount: f64) -> ExpenseEntry {
        ExpenseEntry {
            id: EntryId(id),
            category,
            custom_label: label.to_string(),
            amount,
        }
    }

    #[test]
    fn test_table_sums_by_type_and_category() {
        let csv = "Type,Category,Amount\n\
                   Income,Salary,3000\n\
                   Expense,Food,200\n\
                   Expense,Food,50\n\
                   Expense,Rent,1000\n";
        let table = parse_table(csv.as_bytes()).unwrap();

        let ledger = normalize(ExpenseSource::Table(&table)).unwrap();
        assert_eq!(ledger.income, 3000.0);
        assert_eq!(ledger.expenses.len(), 2);
        assert_eq!(ledger.expenses.get("Food"), Some(250.0));
        assert_eq!(ledger.expenses.get("Rent"), Some(1000.0));
    }

    #[test]
    fn test_type_is_case_insensitive_category_is_not() {
        let rows = vec![
            CsvRow::new("INCOME", "Salary", 1000.0),
            CsvRow::new("income", "Bonus", 500.0),
            CsvRow::new("expense", "Food", 10.0),
            CsvRow::new("Expense", "food", 5.0),
        ];

        let ledger = aggregate_rows(&rows);
        assert_eq!(ledger.income, 1500.0);
        assert_eq!(ledger.expenses.get("Food"), Some(10.0));
        assert_eq!(ledger.expenses.get("food"), Some(5.0));
    }

    #[test]
    fn test_table_drops_expenses_without_category() {
        let csv = "Type,Category,Amount\n\
                   Income,,1200\n\
                   Expense,,75\n\
                   Expense,Food,30\n";
        let table = parse_table(csv.as_bytes()).unwrap();

        let ledger = normalize(ExpenseSource::Table(&table)).unwrap();
        assert_eq!(ledger.income, 1200.0);
        assert_eq!(ledger.expenses.len(), 1);
        assert_eq!(ledger.expenses.get(""), None);
        assert_eq!(ledger.expenses.get("Food"), Some(30.0));
    }

    #[test]
    fn test_table_keeps_zero_and_negative_totals() {
        let rows = vec![
            CsvRow::new("Expense", "Refund", -20.0),
            CsvRow::new("Expense", "Free", 0.0),
        ];

        let ledger = aggregate_rows(&rows);
        assert_eq!(ledger.income, 0.0);
        assert_eq!(ledger.expenses.get("Refund"), Some(-20.0));
        assert_eq!(ledger.expenses.get("Free"), Some(0.0));
    }

    #[test]
    fn test_unknown_types_are_counted_and_dropped() {
        let csv = "Type,Category,Amount\n\
                   Transfer,Savings,500\n\
                   Expense,Food,20\n\
                   ,Misc,5\n";
        let table = parse_table(csv.as_bytes()).unwrap();

        let report = import_table(&table).unwrap();
        assert_eq!(report.row_count, 3);
        assert_eq!(report.ignored_rows, 2);
        assert_eq!(report.ledger.expenses.len(), 1);
        assert_eq!(report.ledger.income, 0.0);
    }

    #[test]
    fn test_missing_column_is_schema_error() {
        let table = parse_table("Type,Category\nIncome,Salary\n".as_bytes()).unwrap();
        let err = normalize(ExpenseSource::Table(&table)).unwrap_err();

        assert!(err.is_schema());
        match err {
            crate::Error::Schema { missing } => assert_eq!(missing, vec!["Amount"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_manual_excludes_non_positive_and_merges() {
        let entries = vec![
            entry(1, ExpenseCategory::Food, "", 100.0),
            entry(2, ExpenseCategory::Other, "Gym", 40.0),
            entry(3, ExpenseCategory::Food, "", 0.0),
        ];

        let ledger = normalize(ExpenseSource::Manual {
            entries: &entries,
            income: 2000.0,
        })
        .unwrap();

        assert_eq!(ledger.income, 2000.0);
        assert_eq!(ledger.expenses.len(), 2);
        assert_eq!(ledger.expenses.get("Food"), Some(100.0));
        assert_eq!(ledger.expenses.get("Gym"), Some(40.0));
    }

    #[test]
    fn test_manual_custom_label_merges_with_builtin() {
        let entries = vec![
            entry(1, ExpenseCategory::Food, "", 60.0),
            entry(2, ExpenseCategory::Other, "Food", 15.0),
            entry(3, ExpenseCategory::Other, "Gym", -5.0),
        ];

        let ledger = aggregate_entries(&entries, 0.0);
        assert_eq!(ledger.expenses.len(), 1);
        assert_eq!(ledger.expenses.get("Food"), Some(75.0));
    }

    #[test]
    fn test_manual_empty_sheet() {
        let ledger = aggregate_entries(&[], 1200.0);
        assert_eq!(ledger.income, 1200.0);
        assert!(ledger.expenses.is_empty());
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let entries = vec![
            entry(1, ExpenseCategory::Rent, "", 900.0),
            entry(2, ExpenseCategory::Other, "Pets", 35.5),
        ];
        let source = ExpenseSource::Manual {
            entries: &entries,
            income: 2500.0,
        };

        let first = normalize(source).unwrap();
        let second = normalize(source).unwrap();
        assert_eq!(first, second);
    }
}
