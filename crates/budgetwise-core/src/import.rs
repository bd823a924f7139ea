//! CSV import for income/expense tables
//!
//! Expected format: a header row containing `Type`, `Category` and `Amount`
//! (exact, case-sensitive names; any order; extra columns allowed).

use csv::{ReaderBuilder, StringRecord};
use std::io::Read;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::CsvRow;

/// Column names a table must expose to be aggregated
pub const REQUIRED_COLUMNS: [&str; 3] = ["Type", "Category", "Amount"];

/// A raw table as read from CSV, before any schema check
#[derive(Debug, Clone)]
pub struct Table {
    pub columns: Vec<String>,
    pub records: Vec<StringRecord>,
}

/// Read a CSV table (header row required, rows may vary in width)
pub fn parse_table<R: Read>(reader: R) -> Result<Table> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let columns: Vec<String> = rdr
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            // Spreadsheet exports often lead with a UTF-8 BOM
            if i == 0 {
                h.trim_start_matches('\u{feff}').to_string()
            } else {
                h.to_string()
            }
        })
        .collect();

    let mut records = Vec::new();
    for result in rdr.records() {
        records.push(result?);
    }

    debug!("Read table with {} columns, {} rows", columns.len(), records.len());
    Ok(Table { columns, records })
}

impl Table {
    /// Position of a column by exact name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Required columns this table lacks, in canonical order
    pub fn missing_columns(&self) -> Vec<String> {
        REQUIRED_COLUMNS
            .iter()
            .filter(|name| self.column_index(name).is_none())
            .map(|name| name.to_string())
            .collect()
    }

    /// Fail with the schema error when any required column is absent
    pub fn check_schema(&self) -> Result<()> {
        let missing = self.missing_columns();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::Schema { missing })
        }
    }

    pub fn row_count(&self) -> usize {
        self.records.len()
    }

    /// Extract the typed rows
    ///
    /// Fails with the schema error when a required column is missing, and with
    /// `InvalidData` naming the line when an `Amount` cell is not a number.
    pub fn rows(&self) -> Result<Vec<CsvRow>> {
        self.check_schema()?;

        let (kind_idx, category_idx, amount_idx) = match (
            self.column_index("Type"),
            self.column_index("Category"),
            self.column_index("Amount"),
        ) {
            (Some(t), Some(c), Some(a)) => (t, c, a),
            _ => {
                return Err(Error::Schema {
                    missing: self.missing_columns(),
                })
            }
        };

        let mut rows = Vec::with_capacity(self.records.len());
        for (i, record) in self.records.iter().enumerate() {
            // Header is line 1
            let line = record
                .position()
                .map(|p| p.line())
                .unwrap_or(i as u64 + 2);

            let amount_str = record.get(amount_idx).unwrap_or("");
            let amount = parse_amount(amount_str).map_err(|_| {
                Error::InvalidData(format!(
                    "Line {}: Amount '{}' is not a number",
                    line, amount_str
                ))
            })?;

            rows.push(CsvRow {
                kind: record.get(kind_idx).unwrap_or("").to_string(),
                category: record.get(category_idx).unwrap_or("").to_string(),
                amount,
            });
        }

        Ok(rows)
    }
}

/// Parse an amount cell: `$1,234.56`, `-12`, `(100.00)` (accounting negative)
pub fn parse_amount(s: &str) -> Result<f64> {
    let cleaned: String = s
        .trim()
        .replace(['$', ',', ' '], "")
        .replace('(', "-")
        .replace(')', "");

    cleaned
        .parse::<f64>()
        .map_err(|_| Error::InvalidData(format!("Unable to parse amount: {}", s)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("$1,234.56").unwrap(), 1234.56);
        assert_eq!(parse_amount("-123.45").unwrap(), -123.45);
        assert_eq!(parse_amount("(100.00)").unwrap(), -100.00);
        assert_eq!(parse_amount(" 250 ").unwrap(), 250.0);
        assert!(parse_amount("twelve").is_err());
        assert!(parse_amount("").is_err());
    }

    #[test]
    fn test_parse_table_any_column_order() {
        let csv = "Amount,Note,Type,Category\n3000,paycheck,Income,Salary\n200,,Expense,Food\n";
        let table = parse_table(csv.as_bytes()).unwrap();

        assert_eq!(table.columns, vec!["Amount", "Note", "Type", "Category"]);
        assert!(table.missing_columns().is_empty());

        let rows = table.rows().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], CsvRow::new("Income", "Salary", 3000.0));
        assert_eq!(rows[1], CsvRow::new("Expense", "Food", 200.0));
    }

    #[test]
    fn test_missing_columns_are_case_sensitive() {
        let csv = "type,Category,amount\nIncome,Salary,3000\n";
        let table = parse_table(csv.as_bytes()).unwrap();

        assert_eq!(table.missing_columns(), vec!["Type", "Amount"]);
        let err = table.rows().unwrap_err();
        assert!(err.is_schema());
        assert!(err.to_string().contains("missing: Type, Amount"));
    }

    #[test]
    fn test_header_only_table() {
        let table = parse_table("Type,Category,Amount\n".as_bytes()).unwrap();
        assert_eq!(table.row_count(), 0);
        assert!(table.rows().unwrap().is_empty());
    }

    #[test]
    fn test_bom_is_stripped_from_first_header() {
        let csv = "\u{feff}Type,Category,Amount\nExpense,Food,12\n";
        let table = parse_table(csv.as_bytes()).unwrap();
        assert!(table.check_schema().is_ok());
    }

    #[test]
    fn test_non_numeric_amount_names_line() {
        let csv = "Type,Category,Amount\nExpense,Food,12\nExpense,Rent,lots\n";
        let table = parse_table(csv.as_bytes()).unwrap();

        let err = table.rows().unwrap_err();
        assert!(matches!(err, Error::InvalidData(_)));
        assert!(err.to_string().contains("Line 3"));
        assert!(err.to_string().contains("lots"));
    }

    #[test]
    fn test_short_row_reads_as_bad_amount() {
        let csv = "Type,Category,Amount\nExpense,Food\n";
        let table = parse_table(csv.as_bytes()).unwrap();
        assert!(table.rows().is_err());
    }

    #[test]
    fn test_currency_formatted_amounts() {
        let csv = "Type,Category,Amount\nExpense,Rent,\"$1,200.00\"\n";
        let rows = parse_table(csv.as_bytes()).unwrap().rows().unwrap();
        assert_eq!(rows[0].amount, 1200.0);
    }
}
