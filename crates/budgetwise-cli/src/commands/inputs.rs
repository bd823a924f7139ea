//! Shared input handling for budget commands
//!
//! This module contains:
//! - `parse_expense_spec` - Parse `Food=120` / `Other:Gym=40` rows
//! - `load_ledger` - CSV or manual inputs into a ledger (with schema fallback)
//! - `load_survey` - Survey answers from a TOML file
//! - `load_config` - Resolved advisor configuration

use std::fs::File;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use budgetwise_core::{
    import_table, normalize, parse_table, AdvisorConfig, EntryUpdate, ExpenseCategory,
    ExpenseSheet, ExpenseSource, Ledger, SurveyAnswers,
};
use tracing::{debug, warn};

use crate::cli::InputArgs;

/// One manual expense row from the command line
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseSpec {
    pub category: ExpenseCategory,
    pub custom_label: String,
    pub amount: f64,
}

/// Parse `Category=Amount` or `Other:Label=Amount`
///
/// A bare label that is not a built-in category is rejected with a hint to
/// use `Other:<label>`.
pub fn parse_expense_spec(spec: &str) -> Result<ExpenseSpec> {
    let (name, amount) = spec
        .rsplit_once('=')
        .ok_or_else(|| anyhow!("Invalid expense '{}': expected CATEGORY=AMOUNT", spec))?;

    let amount: f64 = amount
        .trim()
        .parse()
        .with_context(|| format!("Invalid amount in expense '{}'", spec))?;

    let (category, custom_label) = match name.split_once(':') {
        Some((category, label)) => (category.trim(), label.trim().to_string()),
        None => (name.trim(), String::new()),
    };

    let category: ExpenseCategory = category.parse().map_err(|_| {
        anyhow!(
            "Unknown category '{}' in '{}'. Use one of: {}, or Other:{}=<amount> for a custom label",
            category,
            spec,
            ExpenseCategory::all()
                .iter()
                .map(|c| c.label())
                .collect::<Vec<_>>()
                .join(", "),
            category
        )
    })?;

    if category != ExpenseCategory::Other && !custom_label.is_empty() {
        bail!(
            "Custom labels are only allowed with Other (got '{}')",
            spec
        );
    }

    Ok(ExpenseSpec {
        category,
        custom_label,
        amount,
    })
}

/// Build an expense sheet the way the form does: the first spec fills the
/// initial row, each further spec adds a row
pub fn build_sheet(specs: &[String]) -> Result<ExpenseSheet> {
    let mut sheet = ExpenseSheet::new();

    for (i, raw) in specs.iter().enumerate() {
        let spec = parse_expense_spec(raw)?;
        let id = if i == 0 {
            sheet
                .snapshot()
                .first()
                .map(|e| e.id)
                .ok_or_else(|| anyhow!("Expense sheet has no rows"))?
        } else {
            sheet.add().id
        };

        sheet
            .update(
                id,
                EntryUpdate {
                    category: Some(spec.category),
                    custom_label: Some(spec.custom_label),
                    amount: Some(spec.amount),
                },
            )
            .with_context(|| format!("Invalid expense '{}'", raw))?;
    }

    Ok(sheet)
}

/// A ledger plus where it came from
#[derive(Debug, Clone)]
pub struct LoadedLedger {
    pub ledger: Ledger,
    /// "csv" or "manual"
    pub source: &'static str,
    /// CSV rows whose Type was neither income nor expense
    pub ignored_rows: usize,
    /// Set when the CSV failed its schema check and manual inputs were used
    pub warning: Option<String>,
}

impl InputArgs {
    fn has_manual(&self) -> bool {
        self.income.is_some() || !self.expenses.is_empty()
    }
}

/// Load income and expenses from `--csv`, or from `--income`/`--expense`
pub fn load_ledger(inputs: &InputArgs) -> Result<LoadedLedger> {
    if let Some(ref path) = inputs.csv {
        let file =
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        let table = parse_table(file).context("Failed to read CSV")?;

        match import_table(&table) {
            Ok(report) => {
                debug!(
                    rows = report.row_count,
                    ignored = report.ignored_rows,
                    "Imported {}",
                    path.display()
                );
                return Ok(LoadedLedger {
                    ledger: report.ledger,
                    source: "csv",
                    ignored_rows: report.ignored_rows,
                    warning: None,
                });
            }
            Err(e) if e.is_schema() && inputs.has_manual() => {
                warn!("{}; using manual inputs instead", e);
                let mut loaded = load_manual(inputs)?;
                loaded.warning = Some(e.to_string());
                return Ok(loaded);
            }
            Err(e) => return Err(e.into()),
        }
    }

    load_manual(inputs)
}

fn load_manual(inputs: &InputArgs) -> Result<LoadedLedger> {
    let income = inputs.income.unwrap_or(0.0);
    if !income.is_finite() || income < 0.0 {
        bail!("Income must be a non-negative number (got {})", income);
    }

    let sheet = build_sheet(&inputs.expenses)?;
    let entries = sheet.snapshot();
    let ledger = normalize(ExpenseSource::Manual {
        entries: &entries,
        income,
    })?;

    Ok(LoadedLedger {
        ledger,
        source: "manual",
        ignored_rows: 0,
        warning: None,
    })
}

/// Survey answers from a TOML file, or defaults when no file is given
pub fn load_survey(path: Option<&Path>) -> Result<SurveyAnswers> {
    match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read survey {}", path.display()))?;
            SurveyAnswers::from_toml(&content)
                .with_context(|| format!("Invalid survey file {}", path.display()))
        }
        None => Ok(SurveyAnswers::default()),
    }
}

/// Resolved advisor configuration
pub fn load_config(path: Option<&Path>) -> Result<AdvisorConfig> {
    AdvisorConfig::load(path).context("Failed to load configuration")
}
