//! Domain models for Budgetwise

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

option_set! {
    /// Built-in expense categories offered by the manual entry form
    pub enum ExpenseCategory {
        Rent => ("rent", "Rent"),
        Food => ("food", "Food"),
        Transportation => ("transportation", "Transportation"),
        Utilities => ("utilities", "Utilities"),
        Subscriptions => ("subscriptions", "Subscriptions"),
        Healthcare => ("healthcare", "Healthcare"),
        Education => ("education", "Education"),
        Entertainment => ("entertainment", "Entertainment"),
        Savings => ("savings", "Savings"),
        Debt => ("debt", "Debt"),
        /// Sentinel: the row's custom label is used instead
        Other => ("other", "Other"),
    }
}

/// Opaque identifier of an expense row within one sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub u64);

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One user-editable expense row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseEntry {
    pub id: EntryId,
    pub category: ExpenseCategory,
    /// Only meaningful when `category` is `Other`; empty otherwise
    #[serde(default)]
    pub custom_label: String,
    pub amount: f64,
}

impl ExpenseEntry {
    /// A fresh row: `Other`, no label, zero amount
    pub fn blank(id: EntryId) -> Self {
        Self {
            id,
            category: ExpenseCategory::Other,
            custom_label: String::new(),
            amount: 0.0,
        }
    }

    /// The label this row aggregates under
    pub fn effective_label(&self) -> &str {
        if self.category == ExpenseCategory::Other {
            &self.custom_label
        } else {
            self.category.label()
        }
    }
}

/// Kind of a tabular row after case-insensitive normalization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowKind {
    Income,
    Expense,
}

impl RowKind {
    /// Lower-case the raw `Type` cell and match it; anything else is `None`
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_lowercase().as_str() {
            "income" => Some(Self::Income),
            "expense" => Some(Self::Expense),
            _ => None,
        }
    }
}

/// One parsed row of an income/expense table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsvRow {
    /// Raw `Type` cell
    pub kind: String,
    pub category: String,
    pub amount: f64,
}

impl CsvRow {
    pub fn new(kind: &str, category: &str, amount: f64) -> Self {
        Self {
            kind: kind.to_string(),
            category: category.to_string(),
            amount,
        }
    }
}

/// Canonical expense mapping: category label to summed amount
///
/// Iterates in ascending label order. There are no public mutators; a mapping
/// is always rebuilt from its source.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ExpenseMapping(BTreeMap<String, f64>);

impl ExpenseMapping {
    pub(crate) fn accumulate(&mut self, label: &str, amount: f64) {
        *self.0.entry(label.to_string()).or_insert(0.0) += amount;
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.0.get(label).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Sum of all category amounts
    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    /// Flat `"<label> <amount>"` list joined by `", "`
    pub fn flatten(&self) -> String {
        self.iter()
            .map(|(label, amount)| format!("{} {}", label, format_amount(amount)))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Per-category share of the total, for breakdown displays
    pub fn breakdown(&self) -> Vec<CategoryShare> {
        let total = self.total();
        self.iter()
            .map(|(label, amount)| CategoryShare {
                label: label.to_string(),
                amount,
                percent: if total > 0.0 {
                    amount / total * 100.0
                } else {
                    0.0
                },
            })
            .collect()
    }
}

impl FromIterator<(String, f64)> for ExpenseMapping {
    /// Duplicate labels are merged by summing
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        let mut mapping = Self::default();
        for (label, amount) in iter {
            mapping.accumulate(&label, amount);
        }
        mapping
    }
}

/// One slice of the expense breakdown
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub label: String,
    pub amount: f64,
    /// Percentage of total expenses (0.0 when the total is not positive)
    pub percent: f64,
}

/// Output of the expense normalizer
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Ledger {
    pub income: f64,
    pub expenses: ExpenseMapping,
}

/// Render an amount the way it is embedded in prompts (shortest round-trip form)
pub fn format_amount(amount: f64) -> String {
    format!("{}", amount)
}
