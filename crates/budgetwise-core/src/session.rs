//! Expense sheet: the editable collection of manual expense rows
//!
//! Rows live in an arena keyed by [`EntryId`]. Ids are handed out from a
//! monotonic counter and never reused within a sheet. A sheet always holds at
//! least one row.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{EntryId, ExpenseCategory, ExpenseEntry};

/// Partial edit of one row; `None` fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EntryUpdate {
    pub category: Option<ExpenseCategory>,
    pub custom_label: Option<String>,
    pub amount: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct ExpenseSheet {
    entries: BTreeMap<EntryId, ExpenseEntry>,
    next_id: u64,
}

impl Default for ExpenseSheet {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpenseSheet {
    /// A sheet holding one blank row
    pub fn new() -> Self {
        let mut sheet = Self {
            entries: BTreeMap::new(),
            next_id: 1,
        };
        sheet.add();
        sheet
    }

    /// Append a blank row and return it
    pub fn add(&mut self) -> ExpenseEntry {
        let id = EntryId(self.next_id);
        self.next_id += 1;
        let entry = ExpenseEntry::blank(id);
        self.entries.insert(id, entry.clone());
        entry
    }

    /// Remove a row; the last remaining row cannot be removed
    pub fn remove(&mut self, id: EntryId) -> Result<ExpenseEntry> {
        if !self.entries.contains_key(&id) {
            return Err(Error::NotFound(format!("Expense entry {}", id)));
        }
        if self.entries.len() == 1 {
            return Err(Error::InvalidData(
                "Cannot remove the only expense entry".to_string(),
            ));
        }
        self.entries
            .remove(&id)
            .ok_or_else(|| Error::NotFound(format!("Expense entry {}", id)))
    }

    /// Apply a partial edit
    ///
    /// Moving a row off `Other` clears its custom label. Negative amounts are
    /// rejected and leave the row untouched.
    pub fn update(&mut self, id: EntryId, update: EntryUpdate) -> Result<ExpenseEntry> {
        if let Some(amount) = update.amount {
            if !amount.is_finite() || amount < 0.0 {
                return Err(Error::InvalidData(format!(
                    "Expense amount must be a non-negative number, got {}",
                    amount
                )));
            }
        }

        let entry = self
            .entries
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound(format!("Expense entry {}", id)))?;

        if let Some(category) = update.category {
            entry.category = category;
        }
        if let Some(label) = update.custom_label {
            entry.custom_label = label;
        }
        if let Some(amount) = update.amount {
            entry.amount = amount;
        }
        if entry.category != ExpenseCategory::Other {
            entry.custom_label.clear();
        }

        Ok(entry.clone())
    }

    pub fn get(&self, id: EntryId) -> Option<&ExpenseEntry> {
        self.entries.get(&id)
    }

    /// Rows in creation order, detached from the sheet
    pub fn snapshot(&self) -> Vec<ExpenseEntry> {
        self.entries.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
