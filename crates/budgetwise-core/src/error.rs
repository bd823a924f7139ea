//! Error types for Budgetwise

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The uploaded table lacks one or more of the `Type`, `Category`, `Amount` columns
    #[error(
        "Please make sure your CSV has 'Type', 'Category', and 'Amount' columns (missing: {})",
        .missing.join(", ")
    )]
    Schema { missing: Vec<String> },

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Advice provider error: {0}")]
    Provider(String),
}

impl Error {
    /// Whether this is the missing-columns error raised for tabular input
    pub fn is_schema(&self) -> bool {
        matches!(self, Self::Schema { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
