//! Budgetwise Core Library
//!
//! Shared functionality for the Budgetwise financial assistant:
//! - CSV import of income/expense tables
//! - Expense normalization into a canonical category mapping
//! - Financial behavior survey and prompt compilation
//! - Prompt library with user overrides
//! - Pluggable advice providers (Gemini, Ollama, OpenAI-compatible)
//! - Layered configuration (embedded defaults, override file, environment)

#[macro_use]
pub mod options;

pub mod advisor;
pub mod ai;
pub mod compile;
pub mod config;
pub mod error;
pub mod import;
pub mod models;
pub mod normalize;
pub mod prompts;
pub mod session;
pub mod survey;

/// Test utilities including a mock advice provider server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use advisor::{Advice, Advisor};
pub use ai::{
    AIClient, AdviceBackend, GeminiBackend, MockBackend, OllamaBackend, OpenAICompatibleBackend,
};
pub use compile::{compile, CompiledPrompt, PromptCompiler};
pub use config::{AdvisorConfig, BackendKind, ProviderConfig, ServerConfig};
pub use error::{Error, Result};
pub use import::{parse_table, Table};
pub use models::{
    CategoryShare, CsvRow, EntryId, ExpenseCategory, ExpenseEntry, ExpenseMapping, Ledger,
    RowKind,
};
pub use normalize::{
    aggregate_entries, aggregate_rows, import_table, normalize, ExpenseSource, TableImport,
};
pub use options::OptionInfo;
pub use prompts::{Prompt, PromptId, PromptInfo, PromptLibrary};
pub use session::{EntryUpdate, ExpenseSheet};
pub use survey::SurveyAnswers;
