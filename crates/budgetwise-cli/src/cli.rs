//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Budgetwise - Turn your budget and money habits into advice
#[derive(Parser)]
#[command(name = "budgetwise")]
#[command(about = "Budget summary and personalized financial advice", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file (defaults to ~/.local/share/budgetwise/config.toml if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where income and expenses come from
///
/// `--csv` takes precedence; `--income`/`--expense` are used when no CSV is
/// given, or as a fallback when the CSV lacks the required columns.
#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// CSV with Type, Category and Amount columns
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Monthly income (manual entry)
    #[arg(long)]
    pub income: Option<f64>,

    /// Expense row, e.g. `Food=120` or `Other:Gym=40` (repeatable)
    #[arg(short, long = "expense", value_name = "CATEGORY=AMOUNT")]
    pub expenses: Vec<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show income and the per-category expense breakdown
    Summarize {
        #[command(flatten)]
        inputs: InputArgs,
    },

    /// Compile the survey summary and advice prompt without sending it
    Prompt {
        #[command(flatten)]
        inputs: InputArgs,

        /// Survey answers (TOML); see `budgetwise survey-template`
        #[arg(short, long)]
        survey: Option<PathBuf>,
    },

    /// Compile the prompt and ask the advice provider
    Advise {
        #[command(flatten)]
        inputs: InputArgs,

        /// Survey answers (TOML); see `budgetwise survey-template`
        #[arg(short, long)]
        survey: Option<PathBuf>,

        /// Override the configured model
        #[arg(short, long)]
        model: Option<String>,

        /// Stop after compiling the prompt
        #[arg(long)]
        dry_run: bool,
    },

    /// Print a survey answers file with every option listed
    SurveyTemplate,

    /// Manage prompt templates (view, customize)
    Prompts {
        #[command(subcommand)]
        action: Option<PromptsAction>,
    },

    /// Check the advice provider
    Provider {
        #[command(subcommand)]
        action: ProviderAction,
    },

    /// Show the resolved configuration
    Config,

    /// Start the web API server
    Serve {
        /// Port to listen on (default from config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (default from config)
        #[arg(long)]
        host: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum PromptsAction {
    /// List all available prompts and their override status
    List,

    /// Show the content of a specific prompt
    Show {
        /// Prompt ID (survey_summary, budget_advice)
        prompt_id: String,
    },

    /// Show the path where prompt overrides should be placed
    Path,
}

#[derive(Subcommand)]
pub enum ProviderAction {
    /// Health check plus a short sample request
    Test {
        /// Model to test instead of the configured one
        #[arg(long)]
        model: Option<String>,

        /// Skip the sample request
        #[arg(long)]
        no_probe: bool,
    },
}
