//! Budgetwise CLI - Budget summary and financial advice
//!
//! Usage:
//!   budgetwise summarize --csv budget.csv            Expense breakdown
//!   budgetwise prompt --csv budget.csv -s survey.toml Compile the advice prompt
//!   budgetwise advise --income 3000 -e Rent=1200      Ask the advice provider
//!   budgetwise serve --port 3000                      Start web API

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Summarize { inputs } => commands::cmd_summarize(&inputs),
        Commands::Prompt { inputs, survey } => commands::cmd_prompt(&inputs, survey.as_deref()),
        Commands::Advise {
            inputs,
            survey,
            model,
            dry_run,
        } => {
            commands::cmd_advise(
                config_path,
                &inputs,
                survey.as_deref(),
                model.as_deref(),
                dry_run,
            )
            .await
        }
        Commands::SurveyTemplate => commands::cmd_survey_template(),
        Commands::Prompts { action } => match action {
            None | Some(PromptsAction::List) => commands::cmd_prompts_list(),
            Some(PromptsAction::Show { prompt_id }) => commands::cmd_prompts_show(&prompt_id),
            Some(PromptsAction::Path) => commands::cmd_prompts_path(),
        },
        Commands::Provider { action } => match action {
            ProviderAction::Test { model, no_probe } => {
                commands::cmd_provider_test(config_path, model.as_deref(), !no_probe).await
            }
        },
        Commands::Config => commands::cmd_config_show(config_path),
        Commands::Serve { port, host } => {
            commands::cmd_serve(config_path, host.as_deref(), port).await
        }
    }
}
