//! Budget command implementations (summarize, prompt, advise)

use std::path::Path;

use anyhow::{bail, Context, Result};
use budgetwise_core::{AIClient, AdviceBackend, Advisor, PromptCompiler, PromptLibrary};

use super::{load_config, load_ledger, load_survey, LoadedLedger};
use crate::cli::InputArgs;

/// Templates from the prompt library (user overrides win)
fn load_compiler() -> Result<PromptCompiler> {
    let mut library = PromptLibrary::new();
    PromptCompiler::from_library(&mut library).context("Failed to load prompt templates")
}

fn print_source(loaded: &LoadedLedger) {
    if let Some(ref warning) = loaded.warning {
        println!("⚠️  {}", warning);
        println!("   Falling back to manual income and expenses.");
        println!();
    }
    if loaded.ignored_rows > 0 {
        println!(
            "ℹ️  Ignored {} row(s) whose Type was neither Income nor Expense",
            loaded.ignored_rows
        );
        println!();
    }
}

/// Show income and the per-category expense breakdown
pub fn cmd_summarize(inputs: &InputArgs) -> Result<()> {
    let loaded = load_ledger(inputs)?;
    print_source(&loaded);
    print!("{}", format_breakdown(&loaded));
    Ok(())
}

/// Render the ledger as a small table
pub fn format_breakdown(loaded: &LoadedLedger) -> String {
    let ledger = &loaded.ledger;
    let mut out = String::new();

    out.push_str(&format!("📊 Budget ({} input)\n\n", loaded.source));
    out.push_str(&format!("  Income: ${:.2}\n\n", ledger.income));

    if ledger.expenses.is_empty() {
        out.push_str("  No expenses entered.\n");
        return out;
    }

    out.push_str(&format!("  {:<24} {:>12} {:>8}\n", "CATEGORY", "AMOUNT", "SHARE"));
    out.push_str(&format!("  {}\n", "-".repeat(46)));
    for share in ledger.expenses.breakdown() {
        out.push_str(&format!(
            "  {:<24} {:>12.2} {:>7.1}%\n",
            share.label, share.amount, share.percent
        ));
    }
    out.push_str(&format!("  {}\n", "-".repeat(46)));

    let total = ledger.expenses.total();
    out.push_str(&format!("  {:<24} {:>12.2}\n", "Total expenses", total));
    out.push_str(&format!(
        "  {:<24} {:>12.2}\n",
        "Left over",
        ledger.income - total
    ));
    out
}

/// Compile the summary and prompt and print both
pub fn cmd_prompt(inputs: &InputArgs, survey: Option<&Path>) -> Result<()> {
    let loaded = load_ledger(inputs)?;
    let survey = load_survey(survey)?;
    let compiler = load_compiler()?;

    print_source(&loaded);
    let compiled = compiler.compile(loaded.ledger.income, &loaded.ledger.expenses, &survey);

    println!("🧠 Survey summary\n");
    println!("{}\n", compiled.summary);
    println!("--- Prompt ---");
    println!("{}", compiled.prompt);

    Ok(())
}

/// Compile the prompt and ask the configured advice provider
pub async fn cmd_advise(
    config_path: Option<&Path>,
    inputs: &InputArgs,
    survey: Option<&Path>,
    model: Option<&str>,
    dry_run: bool,
) -> Result<()> {
    let loaded = load_ledger(inputs)?;
    let survey = load_survey(survey)?;
    let compiler = load_compiler()?;

    print_source(&loaded);

    if dry_run {
        let compiled = compiler.compile(loaded.ledger.income, &loaded.ledger.expenses, &survey);
        println!("--- Prompt (dry run, not sent) ---");
        println!("{}", compiled.prompt);
        return Ok(());
    }

    let config = load_config(config_path)?;
    let Some(mut client) = AIClient::from_config(&config.provider) else {
        bail!(
            "No advice provider configured for backend '{}'. \
             Set GOOGLE_API_KEY for Gemini, or choose another backend with AI_BACKEND \
             (ollama, openai_compatible, mock).",
            config.provider.backend
        );
    };
    if let Some(model) = model {
        client = client.with_model(model);
    }

    let advisor = Advisor::with_compiler(client, compiler);
    println!(
        "💬 Asking {} ({})...\n",
        advisor.client().backend_name(),
        advisor.client().model()
    );

    let advice = advisor
        .advise(&loaded.ledger, &survey)
        .await
        .context("Failed to get advice")?;

    println!("💡 Your personalized financial advice\n");
    println!("{}", advice.text);

    Ok(())
}
