//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use std::io::Write;

use budgetwise_core::survey::{Goal, Topic};
use budgetwise_core::{ExpenseCategory, SurveyAnswers};
use clap::Parser;
use tempfile::NamedTempFile;

use crate::cli::{Cli, Commands, InputArgs, PromptsAction};
use crate::commands::{self, build_sheet, load_ledger, load_survey, parse_expense_spec};

fn write_temp(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn manual(income: Option<f64>, expenses: &[&str]) -> InputArgs {
    InputArgs {
        csv: None,
        income,
        expenses: expenses.iter().map(|s| s.to_string()).collect(),
    }
}

// ========== Expense Spec Tests ==========

#[test]
fn test_parse_expense_spec_builtin() {
    let spec = parse_expense_spec("Food=120").unwrap();
    assert_eq!(spec.category, ExpenseCategory::Food);
    assert_eq!(spec.custom_label, "");
    assert_eq!(spec.amount, 120.0);

    let spec = parse_expense_spec("rent = 1200.50").unwrap();
    assert_eq!(spec.category, ExpenseCategory::Rent);
    assert_eq!(spec.amount, 1200.5);
}

#[test]
fn test_parse_expense_spec_custom_label() {
    let spec = parse_expense_spec("Other:Gym=40").unwrap();
    assert_eq!(spec.category, ExpenseCategory::Other);
    assert_eq!(spec.custom_label, "Gym");
    assert_eq!(spec.amount, 40.0);
}

#[test]
fn test_parse_expense_spec_errors() {
    let err = parse_expense_spec("Gym=40").unwrap_err();
    assert!(err.to_string().contains("Other:Gym"));

    assert!(parse_expense_spec("Food:Lunch=10").is_err());
    assert!(parse_expense_spec("Food").is_err());
    assert!(parse_expense_spec("Food=lots").is_err());
}

#[test]
fn test_build_sheet_fills_first_row() {
    let sheet = build_sheet(&["Food=100".to_string(), "Other:Gym=40".to_string()]).unwrap();
    assert_eq!(sheet.len(), 2);

    let rows = sheet.snapshot();
    assert_eq!(rows[0].category, ExpenseCategory::Food);
    assert_eq!(rows[1].effective_label(), "Gym");
}

#[test]
fn test_build_sheet_empty_keeps_blank_row() {
    let sheet = build_sheet(&[]).unwrap();
    assert_eq!(sheet.len(), 1);
    assert_eq!(sheet.snapshot()[0].amount, 0.0);
}

#[test]
fn test_build_sheet_rejects_negative_amount() {
    assert!(build_sheet(&["Food=-5".to_string()]).is_err());
}

// ========== Ledger Loading Tests ==========

#[test]
fn test_load_ledger_from_csv() {
    let csv = write_temp(
        "Type,Category,Amount\n\
         Income,Salary,3000\n\
         Expense,Food,100\n\
         expense,Food,50\n\
         Transfer,Savings,500\n",
    );
    let inputs = InputArgs {
        csv: Some(csv.path().to_path_buf()),
        ..Default::default()
    };

    let loaded = load_ledger(&inputs).unwrap();
    assert_eq!(loaded.source, "csv");
    assert_eq!(loaded.ledger.income, 3000.0);
    assert_eq!(loaded.ledger.expenses.get("Food"), Some(150.0));
    assert_eq!(loaded.ignored_rows, 1);
    assert!(loaded.warning.is_none());
}

#[test]
fn test_load_ledger_csv_schema_falls_back_to_manual() {
    let csv = write_temp("Date,Amount\n2024-01-01,10\n");
    let inputs = InputArgs {
        csv: Some(csv.path().to_path_buf()),
        income: Some(2000.0),
        expenses: vec!["Rent=800".to_string()],
    };

    let loaded = load_ledger(&inputs).unwrap();
    assert_eq!(loaded.source, "manual");
    assert_eq!(loaded.ledger.income, 2000.0);
    assert_eq!(loaded.ledger.expenses.get("Rent"), Some(800.0));
    assert!(loaded.warning.unwrap().contains("'Type', 'Category', and 'Amount'"));
}

#[test]
fn test_load_ledger_csv_schema_error_without_manual() {
    let csv = write_temp("Date,Amount\n2024-01-01,10\n");
    let inputs = InputArgs {
        csv: Some(csv.path().to_path_buf()),
        ..Default::default()
    };

    let err = load_ledger(&inputs).unwrap_err();
    assert!(format!("{:#}", err).contains("Please make sure your CSV has"));
}

#[test]
fn test_load_ledger_manual() {
    let loaded = load_ledger(&manual(Some(2500.0), &["Food=200", "Other:Gym=40"])).unwrap();
    assert_eq!(loaded.source, "manual");
    assert_eq!(loaded.ledger.income, 2500.0);
    assert_eq!(loaded.ledger.expenses.total(), 240.0);
    assert_eq!(loaded.ignored_rows, 0);
}

#[test]
fn test_load_ledger_rejects_negative_income() {
    assert!(load_ledger(&manual(Some(-1.0), &[])).is_err());
}

#[test]
fn test_load_ledger_rejects_non_finite_income() {
    assert!(load_ledger(&manual(Some(f64::NAN), &[])).is_err());
    assert!(load_ledger(&manual(Some(f64::INFINITY), &[])).is_err());
}

#[test]
fn test_load_ledger_missing_csv_file() {
    let inputs = InputArgs {
        csv: Some("/nonexistent/budget.csv".into()),
        ..Default::default()
    };
    assert!(load_ledger(&inputs).is_err());
}

// ========== Survey Tests ==========

#[test]
fn test_load_survey_defaults_without_file() {
    assert_eq!(load_survey(None).unwrap(), SurveyAnswers::default());
}

#[test]
fn test_load_survey_from_file() {
    let file = write_temp(
        "goal = \"pay_off_debt\"\n\
         topics = [\"saving\", \"Investing\"]\n",
    );
    let survey = load_survey(Some(file.path())).unwrap();
    assert_eq!(survey.goal, Goal::PayOffDebt);
    assert_eq!(survey.topics, vec![Topic::Saving, Topic::Investing]);
}

#[test]
fn test_load_survey_invalid_option() {
    let file = write_temp("goal = \"get_rich\"\n");
    assert!(load_survey(Some(file.path())).is_err());
}

#[test]
fn test_survey_template_parses_to_defaults() {
    let template = commands::survey_template();
    assert!(template.contains("pay_off_debt (Pay off debt)"));

    let parsed = SurveyAnswers::from_toml(&template).unwrap();
    assert_eq!(parsed, SurveyAnswers::default());
}

// ========== Output Tests ==========

#[test]
fn test_format_breakdown() {
    let loaded = load_ledger(&manual(Some(1000.0), &["Food=300", "Rent=100"])).unwrap();
    let out = commands::format_breakdown(&loaded);

    assert!(out.contains("manual input"));
    assert!(out.contains("Income: $1000.00"));
    assert!(out.contains("Food"));
    assert!(out.contains("75.0%"));
    assert!(out.contains("Total expenses"));
    assert!(out.contains("600.00"));
}

#[test]
fn test_format_breakdown_no_expenses() {
    let loaded = load_ledger(&manual(Some(1000.0), &[])).unwrap();
    assert!(commands::format_breakdown(&loaded).contains("No expenses entered."));
}

#[test]
fn test_cmd_prompts_show_unknown() {
    let err = commands::cmd_prompts_show("nope").unwrap_err();
    assert!(err.to_string().contains("budget_advice"));
}

#[test]
fn test_cmd_summarize_and_prompt() {
    let inputs = manual(Some(3000.0), &["Food=200"]);
    assert!(commands::cmd_summarize(&inputs).is_ok());
    assert!(commands::cmd_prompt(&inputs, None).is_ok());
}

#[tokio::test]
async fn test_cmd_advise_dry_run() {
    let inputs = manual(Some(3000.0), &["Food=200"]);
    let result = commands::cmd_advise(None, &inputs, None, None, true).await;
    assert!(result.is_ok());
}

// ========== Argument Parsing Tests ==========

#[test]
fn test_parse_advise_args() {
    let cli = Cli::try_parse_from([
        "budgetwise",
        "advise",
        "--csv",
        "budget.csv",
        "--income",
        "2500",
        "-e",
        "Food=10",
        "-e",
        "Other:Gym=5",
        "--model",
        "gemini-1.5-pro",
        "--dry-run",
    ])
    .unwrap();

    match cli.command {
        Commands::Advise {
            inputs,
            model,
            dry_run,
            survey,
        } => {
            assert_eq!(inputs.csv.unwrap().to_str(), Some("budget.csv"));
            assert_eq!(inputs.income, Some(2500.0));
            assert_eq!(inputs.expenses, vec!["Food=10", "Other:Gym=5"]);
            assert_eq!(model.as_deref(), Some("gemini-1.5-pro"));
            assert!(dry_run);
            assert!(survey.is_none());
        }
        _ => panic!("expected advise"),
    }
}

#[test]
fn test_parse_global_flags_and_prompts() {
    let cli = Cli::try_parse_from(["budgetwise", "prompts", "show", "survey_summary", "-v"]).unwrap();
    assert!(cli.verbose);
    assert!(matches!(
        cli.command,
        Commands::Prompts {
            action: Some(PromptsAction::Show { .. })
        }
    ));

    let cli = Cli::try_parse_from(["budgetwise", "--config", "my.toml", "config"]).unwrap();
    assert_eq!(cli.config.unwrap().to_str(), Some("my.toml"));
}

#[test]
fn test_parse_serve_args() {
    let cli = Cli::try_parse_from(["budgetwise", "serve", "--port", "8080"]).unwrap();
    match cli.command {
        Commands::Serve { port, host } => {
            assert_eq!(port, Some(8080));
            assert!(host.is_none());
        }
        _ => panic!("expected serve"),
    }
}
