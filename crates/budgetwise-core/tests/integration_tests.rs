//! Integration tests for budgetwise-core
//!
//! These tests exercise the full import → normalize → compile → advise workflow.

use budgetwise_core::{
    normalize, parse_table,
    survey::{Goal, Timeline, Topic, TrackingFrequency},
    AIClient, Advisor, EntryUpdate, ExpenseCategory, ExpenseSheet, ExpenseSource, MockBackend,
    SurveyAnswers,
};

/// Income and expenses with a row type the normalizer does not recognize
fn household_csv() -> &'static str {
    "Date,Type,Category,Amount,Note\n\
     2024-03-01,Income,Salary,3000,\n\
     2024-03-02,Expense,Food,200,groceries\n\
     2024-03-05,Expense,Rent,1000,\n\
     2024-03-09,Expense,Food,50,takeout\n\
     2024-03-10,Transfer,Savings,400,to savings account\n\
     2024-03-15,income,Side gig,250.5,\n"
}

fn survey() -> SurveyAnswers {
    SurveyAnswers {
        goal: Goal::Other,
        goal_custom: "Build an emergency fund".to_string(),
        timeline: Timeline::ThreeToSixMonths,
        track_spending: TrackingFrequency::Sometimes,
        topics: vec![Topic::Saving, Topic::Budgeting],
        ..Default::default()
    }
}

// =============================================================================
// Tabular workflow
// =============================================================================

#[test]
fn test_csv_to_prompt() {
    let table = parse_table(household_csv().as_bytes()).expect("Failed to read CSV");
    let ledger = normalize(ExpenseSource::Table(&table)).expect("Failed to normalize");

    assert_eq!(ledger.income, 3250.5);
    assert_eq!(ledger.expenses.len(), 2);
    assert_eq!(ledger.expenses.get("Food"), Some(250.0));
    assert_eq!(ledger.expenses.get("Rent"), Some(1000.0));
    assert_eq!(ledger.expenses.get("Savings"), None);

    let compiled = budgetwise_core::compile(ledger.income, &ledger.expenses, &survey());
    assert!(compiled.summary.starts_with("My goal is: Build an emergency fund."));
    assert!(compiled.summary.contains("I want to achieve this goal in: 3–6 months."));
    assert!(compiled.summary.contains("I sometimes track my spending."));
    assert!(compiled.summary.ends_with("I want to learn about: Saving, Budgeting."));
    assert!(compiled.prompt.contains("- My monthly income: $3250.5"));
    assert!(compiled.prompt.contains("- My expenses: Food 250, Rent 1000"));
}

#[test]
fn test_csv_without_required_columns() {
    let table = parse_table("Kind,Category,Value\nIncome,Salary,3000\n".as_bytes()).unwrap();
    let err = normalize(ExpenseSource::Table(&table)).unwrap_err();

    assert!(err.is_schema());
    assert_eq!(
        err.to_string(),
        "Please make sure your CSV has 'Type', 'Category', and 'Amount' columns (missing: Type, Amount)"
    );
}

#[test]
fn test_import_report_counts_ignored_rows() {
    let table = parse_table(household_csv().as_bytes()).unwrap();
    let report = budgetwise_core::import_table(&table).unwrap();

    assert_eq!(report.row_count, 6);
    assert_eq!(report.ignored_rows, 1);

    let breakdown = report.ledger.expenses.breakdown();
    assert_eq!(breakdown.len(), 2);
    assert!((breakdown.iter().map(|s| s.percent).sum::<f64>() - 100.0).abs() < 1e-9);
}

// =============================================================================
// Manual workflow
// =============================================================================

#[test]
fn test_sheet_to_prompt() {
    let mut sheet = ExpenseSheet::new();
    let first = sheet.snapshot()[0].id;
    sheet
        .update(
            first,
            EntryUpdate {
                category: Some(ExpenseCategory::Food),
                amount: Some(100.0),
                ..Default::default()
            },
        )
        .unwrap();

    let gym = sheet.add().id;
    sheet
        .update(
            gym,
            EntryUpdate {
                custom_label: Some("Gym".to_string()),
                amount: Some(40.0),
                ..Default::default()
            },
        )
        .unwrap();

    let zero = sheet.add().id;
    sheet
        .update(
            zero,
            EntryUpdate {
                category: Some(ExpenseCategory::Food),
                ..Default::default()
            },
        )
        .unwrap();

    let entries = sheet.snapshot();
    let ledger = normalize(ExpenseSource::Manual {
        entries: &entries,
        income: 2000.0,
    })
    .unwrap();

    assert_eq!(ledger.income, 2000.0);
    assert_eq!(ledger.expenses.flatten(), "Food 100, Gym 40");

    let compiled = budgetwise_core::compile(ledger.income, &ledger.expenses, &survey());
    assert!(compiled.prompt.contains("- My expenses: Food 100, Gym 40"));
}

// =============================================================================
// Advice
// =============================================================================

#[tokio::test]
async fn test_advice_with_mock_backend() {
    let table = parse_table(household_csv().as_bytes()).unwrap();
    let ledger = normalize(ExpenseSource::Table(&table)).unwrap();

    let advisor = Advisor::new(AIClient::Mock(MockBackend::new()));
    let advice = advisor.advise(&ledger, &survey()).await.unwrap();

    assert_eq!(advice.model, "mock");
    assert!(advice.text.contains("Mock advice"));
    assert_eq!(advice.summary, advisor.compile(&ledger, &survey()).summary);
}
