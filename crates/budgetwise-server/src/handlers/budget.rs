//! Budget pipeline handlers: CSV import, prompt compilation, advice
//!
//! `POST /api/prompt` and `POST /api/advice` take the same body. When `csv`
//! is present it takes precedence over the session's manual rows; a CSV that
//! lacks the required columns falls back to the session (with the schema
//! message as a warning) if one was given.

use std::sync::Arc;

use axum::{extract::State, Json};
use budgetwise_core::{
    import_table, normalize, parse_table, Advice, CategoryShare, ExpenseMapping, ExpenseSource,
    Ledger, SurveyAnswers,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{AppError, AppState};

#[derive(Debug, Deserialize)]
pub struct BudgetRequest {
    /// Session whose rows are used in manual mode
    #[serde(default)]
    pub session_id: Option<String>,
    /// Income typed by the user (manual mode only)
    #[serde(default)]
    pub income: Option<f64>,
    /// Raw CSV text with Type, Category and Amount columns
    #[serde(default)]
    pub csv: Option<String>,
    #[serde(default)]
    pub survey: SurveyAnswers,
}

/// Where a ledger came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerSource {
    Csv,
    Manual,
}

struct ResolvedLedger {
    ledger: Ledger,
    source: LedgerSource,
    warning: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub income: f64,
    pub expenses: ExpenseMapping,
    pub breakdown: Vec<CategoryShare>,
    pub total_expenses: f64,
    pub row_count: usize,
    /// Rows whose Type was neither income nor expense
    pub ignored_rows: usize,
}

#[derive(Debug, Serialize)]
pub struct PromptResponse {
    pub summary: String,
    pub prompt: String,
    pub source: LedgerSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    pub income: f64,
    pub expenses: ExpenseMapping,
}

#[derive(Debug, Serialize)]
pub struct AdviceResponse {
    #[serde(flatten)]
    pub advice: Advice,
    pub source: LedgerSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// POST /api/import - Normalize a raw CSV body
pub async fn import_csv(body: String) -> Result<Json<ImportResponse>, AppError> {
    let table = parse_table(body.as_bytes())?;
    let report = import_table(&table)?;
    let expenses = report.ledger.expenses;

    debug!(
        rows = report.row_count,
        ignored = report.ignored_rows,
        categories = expenses.len(),
        "Imported CSV"
    );

    Ok(Json(ImportResponse {
        income: report.ledger.income,
        breakdown: expenses.breakdown(),
        total_expenses: expenses.total(),
        expenses,
        row_count: report.row_count,
        ignored_rows: report.ignored_rows,
    }))
}

/// POST /api/prompt - Compile the summary and prompt without calling the provider
pub async fn compile_prompt(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BudgetRequest>,
) -> Result<Json<PromptResponse>, AppError> {
    let resolved = resolve_ledger(&state, &req).await?;
    let compiled = state.compiler.compile(
        resolved.ledger.income,
        &resolved.ledger.expenses,
        &req.survey,
    );

    Ok(Json(PromptResponse {
        summary: compiled.summary,
        prompt: compiled.prompt,
        source: resolved.source,
        warning: resolved.warning,
        income: resolved.ledger.income,
        expenses: resolved.ledger.expenses,
    }))
}

/// POST /api/advice - Compile the prompt and ask the advice provider
pub async fn request_advice(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BudgetRequest>,
) -> Result<Json<AdviceResponse>, AppError> {
    let advisor = state.advisor.as_ref().ok_or_else(|| {
        AppError::service_unavailable(
            "No advice provider configured. Set GOOGLE_API_KEY or choose another AI_BACKEND.",
        )
    })?;

    let resolved = resolve_ledger(&state, &req).await?;
    let advice = advisor.advise(&resolved.ledger, &req.survey).await?;

    Ok(Json(AdviceResponse {
        advice,
        source: resolved.source,
        warning: resolved.warning,
    }))
}

async fn resolve_ledger(state: &AppState, req: &BudgetRequest) -> Result<ResolvedLedger, AppError> {
    if let Some(ref csv) = req.csv {
        let table = parse_table(csv.as_bytes())?;
        match import_table(&table) {
            Ok(report) => {
                return Ok(ResolvedLedger {
                    ledger: report.ledger,
                    source: LedgerSource::Csv,
                    warning: None,
                })
            }
            Err(e) if e.is_schema() && req.session_id.is_some() => {
                warn!("{}; using session entries instead", e);
                let mut resolved = manual_ledger(state, req).await?;
                resolved.warning = Some(e.to_string());
                return Ok(resolved);
            }
            Err(e) => return Err(e.into()),
        }
    }

    manual_ledger(state, req).await
}

async fn manual_ledger(state: &AppState, req: &BudgetRequest) -> Result<ResolvedLedger, AppError> {
    let income = req.income.unwrap_or(0.0);
    if !income.is_finite() || income < 0.0 {
        return Err(AppError::bad_request(
            "Income must be a non-negative number",
        ));
    }

    let entries = match req.session_id {
        Some(ref id) => state
            .sessions
            .entries(id)
            .await
            .ok_or_else(|| AppError::not_found("Session not found"))?,
        None => Vec::new(),
    };

    let ledger = normalize(ExpenseSource::Manual {
        entries: &entries,
        income,
    })?;

    Ok(ResolvedLedger {
        ledger,
        source: LedgerSource::Manual,
        warning: None,
    })
}
