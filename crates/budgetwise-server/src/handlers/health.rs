//! Health and form option handlers

use std::sync::Arc;

use axum::{extract::State, Json};
use budgetwise_core::survey::survey_options;
use budgetwise_core::{AdviceBackend, ExpenseCategory, OptionInfo};
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ProviderStatus {
    pub backend: &'static str,
    pub model: String,
    pub healthy: bool,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// `None` when no advice provider is configured
    pub provider: Option<ProviderStatus>,
    pub sessions: usize,
}

/// GET /api/health - Server and advice provider status
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let provider = match state.advisor {
        Some(ref advisor) => {
            let client = advisor.client();
            Some(ProviderStatus {
                backend: client.backend_name(),
                model: client.model().to_string(),
                healthy: client.health_check().await,
            })
        }
        None => None,
    };

    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        provider,
        sessions: state.sessions.len().await,
    })
}

#[derive(Debug, Serialize)]
pub struct SurveyQuestion {
    pub field: &'static str,
    pub options: Vec<OptionInfo>,
}

#[derive(Debug, Serialize)]
pub struct OptionsResponse {
    pub categories: Vec<OptionInfo>,
    pub survey: Vec<SurveyQuestion>,
}

/// GET /api/options - Expense categories and every survey option set
pub async fn options() -> Json<OptionsResponse> {
    let survey = survey_options()
        .into_iter()
        .map(|(field, options)| SurveyQuestion { field, options })
        .collect();

    Json(OptionsResponse {
        categories: ExpenseCategory::options(),
        survey,
    })
}
