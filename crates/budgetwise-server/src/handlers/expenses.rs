//! Expense sheet session handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use budgetwise_core::{EntryId, EntryUpdate, Error as CoreError, ExpenseEntry};
use tracing::debug;

use crate::sessions::SessionView;
use crate::{AppError, AppState};

fn session_not_found() -> AppError {
    AppError::not_found("Session not found")
}

/// POST /api/sessions - Start a sheet with one blank row
pub async fn create_session(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<SessionView>) {
    let view = state.sessions.create().await;
    debug!(session_id = %view.session_id, "Created session");
    (StatusCode::CREATED, Json(view))
}

/// GET /api/sessions/:id
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, AppError> {
    state
        .sessions
        .get(&id)
        .await
        .map(Json)
        .ok_or_else(session_not_found)
}

/// DELETE /api/sessions/:id
pub async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    if state.sessions.delete(&id).await {
        debug!(session_id = %id, "Deleted session");
        Ok(Json(serde_json::json!({ "deleted": true })))
    } else {
        Err(session_not_found())
    }
}

/// POST /api/sessions/:id/expenses - Append a blank row
pub async fn add_expense(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<ExpenseEntry>), AppError> {
    let entry = state
        .sessions
        .with_sheet(&id, |sheet| sheet.add())
        .await
        .ok_or_else(session_not_found)?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// PATCH /api/sessions/:id/expenses/:entry_id - Edit a row
pub async fn update_expense(
    State(state): State<Arc<AppState>>,
    Path((id, entry_id)): Path<(String, u64)>,
    Json(update): Json<EntryUpdate>,
) -> Result<Json<ExpenseEntry>, AppError> {
    let entry = state
        .sessions
        .with_sheet(&id, |sheet| sheet.update(EntryId(entry_id), update))
        .await
        .ok_or_else(session_not_found)??;
    Ok(Json(entry))
}

/// DELETE /api/sessions/:id/expenses/:entry_id - Remove a row
///
/// The last remaining row cannot be removed (409).
pub async fn remove_expense(
    State(state): State<Arc<AppState>>,
    Path((id, entry_id)): Path<(String, u64)>,
) -> Result<Json<ExpenseEntry>, AppError> {
    let result = state
        .sessions
        .with_sheet(&id, |sheet| sheet.remove(EntryId(entry_id)))
        .await
        .ok_or_else(session_not_found)?;

    match result {
        Ok(entry) => Ok(Json(entry)),
        Err(CoreError::InvalidData(msg)) => Err(AppError::conflict(&msg)),
        Err(e) => Err(e.into()),
    }
}
