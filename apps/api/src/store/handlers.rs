//! Axum route handlers for loading and reading the resume document.

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::ResumeSnapshot;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct LoadResumeResponse {
    pub id: Uuid,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ResumeDetailResponse {
    pub id: Uuid,
    pub updated_at: DateTime<Utc>,
    pub document: Value,
}

/// PUT /api/v1/resume
///
/// Loads (or replaces) the live resume document. The body is validated
/// against the tailorable-subtree schema before anything is stored.
pub async fn handle_load_resume(
    State(state): State<AppState>,
    Json(document): Json<Value>,
) -> Result<Json<LoadResumeResponse>, AppError> {
    ResumeSnapshot::from_value(document.clone())?;

    let stored = state.store.replace(document);
    info!("Loaded resume document {}", stored.id);

    Ok(Json(LoadResumeResponse {
        id: stored.id,
        updated_at: stored.updated_at,
    }))
}

/// GET /api/v1/resume
///
/// Returns the current document, including any fields written by the
/// tailor/translate pipelines since it was loaded.
pub async fn handle_get_resume(
    State(state): State<AppState>,
) -> Result<Json<ResumeDetailResponse>, AppError> {
    let stored = state
        .store
        .get()
        .ok_or_else(|| AppError::NotFound("no resume document is loaded".to_string()))?;

    Ok(Json(ResumeDetailResponse {
        id: stored.id,
        updated_at: stored.updated_at,
        document: stored.document,
    }))
}
