//! Axum route handlers for the translation API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::resume::ResumeSnapshot;
use crate::state::AppState;
use crate::translate::translator::{translate_resume, TargetLanguage};

#[derive(Debug, Deserialize)]
pub struct TranslateRequest {
    pub target_language: TargetLanguage,
}

#[derive(Debug, Serialize)]
pub struct TranslateResponse {
    pub resume: ResumeSnapshot,
}

/// POST /api/v1/resume/translate
///
/// Translates the loaded resume to the target language and stores the result.
pub async fn handle_translate(
    State(state): State<AppState>,
    Json(request): Json<TranslateRequest>,
) -> Result<Json<TranslateResponse>, AppError> {
    let resume = translate_resume(
        state.llm.as_ref(),
        state.store.as_ref(),
        request.target_language,
    )
    .await?;

    Ok(Json(TranslateResponse { resume }))
}
