//! Axum route handlers for the tailoring API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::state::AppState;
use crate::tailor::fetcher::{tailor_resume, TailoredFields};

#[derive(Debug, Deserialize)]
pub struct TailorRequest {
    pub job_description: String,
}

#[derive(Debug, Serialize)]
pub struct TailorResponse {
    pub tailored: TailoredFields,
}

/// POST /api/v1/resume/tailor
///
/// Tailors the loaded resume to the supplied job description and applies the
/// accepted fields to the store. The trigger surface disables itself on empty
/// input; an empty body here is rejected before any attempt is made.
pub async fn handle_tailor(
    State(state): State<AppState>,
    Json(request): Json<TailorRequest>,
) -> Result<Json<TailorResponse>, AppError> {
    if request.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "job_description cannot be empty".to_string(),
        ));
    }

    let tailored = tailor_resume(
        state.llm.as_ref(),
        state.store.as_ref(),
        &request.job_description,
    )
    .await?;

    Ok(Json(TailorResponse { tailored }))
}
