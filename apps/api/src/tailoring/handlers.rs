//! Axum route handler for the Tailoring API.

use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::errors::AppError;
use crate::state::AppState;
use crate::tailoring::pipeline::{TailorResumeRequest, TailoredResumeResponse};

/// POST /api/v1/tailor-resume
///
/// Body: `{ "userId": "<uuid>", "jobDescription": "<text>" }`.
/// Unreadable bodies are reported as `INVALID_REQUEST` like any other bad input.
pub async fn handle_tailor_resume(
    State(state): State<AppState>,
    body: Result<Json<TailorResumeRequest>, JsonRejection>,
) -> Result<Json<TailoredResumeResponse>, AppError> {
    let Json(request) = body.map_err(|e| AppError::InvalidRequest(e.body_text()))?;
    let response = state.pipeline.generate_tailored_resume(&request).await?;
    Ok(Json(response))
}
