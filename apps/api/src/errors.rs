use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use crate::profile::ProfileStoreError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("No master profile for user {0}")]
    ProfileNotFound(Uuid),

    #[error("Generative service error: {0}")]
    Upstream(String),

    #[error("Malformed AI output: {0}")]
    MalformedAiOutput(String),

    #[error("AI output does not match the resume schema: {0}")]
    SchemaMismatch(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Storage error: {0}")]
    Storage(String),

    /// The artifact was uploaded but could not be linked into the history.
    #[error("Failed to record artifact {artifact_url} in history: {message}")]
    Persistence {
        artifact_url: String,
        message: String,
    },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Stable machine-readable code, shared by the HTTP body and logs.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidRequest(_) => "INVALID_REQUEST",
            AppError::ProfileNotFound(_) => "PROFILE_NOT_FOUND",
            AppError::Upstream(_) => "UPSTREAM_ERROR",
            AppError::MalformedAiOutput(_) => "MALFORMED_AI_OUTPUT",
            AppError::SchemaMismatch(_) => "SCHEMA_MISMATCH",
            AppError::Render(_) => "RENDER_ERROR",
            AppError::Storage(_) => "STORAGE_ERROR",
            AppError::Persistence { .. } => "PERSISTENCE_ERROR",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::ProfileNotFound(_) => StatusCode::NOT_FOUND,
            AppError::Upstream(_)
            | AppError::MalformedAiOutput(_)
            | AppError::SchemaMismatch(_)
            | AppError::Storage(_) => StatusCode::BAD_GATEWAY,
            AppError::Render(_)
            | AppError::Persistence { .. }
            | AppError::Database(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();

        let message = match &self {
            AppError::InvalidRequest(msg) => msg.clone(),
            AppError::ProfileNotFound(user_id) => {
                format!("No master profile exists for user {user_id}")
            }
            AppError::Upstream(msg) => {
                tracing::error!("Generative service error: {msg}");
                "The resume tailoring service is unavailable. Please try again later.".to_string()
            }
            AppError::MalformedAiOutput(msg) => {
                tracing::warn!("Malformed AI output: {msg}");
                "The AI reply could not be read as a resume. Please try again.".to_string()
            }
            AppError::SchemaMismatch(msg) => {
                tracing::warn!("AI output schema mismatch: {msg}");
                format!("The AI reply was incomplete: {msg}. Please try again.")
            }
            AppError::Render(msg) => {
                tracing::error!("Render error: {msg}");
                "The resume document could not be rendered".to_string()
            }
            AppError::Storage(msg) => {
                tracing::error!("Storage error: {msg}");
                "The resume could not be uploaded. Please try again later.".to_string()
            }
            AppError::Persistence {
                artifact_url,
                message,
            } => {
                tracing::error!("History append failed for {artifact_url}: {message}");
                "The resume was generated but could not be saved to your history".to_string()
            }
            AppError::Database(msg) => {
                tracing::error!("Database error: {msg}");
                "A database error occurred".to_string()
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                "An internal server error occurred".to_string()
            }
        };

        let mut error = json!({
            "code": code,
            "message": message
        });
        if let AppError::Persistence { artifact_url, .. } = &self {
            error["artifactUrl"] = json!(artifact_url);
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}

impl From<ProfileStoreError> for AppError {
    fn from(e: ProfileStoreError) -> Self {
        match e {
            ProfileStoreError::NotFound(user_id) => AppError::ProfileNotFound(user_id),
            ProfileStoreError::Database(e) => AppError::Database(e.to_string()),
        }
    }
}
