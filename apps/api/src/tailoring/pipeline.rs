//! Tailored Resume Pipeline: orchestrates one tailoring request end to end.
//!
//! Flow: validate → read profile → build prompt → generate → extract/validate →
//!       render HTML → compose PDF → upload → append history.
//!
//! Strictly sequential, single attempt per stage. The history append is the
//! only durable write and it is last, so any earlier failure (or the caller
//! going away) leaves the profile untouched.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::config::Config;
use crate::errors::AppError;
use crate::llm_client::TextGenerator;
use crate::models::profile::{ResumeContent, StoredResume};
use crate::profile::ProfileStore;
use crate::render::{PdfCompositor, ResumeRenderer};
use crate::storage::{ArtifactPublisher, ObjectStore};
use crate::tailoring::extract::extract_payload;
use crate::tailoring::prompt_builder::build_prompt;
use crate::tailoring::prompts::TAILOR_SYSTEM;

/// Upper bound on job description size. Longer input is almost always a
/// pasted page rather than a posting, and it inflates the model call.
pub const MAX_JOB_DESCRIPTION_CHARS: usize = 20_000;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// Request body for `POST /api/v1/tailor-resume`.
///
/// Fields default to empty so that a missing field is reported as an
/// `INVALID_REQUEST` rather than a body rejection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TailorResumeRequest {
    pub user_id: String,
    pub job_description: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TailoredResumeResponse {
    pub tailored_resume: ResumeContent,
    pub artifact_url: String,
    pub stored_resume: StoredResume,
}

/// Time budget for each suspension point.
#[derive(Debug, Clone, Copy)]
pub struct StageTimeouts {
    pub profile_read: Duration,
    pub generation: Duration,
    pub render: Duration,
    pub upload: Duration,
    pub history_append: Duration,
}

impl StageTimeouts {
    pub fn from_config(config: &Config) -> Self {
        Self {
            profile_read: config.db_timeout,
            generation: config.llm_timeout,
            render: config.render_timeout,
            upload: config.storage_timeout,
            history_append: config.db_timeout,
        }
    }

    #[cfg(test)]
    pub fn uniform(timeout: Duration) -> Self {
        Self {
            profile_read: timeout,
            generation: timeout,
            render: timeout,
            upload: timeout,
            history_append: timeout,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Request validation
// ────────────────────────────────────────────────────────────────────────────

pub fn parse_user_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| AppError::InvalidRequest(format!("userId '{raw}' is not a valid UUID")))
}

pub fn validate_job_description(job_description: &str) -> Result<(), AppError> {
    if job_description.trim().is_empty() {
        return Err(AppError::InvalidRequest(
            "jobDescription cannot be empty".to_string(),
        ));
    }
    let length = job_description.chars().count();
    if length > MAX_JOB_DESCRIPTION_CHARS {
        return Err(AppError::InvalidRequest(format!(
            "jobDescription is {length} characters; the limit is {MAX_JOB_DESCRIPTION_CHARS}"
        )));
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Immutable once built; shared across concurrent requests behind an `Arc`.
pub struct TailoringPipeline {
    profiles: Arc<dyn ProfileStore>,
    generator: Arc<dyn TextGenerator>,
    renderer: ResumeRenderer,
    compositor: Arc<dyn PdfCompositor>,
    publisher: ArtifactPublisher,
    timeouts: StageTimeouts,
}

impl TailoringPipeline {
    pub fn new(
        profiles: Arc<dyn ProfileStore>,
        generator: Arc<dyn TextGenerator>,
        renderer: ResumeRenderer,
        compositor: Arc<dyn PdfCompositor>,
        store: Arc<dyn ObjectStore>,
        timeouts: StageTimeouts,
    ) -> Self {
        let publisher = ArtifactPublisher::new(
            store,
            profiles.clone(),
            timeouts.upload,
            timeouts.history_append,
        );
        Self {
            profiles,
            generator,
            renderer,
            compositor,
            publisher,
            timeouts,
        }
    }

    /// Runs the full pipeline for one request.
    ///
    /// Input is validated before any I/O. Each stage aborts the chain on
    /// failure; see `AppError` for how failures are classified.
    pub async fn generate_tailored_resume(
        &self,
        request: &TailorResumeRequest,
    ) -> Result<TailoredResumeResponse, AppError> {
        // Step 0: Validate input
        let user_id = parse_user_id(&request.user_id)?;
        validate_job_description(&request.job_description)?;

        // Step 1: Load master profile
        let profile = tokio::time::timeout(
            self.timeouts.profile_read,
            self.profiles.read_profile(user_id),
        )
        .await
        .map_err(|_| {
            AppError::Database(format!(
                "profile read timed out after {:?}",
                self.timeouts.profile_read
            ))
        })??;

        // Step 2: Build prompt
        let prompt = build_prompt(&profile, &request.job_description)?;
        info!(
            "Tailoring resume for user {user_id}: prompt {} chars, {} prior resumes",
            prompt.len(),
            profile.stored_resumes.len()
        );

        // Step 3: Generative call (single attempt)
        let reply = tokio::time::timeout(
            self.timeouts.generation,
            self.generator.generate(&prompt, TAILOR_SYSTEM),
        )
        .await
        .map_err(|_| {
            AppError::Upstream(format!(
                "no reply within {:?}",
                self.timeouts.generation
            ))
        })?
        .map_err(|e| AppError::Upstream(e.to_string()))?;

        // Step 4: Extract + validate
        let tailored = extract_payload(&reply)?;
        info!("Tailored payload validated for user {user_id}");

        // Step 5: Render HTML
        let html = self.renderer.render(&tailored)?;

        // Step 6: Compose PDF
        let pdf = tokio::time::timeout(self.timeouts.render, self.compositor.compose(&html))
            .await
            .map_err(|_| {
                AppError::Render(format!(
                    "PDF composition timed out after {:?}",
                    self.timeouts.render
                ))
            })??;

        // Step 7: Upload artifact
        let artifact_url = self.publisher.publish(user_id, pdf).await?;

        // Step 8: Record in history (the only durable profile write)
        let updated = self
            .publisher
            .append_history(user_id, &artifact_url)
            .await?;

        let stored_resume = updated
            .stored_resumes
            .iter()
            .rev()
            .find(|entry| entry.link == artifact_url)
            .cloned()
            .ok_or_else(|| AppError::Persistence {
                artifact_url: artifact_url.clone(),
                message: "appended entry missing from returned history".to_string(),
            })?;

        info!(
            "Generated '{}' for user {user_id}: {artifact_url}",
            stored_resume.name
        );

        Ok(TailoredResumeResponse {
            tailored_resume: tailored,
            artifact_url,
            stored_resume,
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
