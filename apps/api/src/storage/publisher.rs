//! Artifact Publisher: uploads a rendered resume and links it into the
//! profile's stored-resume history.
//!
//! The two steps fail differently. An upload failure leaves nothing behind.
//! An append failure after a successful upload leaves an unlinked artifact:
//! the error carries its URL so the caller can recover it. The append is not
//! retried automatically, because a commit that failed ambiguously would be
//! recorded twice.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::MasterResumeProfile;
use crate::profile::{ProfileStore, ProfileStoreError};
use crate::storage::ObjectStore;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Object key for a new artifact: `resumes/{user}/{unix_millis}-{uuid}.pdf`.
/// The random suffix keeps keys unique even within the same millisecond.
pub fn artifact_key(user_id: Uuid, now: DateTime<Utc>) -> String {
    format!(
        "resumes/{}/{}-{}.pdf",
        user_id,
        now.timestamp_millis(),
        Uuid::new_v4().simple()
    )
}

#[derive(Clone)]
pub struct ArtifactPublisher {
    store: Arc<dyn ObjectStore>,
    profiles: Arc<dyn ProfileStore>,
    upload_timeout: Duration,
    append_timeout: Duration,
}

impl ArtifactPublisher {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        profiles: Arc<dyn ProfileStore>,
        upload_timeout: Duration,
        append_timeout: Duration,
    ) -> Self {
        Self {
            store,
            profiles,
            upload_timeout,
            append_timeout,
        }
    }

    /// Uploads the PDF under a fresh key and returns its URL.
    pub async fn publish(&self, user_id: Uuid, pdf: Vec<u8>) -> Result<String, AppError> {
        let key = artifact_key(user_id, Utc::now());

        let url = tokio::time::timeout(
            self.upload_timeout,
            self.store.put(Bytes::from(pdf), &key, PDF_CONTENT_TYPE),
        )
        .await
        .map_err(|_| {
            AppError::Storage(format!(
                "upload of {key} timed out after {:?}",
                self.upload_timeout
            ))
        })??;

        info!("Published artifact for user {user_id}: {url}");
        Ok(url)
    }

    /// Appends `{ "Resume N+1", artifact_url }` to the user's history.
    pub async fn append_history(
        &self,
        user_id: Uuid,
        artifact_url: &str,
    ) -> Result<MasterResumeProfile, AppError> {
        let appended = tokio::time::timeout(
            self.append_timeout,
            self.profiles.append_resume_history(user_id, artifact_url),
        )
        .await;

        let failure = match appended {
            Ok(Ok(profile)) => return Ok(profile),
            Ok(Err(ProfileStoreError::NotFound(id))) => {
                error!("Profile {id} disappeared before {artifact_url} could be recorded");
                return Err(AppError::ProfileNotFound(id));
            }
            Ok(Err(ProfileStoreError::Database(e))) => e.to_string(),
            Err(_) => format!("history append timed out after {:?}", self.append_timeout),
        };

        error!(
            "Orphaned artifact for user {user_id}: {artifact_url} was uploaded but not recorded ({failure})"
        );
        Err(AppError::Persistence {
            artifact_url: artifact_url.to_string(),
            message: failure,
        })
    }
}
