//! Profile Store: durable master profiles and their append-only resume history.

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::models::profile::{MasterProfileRow, MasterResumeProfile, StoredResume};

#[derive(Debug, Error)]
pub enum ProfileStoreError {
    #[error("profile not found for user {0}")]
    NotFound(Uuid),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn read_profile(&self, user_id: Uuid) -> Result<MasterResumeProfile, ProfileStoreError>;

    /// Appends `{ "Resume N+1", link }` to the history as one atomic step and
    /// returns the updated profile. The name is derived from the history
    /// length observed inside the same critical section as the write.
    async fn append_resume_history(
        &self,
        user_id: Uuid,
        link: &str,
    ) -> Result<MasterResumeProfile, ProfileStoreError>;
}

/// PostgreSQL-backed profile store.
#[derive(Clone)]
pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn read_profile(&self, user_id: Uuid) -> Result<MasterResumeProfile, ProfileStoreError> {
        sqlx::query_as::<_, MasterProfileRow>("SELECT * FROM master_profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .map(MasterResumeProfile::from)
            .ok_or(ProfileStoreError::NotFound(user_id))
    }

    async fn append_resume_history(
        &self,
        user_id: Uuid,
        link: &str,
    ) -> Result<MasterResumeProfile, ProfileStoreError> {
        let mut tx = self.pool.begin().await?;

        // Row lock: concurrent appends for the same user serialize here, so
        // each one sees the length left by the previous and names are distinct.
        let history: Option<Json<Vec<StoredResume>>> = sqlx::query_scalar(
            "SELECT stored_resumes FROM master_profiles WHERE user_id = $1 FOR UPDATE",
        )
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(Json(history)) = history else {
            return Err(ProfileStoreError::NotFound(user_id));
        };

        let entry = StoredResume::numbered(history.len() + 1, link);

        let row = sqlx::query_as::<_, MasterProfileRow>(
            r#"
            UPDATE master_profiles
            SET stored_resumes = stored_resumes || $2, updated_at = NOW()
            WHERE user_id = $1
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(Json(vec![entry.clone()]))
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        info!("Appended '{}' to resume history of user {user_id}", entry.name);
        Ok(row.into())
    }
}
