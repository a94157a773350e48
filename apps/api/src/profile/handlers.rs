use axum::{
    extract::{Path, State},
    Json,
};

use crate::errors::AppError;
use crate::models::profile::StoredResume;
use crate::state::AppState;
use crate::tailoring::pipeline::parse_user_id;

/// GET /api/v1/profiles/:user_id/resumes
///
/// Returns the stored-resume history, oldest first.
pub async fn handle_list_stored_resumes(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<StoredResume>>, AppError> {
    let user_id = parse_user_id(&user_id)?;
    let profile = state.profiles.read_profile(user_id).await?;
    Ok(Json(profile.stored_resumes))
}
