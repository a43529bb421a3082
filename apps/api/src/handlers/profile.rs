//! Profile handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use crate::auth::{AdminUser, AuthUser};
use crate::error::ApiResult;
use crate::state::AppState;
use recircle_core::Profile;

/// GET /api/v1/profile
///
/// The signed-in student's own profile, including the current point balance.
pub async fn get_own_profile(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<Json<Profile>> {
    let profile = state.db.accounts().require_profile(&user.user_id).await?;
    Ok(Json(profile))
}

/// GET /api/v1/admin/profiles
///
/// All student profiles, ordered by student ID. Admin only.
pub async fn list_profiles(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
) -> ApiResult<Json<Vec<Profile>>> {
    let profiles = state.db.accounts().list_profiles().await?;
    Ok(Json(profiles))
}
