//! Bottle submission handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::{AdminUser, AuthUser};
use crate::error::ApiResult;
use crate::state::AppState;
use recircle_core::{
    submission_credit, validate_bottle_count, CoreError, RecyclingEntry, RecyclingStats,
};

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub bottles: i64,
}

/// The recorded entry plus the balance after crediting.
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub entry: RecyclingEntry,
    pub points_balance: i64,
}

/// POST /api/v1/recycle
///
/// Records a bottle submission: resolves the active rate, computes the
/// whole-unit money credit, then credits the balance and appends the ledger
/// row atomically.
pub async fn submit(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(req): Json<SubmitRequest>,
) -> ApiResult<Json<SubmitResponse>> {
    validate_bottle_count(req.bottles).map_err(CoreError::from)?;

    let rate = state.require_active_rate().await?;
    let credit = submission_credit(req.bottles, &rate);

    let entry = state
        .db
        .recycling()
        .submit(&user.user_id, req.bottles, credit, &rate.id)
        .await?;

    let profile = state.db.accounts().require_profile(&user.user_id).await?;

    info!(
        student_id = %user.student_id,
        bottles = req.bottles,
        money_satang = credit.satang(),
        "Bottles submitted"
    );

    Ok(Json(SubmitResponse {
        entry,
        points_balance: profile.points,
    }))
}

/// GET /api/v1/recycle/history
///
/// The signed-in student's own submissions, newest first.
pub async fn own_history(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<Json<Vec<RecyclingEntry>>> {
    let entries = state.db.recycling().list_by_user(&user.user_id, 100).await?;
    Ok(Json(entries))
}

/// GET /api/v1/admin/recycle/stats
///
/// Per-student submission totals for the admin dashboard.
pub async fn stats(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
) -> ApiResult<Json<Vec<RecyclingStats>>> {
    let stats = state.db.recycling().stats().await?;
    Ok(Json(stats))
}
