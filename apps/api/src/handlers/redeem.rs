//! Point redemption handlers.
//!
//! Redemption is an admin operation: the student presents their ID at the
//! counter, the admin enters the points, and the payout is handed over in
//! cash.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::AdminUser;
use crate::error::ApiResult;
use crate::state::AppState;
use recircle_core::{validate_redemption, CoreError, RedemptionHistoryEntry, RedemptionRecord};

#[derive(Debug, Deserialize)]
pub struct RedeemRequest {
    pub student_id: String,
    pub points: i64,
}

/// The recorded payout plus the balance after deduction.
#[derive(Debug, Serialize)]
pub struct RedeemResponse {
    pub record: RedemptionRecord,
    pub points_balance: i64,
}

/// POST /api/v1/admin/redeem
///
/// Redeems a student's points for money. The preconditions (positive
/// quantity, at least one whole unit, sufficient balance) are checked
/// against a snapshot first for precise error reporting; the decrement
/// itself re-checks the balance inside the transaction, so a concurrent
/// redemption cannot overdraw.
pub async fn redeem(
    State(state): State<Arc<AppState>>,
    admin: AdminUser,
    Json(req): Json<RedeemRequest>,
) -> ApiResult<Json<RedeemResponse>> {
    let rate = state.require_active_rate().await?;

    let student_id = req.student_id.trim();
    let profile = state
        .db
        .accounts()
        .get_profile_by_student_id(student_id)
        .await?
        .ok_or_else(|| CoreError::ProfileNotFound(student_id.to_string()))?;

    let money = validate_redemption(req.points, profile.points, &rate)?;

    let record = state
        .db
        .redemptions()
        .redeem(&profile.user_id, req.points, money, &rate.id)
        .await?;

    let profile = state.db.accounts().require_profile(&profile.user_id).await?;

    info!(
        admin = %admin.0.student_id,
        student_id = %profile.student_id,
        points = req.points,
        money_satang = money.satang(),
        "Points redeemed"
    );

    Ok(Json(RedeemResponse {
        record,
        points_balance: profile.points,
    }))
}

/// GET /api/v1/admin/redemptions
///
/// All redemptions, newest first, with student identity joined in.
pub async fn redemption_history(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
) -> ApiResult<Json<Vec<RedemptionHistoryEntry>>> {
    let history = state.db.redemptions().history(100).await?;
    Ok(Json(history))
}
