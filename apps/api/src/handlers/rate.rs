//! Exchange-rate handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use tracing::info;

use crate::auth::{AdminUser, AuthUser};
use crate::error::ApiResult;
use crate::state::AppState;
use recircle_core::{validate_rate_fields, CoreError, ExchangeRate};

#[derive(Debug, Deserialize)]
pub struct SetRateRequest {
    pub bottles_per_unit: i64,
    pub money_per_unit_satang: i64,
}

/// GET /api/v1/rate
///
/// The active exchange rate, served through the cache. 404 when no rate is
/// active.
pub async fn get_active_rate(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
) -> ApiResult<Json<ExchangeRate>> {
    let rate = state.require_active_rate().await?;
    Ok(Json(rate))
}

/// PUT /api/v1/admin/rate
///
/// Replaces the active rate and invalidates the cache so the new rate takes
/// effect on the next request. Admin only.
pub async fn set_rate(
    State(state): State<Arc<AppState>>,
    admin: AdminUser,
    Json(req): Json<SetRateRequest>,
) -> ApiResult<Json<ExchangeRate>> {
    validate_rate_fields(req.bottles_per_unit, req.money_per_unit_satang)
        .map_err(CoreError::from)?;

    let rate = state
        .db
        .rates()
        .set_rate(req.bottles_per_unit, req.money_per_unit_satang)
        .await?;

    state.rate_cache.invalidate().await;

    info!(
        admin = %admin.0.student_id,
        rate_id = %rate.id,
        bottles_per_unit = rate.bottles_per_unit,
        money_per_unit_satang = rate.money_per_unit_satang,
        "Exchange rate changed"
    );

    Ok(Json(rate))
}

/// GET /api/v1/admin/rate/history
///
/// Past and present rates, newest first. Admin only.
pub async fn rate_history(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
) -> ApiResult<Json<Vec<ExchangeRate>>> {
    let rates = state.db.rates().history(100).await?;
    Ok(Json(rates))
}
