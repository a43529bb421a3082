//! # recircle-api: HTTP API for ReCircle
//!
//! Axum server exposing the recycling rewards system over JSON.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         API Server                                      │
//! │                                                                         │
//! │  Client ───► HTTP (8080) ───► Handlers ───► recircle-core (rules)      │
//! │                                   │                                     │
//! │                                   ▼                                     │
//! │                             recircle-db ───► SQLite                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod state;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{extract::State, Json, Router};
use tracing::info;

use crate::auth::hash_password;
use crate::error::{ApiError, ApiResult, ErrorCode};
use crate::state::AppState;
use recircle_core::UserRole;
use recircle_db::NewAccount;

/// Builds the full route table.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        // Authentication
        .route("/api/v1/auth/signup", post(handlers::auth::signup))
        .route("/api/v1/auth/signin", post(handlers::auth::signin))
        .route("/api/v1/auth/refresh", post(handlers::auth::refresh))
        // Student routes
        .route("/api/v1/profile", get(handlers::profile::get_own_profile))
        .route("/api/v1/rate", get(handlers::rate::get_active_rate))
        .route("/api/v1/recycle", post(handlers::recycle::submit))
        .route("/api/v1/recycle/history", get(handlers::recycle::own_history))
        // Admin routes
        .route("/api/v1/admin/profiles", get(handlers::profile::list_profiles))
        .route("/api/v1/admin/rate", put(handlers::rate::set_rate))
        .route("/api/v1/admin/rate/history", get(handlers::rate::rate_history))
        .route("/api/v1/admin/recycle/stats", get(handlers::recycle::stats))
        .route("/api/v1/admin/redeem", post(handlers::redeem::redeem))
        .route(
            "/api/v1/admin/redemptions",
            get(handlers::redeem::redemption_history),
        )
        .fallback(not_found)
        .with_state(state)
}

/// GET /health
///
/// Liveness probe: checks that the database answers a trivial query.
async fn health(State(state): State<Arc<AppState>>) -> ApiResult<Json<serde_json::Value>> {
    if !state.db.health_check().await {
        return Err(ApiError::new(
            ErrorCode::StoreUnavailable,
            "Database is not responding",
        ));
    }
    Ok(Json(serde_json::json!({ "status": "ok" })))
}

/// Creates the admin account named in the configuration, if it does not
/// already exist. Called once at startup.
pub async fn bootstrap_admin(state: &AppState) -> Result<(), Box<dyn std::error::Error>> {
    let (student_id, password) = match (
        state.config.admin_student_id.as_deref(),
        state.config.admin_password.as_deref(),
    ) {
        (Some(id), Some(pw)) => (id, pw),
        _ => return Ok(()),
    };

    if state.db.accounts().student_id_exists(student_id).await? {
        return Ok(());
    }

    let password_hash = hash_password(password).map_err(|e| e.to_string())?;

    state
        .db
        .accounts()
        .create_account(&NewAccount {
            student_id: student_id.to_string(),
            name: "Administrator".to_string(),
            email: format!("{}@recircle.local", student_id),
            password_hash,
            role: UserRole::Admin,
        })
        .await?;

    info!(student_id, "Bootstrapped admin account");
    Ok(())
}

/// Fallback for unmatched routes.
pub async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}
