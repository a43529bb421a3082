//! Account registration and sign-in handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::{hash_password, verify_password};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use recircle_core::{
    validate_email, validate_name, validate_password, validate_student_id, CoreError, Profile,
    UserRole,
};
use recircle_db::NewAccount;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub student_id: String,
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct SigninRequest {
    pub student_id: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Tokens plus the signed-in profile.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub profile: Profile,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
}

/// POST /api/v1/auth/signup
///
/// Registers a student account. The student ID is the login identifier and
/// must be unique; the duplicate check races with the INSERT, so the unique
/// index is the real guarantee and its violation maps to the same error.
pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignupRequest>,
) -> ApiResult<Json<AuthResponse>> {
    // Normalize once; the stored values are exactly what validation saw,
    // so a padded student ID can neither shadow nor miss an existing one.
    let student_id = req.student_id.trim().to_string();
    let name = req.name.trim().to_string();
    let email = req.email.trim().to_string();

    validate_student_id(&student_id).map_err(CoreError::from)?;
    validate_name(&name).map_err(CoreError::from)?;
    validate_email(&email).map_err(CoreError::from)?;
    validate_password(&req.password).map_err(CoreError::from)?;

    if state.db.accounts().student_id_exists(&student_id).await? {
        return Err(CoreError::DuplicateStudentId(student_id).into());
    }

    let password_hash = hash_password(&req.password)?;

    let profile = state
        .db
        .accounts()
        .create_account(&NewAccount {
            student_id,
            name,
            email,
            password_hash,
            role: UserRole::Student,
        })
        .await?;

    info!(student_id = %profile.student_id, "Student account registered");

    let access_token =
        state
            .jwt
            .generate_access_token(&profile.user_id, &profile.student_id, UserRole::Student)?;
    let refresh_token =
        state
            .jwt
            .generate_refresh_token(&profile.user_id, &profile.student_id, UserRole::Student)?;

    Ok(Json(AuthResponse {
        access_token,
        refresh_token,
        profile,
    }))
}

/// POST /api/v1/auth/signin
///
/// Signs in with student ID and password. Unknown student IDs and wrong
/// passwords produce the same response.
pub async fn signin(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SigninRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let student_id = req.student_id.trim();

    let account = state
        .db
        .accounts()
        .get_account_by_student_id(student_id)
        .await?;

    let account = match account {
        Some(account) => account,
        None => {
            warn!(student_id, "Sign-in for unknown student ID");
            return Err(ApiError::authentication_failed());
        }
    };

    if !verify_password(&req.password, &account.password_hash) {
        warn!(student_id, "Sign-in with wrong password");
        return Err(ApiError::authentication_failed());
    }

    let profile = state
        .db
        .accounts()
        .require_profile(&account.id)
        .await?;

    let access_token =
        state
            .jwt
            .generate_access_token(&account.id, &profile.student_id, account.role)?;
    let refresh_token =
        state
            .jwt
            .generate_refresh_token(&account.id, &profile.student_id, account.role)?;

    info!(student_id = %profile.student_id, "Signed in");

    Ok(Json(AuthResponse {
        access_token,
        refresh_token,
        profile,
    }))
}

/// POST /api/v1/auth/refresh
///
/// Exchanges a refresh token for a fresh token pair.
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let claims = state.jwt.validate_refresh_token(&req.refresh_token)?;

    // The account may have been deleted since the token was issued
    let profile = state.db.accounts().require_profile(&claims.sub).await?;

    let role = claims.role();
    let access_token = state
        .jwt
        .generate_access_token(&claims.sub, &profile.student_id, role)?;
    let refresh_token = state
        .jwt
        .generate_refresh_token(&claims.sub, &profile.student_id, role)?;

    Ok(Json(TokenResponse {
        access_token,
        refresh_token,
    }))
}
