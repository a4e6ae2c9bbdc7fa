use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::extract::AppJson;
use crate::models::{LoginCredentials, Signup, UserProfile};
use crate::repositories::UserRepository;
use crate::token::TokenKeys;

#[derive(Clone)]
pub struct AuthState {
    pub user_repo: UserRepository,
    pub keys: TokenKeys,
    /// When set, signup must present this code.
    pub invite_code: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub user: UserProfile,
}

pub async fn signup(
    State(state): State<AuthState>,
    AppJson(payload): AppJson<Signup>,
) -> Result<(StatusCode, Json<UserProfile>)> {
    if let Some(expected) = &state.invite_code {
        if payload.invite_code.as_deref().map(str::trim) != Some(expected.as_str()) {
            return Err(AppError::Forbidden("Invalid invite code.".to_string()));
        }
    }

    let new_user = payload.validate().map_err(AppError::Validation)?;

    if state.user_repo.find_by_email(&new_user.email).await?.is_some() {
        return Err(AppError::Conflict("Email Already Exists".to_string()));
    }
    if let Some(username) = &new_user.username {
        if state.user_repo.find_by_username(username).await?.is_some() {
            return Err(AppError::Conflict("Username Already Exists".to_string()));
        }
    }

    let user = state.user_repo.create(new_user).await?;
    tracing::info!(user_id = user.id, role = user.role.as_str(), "User signed up");

    Ok((StatusCode::CREATED, Json(UserProfile::from(&user))))
}

pub async fn login(
    State(state): State<AuthState>,
    AppJson(credentials): AppJson<LoginCredentials>,
) -> Result<Json<LoginResponse>> {
    let user = state
        .user_repo
        .verify_password(&credentials.identifier, &credentials.password)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    let access_token = state.keys.issue(&user)?;
    tracing::debug!(user_id = user.id, "Issued access token");

    Ok(Json(LoginResponse {
        access_token,
        token_type: "bearer",
        user: UserProfile::from(&user),
    }))
}
