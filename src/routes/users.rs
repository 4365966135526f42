//! User registration, login, and profile.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::{self, CurrentUser};
use crate::error::{ApiError, Result};
use crate::store::users::{self, User};
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
    #[validate(length(min = 1))]
    pub first_name: String,
    #[validate(length(min = 1))]
    pub last_name: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>> {
    req.validate().map_err(|e| ApiError::bad_request(e.to_string()))?;
    if users::find_by_email(&state.db, &req.email).await?.is_some() {
        return Err(ApiError::bad_request("Email already registered"));
    }

    let password_hash = auth::hash_password(&req.password)?;
    let user = User::new(req.email, password_hash, req.first_name, req.last_name);
    users::insert(&state.db, &user).await?;
    let token = auth::issue_token(user.id, &state.config.jwt_secret)?;
    tracing::info!(user_id = %user.id, "user registered");
    Ok(Json(AuthResponse { user, token }))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let user = users::find_by_email(&state.db, &req.email)
        .await?
        .filter(|u| auth::verify_password(&req.password, &u.password_hash))
        .ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;
    let token = auth::issue_token(user.id, &state.config.jwt_secret)?;
    Ok(Json(AuthResponse { user, token }))
}

pub async fn profile(CurrentUser(user): CurrentUser) -> Json<User> {
    Json(user)
}
