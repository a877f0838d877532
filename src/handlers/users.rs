use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::AppState;
use crate::error::AppError;
use crate::middleware::auth::AuthenticatedUser;
use crate::services::users::{RegisterUser, UpdateProfile, UserService};

#[derive(Debug, Deserialize)]
pub struct RegisterPayload {
    pub full_name: String,
    pub cpf: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfilePayload {
    pub full_name: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

// Placeholder digest until a real credential layer replaces the bearer
// scheme in middleware::auth.
fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterPayload>,
) -> Result<impl IntoResponse, AppError> {
    let user = UserService::new(state.db.clone())
        .register(RegisterUser {
            full_name: payload.full_name,
            cpf: payload.cpf,
            email: payload.email,
            password_hash: hash_password(&payload.password),
            phone: payload.phone,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<impl IntoResponse, AppError> {
    let user = UserService::new(state.db.clone())
        .authenticate(&payload.email, &hash_password(&payload.password))
        .await?
        .ok_or_else(|| AppError::Unauthorized("invalid email or password".to_string()))?;

    Ok(Json(LoginResponse {
        token: user.id.to_string(),
    }))
}

pub async fn me(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let user = UserService::new(state.db.clone()).get(user.user_id).await?;
    Ok(Json(user))
}

pub async fn update_me(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<UpdateProfilePayload>,
) -> Result<impl IntoResponse, AppError> {
    let user = UserService::new(state.db.clone())
        .update_profile(
            user.user_id,
            UpdateProfile {
                full_name: payload.full_name,
                phone: payload.phone,
            },
        )
        .await?;

    Ok(Json(user))
}

pub async fn deactivate_me(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    UserService::new(state.db.clone())
        .deactivate(user.user_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
