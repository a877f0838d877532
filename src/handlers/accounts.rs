use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use bigdecimal::BigDecimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::AppState;
use crate::domain::AccountType;
use crate::error::AppError;
use crate::middleware::auth::AuthenticatedUser;
use crate::services::accounts::AccountService;

#[derive(Debug, Deserialize)]
pub struct OpenAccountPayload {
    pub account_type: AccountType,
    #[serde(default, deserialize_with = "crate::handlers::amount::deserialize_opt")]
    pub initial_deposit: Option<BigDecimal>,
}

pub async fn list_accounts(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let accounts = AccountService::new(state.db.clone())
        .list_by_owner(user.user_id)
        .await?;

    Ok(Json(accounts))
}

pub async fn get_account(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let account = AccountService::new(state.db.clone()).get(id).await?;

    if account.user_id != user.user_id {
        return Err(AppError::Forbidden(
            "account belongs to another user".to_string(),
        ));
    }

    Ok(Json(account))
}

pub async fn open_account(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<OpenAccountPayload>,
) -> Result<impl IntoResponse, AppError> {
    let initial_deposit = payload.initial_deposit.unwrap_or_else(|| BigDecimal::from(0));

    let account = AccountService::new(state.db.clone())
        .open(user.user_id, payload.account_type, initial_deposit)
        .await?;

    Ok((StatusCode::CREATED, Json(account)))
}

pub async fn close_account(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let service = AccountService::new(state.db.clone());
    let account = service.get(id).await?;

    if account.user_id != user.user_id {
        return Err(AppError::Forbidden(
            "account belongs to another user".to_string(),
        ));
    }

    service.close(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
