use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::AppState;
use crate::db::queries;
use crate::error::AppError;
use crate::middleware::auth::AuthenticatedUser;
use crate::services::ledger::LedgerService;
use crate::services::statement::StatementService;

#[derive(Debug, Deserialize)]
pub struct DepositPayload {
    pub account_id: Uuid,
    #[serde(deserialize_with = "crate::handlers::amount::deserialize")]
    pub amount: BigDecimal,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WithdrawPayload {
    pub account_id: Uuid,
    #[serde(deserialize_with = "crate::handlers::amount::deserialize")]
    pub amount: BigDecimal,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TransferPayload {
    pub from_account_id: Uuid,
    pub to_account_id: Uuid,
    #[serde(deserialize_with = "crate::handlers::amount::deserialize")]
    pub amount: BigDecimal,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatementQuery {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

pub async fn deposit(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Json(payload): Json<DepositPayload>,
) -> Result<impl IntoResponse, AppError> {
    let transaction = LedgerService::new(state.db.clone())
        .deposit(payload.account_id, payload.amount, payload.description)
        .await?;

    Ok((StatusCode::CREATED, Json(transaction)))
}

pub async fn withdraw(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<WithdrawPayload>,
) -> Result<impl IntoResponse, AppError> {
    let transaction = LedgerService::new(state.db.clone())
        .withdraw(
            payload.account_id,
            payload.amount,
            payload.description,
            user.user_id,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(transaction)))
}

pub async fn transfer(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<TransferPayload>,
) -> Result<impl IntoResponse, AppError> {
    let transaction = LedgerService::new(state.db.clone())
        .transfer(
            payload.from_account_id,
            payload.to_account_id,
            payload.amount,
            payload.description,
            user.user_id,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(transaction)))
}

/// A transaction is visible only to owners of an account on either side.
pub async fn get_transaction(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let transaction = queries::get_transaction(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Transaction {} not found", id)))?;

    let accounts = queries::get_accounts_by_user(&state.db, user.user_id).await?;
    let visible = accounts.iter().any(|account| {
        transaction.from_account_id == Some(account.id)
            || transaction.to_account_id == Some(account.id)
    });

    if !visible {
        return Err(AppError::Forbidden(
            "transaction belongs to another user".to_string(),
        ));
    }

    Ok(Json(transaction))
}

pub async fn get_statement(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(account_id): Path<Uuid>,
    Query(query): Query<StatementQuery>,
) -> Result<impl IntoResponse, AppError> {
    let account = queries::get_account(&state.db, account_id)
        .await?
        .ok_or(AppError::AccountNotFound(account_id))?;

    if account.user_id != user.user_id {
        return Err(AppError::Forbidden(
            "account belongs to another user".to_string(),
        ));
    }

    let statement = StatementService::new(state.db.clone())
        .build(account_id, query.start_date, query.end_date)
        .await?;

    Ok(Json(statement))
}
