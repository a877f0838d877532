//! Read-only statement projection: live balance plus transaction history
//! filtered to a date range.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::queries;
use crate::domain::Transaction;
use crate::error::AppError;

/// Period applied when the caller gives no bounds: the last 30 days.
const DEFAULT_PERIOD_DAYS: i64 = 30;

#[derive(Debug, Serialize)]
pub struct Statement {
    pub account_id: Uuid,
    pub account_number: String,
    /// Balance at call time, not as of `period_end`.
    pub current_balance: BigDecimal,
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
    pub transactions: Vec<Transaction>,
}

#[derive(Clone)]
pub struct StatementService {
    pool: SqlitePool,
}

impl StatementService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Ownership is the caller's concern; this projector only requires the
    /// account to resolve.
    pub async fn build(
        &self,
        account_id: Uuid,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Statement, AppError> {
        let account = queries::get_account(&self.pool, account_id)
            .await?
            .ok_or(AppError::AccountNotFound(account_id))?;

        // Each default is anchored at the current instant, not at the other
        // bound, so a historical `end` alone yields an empty window rather
        // than a shifted one.
        let now = Utc::now();
        let period_end = end.unwrap_or(now);
        let period_start = start.unwrap_or_else(|| now - Duration::days(DEFAULT_PERIOD_DAYS));

        let transactions = queries::list_account_transactions(
            &self.pool,
            account_id,
            Some(period_start),
            Some(period_end),
        )
        .await?;

        Ok(Statement {
            account_id: account.id,
            account_number: account.account_number,
            current_balance: account.balance,
            period_start,
            period_end,
            transactions,
        })
    }
}
