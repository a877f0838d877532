//! The ledger engine: the only writer of account balances.
//!
//! Each money movement is one atomic unit: the balance write(s) and the
//! ledger entry commit together or not at all. Serialization per account
//! uses optimistic concurrency: every balance write is conditional on the
//! account `version` read during validation, and a stale version rolls the
//! whole unit back and revalidates from a fresh read. Preconditions are
//! therefore never trusted across the read-to-commit window.

use bigdecimal::BigDecimal;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::queries;
use crate::domain::{Account, Transaction};
use crate::error::AppError;
use crate::validation;

/// Contention retries before giving up on an operation.
const MAX_BALANCE_RETRIES: u32 = 5;

#[derive(Clone)]
pub struct LedgerService {
    pool: SqlitePool,
}

impl LedgerService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Deposits carry no ownership check: any authenticated caller may
    /// credit any active account.
    pub async fn deposit(
        &self,
        account_id: Uuid,
        amount: BigDecimal,
        description: Option<String>,
    ) -> Result<Transaction, AppError> {
        validation::validate_amount(&amount)?;
        validation::validate_description(&description)?;

        for attempt in 0..MAX_BALANCE_RETRIES {
            let account = self.load_account(account_id).await?;

            let record = Transaction::deposit(
                account.id,
                amount.clone(),
                description.clone().unwrap_or_else(|| "Deposit".to_string()),
            );
            let new_balance = &account.balance + &amount;

            if self
                .commit_unit(&record, &[(&account, new_balance)])
                .await?
            {
                tracing::info!(transaction_id = %record.id, account_id = %account_id, "deposit completed");
                return Ok(record);
            }

            tracing::debug!(account_id = %account_id, attempt, "balance version moved, retrying deposit");
        }

        Err(AppError::Conflict(
            "deposit aborted after repeated balance contention".to_string(),
        ))
    }

    pub async fn withdraw(
        &self,
        account_id: Uuid,
        amount: BigDecimal,
        description: Option<String>,
        requester_id: Uuid,
    ) -> Result<Transaction, AppError> {
        validation::validate_amount(&amount)?;
        validation::validate_description(&description)?;

        for attempt in 0..MAX_BALANCE_RETRIES {
            let account = self.load_account(account_id).await?;

            if account.user_id != requester_id {
                return Err(AppError::Forbidden(
                    "only the account owner may withdraw".to_string(),
                ));
            }
            if amount > account.available_balance() {
                return Err(AppError::InsufficientFunds);
            }

            let record = Transaction::withdrawal(
                account.id,
                amount.clone(),
                description
                    .clone()
                    .unwrap_or_else(|| "Withdrawal".to_string()),
            );
            let new_balance = &account.balance - &amount;

            if self
                .commit_unit(&record, &[(&account, new_balance)])
                .await?
            {
                tracing::info!(transaction_id = %record.id, account_id = %account_id, "withdrawal completed");
                return Ok(record);
            }

            tracing::debug!(account_id = %account_id, attempt, "balance version moved, retrying withdrawal");
        }

        Err(AppError::Conflict(
            "withdrawal aborted after repeated balance contention".to_string(),
        ))
    }

    pub async fn transfer(
        &self,
        from_account_id: Uuid,
        to_account_id: Uuid,
        amount: BigDecimal,
        description: Option<String>,
        requester_id: Uuid,
    ) -> Result<Transaction, AppError> {
        if from_account_id == to_account_id {
            return Err(AppError::SameAccount);
        }
        validation::validate_amount(&amount)?;
        validation::validate_description(&description)?;

        for attempt in 0..MAX_BALANCE_RETRIES {
            let source = self.load_account(from_account_id).await?;

            if source.user_id != requester_id {
                return Err(AppError::Forbidden(
                    "only the account owner may transfer".to_string(),
                ));
            }

            // An inactive destination does not resolve and is
            // indistinguishable from a nonexistent one.
            let destination = self.load_account(to_account_id).await?;

            if amount > source.available_balance() {
                return Err(AppError::InsufficientFunds);
            }

            let record = Transaction::transfer(
                source.id,
                destination.id,
                amount.clone(),
                description.clone().unwrap_or_else(|| {
                    format!("Transfer to account {}", destination.account_number)
                }),
            );
            let source_balance = &source.balance - &amount;
            let destination_balance = &destination.balance + &amount;

            // Fixed id order keeps the write sequence deterministic for
            // any pair of concurrent transfers over the same accounts.
            let mut writes = [
                (&source, source_balance),
                (&destination, destination_balance),
            ];
            writes.sort_by_key(|(account, _)| account.id);

            if self.commit_unit(&record, &writes).await? {
                tracing::info!(
                    transaction_id = %record.id,
                    from_account_id = %from_account_id,
                    to_account_id = %to_account_id,
                    "transfer completed"
                );
                return Ok(record);
            }

            tracing::debug!(
                from_account_id = %from_account_id,
                to_account_id = %to_account_id,
                attempt,
                "balance version moved, retrying transfer"
            );
        }

        Err(AppError::Conflict(
            "transfer aborted after repeated balance contention".to_string(),
        ))
    }

    async fn load_account(&self, account_id: Uuid) -> Result<Account, AppError> {
        queries::get_account(&self.pool, account_id)
            .await?
            .ok_or(AppError::AccountNotFound(account_id))
    }

    /// Applies the conditional balance writes and the ledger entry in one
    /// database transaction. Returns false (after rolling back) when any
    /// account version turned out stale.
    async fn commit_unit(
        &self,
        record: &Transaction,
        writes: &[(&Account, BigDecimal)],
    ) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        for (account, new_balance) in writes {
            if !queries::try_set_balance(&mut tx, account.id, new_balance, account.version).await? {
                tx.rollback().await?;
                return Ok(false);
            }
        }

        queries::insert_transaction(&mut tx, record).await?;
        tx.commit().await?;

        Ok(true)
    }
}
