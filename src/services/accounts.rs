//! Account opening, lookup, and closure.

use bigdecimal::BigDecimal;
use rand::Rng;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::queries;
use crate::domain::{Account, AccountType, Transaction};
use crate::error::{is_unique_violation, AppError};
use crate::validation;

/// Candidate draws before account-number allocation gives up.
const MAX_NUMBER_ATTEMPTS: u32 = 20;

/// Closure is retried a few times when it races a balance mutation.
const MAX_CLOSE_RETRIES: u32 = 5;

#[derive(Clone)]
pub struct AccountService {
    pool: SqlitePool,
}

impl AccountService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, account_id: Uuid) -> Result<Account, AppError> {
        queries::get_account(&self.pool, account_id)
            .await?
            .ok_or(AppError::AccountNotFound(account_id))
    }

    pub async fn list_by_owner(&self, user_id: Uuid) -> Result<Vec<Account>, AppError> {
        queries::get_accounts_by_user(&self.pool, user_id).await
    }

    /// Opens an account; a positive initial deposit co-creates a Completed
    /// Deposit entry in the same database transaction as the account row.
    ///
    /// The allocation pre-check and the insert are not atomic, so two
    /// concurrent opens can draw the same candidate number. The UNIQUE
    /// constraint catches the loser, which redraws instead of failing.
    pub async fn open(
        &self,
        user_id: Uuid,
        account_type: AccountType,
        initial_deposit: BigDecimal,
    ) -> Result<Account, AppError> {
        validation::validate_initial_deposit(&initial_deposit)?;

        for _ in 0..MAX_NUMBER_ATTEMPTS {
            let account_number = self.allocate_account_number().await?;
            let account =
                Account::new(user_id, account_number, account_type, initial_deposit.clone());

            let mut tx = self.pool.begin().await?;
            match queries::insert_account(&mut tx, &account).await {
                Ok(()) => {}
                Err(err) if is_unique_violation(&err, "accounts.account_number") => {
                    tx.rollback().await?;
                    tracing::debug!(
                        account_number = %account.account_number,
                        "account number taken between allocation and insert, redrawing"
                    );
                    continue;
                }
                Err(err) => return Err(err),
            }

            if initial_deposit > BigDecimal::from(0) {
                let seed = Transaction::deposit(
                    account.id,
                    initial_deposit.clone(),
                    "Initial deposit".to_string(),
                );
                queries::insert_transaction(&mut tx, &seed).await?;
            }

            tx.commit().await?;

            tracing::info!(
                account_id = %account.id,
                account_number = %account.account_number,
                user_id = %user_id,
                "account opened"
            );

            return Ok(account);
        }

        Err(AppError::Internal(
            "could not allocate a unique account number".to_string(),
        ))
    }

    /// Soft-deletes the account. The balance must be exactly zero, and the
    /// version token guards against a deposit landing mid-closure.
    pub async fn close(&self, account_id: Uuid) -> Result<(), AppError> {
        for _ in 0..MAX_CLOSE_RETRIES {
            let account = self.get(account_id).await?;

            if account.balance != BigDecimal::from(0) {
                return Err(AppError::BalanceNotZero);
            }

            if queries::try_deactivate_account(&self.pool, account.id, account.version).await? {
                tracing::info!(account_id = %account_id, "account closed");
                return Ok(());
            }
        }

        Err(AppError::Conflict(
            "account closure aborted after repeated balance contention".to_string(),
        ))
    }

    /// Generate-candidate plus existence-check loop, bounded so a dense
    /// number space cannot spin forever.
    async fn allocate_account_number(&self) -> Result<String, AppError> {
        for _ in 0..MAX_NUMBER_ATTEMPTS {
            let candidate = {
                let mut rng = rand::thread_rng();
                rng.gen_range(10_000_000u32..100_000_000).to_string()
            };

            if !queries::account_number_exists(&self.pool, &candidate).await? {
                return Ok(candidate);
            }
        }

        Err(AppError::Internal(
            "could not allocate a unique account number".to_string(),
        ))
    }
}
