use chrono::{DateTime, Utc};
use sqlx::{Sqlite, SqlitePool, Transaction as SqlxTransaction};
use uuid::Uuid;

use crate::db::models::{money_to_text, AccountRow, TransactionRow, UserRow};
use crate::domain::{Account, Transaction, User};
use crate::error::AppError;

// --- User queries ---

pub async fn insert_user(pool: &SqlitePool, user: &User) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO users (
            id, full_name, cpf, email, password_hash, phone, is_active, created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(user.id.to_string())
    .bind(&user.full_name)
    .bind(&user.cpf)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(&user.phone)
    .bind(user.is_active)
    .bind(user.created_at)
    .bind(user.updated_at)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn get_user(pool: &SqlitePool, id: Uuid) -> Result<Option<User>, AppError> {
    let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = ? AND is_active = 1")
        .bind(id.to_string())
        .fetch_optional(pool)
        .await?;

    row.map(User::try_from).transpose()
}

pub async fn get_user_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>, AppError> {
    let row =
        sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = ? AND is_active = 1")
            .bind(email)
            .fetch_optional(pool)
            .await?;

    row.map(User::try_from).transpose()
}

// Uniqueness checks cover deactivated users too; identities are never reused.

pub async fn cpf_exists(pool: &SqlitePool, cpf: &str) -> Result<bool, AppError> {
    let row = sqlx::query("SELECT 1 FROM users WHERE cpf = ?")
        .bind(cpf)
        .fetch_optional(pool)
        .await?;

    Ok(row.is_some())
}

pub async fn email_exists(pool: &SqlitePool, email: &str) -> Result<bool, AppError> {
    let row = sqlx::query("SELECT 1 FROM users WHERE email = ?")
        .bind(email)
        .fetch_optional(pool)
        .await?;

    Ok(row.is_some())
}

/// Writes back the mutable profile fields. Affects zero rows when the user
/// is missing or already deactivated.
pub async fn update_user(pool: &SqlitePool, user: &User) -> Result<bool, AppError> {
    let result = sqlx::query(
        "UPDATE users SET full_name = ?, phone = ?, updated_at = ? WHERE id = ? AND is_active = 1",
    )
    .bind(&user.full_name)
    .bind(&user.phone)
    .bind(user.updated_at)
    .bind(user.id.to_string())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Soft delete; the row stays so cpf/email uniqueness keeps holding.
pub async fn deactivate_user(pool: &SqlitePool, id: Uuid) -> Result<bool, AppError> {
    let result = sqlx::query(
        "UPDATE users SET is_active = 0, updated_at = ? WHERE id = ? AND is_active = 1",
    )
    .bind(Utc::now())
    .bind(id.to_string())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}

// --- Account store ---

pub async fn insert_account(
    executor: &mut SqlxTransaction<'_, Sqlite>,
    account: &Account,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO accounts (
            id, account_number, agency, account_type, balance, credit_limit,
            is_active, version, created_at, updated_at, user_id
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(account.id.to_string())
    .bind(&account.account_number)
    .bind(&account.agency)
    .bind(account.account_type.as_str())
    .bind(money_to_text(&account.balance))
    .bind(money_to_text(&account.credit_limit))
    .bind(account.is_active)
    .bind(account.version)
    .bind(account.created_at)
    .bind(account.updated_at)
    .bind(account.user_id.to_string())
    .execute(&mut **executor)
    .await?;

    Ok(())
}

/// Active accounts only; a deactivated account is invisible to lookups.
pub async fn get_account(pool: &SqlitePool, id: Uuid) -> Result<Option<Account>, AppError> {
    let row =
        sqlx::query_as::<_, AccountRow>("SELECT * FROM accounts WHERE id = ? AND is_active = 1")
            .bind(id.to_string())
            .fetch_optional(pool)
            .await?;

    row.map(Account::try_from).transpose()
}

pub async fn get_accounts_by_user(
    pool: &SqlitePool,
    user_id: Uuid,
) -> Result<Vec<Account>, AppError> {
    let rows = sqlx::query_as::<_, AccountRow>(
        "SELECT * FROM accounts WHERE user_id = ? AND is_active = 1 ORDER BY created_at ASC",
    )
    .bind(user_id.to_string())
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(Account::try_from).collect()
}

/// Closed accounts keep their number, so the check spans inactive rows.
pub async fn account_number_exists(
    pool: &SqlitePool,
    account_number: &str,
) -> Result<bool, AppError> {
    let row = sqlx::query("SELECT 1 FROM accounts WHERE account_number = ?")
        .bind(account_number)
        .fetch_optional(pool)
        .await?;

    Ok(row.is_some())
}

/// Compare-and-swap balance write. Affects zero rows when the account is
/// missing, inactive, or `expected_version` is stale; the caller decides
/// whether to retry from a fresh read.
pub async fn try_set_balance(
    executor: &mut SqlxTransaction<'_, Sqlite>,
    account_id: Uuid,
    new_balance: &bigdecimal::BigDecimal,
    expected_version: i64,
) -> Result<bool, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE accounts
        SET balance = ?, version = version + 1, updated_at = ?
        WHERE id = ? AND version = ? AND is_active = 1
        "#,
    )
    .bind(money_to_text(new_balance))
    .bind(Utc::now())
    .bind(account_id.to_string())
    .bind(expected_version)
    .execute(&mut **executor)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Soft delete, guarded by the same version token so a concurrent deposit
/// cannot slip in between the zero-balance check and the flag flip.
pub async fn try_deactivate_account(
    pool: &SqlitePool,
    account_id: Uuid,
    expected_version: i64,
) -> Result<bool, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE accounts
        SET is_active = 0, version = version + 1, updated_at = ?
        WHERE id = ? AND version = ? AND is_active = 1
        "#,
    )
    .bind(Utc::now())
    .bind(account_id.to_string())
    .bind(expected_version)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}

// --- Transaction ledger ---

/// Appends a ledger entry inside the caller's atomic unit. Completed rows
/// are never updated afterwards.
pub async fn insert_transaction(
    executor: &mut SqlxTransaction<'_, Sqlite>,
    tx: &Transaction,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO transactions (
            id, tx_type, amount, description, status, created_at, processed_at,
            from_account_id, to_account_id, external_reference
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(tx.id.to_string())
    .bind(tx.tx_type.as_str())
    .bind(money_to_text(&tx.amount))
    .bind(&tx.description)
    .bind(tx.status.as_str())
    .bind(tx.created_at)
    .bind(tx.processed_at)
    .bind(tx.from_account_id.map(|id| id.to_string()))
    .bind(tx.to_account_id.map(|id| id.to_string()))
    .bind(&tx.external_reference)
    .execute(&mut **executor)
    .await?;

    Ok(())
}

pub async fn get_transaction(
    pool: &SqlitePool,
    id: Uuid,
) -> Result<Option<Transaction>, AppError> {
    let row = sqlx::query_as::<_, TransactionRow>("SELECT * FROM transactions WHERE id = ?")
        .bind(id.to_string())
        .fetch_optional(pool)
        .await?;

    row.map(Transaction::try_from).transpose()
}

/// Entries touching the account on either side, newest first, optionally
/// bounded by an inclusive `created_at` range.
pub async fn list_account_transactions(
    pool: &SqlitePool,
    account_id: Uuid,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
) -> Result<Vec<Transaction>, AppError> {
    let rows = sqlx::query_as::<_, TransactionRow>(
        r#"
        SELECT * FROM transactions
        WHERE (from_account_id = ? OR to_account_id = ?)
          AND (? IS NULL OR created_at >= ?)
          AND (? IS NULL OR created_at <= ?)
        ORDER BY created_at DESC
        "#,
    )
    .bind(account_id.to_string())
    .bind(account_id.to_string())
    .bind(from)
    .bind(from)
    .bind(to)
    .bind(to)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(Transaction::try_from).collect()
}
