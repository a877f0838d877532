//! Row types for the SQLite store.
//!
//! SQLite has no decimal or uuid column types, so money and ids live in
//! TEXT columns and are converted here, at the row boundary. A row that
//! fails conversion indicates a corrupted store and surfaces as an
//! internal error.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::{Account, AccountType, Transaction, TransactionStatus, TransactionType, User};
use crate::error::AppError;

/// Canonical TEXT form for monetary values: always two fractional digits.
pub fn money_to_text(value: &BigDecimal) -> String {
    value.with_scale(2).to_string()
}

fn parse_money(field: &str, raw: &str) -> Result<BigDecimal, AppError> {
    BigDecimal::from_str(raw)
        .map_err(|_| AppError::Internal(format!("invalid decimal in column {}: {}", field, raw)))
}

fn parse_id(field: &str, raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw)
        .map_err(|_| AppError::Internal(format!("invalid uuid in column {}: {}", field, raw)))
}

#[derive(Debug, FromRow)]
pub struct UserRow {
    pub id: String,
    pub full_name: String,
    pub cpf: String,
    pub email: String,
    pub password_hash: String,
    pub phone: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<UserRow> for User {
    type Error = AppError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: parse_id("users.id", &row.id)?,
            full_name: row.full_name,
            cpf: row.cpf,
            email: row.email,
            password_hash: row.password_hash,
            phone: row.phone,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
pub struct AccountRow {
    pub id: String,
    pub account_number: String,
    pub agency: String,
    pub account_type: String,
    pub balance: String,
    pub credit_limit: String,
    pub is_active: bool,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub user_id: String,
}

impl TryFrom<AccountRow> for Account {
    type Error = AppError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let account_type = AccountType::parse(&row.account_type).ok_or_else(|| {
            AppError::Internal(format!("unknown account type: {}", row.account_type))
        })?;

        Ok(Account {
            id: parse_id("accounts.id", &row.id)?,
            account_number: row.account_number,
            agency: row.agency,
            account_type,
            balance: parse_money("accounts.balance", &row.balance)?,
            credit_limit: parse_money("accounts.credit_limit", &row.credit_limit)?,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
            user_id: parse_id("accounts.user_id", &row.user_id)?,
            version: row.version,
        })
    }
}

#[derive(Debug, FromRow)]
pub struct TransactionRow {
    pub id: String,
    pub tx_type: String,
    pub amount: String,
    pub description: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
    pub from_account_id: Option<String>,
    pub to_account_id: Option<String>,
    pub external_reference: Option<String>,
}

impl TryFrom<TransactionRow> for Transaction {
    type Error = AppError;

    fn try_from(row: TransactionRow) -> Result<Self, Self::Error> {
        let tx_type = TransactionType::parse(&row.tx_type).ok_or_else(|| {
            AppError::Internal(format!("unknown transaction type: {}", row.tx_type))
        })?;
        let status = TransactionStatus::parse(&row.status).ok_or_else(|| {
            AppError::Internal(format!("unknown transaction status: {}", row.status))
        })?;

        Ok(Transaction {
            id: parse_id("transactions.id", &row.id)?,
            tx_type,
            amount: parse_money("transactions.amount", &row.amount)?,
            description: row.description,
            status,
            created_at: row.created_at,
            processed_at: row.processed_at,
            from_account_id: row
                .from_account_id
                .as_deref()
                .map(|raw| parse_id("transactions.from_account_id", raw))
                .transpose()?,
            to_account_id: row
                .to_account_id
                .as_deref()
                .map(|raw| parse_id("transactions.to_account_id", raw))
                .transpose()?,
            external_reference: row.external_reference,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_text_is_canonical_two_digit_form() {
        assert_eq!(money_to_text(&BigDecimal::from(100)), "100.00");
        assert_eq!(
            money_to_text(&BigDecimal::from_str("100.5").unwrap()),
            "100.50"
        );
        assert_eq!(
            money_to_text(&BigDecimal::from_str("-450").unwrap()),
            "-450.00"
        );
    }

    #[test]
    fn account_row_converts_to_domain() {
        let id = Uuid::new_v4();
        let user_id = Uuid::new_v4();
        let row = AccountRow {
            id: id.to_string(),
            account_number: "12345678".to_string(),
            agency: "0001".to_string(),
            account_type: "checking".to_string(),
            balance: "-450.00".to_string(),
            credit_limit: "500.00".to_string(),
            is_active: true,
            version: 3,
            created_at: Utc::now(),
            updated_at: None,
            user_id: user_id.to_string(),
        };

        let account = Account::try_from(row).unwrap();
        assert_eq!(account.id, id);
        assert_eq!(account.user_id, user_id);
        assert_eq!(account.balance, BigDecimal::from(-450));
        assert_eq!(account.available_balance(), BigDecimal::from(50));
    }

    #[test]
    fn unknown_account_type_is_rejected() {
        let row = AccountRow {
            id: Uuid::new_v4().to_string(),
            account_number: "12345678".to_string(),
            agency: "0001".to_string(),
            account_type: "payroll".to_string(),
            balance: "0.00".to_string(),
            credit_limit: "0.00".to_string(),
            is_active: true,
            version: 0,
            created_at: Utc::now(),
            updated_at: None,
            user_id: Uuid::new_v4().to_string(),
        };

        assert!(Account::try_from(row).is_err());
    }
}
