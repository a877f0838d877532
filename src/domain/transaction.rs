//! Transaction domain entity.
//! A transaction references the debit side, the credit side, or both,
//! depending on its type. Completed rows are immutable and never deleted.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Deposit,
    Withdrawal,
    Transfer,
    Payment,
    PixIn,
    PixOut,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Deposit => "deposit",
            TransactionType::Withdrawal => "withdrawal",
            TransactionType::Transfer => "transfer",
            TransactionType::Payment => "payment",
            TransactionType::PixIn => "pix_in",
            TransactionType::PixOut => "pix_out",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "deposit" => Some(TransactionType::Deposit),
            "withdrawal" => Some(TransactionType::Withdrawal),
            "transfer" => Some(TransactionType::Transfer),
            "payment" => Some(TransactionType::Payment),
            "pix_in" => Some(TransactionType::PixIn),
            "pix_out" => Some(TransactionType::PixOut),
            _ => None,
        }
    }
}

/// Failed and Cancelled are modeled for future asynchronous flows; the
/// synchronous paths either commit a Completed row or leave no row at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
    Cancelled,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Completed => "completed",
            TransactionStatus::Failed => "failed",
            TransactionStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(TransactionStatus::Pending),
            "completed" => Some(TransactionStatus::Completed),
            "failed" => Some(TransactionStatus::Failed),
            "cancelled" => Some(TransactionStatus::Cancelled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Transaction {
    pub id: Uuid,
    pub tx_type: TransactionType,
    pub amount: BigDecimal,
    pub description: Option<String>,
    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
    pub from_account_id: Option<Uuid>,
    pub to_account_id: Option<Uuid>,
    pub external_reference: Option<String>,
}

impl Transaction {
    fn completed(
        tx_type: TransactionType,
        amount: BigDecimal,
        description: String,
        from_account_id: Option<Uuid>,
        to_account_id: Option<Uuid>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            tx_type,
            amount,
            description: Some(description),
            status: TransactionStatus::Completed,
            created_at: now,
            processed_at: Some(now),
            from_account_id,
            to_account_id,
            external_reference: None,
        }
    }

    pub fn deposit(to_account_id: Uuid, amount: BigDecimal, description: String) -> Self {
        Self::completed(
            TransactionType::Deposit,
            amount,
            description,
            None,
            Some(to_account_id),
        )
    }

    pub fn withdrawal(from_account_id: Uuid, amount: BigDecimal, description: String) -> Self {
        Self::completed(
            TransactionType::Withdrawal,
            amount,
            description,
            Some(from_account_id),
            None,
        )
    }

    pub fn transfer(
        from_account_id: Uuid,
        to_account_id: Uuid,
        amount: BigDecimal,
        description: String,
    ) -> Self {
        Self::completed(
            TransactionType::Transfer,
            amount,
            description,
            Some(from_account_id),
            Some(to_account_id),
        )
    }
}
