//! Account domain entity.
//! Balances are exact decimals; an account may overdraw down to the
//! negative of its credit limit.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Checking accounts open with a default credit limit of 500.
pub const CHECKING_CREDIT_LIMIT: i64 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    Checking,
    Savings,
    Investment,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Checking => "checking",
            AccountType::Savings => "savings",
            AccountType::Investment => "investment",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "checking" => Some(AccountType::Checking),
            "savings" => Some(AccountType::Savings),
            "investment" => Some(AccountType::Investment),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Account {
    pub id: Uuid,
    pub account_number: String,
    pub agency: String,
    pub account_type: AccountType,
    pub balance: BigDecimal,
    pub credit_limit: BigDecimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub user_id: Uuid,
    /// Optimistic concurrency token, bumped on every balance mutation.
    #[serde(skip_serializing)]
    pub version: i64,
}

impl Account {
    pub fn new(
        user_id: Uuid,
        account_number: String,
        account_type: AccountType,
        initial_deposit: BigDecimal,
    ) -> Self {
        let credit_limit = match account_type {
            AccountType::Checking => BigDecimal::from(CHECKING_CREDIT_LIMIT),
            _ => BigDecimal::from(0),
        };

        Self {
            id: Uuid::new_v4(),
            account_number,
            agency: "0001".to_string(),
            account_type,
            balance: initial_deposit,
            credit_limit,
            is_active: true,
            created_at: Utc::now(),
            updated_at: None,
            user_id,
            version: 0,
        }
    }

    /// Maximum amount that can be withdrawn or transferred out.
    pub fn available_balance(&self) -> BigDecimal {
        &self.balance + &self.credit_limit
    }
}
