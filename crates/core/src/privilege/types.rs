//! Loyalty account data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tier assigned to newly opened accounts.
pub const DEFAULT_STATUS: &str = "BRONZE";

/// Kind of balance change recorded in the history.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationType {
    /// Accrual after a money payment.
    FillInBalance,
    /// Points spent on a purchase.
    DebitTheAccount,
}

impl OperationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationType::FillInBalance => "FILL_IN_BALANCE",
            OperationType::DebitTheAccount => "DEBIT_THE_ACCOUNT",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "FILL_IN_BALANCE" => Some(OperationType::FillInBalance),
            "DEBIT_THE_ACCOUNT" => Some(OperationType::DebitTheAccount),
            _ => None,
        }
    }
}

/// A loyalty account row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Privilege {
    pub id: i64,
    pub username: String,
    pub status: String,
    pub balance: i64,
}

/// Account fields supplied on creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewPrivilege {
    pub username: String,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub balance: i64,
}

fn default_status() -> String {
    DEFAULT_STATUS.to_string()
}

impl NewPrivilege {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            status: default_status(),
            balance: 0,
        }
    }

    pub fn with_balance(mut self, balance: i64) -> Self {
        self.balance = balance;
        self
    }
}

/// The `{id, balance, status}` view exchanged with the gateway.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PrivilegeSnapshot {
    pub id: i64,
    pub balance: i64,
    pub status: String,
}

impl From<Privilege> for PrivilegeSnapshot {
    fn from(privilege: Privilege) -> Self {
        Self {
            id: privilege.id,
            balance: privilege.balance,
            status: privilege.status,
        }
    }
}

/// History append request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewHistoryEntry {
    pub privilege_id: i64,
    pub ticket_uid: String,
    pub operation_type: OperationType,
    pub balance_diff: i64,
    pub date: DateTime<Utc>,
}

/// One recorded balance change as listed to the account owner.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub date: DateTime<Utc>,
    pub ticket_uid: String,
    pub balance_diff: i64,
    pub operation_type: OperationType,
}
