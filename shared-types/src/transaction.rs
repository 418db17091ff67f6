use crate::category::CategoryKind;
use crate::error::UnknownVariant;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Expense,
    Income,
    Transfer,
    /// Month-end balance snapshot, never counted as spending or income
    Closing,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Expense => "expense",
            TransactionKind::Income => "income",
            TransactionKind::Transfer => "transfer",
            TransactionKind::Closing => "closing",
        }
    }

    /// Signed effect on the balance of the transaction's own account
    pub fn signed(&self, amount: f64) -> f64 {
        match self {
            TransactionKind::Income => amount,
            TransactionKind::Expense | TransactionKind::Transfer => -amount,
            TransactionKind::Closing => 0.0,
        }
    }
}

impl From<CategoryKind> for TransactionKind {
    fn from(kind: CategoryKind) -> Self {
        match kind {
            CategoryKind::Expense => TransactionKind::Expense,
            CategoryKind::Income => TransactionKind::Income,
        }
    }
}

impl FromStr for TransactionKind {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "expense" => Ok(TransactionKind::Expense),
            "income" => Ok(TransactionKind::Income),
            "transfer" => Ok(TransactionKind::Transfer),
            "closing" => Ok(TransactionKind::Closing),
            other => Err(UnknownVariant::new("transaction kind", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, PartialEq)]
pub struct Transaction {
    pub id: i64,
    pub user_id: i64,
    pub kind: TransactionKind,
    pub amount: f64,
    pub category: Option<String>,
    pub account_id: Option<i64>,
    pub destination_account_id: Option<i64>,
    pub description: Option<String>,
    /// `YYYY-MM`, closing records only
    pub period: Option<String>,
    pub created_at: i64,
}

/// Values needed to insert a transaction; ids and timestamps are assigned by storage
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub user_id: i64,
    pub kind: TransactionKind,
    pub amount: f64,
    pub category: Option<String>,
    pub account_id: Option<i64>,
    pub destination_account_id: Option<i64>,
    pub description: Option<String>,
}

/// An expense or income waiting for the user to choose an account
#[derive(Debug, Clone, Serialize, Deserialize, TS, PartialEq)]
pub struct PendingTransaction {
    pub id: String,
    pub user_id: i64,
    pub chat_id: i64,
    pub kind: CategoryKind,
    pub amount: f64,
    pub category: String,
    pub description: Option<String>,
    pub created_at: i64,
}

#[derive(Debug, Serialize, Deserialize, TS)]
pub struct TransactionsResponse {
    pub transactions: Vec<Transaction>,
}
