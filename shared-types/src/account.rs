use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A place where money is kept (bank account, wallet, reserve fund)
#[derive(Debug, Clone, Serialize, Deserialize, TS, PartialEq)]
pub struct Account {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub balance: f64,
    /// Reserve accounts are not used day to day (emergency funds, investments)
    pub is_reserve: bool,
    /// Account used by quick bot commands
    pub is_default: bool,
    pub created_at: i64,
}

#[derive(Debug, Serialize, Deserialize, TS)]
pub struct CreateAccountRequest {
    pub name: String,
    #[serde(default)]
    pub balance: f64,
    #[serde(default)]
    pub is_reserve: bool,
}

#[derive(Debug, Serialize, Deserialize, TS)]
pub struct AccountsResponse {
    pub accounts: Vec<Account>,
    pub total_balance: f64,
}
