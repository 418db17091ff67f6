use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Monthly spending cap for one expense category
#[derive(Debug, Clone, Serialize, Deserialize, TS, PartialEq)]
pub struct Budget {
    pub user_id: i64,
    pub category_name: String,
    pub year: i32,
    pub month: u32,
    pub amount: f64,
}

#[derive(Debug, Serialize, Deserialize, TS)]
pub struct BudgetEntry {
    pub category_name: String,
    pub amount: f64,
}

/// Replaces the budgets of a month, one entry per category
#[derive(Debug, Serialize, Deserialize, TS)]
pub struct SetBudgetsRequest {
    pub year: i32,
    pub month: u32,
    pub budgets: Vec<BudgetEntry>,
}

#[derive(Debug, Serialize, Deserialize, TS)]
pub struct BudgetsResponse {
    pub budgets: Vec<Budget>,
}
