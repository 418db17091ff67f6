use crate::error::UnknownVariant;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
pub enum BillStatus {
    Pending,
    Paid,
}

impl BillStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillStatus::Pending => "pending",
            BillStatus::Paid => "paid",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BillStatus::Pending => "pendente",
            BillStatus::Paid => "paga",
        }
    }
}

impl FromStr for BillStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BillStatus::Pending),
            "paid" => Ok(BillStatus::Paid),
            other => Err(UnknownVariant::new("bill status", other)),
        }
    }
}

/// A bill with a due date, one-off or repeating monthly
#[derive(Debug, Clone, Serialize, Deserialize, TS, PartialEq)]
pub struct ScheduledTransaction {
    pub id: i64,
    pub user_id: i64,
    pub description: String,
    pub amount: f64,
    pub category_name: String,
    /// Calendar date, `YYYY-MM-DD`
    pub due_date: String,
    pub status: BillStatus,
    pub is_recurring: bool,
    pub paid_at: Option<i64>,
    /// Set once the recurring job has created the next occurrence
    pub rescheduled: bool,
}

#[derive(Debug, Serialize, Deserialize, TS)]
pub struct CreateBillRequest {
    pub description: String,
    pub amount: f64,
    pub category_name: String,
    pub due_date: String,
    #[serde(default)]
    pub is_recurring: bool,
}

#[derive(Debug, Serialize, Deserialize, TS)]
pub struct BillsResponse {
    pub bills: Vec<ScheduledTransaction>,
}
