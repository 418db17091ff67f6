use crate::error::UnknownVariant;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    Active,
    Completed,
}

impl GoalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalStatus::Active => "active",
            GoalStatus::Completed => "completed",
        }
    }
}

impl FromStr for GoalStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(GoalStatus::Active),
            "completed" => Ok(GoalStatus::Completed),
            other => Err(UnknownVariant::new("goal status", other)),
        }
    }
}

/// Savings target with the amount accumulated so far
#[derive(Debug, Clone, Serialize, Deserialize, TS, PartialEq)]
pub struct Goal {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub target_amount: f64,
    pub saved_amount: f64,
    pub status: GoalStatus,
    pub created_at: i64,
}

impl Goal {
    /// Progress in percent, 0 when the goal has no target
    pub fn progress(&self) -> f64 {
        if self.target_amount > 0.0 {
            self.saved_amount / self.target_amount * 100.0
        } else {
            0.0
        }
    }

    pub fn is_reached(&self) -> bool {
        self.target_amount > 0.0 && self.saved_amount >= self.target_amount
    }
}

#[derive(Debug, Serialize, Deserialize, TS)]
pub struct CreateGoalRequest {
    pub name: String,
    pub target_amount: f64,
}

#[derive(Debug, Serialize, Deserialize, TS)]
pub struct GoalsResponse {
    pub goals: Vec<Goal>,
}
