use serde::{Deserialize, Serialize};

pub mod account;
pub mod budget;
pub mod category;
pub mod error;
pub mod goal;
pub mod job;
pub mod scheduled;
pub mod telegram;
pub mod transaction;
pub mod user;

pub use account::{Account, AccountsResponse, CreateAccountRequest};
pub use budget::{Budget, BudgetEntry, BudgetsResponse, SetBudgetsRequest};
pub use category::{CategoriesResponse, Category, CategoryKind, CreateCategoryRequest};
pub use error::UnknownVariant;
pub use goal::{CreateGoalRequest, Goal, GoalStatus, GoalsResponse};
pub use job::JobReport;
pub use scheduled::{BillStatus, BillsResponse, CreateBillRequest, ScheduledTransaction};
pub use telegram::{
    CallbackQuery, Chat, InlineKeyboardButton, InlineKeyboardMarkup, Message, TelegramUser, Update,
};
pub use transaction::{
    NewTransaction, PendingTransaction, Transaction, TransactionKind, TransactionsResponse,
};
pub use user::{CreateUserRequest, User, UsersResponse};

/// Error response for API endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_serialization() {
        let json = serde_json::to_string(&CategoryKind::Expense).unwrap();
        assert_eq!(json, "\"expense\"");

        let kind: TransactionKind = serde_json::from_str("\"closing\"").unwrap();
        assert_eq!(kind, TransactionKind::Closing);
    }

    #[test]
    fn test_enum_from_str() {
        assert_eq!("paid".parse::<BillStatus>().unwrap(), BillStatus::Paid);
        assert_eq!("active".parse::<GoalStatus>().unwrap(), GoalStatus::Active);

        let err = "weekly".parse::<BillStatus>().unwrap_err();
        assert_eq!(err.to_string(), "unknown bill status value: 'weekly'");
    }

    #[test]
    fn test_signed_amounts() {
        assert_eq!(TransactionKind::Income.signed(10.0), 10.0);
        assert_eq!(TransactionKind::Expense.signed(10.0), -10.0);
        assert_eq!(TransactionKind::Closing.signed(10.0), 0.0);
    }

    #[test]
    fn test_goal_progress() {
        let goal = Goal {
            id: 1,
            user_id: 1,
            name: "Viagem".to_string(),
            target_amount: 200.0,
            saved_amount: 50.0,
            status: GoalStatus::Active,
            created_at: 0,
        };
        assert_eq!(goal.progress(), 25.0);
        assert!(!goal.is_reached());
    }

    #[test]
    fn test_user_display_name() {
        let mut user = User {
            id: 1,
            email: "ana@example.com".to_string(),
            nickname: None,
            telegram_chat_id: None,
            created_at: 0,
        };
        assert_eq!(user.display_name(), "ana");

        user.nickname = Some("Aninha".to_string());
        assert_eq!(user.display_name(), "Aninha");
    }

    #[test]
    fn test_update_from_crate_root() {
        let update: Update = serde_json::from_str(
            r#"{"update_id": 7, "message": {"message_id": 1, "chat": {"id": 42}, "date": 0, "text": "saldo"}}"#,
        )
        .unwrap();
        let message: &Message = update.message.as_ref().unwrap();
        let chat: &Chat = &message.chat;
        assert_eq!(chat.id, 42);
        assert_eq!(message.text.as_deref(), Some("saldo"));
    }
}
