use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A dashboard user, optionally linked to a Telegram chat
#[derive(Debug, Clone, Serialize, Deserialize, TS, PartialEq)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub nickname: Option<String>,
    pub telegram_chat_id: Option<i64>,
    pub created_at: i64,
}

impl User {
    /// Name used when the bot greets the user
    pub fn display_name(&self) -> &str {
        match self.nickname.as_deref() {
            Some(nickname) if !nickname.trim().is_empty() => nickname,
            _ => self.email.split('@').next().unwrap_or(&self.email),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, TS)]
pub struct CreateUserRequest {
    pub email: String,
    pub nickname: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, TS)]
pub struct UsersResponse {
    pub users: Vec<User>,
}
