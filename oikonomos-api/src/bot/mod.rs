//! Chat front end: turns Telegram updates into ledger operations and replies.

mod accounts;
mod bills;
pub mod error;
pub mod feedback;
mod goals;
mod linking;
mod messages;
mod records;
mod reports;

pub use error::{BotError, GENERIC_ERROR};

use crate::database::{users, AsyncDbConnection};
use crate::integrations::TelegramApi;
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use commands::{parse, Command};
use shared_types::{CallbackQuery, InlineKeyboardMarkup, Update, User};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Text sent back to the chat, with an optional inline keyboard
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: String,
    pub keyboard: Option<InlineKeyboardMarkup>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: None,
        }
    }

    pub fn with_keyboard(text: impl Into<String>, keyboard: InlineKeyboardMarkup) -> Self {
        Self {
            text: text.into(),
            keyboard: Some(keyboard),
        }
    }
}

pub struct Bot {
    db: AsyncDbConnection,
    telegram: Arc<dyn TelegramApi>,
    tz: Tz,
    allowed_chat_ids: Vec<i64>,
}

impl Bot {
    pub fn new(
        db: AsyncDbConnection,
        telegram: Arc<dyn TelegramApi>,
        tz: Tz,
        allowed_chat_ids: Vec<i64>,
    ) -> Self {
        Self {
            db,
            telegram,
            tz,
            allowed_chat_ids,
        }
    }

    pub async fn handle_update(&self, update: &Update) -> anyhow::Result<()> {
        self.handle_update_at(update, Utc::now()).await
    }

    /// Handles one update as if it arrived at `now`.
    ///
    /// User mistakes are answered in the chat and return `Ok`; storage or
    /// Telegram failures are answered with a generic message and returned.
    pub async fn handle_update_at(&self, update: &Update, now: DateTime<Utc>) -> anyhow::Result<()> {
        if let Some(callback) = &update.callback_query {
            return self.handle_callback(callback, now).await;
        }

        let Some(message) = &update.message else {
            debug!("Ignoring update {} without a message", update.update_id);
            return Ok(());
        };
        let Some(text) = message.text.as_deref() else {
            debug!("Ignoring non-text message in chat {}", message.chat.id);
            return Ok(());
        };

        self.handle_text(message.chat.id, text, now).await
    }

    fn is_allowed(&self, chat_id: i64) -> bool {
        self.allowed_chat_ids.is_empty() || self.allowed_chat_ids.contains(&chat_id)
    }

    fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        crate::helpers::dates::local_today(now, self.tz)
    }

    async fn handle_text(&self, chat_id: i64, text: &str, now: DateTime<Utc>) -> anyhow::Result<()> {
        if !self.is_allowed(chat_id) {
            warn!("Ignoring message from chat {} outside allowed_chat_ids", chat_id);
            return Ok(());
        }

        let command = parse(text);
        let user = match users::find_by_chat_id(self.db.clone(), chat_id).await {
            Ok(user) => user,
            Err(e) => return self.fail(chat_id, e).await,
        };

        let result = match &user {
            Some(user) => {
                info!("Chat {} (user {}) sent {:?}", chat_id, user.id, command);
                self.dispatch(user, chat_id, command, now).await
            }
            None => self.handle_unlinked(chat_id, command).await,
        };

        match result {
            Ok(reply) => self.send(chat_id, &reply).await,
            Err(BotError::Internal(e)) => self.fail(chat_id, e).await,
            Err(e) => {
                debug!("Chat {} got a validation reply: {}", chat_id, e);
                self.send(chat_id, &Reply::text(e.to_string())).await
            }
        }
    }

    async fn dispatch(
        &self,
        user: &User,
        chat_id: i64,
        command: Command,
        now: DateTime<Utc>,
    ) -> Result<Reply, BotError> {
        match command {
            Command::Start => Ok(Reply::text(messages::welcome(user))),
            Command::Help => Ok(Reply::text(messages::help())),
            Command::ListCategories => self.list_categories(user).await,
            Command::ListBudgets { category } => {
                self.list_budgets(user, category.as_deref(), now).await
            }
            Command::ListBills { filter } => self.list_bills(user, filter, now).await,
            Command::TodaySpending { by_category } => {
                self.today_spending(user, by_category, now).await
            }
            Command::DailyAllowance => self.daily_allowance(user, now).await,
            Command::ListAccounts => self.list_accounts(user).await,
            Command::ListGoals => self.list_goals(user).await,
            Command::PayBill { name } => self.pay_bill(user, &name, now).await,
            Command::Transfer { amount, from, to } => {
                self.transfer(user, amount, &from, &to, now).await
            }
            Command::Contribute { amount, goal } => self.contribute(user, amount, &goal, now).await,
            Command::Withdraw {
                amount,
                goal,
                category,
            } => self.withdraw(user, amount, &goal, &category, now).await,
            Command::Record {
                kind,
                quick,
                amount,
                rest,
            } => self.record(user, chat_id, kind, quick, amount, &rest, now).await,
            Command::Email(_) => Ok(Reply::text(format!(
                "✅ Este chat já está vinculado a {}.",
                user.email
            ))),
            Command::Invalid { usage } => Err(BotError::Usage(usage)),
            Command::Unknown => Err(BotError::UnknownCommand),
        }
    }

    async fn handle_callback(&self, callback: &CallbackQuery, now: DateTime<Utc>) -> anyhow::Result<()> {
        let chat_id = callback.chat_id();
        if !self.is_allowed(chat_id) {
            warn!("Ignoring callback from chat {} outside allowed_chat_ids", chat_id);
            return Ok(());
        }

        match self.select_account(callback, chat_id, now).await {
            Ok(reply) => {
                self.telegram.answer_callback_query(&callback.id, None).await?;
                self.send(chat_id, &reply).await
            }
            Err(BotError::Internal(e)) => {
                error!("Callback {} failed: {:#}", callback.id, e);
                if let Err(send_err) = self
                    .telegram
                    .answer_callback_query(&callback.id, Some(GENERIC_ERROR))
                    .await
                {
                    warn!("Could not answer callback {}: {:#}", callback.id, send_err);
                }
                Err(e)
            }
            Err(e) => {
                self.telegram
                    .answer_callback_query(&callback.id, Some(&e.to_string()))
                    .await
            }
        }
    }

    async fn send(&self, chat_id: i64, reply: &Reply) -> anyhow::Result<()> {
        self.telegram
            .send_message(chat_id, &reply.text, reply.keyboard.as_ref())
            .await
    }

    /// Reports an infrastructure failure to the chat and hands it back to the caller
    async fn fail(&self, chat_id: i64, e: anyhow::Error) -> anyhow::Result<()> {
        error!("Failed to handle message from chat {}: {:#}", chat_id, e);
        if let Err(send_err) = self.send(chat_id, &Reply::text(GENERIC_ERROR)).await {
            warn!("Could not notify chat {}: {:#}", chat_id, send_err);
        }
        Err(e)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::database::test_support as db_support;
    use crate::integrations::telegram::fake::RecordingTelegram;
    use chrono::TimeZone;
    use shared_types::{Chat, Message};

    pub const CHAT: i64 = 4242;

    pub struct Harness {
        pub bot: Bot,
        pub db: AsyncDbConnection,
        pub telegram: Arc<RecordingTelegram>,
        pub user: User,
    }

    /// 2026-10-22 12:00 in São Paulo
    pub fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 22, 15, 0, 0).unwrap()
    }

    pub fn text_update(chat_id: i64, text: &str) -> Update {
        Update {
            update_id: 1,
            message: Some(Message {
                message_id: 1,
                chat: Chat {
                    id: chat_id,
                    kind: Some("private".to_string()),
                },
                from: None,
                date: 0,
                text: Some(text.to_string()),
            }),
            edited_message: None,
            callback_query: None,
        }
    }

    /// A bot with one user linked to `CHAT`
    pub async fn harness(allowed_chat_ids: Vec<i64>) -> Harness {
        let db = db_support::db();
        let telegram = Arc::new(RecordingTelegram::default());
        let user = db_support::user(&db, "ana@example.com").await;
        users::link_chat(db.clone(), user.id, CHAT).await.unwrap();

        let bot = Bot::new(
            db.clone(),
            telegram.clone(),
            chrono_tz::America::Sao_Paulo,
            allowed_chat_ids,
        );
        Harness {
            bot,
            db,
            telegram,
            user,
        }
    }

    impl Harness {
        /// Sends `text` from the linked chat and returns the reply text
        pub async fn say(&self, text: &str) -> String {
            self.bot
                .handle_update_at(&text_update(CHAT, text), noon())
                .await
                .unwrap();
            self.telegram.last().text
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[tokio::test]
    async fn test_disallowed_chat_is_ignored() {
        let h = harness(vec![1]).await;
        h.bot
            .handle_update_at(&text_update(CHAT, "ver saldos"), noon())
            .await
            .unwrap();
        assert!(h.telegram.texts().is_empty());
    }

    #[tokio::test]
    async fn test_help_and_unknown() {
        let h = harness(vec![CHAT]).await;
        assert!(h.say("/ajuda").await.contains("guardar"));
        assert_eq!(h.say("bom dia").await, BotError::UnknownCommand.to_string());
        assert!(h.say("transferir muito").await.contains("transferir <valor>"));
    }

    #[tokio::test]
    async fn test_non_text_message_is_ignored() {
        let h = harness(vec![]).await;
        let mut update = text_update(CHAT, "");
        if let Some(message) = update.message.as_mut() {
            message.text = None;
        }
        h.bot.handle_update_at(&update, noon()).await.unwrap();
        assert!(h.telegram.texts().is_empty());
    }

    #[tokio::test]
    async fn test_start_greets_linked_user() {
        let h = harness(vec![]).await;
        assert!(h.say("/start").await.contains("ana"));
    }
}
