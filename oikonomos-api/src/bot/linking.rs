use super::{messages, Bot, BotError, Reply};
use crate::database::users;
use commands::Command;
use tracing::info;

impl Bot {
    /// Chats without a user may only start the e-mail handshake
    pub(super) async fn handle_unlinked(
        &self,
        chat_id: i64,
        command: Command,
    ) -> Result<Reply, BotError> {
        match command {
            Command::Start => Ok(Reply::text(messages::ask_email())),
            Command::Email(email) => self.link(chat_id, &email).await,
            _ => Ok(Reply::text(messages::link_prompt())),
        }
    }

    async fn link(&self, chat_id: i64, email: &str) -> Result<Reply, BotError> {
        let Some(user) = users::find_by_email(self.db.clone(), email).await? else {
            return Ok(Reply::text(format!(
                "❌ Não encontrei nenhum usuário com o e-mail {}. Confira o endereço cadastrado no painel.",
                email
            )));
        };

        if matches!(user.telegram_chat_id, Some(linked) if linked != chat_id) {
            return Ok(Reply::text("❌ Este e-mail já está vinculado a outro chat."));
        }

        users::link_chat(self.db.clone(), user.id, chat_id).await?;
        info!("Linked chat {} to user {}", chat_id, user.id);

        Ok(Reply::text(format!(
            "✅ Chat vinculado! Olá, {}.\nEnvie /ajuda para ver os comandos.",
            user.display_name()
        )))
    }
}

#[cfg(test)]
mod tests {
    use crate::bot::test_support::*;
    use crate::bot::Bot;
    use crate::database::{test_support as db_support, users};
    use crate::integrations::telegram::fake::RecordingTelegram;
    use std::sync::Arc;

    async fn unlinked_bot() -> (Bot, crate::database::AsyncDbConnection, Arc<RecordingTelegram>) {
        let db = db_support::db();
        let telegram = Arc::new(RecordingTelegram::default());
        let bot = Bot::new(
            db.clone(),
            telegram.clone(),
            chrono_tz::America::Sao_Paulo,
            vec![],
        );
        (bot, db, telegram)
    }

    #[tokio::test]
    async fn test_start_asks_for_email() {
        let (bot, _db, telegram) = unlinked_bot().await;
        bot.handle_update_at(&text_update(7, "/start"), noon()).await.unwrap();
        assert!(telegram.last().text.contains("e-mail"));

        bot.handle_update_at(&text_update(7, "ver saldos"), noon()).await.unwrap();
        assert!(telegram.last().text.starts_with("🔗"));
    }

    #[tokio::test]
    async fn test_email_links_chat() {
        let (bot, db, telegram) = unlinked_bot().await;
        let user = db_support::user(&db, "Ana@Example.com").await;

        bot.handle_update_at(&text_update(7, "ana@example.com"), noon())
            .await
            .unwrap();
        assert!(telegram.last().text.starts_with("✅ Chat vinculado! Olá, Ana."));

        let linked = users::find_by_chat_id(db.clone(), 7).await.unwrap().unwrap();
        assert_eq!(linked.id, user.id);
    }

    #[tokio::test]
    async fn test_email_linked_elsewhere_or_unknown() {
        let (bot, db, telegram) = unlinked_bot().await;
        let user = db_support::user(&db, "ana@example.com").await;
        users::link_chat(db.clone(), user.id, 99).await.unwrap();

        bot.handle_update_at(&text_update(7, "ana@example.com"), noon())
            .await
            .unwrap();
        assert!(telegram.last().text.contains("outro chat"));

        bot.handle_update_at(&text_update(7, "bia@example.com"), noon())
            .await
            .unwrap();
        assert!(telegram.last().text.contains("Não encontrei"));
        assert!(users::find_by_chat_id(db.clone(), 7).await.unwrap().is_none());
    }
}
