use crate::config::TelegramConfig;
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared_types::InlineKeyboardMarkup;

/// Outgoing side of the Bot API used by the bot and the jobs
#[async_trait]
pub trait TelegramApi: Send + Sync {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&InlineKeyboardMarkup>,
    ) -> Result<()>;

    async fn answer_callback_query(&self, callback_query_id: &str, text: Option<&str>) -> Result<()>;
}

pub struct TelegramClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: i64,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_markup: Option<&'a InlineKeyboardMarkup>,
}

#[derive(Serialize)]
struct AnswerCallbackQuery<'a> {
    callback_query_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
}

#[derive(Deserialize)]
struct ApiResponse {
    ok: bool,
    description: Option<String>,
}

impl TelegramClient {
    pub fn new(config: &TelegramConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            token: config.bot_token.clone(),
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token, method)
    }

    async fn call<T: Serialize + ?Sized>(&self, method: &str, body: &T) -> Result<()> {
        if self.token.is_empty() {
            bail!("telegram.bot_token is not configured");
        }

        let response = self
            .http
            .post(self.method_url(method))
            .json(body)
            .send()
            .await
            .with_context(|| format!("Telegram {} request failed", method))?;

        let status = response.status();
        let body: ApiResponse = response
            .json()
            .await
            .with_context(|| format!("Telegram {} returned an unreadable body ({})", method, status))?;

        if !body.ok {
            bail!(
                "Telegram {} failed ({}): {}",
                method,
                status,
                body.description.unwrap_or_default()
            );
        }

        Ok(())
    }
}

#[async_trait]
impl TelegramApi for TelegramClient {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&InlineKeyboardMarkup>,
    ) -> Result<()> {
        self.call(
            "sendMessage",
            &SendMessage {
                chat_id,
                text,
                reply_markup: keyboard,
            },
        )
        .await
    }

    async fn answer_callback_query(&self, callback_query_id: &str, text: Option<&str>) -> Result<()> {
        self.call(
            "answerCallbackQuery",
            &AnswerCallbackQuery {
                callback_query_id,
                text,
            },
        )
        .await
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    pub struct SentMessage {
        pub chat_id: i64,
        pub text: String,
        pub keyboard: Option<InlineKeyboardMarkup>,
    }

    /// Keeps every outgoing call in memory
    #[derive(Default)]
    pub struct RecordingTelegram {
        pub messages: Mutex<Vec<SentMessage>>,
        pub answers: Mutex<Vec<(String, Option<String>)>>,
    }

    impl RecordingTelegram {
        pub fn texts(&self) -> Vec<String> {
            self.messages
                .lock()
                .unwrap()
                .iter()
                .map(|m| m.text.clone())
                .collect()
        }

        pub fn last(&self) -> SentMessage {
            self.messages.lock().unwrap().last().cloned().expect("no message sent")
        }

        pub fn clear(&self) {
            self.messages.lock().unwrap().clear();
            self.answers.lock().unwrap().clear();
        }
    }

    #[async_trait]
    impl TelegramApi for RecordingTelegram {
        async fn send_message(
            &self,
            chat_id: i64,
            text: &str,
            keyboard: Option<&InlineKeyboardMarkup>,
        ) -> Result<()> {
            self.messages.lock().unwrap().push(SentMessage {
                chat_id,
                text: text.to_string(),
                keyboard: keyboard.cloned(),
            });
            Ok(())
        }

        async fn answer_callback_query(&self, callback_query_id: &str, text: Option<&str>) -> Result<()> {
            self.answers
                .lock()
                .unwrap()
                .push((callback_query_id.to_string(), text.map(str::to_string)));
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::InlineKeyboardButton;

    #[test]
    fn test_method_url() {
        let config = TelegramConfig {
            bot_token: "123:abc".to_string(),
            api_base_url: "https://api.telegram.org/".to_string(),
            ..Default::default()
        };
        let client = TelegramClient::new(&config);
        assert_eq!(
            client.method_url("sendMessage"),
            "https://api.telegram.org/bot123:abc/sendMessage"
        );
    }

    #[test]
    fn test_send_message_body() {
        let keyboard = InlineKeyboardMarkup::single_column(vec![InlineKeyboardButton {
            text: "Nubank".to_string(),
            callback_data: "conta:x:1".to_string(),
        }]);
        let body = serde_json::to_value(SendMessage {
            chat_id: 42,
            text: "oi",
            reply_markup: Some(&keyboard),
        })
        .unwrap();

        assert_eq!(body["chat_id"], 42);
        assert_eq!(
            body["reply_markup"]["inline_keyboard"][0][0]["callback_data"],
            "conta:x:1"
        );

        let plain = serde_json::to_value(SendMessage {
            chat_id: 42,
            text: "oi",
            reply_markup: None,
        })
        .unwrap();
        assert!(plain.get("reply_markup").is_none());
    }

    #[tokio::test]
    async fn test_missing_token_fails_without_request() {
        let client = TelegramClient::new(&TelegramConfig::default());
        assert!(client.send_message(1, "oi", None).await.is_err());
    }
}
