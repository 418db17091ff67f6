pub mod telegram;

pub use telegram::{TelegramApi, TelegramClient};
