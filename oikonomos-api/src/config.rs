use chrono_tz::Tz;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ApiConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub jobs: JobsConfig,
    #[serde(default)]
    pub locale: LocaleConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Expected `X-Admin-Token` of the management endpoints; they refuse every call while unset
    #[serde(default)]
    pub admin_token: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            admin_token: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TelegramConfig {
    #[serde(default)]
    pub bot_token: String,
    #[serde(default = "default_telegram_api")]
    pub api_base_url: String,
    /// Expected value of the `X-Telegram-Bot-Api-Secret-Token` header
    #[serde(default)]
    pub webhook_secret: Option<String>,
    /// When non-empty only these chats are served
    #[serde(default)]
    pub allowed_chat_ids: Vec<i64>,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            api_base_url: default_telegram_api(),
            webhook_secret: None,
            allowed_chat_ids: Vec::new(),
        }
    }
}

fn default_telegram_api() -> String {
    "https://api.telegram.org".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct DatabaseConfig {
    pub path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct JobsConfig {
    /// Shared secret for the job trigger endpoints; they refuse every call while unset
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_true")]
    pub notify_users: bool,
}

impl Default for JobsConfig {
    fn default() -> Self {
        Self {
            token: None,
            notify_users: true,
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LocaleConfig {
    pub timezone: String,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            timezone: "America/Sao_Paulo".to_string(),
        }
    }
}

impl LocaleConfig {
    pub fn tz(&self) -> Result<Tz, ConfigError> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| ConfigError::Message(format!("Invalid timezone '{}': {}", self.timezone, e)))
    }
}

impl ApiConfig {
    pub fn load() -> Result<(Self, PathBuf), ConfigError> {
        let config_path = get_config_path();

        // Create config directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Message(format!("Failed to create config directory: {e}"))
            })?;
        }

        // Create default config file if it doesn't exist
        if !config_path.exists() {
            let default_config = r#"
[server]
host = "127.0.0.1"
port = 8080
# admin_token = "secret-for-the-management-endpoints"

[telegram]
# bot_token = "123456:ABC..."
# webhook_secret = "random-string-registered-with-setWebhook"
# allowed_chat_ids = [123456789]

[database]
# path = "/var/lib/oikonomos/oikonomos.db"

[jobs]
# token = "secret-used-by-the-scheduler"
notify_users = true

[locale]
timezone = "America/Sao_Paulo"
"#;
            std::fs::write(&config_path, default_config).map_err(|e| {
                ConfigError::Message(format!("Failed to write default config: {e}"))
            })?;
        }

        let config = Self::load_from(config_path.clone())?;

        Ok((config, config_path))
    }

    /// Reads one TOML file, then lets `OIKONOMOS__SECTION__KEY` variables override it
    pub fn load_from(path: PathBuf) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::from(path))
            .add_source(
                Environment::with_prefix("OIKONOMOS")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("telegram.allowed_chat_ids")
                    .try_parsing(true),
            )
            .build()?;

        let config: ApiConfig = builder.try_deserialize()?;
        config.locale.tz()?;

        Ok(config)
    }
}

pub fn get_config_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("oikonomos").join("api.toml")
    } else {
        PathBuf::from("api.toml")
    }
}
