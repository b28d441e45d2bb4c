use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::sync::OnceLock;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiProviderKind {
    OpenAi,
    GigaChat,
}

impl FromStr for AiProviderKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "gigachat" => Ok(Self::GigaChat),
            other => Err(format!("unknown AI provider '{}'", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub telegram_bot_token: String,
    pub ai_provider: AiProviderKind,
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub openai_model: String,
    pub openai_transcription_model: String,
    pub transcription_language: String,
    pub gigachat_client_id: String,
    pub gigachat_client_secret: String,
    pub gigachat_auth_url: String,
    pub gigachat_api_url: String,
    pub daily_limit_per_user: u32,
    pub notes_cache_ttl_secs: u64,
    pub ai_timeout_secs: u64,
    pub ai_max_attempts: u32,
    pub ai_retry_base_delay_ms: u64,
    pub voice_temp_dir: String,
    pub piston_url: String,
    pub code_run_timeout_secs: u64,
    pub log_level: String,
    pub log_format: String,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            database_url: get_env("DATABASE_URL")?,
            telegram_bot_token: get_env("TELEGRAM_BOT_TOKEN")?,
            ai_provider: get_env_parse_or("AI_PROVIDER", AiProviderKind::OpenAi)?,
            openai_api_key: get_env_or("OPENAI_API_KEY", ""),
            openai_base_url: get_env_or("OPENAI_BASE_URL", "https://api.openai.com/v1"),
            openai_model: get_env_or("OPENAI_MODEL", "gpt-4"),
            openai_transcription_model: get_env_or("OPENAI_TRANSCRIPTION_MODEL", "whisper-1"),
            transcription_language: get_env_or("TRANSCRIPTION_LANGUAGE", "ru"),
            gigachat_client_id: get_env_or("GIGACHAT_CLIENT_ID", ""),
            gigachat_client_secret: get_env_or("GIGACHAT_CLIENT_SECRET", ""),
            gigachat_auth_url: get_env_or(
                "GIGACHAT_AUTH_URL",
                "https://ngw.devices.sberbank.ru:9443/api/v2/oauth",
            ),
            gigachat_api_url: get_env_or(
                "GIGACHAT_API_URL",
                "https://gigachat.devices.sberbank.ru/api/v1",
            ),
            daily_limit_per_user: get_env_parse_or("DAILY_LIMIT_PER_USER", 50)?,
            notes_cache_ttl_secs: get_env_parse_or("NOTES_CACHE_TTL_SECS", 600)?,
            ai_timeout_secs: get_env_parse_or("AI_TIMEOUT_SECS", 10)?,
            ai_max_attempts: get_env_parse_or("AI_MAX_ATTEMPTS", 3)?,
            ai_retry_base_delay_ms: get_env_parse_or("AI_RETRY_BASE_DELAY_MS", 500)?,
            voice_temp_dir: get_env_or("VOICE_TEMP_DIR", "temp"),
            piston_url: get_env_or("PISTON_URL", "https://emkc.org/api/v2/piston/execute"),
            code_run_timeout_secs: get_env_parse_or("CODE_RUN_TIMEOUT_SECS", 20)?,
            log_level: get_env_or("LOG_LEVEL", "info"),
            log_format: get_env_or("LOG_FORMAT", "text"),
        })
    }

    /// Per-call bound for AI and Telegram calls. With the default retry budget an
    /// evaluation takes at most `3 * ai_timeout + 1.5 s`.
    pub fn ai_timeout(&self) -> Duration {
        Duration::from_secs(self.ai_timeout_secs)
    }

    pub fn notes_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.notes_cache_ttl_secs)
    }

    pub fn code_run_timeout(&self) -> Duration {
        Duration::from_secs(self.code_run_timeout_secs)
    }

    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.ai_retry_base_delay_ms)
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}

pub fn init_config() -> Result<&'static Config> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    get_config()
}

pub fn get_config() -> Result<&'static Config> {
    CONFIG
        .get()
        .ok_or_else(|| Error::Config("Configuration has not been initialized".to_string()))
}
