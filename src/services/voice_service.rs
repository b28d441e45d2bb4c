use crate::config::Config;
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value as JsonValue;
use std::path::{Path, PathBuf};
use std::time::Duration;

const TELEGRAM_API: &str = "https://api.telegram.org";

/// Where voice messages come from before transcription.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VoiceStorage: Send + Sync {
    /// Fetches the voice file into local storage and returns its path.
    async fn download(&self, file_id: &str) -> Result<PathBuf>;

    /// Best effort; a missing file is not an error.
    async fn cleanup(&self, path: &Path);
}

#[derive(Clone)]
pub struct TelegramVoiceStorage {
    client: Client,
    bot_token: String,
    temp_dir: PathBuf,
    timeout: Duration,
}

impl TelegramVoiceStorage {
    pub fn new(
        client: Client,
        bot_token: String,
        temp_dir: impl Into<PathBuf>,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            bot_token,
            temp_dir: temp_dir.into(),
            timeout,
        }
    }

    pub fn from_config(config: &Config, client: Client) -> Self {
        Self::new(
            client,
            config.telegram_bot_token.clone(),
            &config.voice_temp_dir,
            config.ai_timeout(),
        )
    }

    pub fn target_path(&self, file_id: &str) -> PathBuf {
        let safe: String = file_id
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.temp_dir.join(format!("{}.ogg", safe))
    }

    async fn resolve_file_path(&self, file_id: &str) -> Result<String> {
        let res = self
            .client
            .get(format!("{}/bot{}/getFile", TELEGRAM_API, self.bot_token))
            .query(&[("file_id", file_id)])
            .timeout(self.timeout)
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(Error::Provider(format!("Telegram getFile failed: {}", res.status())));
        }

        let body: JsonValue = res.json().await?;
        body.get("result")
            .and_then(|r| r.get("file_path"))
            .and_then(|p| p.as_str())
            .map(str::to_string)
            .ok_or_else(|| Error::Provider("Telegram getFile returned no file_path".to_string()))
    }
}

#[async_trait]
impl VoiceStorage for TelegramVoiceStorage {
    async fn download(&self, file_id: &str) -> Result<PathBuf> {
        let file_path = self.resolve_file_path(file_id).await?;

        let res = self
            .client
            .get(format!("{}/file/bot{}/{}", TELEGRAM_API, self.bot_token, file_path))
            .timeout(self.timeout)
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(Error::Provider(format!("Telegram file download failed: {}", res.status())));
        }

        let bytes = res.bytes().await?;
        tokio::fs::create_dir_all(&self.temp_dir).await?;
        let target = self.target_path(file_id);
        tokio::fs::write(&target, &bytes).await?;
        tracing::debug!(
            file_id,
            path = %target.display(),
            size = bytes.len(),
            "voice file downloaded"
        );
        Ok(target)
    }

    async fn cleanup(&self, path: &Path) {
        match tokio::fs::remove_file(path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to remove voice file")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage(dir: &Path) -> TelegramVoiceStorage {
        TelegramVoiceStorage::new(Client::new(), "token".into(), dir, Duration::from_secs(1))
    }

    #[test]
    fn target_path_is_sanitized() {
        let s = storage(Path::new("temp"));
        assert_eq!(s.target_path("AwAD-x_1"), Path::new("temp/AwAD-x_1.ogg"));
        assert_eq!(s.target_path("../etc"), Path::new("temp/___etc.ogg"));
    }

    #[tokio::test]
    async fn cleanup_removes_file_and_ignores_missing() {
        let dir = std::env::temp_dir().join(format!("voice-cleanup-{}", std::process::id()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let s = storage(&dir);
        let path = s.target_path("abc");
        tokio::fs::write(&path, b"ogg").await.unwrap();

        s.cleanup(&path).await;
        assert!(!path.exists());
        s.cleanup(&path).await;

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}
