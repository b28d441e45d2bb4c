use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::answer::EvaluationResult;
use crate::services::ai_service::{
    chat_payload, first_choice_content, parse_evaluation, AiProvider,
};
use crate::services::scoring_prompt::ScoringPrompt;
use crate::utils::time;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde_json::Value as JsonValue;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

const DEFAULT_TOKEN_TTL_SECS: i64 = 600;
const TOKEN_SAFETY_MARGIN_SECS: i64 = 30;

#[derive(Debug, Clone)]
struct AccessToken {
    value: String,
    expires_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct GigaChatService {
    client: Client,
    client_id: String,
    client_secret: String,
    auth_url: String,
    api_url: String,
    timeout: Duration,
    token: Arc<RwLock<Option<AccessToken>>>,
}

impl GigaChatService {
    pub fn new(
        client: Client,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        auth_url: impl Into<String>,
        api_url: &str,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            auth_url: auth_url.into(),
            api_url: api_url.trim_end_matches('/').to_string(),
            timeout,
            token: Arc::new(RwLock::new(None)),
        }
    }

    pub fn from_config(config: &Config, client: Client) -> Self {
        Self::new(
            client,
            config.gigachat_client_id.clone(),
            config.gigachat_client_secret.clone(),
            config.gigachat_auth_url.clone(),
            &config.gigachat_api_url,
            config.ai_timeout(),
        )
    }

    /// The cached token, if one is held and has not expired.
    async fn cached_token(&self) -> Option<String> {
        self.token
            .read()
            .await
            .as_ref()
            .filter(|token| time::now() < token.expires_at)
            .map(|token| token.value.clone())
    }

    async fn access_token(&self) -> Result<String> {
        if let Some(token) = self.cached_token().await {
            return Ok(token);
        }

        #[derive(serde::Deserialize)]
        struct TokenResp {
            access_token: String,
            expires_in: Option<i64>,
        }

        let res = self
            .client
            .post(&self.auth_url)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("grant_type", "client_credentials"),
            ])
            .timeout(self.timeout)
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(Error::Provider(format!("GigaChat auth failed: {}", res.status())));
        }

        let body: TokenResp = res.json().await?;
        let expires_at = token_expiry(time::now(), body.expires_in);
        *self.token.write().await = Some(AccessToken {
            value: body.access_token.clone(),
            expires_at,
        });
        Ok(body.access_token)
    }

    async fn invalidate_token(&self) {
        *self.token.write().await = None;
    }

    /// Maps a chat response status to success or a provider error.
    /// A 401 drops the cached token so the next attempt re-authenticates.
    async fn check_status(&self, status: StatusCode) -> Result<()> {
        match status {
            StatusCode::OK => Ok(()),
            StatusCode::UNAUTHORIZED => {
                self.invalidate_token().await;
                Err(Error::Provider("GigaChat token rejected".to_string()))
            }
            status => Err(Error::Provider(format!("GigaChat API error: {}", status))),
        }
    }
}

/// Token lifetime minus a safety margin, never shorter than the margin itself.
fn token_expiry(now: DateTime<Utc>, expires_in: Option<i64>) -> DateTime<Utc> {
    let secs = expires_in.unwrap_or(DEFAULT_TOKEN_TTL_SECS);
    let ttl = (secs - TOKEN_SAFETY_MARGIN_SECS).max(TOKEN_SAFETY_MARGIN_SECS);
    now + chrono::Duration::seconds(ttl)
}

#[async_trait]
impl AiProvider for GigaChatService {
    fn name(&self) -> &'static str {
        "gigachat"
    }

    async fn evaluate(&self, prompt: &ScoringPrompt) -> Result<EvaluationResult> {
        let token = self.access_token().await?;
        let payload = chat_payload("GigaChat:latest", prompt);

        let res = self
            .client
            .post(format!("{}/chat/completions", self.api_url))
            .bearer_auth(token)
            .json(&payload)
            .timeout(self.timeout)
            .send()
            .await?;

        self.check_status(res.status()).await?;
        let body: JsonValue = res.json().await?;
        parse_evaluation(first_choice_content(&body)?)
    }

    async fn transcribe(&self, _audio_path: &Path) -> Result<String> {
        Err(Error::Provider(
            "GigaChat does not support audio transcription".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_expiry_keeps_a_margin() {
        let now = time::now();
        assert_eq!(token_expiry(now, Some(1800)), now + chrono::Duration::seconds(1770));
        assert_eq!(token_expiry(now, None), now + chrono::Duration::seconds(570));
        assert_eq!(token_expiry(now, Some(10)), now + chrono::Duration::seconds(30));
    }

    fn service() -> GigaChatService {
        GigaChatService::new(
            Client::new(),
            "id",
            "secret",
            "http://localhost/oauth",
            "http://localhost/api/v1/",
            Duration::from_secs(1),
        )
    }

    async fn seed_token(service: &GigaChatService, expires_at: DateTime<Utc>) {
        *service.token.write().await = Some(AccessToken {
            value: "cached".to_string(),
            expires_at,
        });
    }

    #[tokio::test]
    async fn unauthorized_clears_the_cached_token() {
        let service = service();
        seed_token(&service, time::now() + chrono::Duration::minutes(5)).await;
        assert_eq!(service.cached_token().await.as_deref(), Some("cached"));

        let err = service.check_status(StatusCode::UNAUTHORIZED).await.unwrap_err();

        assert!(matches!(err, Error::Provider(_)));
        assert!(service.token.read().await.is_none());
    }

    #[tokio::test]
    async fn other_errors_keep_the_cached_token() {
        let service = service();
        seed_token(&service, time::now() + chrono::Duration::minutes(5)).await;

        assert!(service.check_status(StatusCode::TOO_MANY_REQUESTS).await.is_err());
        assert!(service.check_status(StatusCode::OK).await.is_ok());
        assert_eq!(service.cached_token().await.as_deref(), Some("cached"));
    }

    #[tokio::test]
    async fn expired_token_is_not_reused() {
        let service = service();
        seed_token(&service, time::now() - chrono::Duration::seconds(1)).await;

        assert!(service.cached_token().await.is_none());
        assert_eq!(service.api_url, "http://localhost/api/v1");
    }
}
