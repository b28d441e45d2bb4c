use crate::config::{AiProviderKind, Config};
use crate::error::{Error, Result};
use crate::models::answer::EvaluationResult;
use crate::services::gigachat_service::GigaChatService;
use crate::services::scoring_prompt::ScoringPrompt;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::Value as JsonValue;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// One attempt against a language model. Retries live with the caller, so every
/// error returned here is treated as transient.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AiProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn evaluate(&self, prompt: &ScoringPrompt) -> Result<EvaluationResult>;

    async fn transcribe(&self, audio_path: &Path) -> Result<String>;
}

/// The evaluator scores answers; the transcriber turns voice into text. They differ
/// when the evaluator cannot transcribe (GigaChat).
#[derive(Clone)]
pub struct AiProviders {
    pub evaluator: Arc<dyn AiProvider>,
    pub transcriber: Arc<dyn AiProvider>,
}

pub fn build_ai_providers(config: &Config, client: Client) -> AiProviders {
    let openai: Arc<dyn AiProvider> = Arc::new(OpenAIService::from_config(config, client.clone()));
    match config.ai_provider {
        AiProviderKind::OpenAi => AiProviders {
            evaluator: openai.clone(),
            transcriber: openai,
        },
        AiProviderKind::GigaChat => AiProviders {
            evaluator: Arc::new(GigaChatService::from_config(config, client)),
            transcriber: openai,
        },
    }
}

/// Parses the model's JSON reply. Tolerates a surrounding ```json fence.
pub fn parse_evaluation(content: &str) -> Result<EvaluationResult> {
    let trimmed = content.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|s| s.strip_suffix("```"))
        .unwrap_or(trimmed)
        .trim();
    serde_json::from_str(body)
        .map_err(|e| Error::Provider(format!("Malformed evaluation payload: {}", e)))
}

pub(crate) fn chat_payload(model: &str, prompt: &ScoringPrompt) -> JsonValue {
    serde_json::json!({
        "model": model,
        "messages": [
            {"role": "system", "content": prompt.system},
            {"role": "user", "content": prompt.user}
        ],
        "temperature": 0.3,
        "max_tokens": 1000
    })
}

pub(crate) fn first_choice_content(body: &JsonValue) -> Result<&str> {
    body.get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .ok_or_else(|| Error::Provider("Invalid chat completion response format".to_string()))
}

#[derive(Clone)]
pub struct OpenAIService {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    transcription_model: String,
    language: String,
    timeout: Duration,
}

impl OpenAIService {
    pub fn from_config(config: &Config, client: Client) -> Self {
        Self {
            client,
            api_key: config.openai_api_key.clone(),
            base_url: config.openai_base_url.trim_end_matches('/').to_string(),
            model: config.openai_model.clone(),
            transcription_model: config.openai_transcription_model.clone(),
            language: config.transcription_language.clone(),
            timeout: config.ai_timeout(),
        }
    }

    async fn chat_openai(&self, payload: JsonValue) -> Result<String> {
        let res = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&payload)
            .timeout(self.timeout)
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(Error::Provider(format!("OpenAI API Error {}: {}", status, text)));
        }

        let body: JsonValue = res.json().await?;
        first_choice_content(&body).map(str::to_string)
    }
}

#[async_trait]
impl AiProvider for OpenAIService {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn evaluate(&self, prompt: &ScoringPrompt) -> Result<EvaluationResult> {
        let mut payload = chat_payload(&self.model, prompt);
        payload["response_format"] = serde_json::json!({ "type": "json_object" });
        let content = self.chat_openai(payload).await?;
        parse_evaluation(&content)
    }

    async fn transcribe(&self, audio_path: &Path) -> Result<String> {
        #[derive(serde::Deserialize)]
        struct TranscriptionResp {
            text: String,
        }

        let data = tokio::fs::read(audio_path).await?;
        let file_name = audio_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("voice.ogg")
            .to_string();
        let form = Form::new()
            .part("file", Part::bytes(data).file_name(file_name))
            .text("model", self.transcription_model.clone())
            .text("language", self.language.clone());

        let res = self
            .client
            .post(format!("{}/audio/transcriptions", self.base_url))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .timeout(self.timeout)
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(Error::Provider(format!("Transcription API Error {}: {}", status, text)));
        }

        let parsed: TranscriptionResp = res.json().await?;
        Ok(parsed.text.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_fenced_json() {
        let plain = r#"{"score": 7, "feedback": "ok", "is_correct": true}"#;
        let parsed = parse_evaluation(plain).unwrap();
        assert_eq!(parsed.score, 7);
        assert!(parsed.strengths.is_empty());

        let fenced = "```json\n{\"score\": 3, \"feedback\": \"meh\", \"is_correct\": false, \
                      \"improvements\": [\"depth\"]}\n```";
        let parsed = parse_evaluation(fenced).unwrap();
        assert_eq!(parsed.score, 3);
        assert_eq!(parsed.improvements, vec!["depth".to_string()]);
    }

    #[test]
    fn malformed_payload_is_a_provider_error() {
        assert!(matches!(
            parse_evaluation("the answer is fine"),
            Err(Error::Provider(_))
        ));
        assert!(matches!(
            parse_evaluation(r#"{"feedback": "no score"}"#),
            Err(Error::Provider(_))
        ));
    }

    #[test]
    fn chat_choice_content_is_extracted() {
        let body = serde_json::json!({"choices": [{"message": {"content": "{}"}}]});
        assert_eq!(first_choice_content(&body).unwrap(), "{}");
        assert!(first_choice_content(&serde_json::json!({"choices": []})).is_err());
    }
}
